//! Algorithms under test and the decision capability they call into
//!
//! An algorithm never uses native relational operators on its elements; every
//! comparison goes through [`Decide`], which lets the engine choose the outcome.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::application::ApplicationError;
use crate::domain::{Branch, Comparison, Element, Operator, ReplayQueue};

/// Answers relational questions on behalf of an algorithm.
pub trait Decide<T: Element> {
    fn decide(&mut self, left: &T, op: Operator, right: &T) -> bool;

    fn gt(&mut self, left: &T, right: &T) -> bool {
        self.decide(left, Operator::Greater, right)
    }

    fn lt(&mut self, left: &T, right: &T) -> bool {
        self.decide(left, Operator::Less, right)
    }

    fn eq(&mut self, left: &T, right: &T) -> bool {
        self.decide(left, Operator::Equal, right)
    }
}

/// A comparison-driven algorithm over a mutable slice.
///
/// Implementations must be deterministic given identical decisions and must not
/// have side effects beyond mutating `data`.
pub trait Algorithm<T: Element> {
    fn name(&self) -> &'static str;

    fn run(&self, data: &mut [T], decide: &mut dyn Decide<T>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl<T: Element> Algorithm<T> for BubbleSort {
    fn name(&self) -> &'static str {
        "bubble"
    }

    fn run(&self, data: &mut [T], decide: &mut dyn Decide<T>) {
        for i in (0..data.len().saturating_sub(1)).rev() {
            for j in 0..=i {
                if decide.gt(&data[j], &data[j + 1]) {
                    data.swap(j, j + 1);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl<T: Element> Algorithm<T> for InsertionSort {
    fn name(&self) -> &'static str {
        "insertion"
    }

    fn run(&self, data: &mut [T], decide: &mut dyn Decide<T>) {
        for i in 1..data.len() {
            let elem = data[i].clone();
            let mut j = i;
            while j > 0 && decide.gt(&data[j - 1], &elem) {
                data[j] = data[j - 1].clone();
                j -= 1;
            }
            data[j] = elem;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellSort;

impl<T: Element> Algorithm<T> for ShellSort {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn run(&self, data: &mut [T], decide: &mut dyn Decide<T>) {
        let mut gap = data.len() / 2;
        while gap > 0 {
            for i in gap..data.len() {
                let temp = data[i].clone();
                let mut j = i;
                while j >= gap && decide.gt(&data[j - gap], &temp) {
                    data[j] = data[j - gap].clone();
                    j -= gap;
                }
                data[j] = temp;
            }
            gap /= 2;
        }
    }
}

/// Algorithm selection, as used on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    #[default]
    Bubble,
    Insertion,
    Shell,
}

impl AlgorithmKind {
    pub fn build<T: Element>(self) -> Box<dyn Algorithm<T>> {
        match self {
            AlgorithmKind::Bubble => Box::new(BubbleSort),
            AlgorithmKind::Insertion => Box::new(InsertionSort),
            AlgorithmKind::Shell => Box::new(ShellSort),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Bubble => "bubble",
            AlgorithmKind::Insertion => "insertion",
            AlgorithmKind::Shell => "shell",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(AlgorithmKind::Bubble),
            "insertion" => Ok(AlgorithmKind::Insertion),
            "shell" => Ok(AlgorithmKind::Shell),
            _ => Err(ApplicationError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Answers every question with the elements' real ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeOrder;

impl<T: Element + PartialOrd> Decide<T> for NativeOrder {
    fn decide(&mut self, left: &T, op: Operator, right: &T) -> bool {
        match op {
            Operator::Greater => left > right,
            Operator::Less => left < right,
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
        }
    }
}

/// Answers from a fixed decision script and records what was asked.
///
/// Once the script runs out every further question is answered `false` and
/// counted as unscripted.
#[derive(Debug, Clone)]
pub struct ScriptedDecider<T> {
    script: ReplayQueue,
    posed: Vec<(Comparison<T>, Branch)>,
    unscripted: usize,
}

impl<T: Element> ScriptedDecider<T> {
    pub fn new(script: ReplayQueue) -> Self {
        Self {
            script,
            posed: Vec::new(),
            unscripted: 0,
        }
    }

    /// Comparisons answered from the script, with the answer given.
    pub fn posed(&self) -> &[(Comparison<T>, Branch)] {
        &self.posed
    }

    pub fn into_posed(self) -> Vec<(Comparison<T>, Branch)> {
        self.posed
    }

    pub fn unscripted(&self) -> usize {
        self.unscripted
    }

    /// Scripted decisions the algorithm never asked for.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl<T: Element> Decide<T> for ScriptedDecider<T> {
    fn decide(&mut self, left: &T, op: Operator, right: &T) -> bool {
        match self.script.dequeue() {
            Some(decision) => {
                let comparison = Comparison::new(left.clone(), op, right.clone());
                trace!("scripted: {} -> {}", comparison, decision);
                self.posed.push((comparison, Branch::from(decision)));
                decision
            }
            None => {
                self.unscripted += 1;
                false
            }
        }
    }
}
