//! Enumeration service
//!
//! Validates input against the settings, then drives a decision engine or a
//! single scripted run.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::application::{
    AlgorithmKind, ApplicationError, ApplicationResult, DecisionEngine, ScriptedDecider,
};
use crate::config::Settings;
use crate::domain::{Branch, Comparison, DecisionTree, ReplayQueue};

/// Result of a full enumeration.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub algorithm: AlgorithmKind,
    pub tree: DecisionTree<String>,
    /// Number of algorithm invocations needed
    pub runs: usize,
}

/// Result of replaying a single decision path.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Comparisons asked while the path lasted, with the answer given
    pub steps: Vec<(Comparison<String>, Branch)>,
    /// Data after the algorithm returned
    pub data: Vec<String>,
    /// Comparisons asked after the path ran out (answered `No`)
    pub unscripted: usize,
    /// Path decisions the algorithm never asked for
    pub unused: usize,
    /// First step whose answer contradicts an earlier one; the tree prunes it
    pub contradicted: Option<usize>,
}

impl Trace {
    /// Index of the first step that contradicts an earlier step's answer.
    fn first_contradiction(steps: &[(Comparison<String>, Branch)]) -> Option<usize> {
        let asserted: Vec<Comparison<String>> = steps
            .iter()
            .map(|(comparison, branch)| match branch {
                Branch::Yes => comparison.clone(),
                Branch::No => comparison.negate(),
            })
            .collect();
        (0..asserted.len()).find(|&k| {
            asserted[..k]
                .iter()
                .any(|earlier| asserted[k].contradicts(earlier))
        })
    }
}

/// Service for enumerating decision trees of the built-in algorithms.
pub struct EnumerationService {
    settings: Settings,
}

impl EnumerationService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the complete decision tree of `kind` on `elements`.
    #[instrument(level = "debug", skip(self))]
    pub fn enumerate(&self, kind: AlgorithmKind, elements: &[String]) -> ApplicationResult<Enumeration> {
        self.validate(elements)?;

        let mut engine = DecisionEngine::new(kind.build::<String>(), elements.to_vec());
        engine.run_to_completion()?;
        let runs = engine.runs();
        let tree = engine.into_tree()?;
        debug!("enumerate: {} runs, {} orderings", runs, tree.leaf_count());

        Ok(Enumeration {
            algorithm: kind,
            tree,
            runs,
        })
    }

    /// Run `kind` once, answering comparisons from `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn trace(
        &self,
        kind: AlgorithmKind,
        elements: &[String],
        path: &[Branch],
    ) -> ApplicationResult<Trace> {
        self.validate(elements)?;

        let mut data = elements.to_vec();
        let mut decider = ScriptedDecider::new(path.iter().copied().collect::<ReplayQueue>());
        kind.build::<String>().run(&mut data, &mut decider);

        let unscripted = decider.unscripted();
        let unused = decider.remaining();
        if unused > 0 {
            warn!("trace: {} decision(s) of the path were never asked for", unused);
        }

        let steps = decider.into_posed();
        let contradicted = Trace::first_contradiction(&steps);
        if let Some(k) = contradicted {
            warn!("trace: step {} contradicts an earlier answer, this branch is pruned", k + 1);
        }

        Ok(Trace {
            steps,
            data,
            unscripted,
            unused,
            contradicted,
        })
    }

    fn validate(&self, elements: &[String]) -> ApplicationResult<()> {
        let max = self.settings.max_elements;
        if elements.len() > max {
            return Err(ApplicationError::DatasetTooLarge {
                len: elements.len(),
                max,
            });
        }

        let mut seen = HashSet::new();
        for element in elements {
            if !seen.insert(element.as_str()) {
                return Err(ApplicationError::DuplicateElement(element.clone()));
            }
        }
        Ok(())
    }
}
