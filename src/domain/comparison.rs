//! Comparison values: operators, negation and equivalence

use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Anything an algorithm under test can shuffle around and compare.
pub trait Element: Clone + PartialEq + fmt::Debug + fmt::Display {}

impl<T: Clone + PartialEq + fmt::Debug + fmt::Display> Element for T {}

/// Relational operator of a comparison.
///
/// `NotEqual` never comes from algorithm code directly in practice, it is the
/// negation of `Equal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Greater,
    Less,
    Equal,
    NotEqual,
}

impl Operator {
    /// Operator that holds exactly when `self` does not (for distinct operands).
    pub fn negate(self) -> Self {
        match self {
            Operator::Greater => Operator::Less,
            Operator::Less => Operator::Greater,
            Operator::Equal => Operator::NotEqual,
            Operator::NotEqual => Operator::Equal,
        }
    }

    /// Operator that expresses the same relation with swapped operands.
    pub fn converse(self) -> Self {
        match self {
            Operator::Greater => Operator::Less,
            Operator::Less => Operator::Greater,
            Operator::Equal => Operator::Equal,
            Operator::NotEqual => Operator::NotEqual,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Operator::Greater),
            "<" => Ok(Operator::Less),
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            other => Err(DomainError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// An atomic relational test between two elements.
///
/// `PartialEq` is structural: same operands in the same order and the same
/// operator. Use [`Comparison::is_equivalent`] for logical equivalence.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<T> {
    left: T,
    op: Operator,
    right: T,
}

impl<T: Element> Comparison<T> {
    pub fn new(left: T, op: Operator, right: T) -> Self {
        Self { left, op, right }
    }

    pub fn left(&self) -> &T {
        &self.left
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn right(&self) -> &T {
        &self.right
    }

    /// Same operands, negated operator: `a > b` becomes `a < b`.
    pub fn negate(&self) -> Self {
        Self::new(self.left.clone(), self.op.negate(), self.right.clone())
    }

    /// True if both comparisons state the same relation, either literally or
    /// with swapped operands (`a > b` is equivalent to `b < a`).
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.op == other.op && self.left == other.left && self.right == other.right {
            return true;
        }
        self.op == other.op.converse() && self.left == other.right && self.right == other.left
    }

    /// True if `other` states exactly the opposite of `self`.
    pub fn contradicts(&self, other: &Self) -> bool {
        self.negate().is_equivalent(other)
    }
}

impl<T: Element> fmt::Display for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
