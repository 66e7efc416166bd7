//! dtgen: decision trees of comparison algorithms
//!
//! A [`application::DecisionEngine`] intercepts every comparison an algorithm
//! makes, explores both outcomes by restarting and replaying the algorithm, prunes
//! outcomes that contradict earlier answers, and yields a [`domain::DecisionTree`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
