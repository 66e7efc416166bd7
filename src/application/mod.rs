//! Application layer: algorithms, the decision engine, renderers and services
//!
//! This layer orchestrates domain logic; it performs no I/O of its own.

pub mod algorithms;
pub mod engine;
pub mod error;
pub mod render;
pub mod services;

pub use algorithms::{
    Algorithm, AlgorithmKind, BubbleSort, Decide, InsertionSort, NativeOrder, ScriptedDecider,
    ShellSort,
};
pub use engine::{DecisionEngine, Mode};
pub use error::{ApplicationError, ApplicationResult};
pub use render::{ForestRenderer, OutputFormat, Renderer, TextRenderer};
