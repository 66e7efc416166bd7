//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services are configured from `Settings` but are themselves concrete structs, not traits.

mod enumeration;

pub use enumeration::{Enumeration, EnumerationService, Trace};
