//! Course data models and DTOs.
//!
//! Re-exports the catalog models from the `lectern-models` crate.

pub use lectern_models::courses::*;
