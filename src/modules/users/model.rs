//! User data models and DTOs.
//!
//! Re-exports the user models from the `lectern-models` crate.

pub use lectern_models::users::*;
