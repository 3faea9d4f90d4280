//! Notification models.
//!
//! Re-exports the persisted record and request body from `lectern-models`.

pub use lectern_models::notifications::*;
