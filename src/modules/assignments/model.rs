//! Assignment data models and DTOs.

pub use lectern_models::courses::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};
