//! Lesson data models and DTOs.

pub use lectern_models::courses::{CreateLessonDto, Lesson, UpdateLessonDto};
