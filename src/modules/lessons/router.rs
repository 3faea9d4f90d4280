use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{create_lesson, delete_lesson, update_lesson};

/// Routes nested under `/courses/{id}/lessons`.
pub fn init_course_lessons_router() -> Router<AppState> {
    Router::new().route("/", post(create_lesson))
}

pub fn init_lessons_router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_lesson).delete(delete_lesson))
}
