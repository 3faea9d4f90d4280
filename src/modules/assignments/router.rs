use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{create_assignment, delete_assignment, update_assignment};

/// Routes nested under `/courses/{id}/assignments`.
pub fn init_course_assignments_router() -> Router<AppState> {
    Router::new().route("/", post(create_assignment))
}

pub fn init_assignments_router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_assignment).delete(delete_assignment))
}
