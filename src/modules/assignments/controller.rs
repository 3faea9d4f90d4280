use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use lectern_core::{AppError, ErrorResponse};

use crate::middleware::role::RequireAdmin;
use crate::modules::assignments::model::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/courses/{id}/assignments",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created and appended to the course", body = Assignment),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = AssignmentService::create_assignment(&state.db, course_id, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    put,
    path = "/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::update_assignment(&state.db, id, dto).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted and removed from its course"),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AssignmentService::delete_assignment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
