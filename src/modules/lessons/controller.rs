use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use lectern_core::{AppError, ErrorResponse};

use crate::middleware::role::RequireAdmin;
use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/courses/{id}/lessons",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created and appended to the course", body = Lesson),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = LessonService::create_lesson(&state.db, course_id, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    put,
    path = "/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::update_lesson(&state.db, id, dto).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 204, description = "Lesson deleted and removed from its course"),
        (status = 403, description = "Forbidden - requires admin", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LessonService::delete_lesson(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
