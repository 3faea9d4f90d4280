use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use lectern_core::AppError;

use crate::modules::assignments::model::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};

pub(crate) const ASSIGNMENT_COLUMNS: &str = "id, title, link, course_id, created_at, updated_at";

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db))]
    pub async fn create_assignment(
        db: &PgPool,
        course_id: Uuid,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments (title, link, course_id)
             VALUES ($1, $2, $3)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(dto.link.trim())
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE courses
             SET assignment_ids = array_append(assignment_ids, $2), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(course_id)
        .bind(assignment.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn update_assignment(
        db: &PgPool,
        id: Uuid,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "UPDATE assignments
             SET title = COALESCE($2, title), link = COALESCE($3, link), updated_at = NOW()
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.link.as_deref().map(str::trim))
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let course_id = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM assignments WHERE id = $1 RETURNING course_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))?;

        sqlx::query(
            "UPDATE courses
             SET assignment_ids = array_remove(assignment_ids, $2), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(course_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
