use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use lectern_core::AppError;

use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};

pub(crate) const LESSON_COLUMNS: &str = "id, title, youtube_link, course_id, created_at, updated_at";

pub struct LessonService;

impl LessonService {
    /// Inserts the lesson and appends its id to the parent course in one
    /// transaction. The course row is locked first so concurrent creations
    /// under the same course append in commit order.
    #[instrument(skip(db))]
    pub async fn create_lesson(
        db: &PgPool,
        course_id: Uuid,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "INSERT INTO lessons (title, youtube_link, course_id)
             VALUES ($1, $2, $3)
             RETURNING {LESSON_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(dto.youtube_link.trim())
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE courses
             SET lesson_ids = array_append(lesson_ids, $2), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(course_id)
        .bind(lesson.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn update_lesson(
        db: &PgPool,
        id: Uuid,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        sqlx::query_as::<_, Lesson>(&format!(
            "UPDATE lessons
             SET title = COALESCE($2, title),
                 youtube_link = COALESCE($3, youtube_link),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {LESSON_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.youtube_link.as_deref().map(str::trim))
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))
    }

    /// Deletes the lesson and removes its id from the parent course in one
    /// transaction.
    #[instrument(skip(db))]
    pub async fn delete_lesson(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let course_id =
            sqlx::query_scalar::<_, Uuid>("DELETE FROM lessons WHERE id = $1 RETURNING course_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))?;

        sqlx::query(
            "UPDATE courses
             SET lesson_ids = array_remove(lesson_ids, $2), updated_at = NOW()
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
