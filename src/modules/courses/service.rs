use std::collections::HashMap;

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use lectern_core::AppError;

use crate::modules::assignments::service::ASSIGNMENT_COLUMNS;
use crate::modules::courses::model::{
    Assignment, Course, CourseWithContent, CreateCourseDto, Lesson, UpdateCourseDto,
};
use crate::modules::lessons::service::LESSON_COLUMNS;

pub(crate) const COURSE_COLUMNS: &str =
    "id, name, code, created_by, lesson_ids, assignment_ids, created_at, updated_at";

fn map_code_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow::anyhow!("A course with this code already exists"));
    }
    AppError::from(e)
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn create_course(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (name, code, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.code.trim())
        .bind(created_by)
        .fetch_one(db)
        .await
        .map_err(map_code_conflict)?;

        Ok(course)
    }

    /// All courses, oldest first, with lessons and assignments resolved.
    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<CourseWithContent>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at, id"
        ))
        .fetch_all(db)
        .await?;

        let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
        let (lessons, assignments) = Self::load_content(db, &course_ids).await?;

        Ok(courses
            .into_iter()
            .map(|course| CourseWithContent::assemble(course, &lessons, &assignments))
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: Uuid) -> Result<CourseWithContent, AppError> {
        let course = Self::find_course(db, id).await?;
        let (lessons, assignments) = Self::load_content(db, &[course.id]).await?;
        Ok(CourseWithContent::assemble(course, &lessons, &assignments))
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET name = COALESCE($2, name), code = COALESCE($3, code), updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.code.as_deref().map(str::trim))
        .fetch_optional(db)
        .await
        .map_err(map_code_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        // TODO: decide whether deleting a course should also delete its lessons
        // and assignments; today they are left behind with a dangling course_id.
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }

    async fn find_course(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    /// Loads every lesson and assignment belonging to `course_ids`, keyed by id.
    async fn load_content(
        db: &PgPool,
        course_ids: &[Uuid],
    ) -> Result<(HashMap<Uuid, Lesson>, HashMap<Uuid, Assignment>), AppError> {
        if course_ids.is_empty() {
            return Ok((HashMap::new(), HashMap::new()));
        }

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ANY($1)"
        ))
        .bind(course_ids)
        .fetch_all(db)
        .await?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE course_id = ANY($1)"
        ))
        .bind(course_ids)
        .fetch_all(db)
        .await?;

        Ok((
            lessons.into_iter().map(|l| (l.id, l)).collect(),
            assignments.into_iter().map(|a| (a.id, a)).collect(),
        ))
    }
}
