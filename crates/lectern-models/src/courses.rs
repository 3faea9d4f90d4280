//! Course catalog models and DTOs.
//!
//! A [`Course`] keeps ordered reference lists of its lesson and assignment
//! ids; [`CourseWithContent`] is the read model with those references
//! resolved inline.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    /// Admin who created the course
    pub created_by: Uuid,
    pub lesson_ids: Vec<Uuid>,
    pub assignment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub youtube_link: String,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithContent {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_by: Uuid,
    pub lessons: Vec<Lesson>,
    pub assignments: Vec<Assignment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseWithContent {
    /// Resolves the course's reference lists against already-loaded rows.
    ///
    /// Output order follows `lesson_ids` / `assignment_ids`. References with
    /// no matching row are skipped.
    pub fn assemble(
        course: Course,
        lessons: &HashMap<Uuid, Lesson>,
        assignments: &HashMap<Uuid, Assignment>,
    ) -> Self {
        let lessons = course
            .lesson_ids
            .iter()
            .filter_map(|id| lessons.get(id).cloned())
            .collect();
        let assignments = course
            .assignment_ids
            .iter()
            .filter_map(|id| assignments.get(id).cloned())
            .collect();

        Self {
            id: course.id,
            name: course.name,
            code: course.code,
            created_by: course.created_by,
            lessons,
            assignments,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(
        length(max = 200, message = "Name must be at most 200 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,
    #[validate(
        length(max = 50, message = "Code must be at most 50 characters"),
        custom(function = "not_blank", message = "Code must not be blank")
    )]
    #[schema(example = "CS101")]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(
        length(max = 200, message = "Name must be at most 200 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(max = 50, message = "Code must be at most 50 characters"),
        custom(function = "not_blank", message = "Code must not be blank")
    )]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonDto {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(url(message = "youtubeLink must be a valid URL"))]
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    pub youtube_link: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonDto {
    #[validate(custom(function = "not_blank", message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(url(message = "youtubeLink must be a valid URL"))]
    pub youtube_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(url(message = "link must be a valid URL"))]
    pub link: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(custom(function = "not_blank", message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(url(message = "link must be a valid URL"))]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(course_id: Uuid, title: &str) -> Lesson {
        Lesson {
            id: Uuid::new_v4(),
            title: title.to_string(),
            youtube_link: "https://youtu.be/x".to_string(),
            course_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_follows_reference_order() {
        let course_id = Uuid::new_v4();
        let first = lesson(course_id, "Intro");
        let second = lesson(course_id, "Ownership");

        let course = Course {
            id: course_id,
            name: "Rust".to_string(),
            code: "RS101".to_string(),
            created_by: Uuid::new_v4(),
            lesson_ids: vec![second.id, first.id],
            assignment_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let lessons: HashMap<Uuid, Lesson> = [first.clone(), second.clone()]
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let assembled = CourseWithContent::assemble(course, &lessons, &HashMap::new());
        assert_eq!(assembled.lessons, vec![second, first]);
        assert!(assembled.assignments.is_empty());
    }

    #[test]
    fn test_assemble_skips_dangling_references() {
        let course = Course {
            id: Uuid::new_v4(),
            name: "Rust".to_string(),
            code: "RS101".to_string(),
            created_by: Uuid::new_v4(),
            lesson_ids: vec![Uuid::new_v4()],
            assignment_ids: vec![Uuid::new_v4()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let assembled = CourseWithContent::assemble(course, &HashMap::new(), &HashMap::new());
        assert!(assembled.lessons.is_empty());
        assert!(assembled.assignments.is_empty());
    }

    #[test]
    fn test_create_course_dto_validation() {
        let valid = CreateCourseDto {
            name: "Algorithms".to_string(),
            code: "CS201".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_code = CreateCourseDto {
            name: "Algorithms".to_string(),
            code: "".to_string(),
        };
        assert!(empty_code.validate().is_err());
    }

    #[test]
    fn test_whitespace_only_fields_rejected() {
        let course = CreateCourseDto {
            name: "Algorithms".to_string(),
            code: "   ".to_string(),
        };
        assert!(course.validate().is_err());

        let update = UpdateCourseDto {
            name: Some(" \t ".to_string()),
            code: None,
        };
        assert!(update.validate().is_err());

        let lesson = CreateLessonDto {
            title: "  ".to_string(),
            youtube_link: "https://www.youtube.com/watch?v=abc".to_string(),
        };
        assert!(lesson.validate().is_err());

        let assignment = UpdateAssignmentDto {
            title: Some(" ".to_string()),
            link: None,
        };
        assert!(assignment.validate().is_err());
    }

    #[test]
    fn test_update_course_dto_allows_partial() {
        let dto = UpdateCourseDto {
            name: None,
            code: Some("CS202".to_string()),
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateCourseDto {
            name: Some("".to_string()),
            code: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_lesson_dto_reads_camel_case() {
        let dto: CreateLessonDto = serde_json::from_str(
            r#"{"title":"Intro","youtubeLink":"https://www.youtube.com/watch?v=abc"}"#,
        )
        .unwrap();
        assert_eq!(dto.youtube_link, "https://www.youtube.com/watch?v=abc");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_assignment_dto_rejects_bad_link() {
        let dto = CreateAssignmentDto {
            title: "Homework 1".to_string(),
            link: "not a url".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
