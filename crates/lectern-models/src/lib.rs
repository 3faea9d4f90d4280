//! # Lectern Models
//!
//! Domain models and DTOs for the Lectern API.
//!
//! This crate holds the database entities, request/response bodies and their
//! validation rules.
//!
//! # Modules
//!
//! - [`users`]: Users, roles and authentication bodies
//! - [`courses`]: Courses, lessons and assignments
//! - [`notifications`]: Transactional email records and requests
//!
//! # Example
//!
//! ```ignore
//! use lectern_models::users::{RegisterRequest, UserRole};
//! use lectern_models::courses::CourseWithContent;
//! ```

pub mod courses;
pub mod notifications;
pub mod users;
pub mod validation;

pub use courses::{
    Assignment, Course, CourseWithContent, CreateAssignmentDto, CreateCourseDto, CreateLessonDto,
    Lesson, UpdateAssignmentDto, UpdateCourseDto, UpdateLessonDto,
};

pub use notifications::{Notification, NotificationStatus, SendEmailRequest, SendEmailResponse};

pub use users::{
    AccessTokenResponse, AuthResponse, LoginRequest, PublicUser, RefreshTokenRequest,
    RegisterRequest, User, UserRole,
};
