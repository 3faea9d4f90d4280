use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use lectern_core::{ErrorCode, ErrorResponse};
use lectern_models::{
    AccessTokenResponse, Assignment, AuthResponse, Course, CourseWithContent, CreateAssignmentDto,
    CreateCourseDto, CreateLessonDto, Lesson, LoginRequest, Notification, NotificationStatus,
    PublicUser, RefreshTokenRequest, RegisterRequest, SendEmailRequest, SendEmailResponse,
    UpdateAssignmentDto, UpdateCourseDto, UpdateLessonDto, UserRole,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::update_assignment,
        crate::modules::assignments::controller::delete_assignment,
        crate::modules::notifications::controller::send_email,
        crate::modules::notifications::controller::send_email_spanish,
        crate::modules::notifications::controller::send_email_portuguese,
        crate::modules::notifications::controller::get_transactions,
    ),
    components(
        schemas(
            ErrorCode,
            ErrorResponse,
            UserRole,
            PublicUser,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            AccessTokenResponse,
            Course,
            CourseWithContent,
            CreateCourseDto,
            UpdateCourseDto,
            Lesson,
            CreateLessonDto,
            UpdateLessonDto,
            Assignment,
            CreateAssignmentDto,
            UpdateAssignmentDto,
            Notification,
            NotificationStatus,
            SendEmailRequest,
            SendEmailResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Courses", description = "Course catalog"),
        (name = "Lessons", description = "Course lessons"),
        (name = "Assignments", description = "Course assignments"),
        (name = "Notifications", description = "Transactional provider emails")
    ),
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "Course catalog and transactional email API built with Rust, Axum, and PostgreSQL. Protected routes require a bearer token and an `x-user-email` header.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
