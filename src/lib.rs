//! # Lectern API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for a small course
//! catalog (courses, lessons, assignments) plus a transactional email
//! service that renders provider-branded confirmation emails.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Authentication and role checks
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Register, login, refresh
//! │   ├── users/       # Credential store queries
//! │   ├── courses/     # Courses
//! │   ├── lessons/     # Lessons (owned by a course)
//! │   ├── assignments/ # Assignments (owned by a course)
//! │   └── notifications/ # Provider emails and their delivery log
//! └── utils/           # Mail delivery
//! ```
//!
//! ## Authentication
//!
//! - **Access token**: short-lived (default 15 minutes), carries user id and role
//! - **Refresh token**: long-lived (default 7 days), stored on the user
//!
//! Protected routes need `Authorization: Bearer <access token>` and an
//! `x-user-email` header naming the token's owner. An access token is only
//! honoured while its owner still holds a valid refresh token.
//!
//! The first account registered becomes `admin`; all later ones are
//! `student`. Catalog writes are admin-only, catalog reads are public.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use lectern_auth;
pub use lectern_config;
pub use lectern_core;
pub use lectern_db;
pub use lectern_models;
