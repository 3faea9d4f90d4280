//! Feature modules.
//!
//! Each module follows the same layout: `controller.rs` (HTTP handlers),
//! `service.rs` (queries and business rules), `model.rs` (types),
//! `router.rs` (route table).

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod lessons;
pub mod notifications;
pub mod users;
