//! # Lectern Core
//!
//! Core types shared by every Lectern crate:
//!
//! - [`errors`]: [`AppError`] and the [`ErrorCode`] taxonomy, rendered as JSON responses
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use lectern_core::{AppError, ErrorCode, hash_password};
//!
//! let err = AppError::coded(ErrorCode::TokenMissing, "Access token is missing");
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use password::{hash_password, verify_password};
