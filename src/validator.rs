use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use lectern_core::{AppError, ErrorCode};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::coded(
            ErrorCode::ValidationError,
            "Missing 'Content-Type: application/json' header",
        );
    }

    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::coded(ErrorCode::ValidationError, format!("{} is required", field));
    }

    if error_msg.contains("invalid type") {
        return AppError::coded(ErrorCode::ValidationError, "Invalid field type in request");
    }

    AppError::coded(ErrorCode::ValidationError, "Invalid request body")
}

/// JSON body extractor that also runs `validator` rules.
///
/// Both malformed bodies and rule violations are rejected with
/// `400 VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate().map_err(|errors| {
            AppError::with_code(ErrorCode::ValidationError, anyhow!(format_errors(&errors)))
        })?;

        Ok(ValidatedJson(value))
    }
}
