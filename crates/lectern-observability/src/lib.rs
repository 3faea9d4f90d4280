//! Lectern observability
//!
//! - Structured logging via `tracing` (console plus rolling JSON file)
//! - Prometheus metrics via `metrics`
//! - Request logging and metrics middleware
//!
//! Metrics can be switched off at runtime with `OBSERVABILITY_ENABLED=false`;
//! the tracking helpers then become no-ops.
//!
//! # Examples
//!
//! ```no_run
//! use lectern_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing()?;
//!     let _handle = init_metrics()?;
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{init_tracing, logging_middleware};
pub use self::metrics::{
    init_metrics, is_observability_enabled, metrics_middleware, metrics_router,
    track_auth_rejection, track_jwt_issued, track_notification, track_user_login_failure,
    track_user_login_success, track_user_registered,
};
