pub mod controller;
pub mod model;
pub mod router;
pub mod service;
pub mod templates;

pub use router::init_notifications_router;
