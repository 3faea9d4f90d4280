pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_course_lessons_router, init_lessons_router};
