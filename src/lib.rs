pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;
pub mod views;

pub use api::{CourseApi, HttpCourseApi};
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::Session;
