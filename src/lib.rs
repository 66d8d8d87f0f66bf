pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod response;
pub mod routing;
pub mod testing;

pub use app::App;
pub use cache::CacheService;
pub use config::Config;
pub use error::ApiError;
pub use response::ApiResponse;
pub use testing::{TestApp, TestClient, TestResponse};
