pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod pages;
pub mod service;

pub use api::{router, AppState};
pub use client::BackendClient;
pub use config::AppConfig;
pub use service::DocumentIntake;
