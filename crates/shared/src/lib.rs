//! Shared errors and configuration for the SWIFT code registry.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application-wide error types with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;


pub use config::{AppConfig, DatabaseConfig, RateLimitConfig, ServerConfig};
pub use error::{AppError, AppResult};
