//! Core types shared by the linkdiff crates.
//!
//! This crate provides:
//! - Unified error types for the extraction and comparison pipeline
//! - Layered application configuration

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
