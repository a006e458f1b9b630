//! Configuration module
//!
//! TOML-backed settings plus environment overrides for the secrets.

pub mod config;

pub use config::Config;
