//! Configuration module for AIMS
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Loading the field-encryption key from the environment

pub mod paths;
pub mod settings;

pub use paths::AimsPaths;
pub use settings::Settings;
