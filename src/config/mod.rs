//! Configuration module for instabot.
//!
//! This module wires together the data models and loading/validation helpers used
//! throughout the crate. Import from here for a convenient, stable API.
//!
//! Example:
//! use instabot::config::{Config, load_from_path};
//!
//! let cfg = load_from_path("instabot.json", &registry.get_actions_args())?;

pub mod loader;
pub mod models;

// Re-export core data models
pub use models::{ArgsMap, Config, SessionConfig};

// Re-export loader utilities
pub use loader::{
    generate_schema, load_from_path, load_from_reader, load_from_str, validate_config,
    write_schema_to_writer,
};
