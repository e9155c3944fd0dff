#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! instabot — action registry and run loop for an Instagram interaction bot.
//!
//! This crate organizes the codebase into cohesive modules and exposes a convenient prelude
//! for downstream crates/binaries. Most implementation details live under the internal modules:
//! - `actions`: Action declarations, the registry/selector, and the run loops.
//! - `config`: Configuration models, loader, and schema helpers.
//! - `executor`: Collaborator seams (device, storage, interactor) and the job safety wrapper.
//! - `session`: Session counters and limits.
//! - `utils`: Count/range value parsing.
//!
//! Use `instabot::prelude::*` to bring commonly used items into scope quickly.

/// Public module: actions (declarations, registry, run loops).
pub mod actions;
/// Public module: configuration (models, loader, schema helpers).
pub mod config;
/// Public module: errors raised by action selection and binding.
pub mod error;
/// Public module: execution seams and the job safety wrapper.
pub mod executor;
/// Public module: session counters and limits.
pub mod session;
/// Public module: utilities (count/range values).
pub mod utils;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Parse a level name (trace|debug|info|warn|error).
pub fn parse_level(s: &str) -> Option<tracing::Level> {
    use tracing::Level;
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize tracing (logging).
/// - Uses `level` if given, else honors the `RUST_LOG` environment variable.
/// - Falls back to `info` level.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::fmt;

    let level = level
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .and_then(|s| parse_level(&s))
        .unwrap_or(tracing::Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = fmt().with_max_level(level).try_init();
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use instabot::prelude::*;`
pub mod prelude {
    // Common result/error handling
    pub use anyhow::{Context, Error, Result, anyhow, bail, ensure};

    // Serialization
    pub use serde::{Deserialize, Serialize};

    // Tracing macros
    pub use tracing::{debug, error, info, instrument, trace, warn};

    // External crates (namespaced) if callers want direct access
    pub use crate as instabot;
    pub use rand;

    // Frequently used items
    pub use crate::actions::{ActionRegistry, ActionRunner, ActionState, ActionStatus, RunArgs};
    pub use crate::error::ActionError;
    pub use crate::executor::{ActionContext, Device, Interactor, Storage};
    pub use crate::session::{Limits, SessionAction, SessionState};
    pub use crate::{actions, config, executor, session, utils};
}
