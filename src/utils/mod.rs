//! Utilities for instabot.
//!
//! Submodules:
//! - `value`: Count-or-range values such as `2` or `2-4`, parsed and sampled.

pub mod value;

pub use value::{CountOrRange, ValueError, get_value, parse_or_default};
