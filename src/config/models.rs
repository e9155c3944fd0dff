use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::collections::BTreeMap;

use crate::actions::ArgValue;
use crate::session::{
    DEFAULT_INTERACTIONS_COUNT, DEFAULT_TOTAL_FOLLOW_LIMIT, DEFAULT_TOTAL_LIKES_LIMIT, Limits,
};

/// Root configuration for instabot.
///
/// Deserialized from a JSON file. Everything is optional; the command line wins over the file
/// and the file wins over built-in defaults.
/// - `args`: values for action arguments, keyed by argument name (`likes_count`, `interact`...)
/// - `session`: operator account and session limits
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Config {
    /// Action arguments. A value is a string, or a list of strings for multi-valued arguments.
    /// Example: `{ "interact": ["@alice", "#cats"], "likes_count": "2-4" }`
    #[serde(default)]
    pub args: ArgsMap,

    #[serde(default)]
    #[validate]
    pub session: SessionConfig,
}

/// Argument name -> value.
pub type ArgsMap = BTreeMap<String, ArgValue>;

/// Session-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SessionConfig {
    /// Username of the operator's own account, used to flag it when it shows up as a source.
    #[serde(default)]
    pub my_username: Option<String>,

    /// Successful interactions per source before moving on (default: 70).
    #[serde(default)]
    #[validate(minimum = 1)]
    pub interactions_count: Option<u32>,

    /// Likes per session before stopping (default: 300).
    #[serde(default)]
    #[validate(minimum = 1)]
    pub total_likes_limit: Option<u32>,

    /// Follows per session before stopping (default: 50).
    #[serde(default)]
    #[validate(minimum = 1)]
    pub total_follow_limit: Option<u32>,
}

impl SessionConfig {
    /// Limits with defaults filled in.
    pub fn limits(&self) -> Limits {
        Limits {
            interactions_count: self.interactions_count.unwrap_or(DEFAULT_INTERACTIONS_COUNT),
            total_likes_limit: self.total_likes_limit.unwrap_or(DEFAULT_TOTAL_LIKES_LIMIT),
            total_follow_limit: self.total_follow_limit.unwrap_or(DEFAULT_TOTAL_FOLLOW_LIMIT),
        }
    }

    /// Overlay the `Some` fields of `other` on top of `self`.
    pub fn merged_with(&self, other: &SessionConfig) -> SessionConfig {
        SessionConfig {
            my_username: other.my_username.clone().or_else(|| self.my_username.clone()),
            interactions_count: other.interactions_count.or(self.interactions_count),
            total_likes_limit: other.total_likes_limit.or(self.total_likes_limit),
            total_follow_limit: other.total_follow_limit.or(self.total_follow_limit),
        }
    }
}
