//! Per-session counters and the limits checked against them.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::actions::ActionState;

pub const DEFAULT_INTERACTIONS_COUNT: u32 = 70;
pub const DEFAULT_TOTAL_LIKES_LIMIT: u32 = 300;
pub const DEFAULT_TOTAL_FOLLOW_LIMIT: u32 = 50;

/// Something the interaction collaborator did, reported through `on_action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Like { username: String, count: u32 },
    Follow { username: String },
    Interact {
        source: String,
        username: String,
        succeed: bool,
    },
}

/// Counters for one bot session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub my_username: Option<String>,
    pub total_likes: u32,
    pub total_follows: u32,
    pub total_interactions: u32,
    successful_interactions: BTreeMap<String, u32>,
}

impl SessionState {
    pub fn new(my_username: Option<String>) -> Self {
        Self {
            my_username,
            ..Self::default()
        }
    }

    /// Whether `username` (without `@`) is the operator's own account.
    pub fn is_myself(&self, username: &str) -> bool {
        self.my_username.as_deref() == Some(username)
    }

    pub fn successful_interactions(&self, source: &str) -> u32 {
        self.successful_interactions.get(source).copied().unwrap_or(0)
    }

    pub fn apply(&mut self, action: &SessionAction) {
        match action {
            SessionAction::Like { count, .. } => self.total_likes += count,
            SessionAction::Follow { .. } => self.total_follows += 1,
            SessionAction::Interact {
                source, succeed, ..
            } => {
                self.total_interactions += 1;
                if *succeed {
                    *self
                        .successful_interactions
                        .entry(source.clone())
                        .or_default() += 1;
                }
            }
        }
    }
}

/// Default `on_action` callback: fold the event into the session counters.
pub fn record_action(session: &mut SessionState, action: SessionAction) {
    debug!(target: "instabot::session", ?action, "Recording action");
    session.apply(&action);
}

/// Thresholds that end a source or the whole session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Successful interactions per source.
    pub interactions_count: u32,
    pub total_likes_limit: u32,
    pub total_follow_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            interactions_count: DEFAULT_INTERACTIONS_COUNT,
            total_likes_limit: DEFAULT_TOTAL_LIKES_LIMIT,
            total_follow_limit: DEFAULT_TOTAL_FOLLOW_LIMIT,
        }
    }
}

impl Limits {
    /// Default `is_limit_reached` check. Session limits win over the source limit.
    pub fn check(&self, session: &SessionState, source: &str) -> Option<ActionState> {
        if session.total_likes >= self.total_likes_limit {
            info!(
                target: "instabot::session",
                likes = session.total_likes, limit = self.total_likes_limit,
                "Total likes limit reached"
            );
            return Some(ActionState::SessionLimitReached);
        }
        if session.total_follows >= self.total_follow_limit {
            info!(
                target: "instabot::session",
                follows = session.total_follows, limit = self.total_follow_limit,
                "Total follow limit reached"
            );
            return Some(ActionState::SessionLimitReached);
        }
        let done = session.successful_interactions(source);
        if done >= self.interactions_count {
            info!(
                target: "instabot::session",
                %source, interactions = done, limit = self.interactions_count,
                "Interactions limit for source reached"
            );
            return Some(ActionState::SourceLimitReached);
        }
        None
    }
}
