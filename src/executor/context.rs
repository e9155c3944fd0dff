use std::collections::BTreeMap;

use anyhow::Result;

use crate::actions::{ActionState, ActionStatus};
use crate::session::{SessionAction, SessionState};

/// Handle to the phone the bot drives.
pub trait Device {
    /// Identifier used in logs (serial number, emulator name...).
    fn id(&self) -> &str;

    /// Bring the app back to a known screen after a failed job.
    fn recover(&mut self) -> Result<()>;
}

/// Record of the users the bot already interacted with.
pub trait Storage {
    fn is_user_interacted(&self, username: &str) -> bool;
    fn add_interacted_user(&mut self, username: &str, followed: bool);
}

/// In-memory [`Storage`], forgotten when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    interacted: BTreeMap<String, bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.interacted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interacted.is_empty()
    }

    pub fn is_followed(&self, username: &str) -> bool {
        self.interacted.get(username).copied().unwrap_or(false)
    }
}

impl Storage for MemoryStorage {
    fn is_user_interacted(&self, username: &str) -> bool {
        self.interacted.contains_key(username)
    }

    fn add_interacted_user(&mut self, username: &str, followed: bool) {
        let entry = self.interacted.entry(username.to_string()).or_default();
        *entry |= followed;
    }
}

/// `on_action` callback.
pub type OnAction<'a> = dyn Fn(&mut SessionState, SessionAction) + 'a;
/// `is_limit_reached` callback: session and source name in, limit state out.
pub type LimitCheck<'a> = dyn Fn(&SessionState, &str) -> Option<ActionState> + 'a;
/// `is_passed_filters` callback: whether a username should be interacted with.
pub type FilterCheck<'a> = dyn Fn(&mut dyn Device, &str) -> bool + 'a;

/// Everything an action run needs from the outside world.
pub struct ActionContext<'a> {
    pub device: &'a mut dyn Device,
    pub storage: &'a mut dyn Storage,
    pub session: &'a mut SessionState,
    pub on_action: &'a OnAction<'a>,
    pub is_limit_reached: &'a LimitCheck<'a>,
    pub is_passed_filters: Option<&'a FilterCheck<'a>>,
}

impl ActionContext<'_> {
    /// Forward an action to `on_action`.
    pub fn report(&mut self, action: SessionAction) {
        (self.on_action)(&mut *self.session, action);
    }

    pub fn check_limit(&self, source: &str) -> Option<ActionState> {
        (self.is_limit_reached)(&*self.session, source)
    }

    /// Users pass when no filter is configured.
    pub fn passes_filters(&mut self, username: &str) -> bool {
        match self.is_passed_filters {
            Some(filter) => filter(&mut *self.device, username),
            None => true,
        }
    }
}

/// One blogger to interact with, as resolved by the interact loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloggerTarget<'s> {
    /// Source as configured, with its `@` prefix.
    pub source: &'s str,
    pub username: &'s str,
    pub likes_count: u32,
    pub follow_percentage: u8,
    /// The source is the operator's own account.
    pub is_myself: bool,
}

/// The component that actually drives the Instagram UI.
pub trait Interactor {
    /// Interact with the followers of `target.username`.
    ///
    /// Implementations report through `ctx.report`, ask `ctx.check_limit` after each
    /// interaction and raise any limit on `status`. An `Err` is contained by the caller
    /// and the job is retried.
    fn handle_blogger(
        &mut self,
        ctx: &mut ActionContext<'_>,
        target: &BloggerTarget<'_>,
        status: &mut ActionStatus,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_keeps_follow_flag() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.add_interacted_user("alice", true);
        storage.add_interacted_user("alice", false);
        storage.add_interacted_user("bob", false);
        assert_eq!(storage.len(), 2);
        assert!(storage.is_user_interacted("alice"));
        assert!(storage.is_followed("alice"));
        assert!(!storage.is_followed("bob"));
        assert!(!storage.is_user_interacted("carol"));
    }
}
