//! Fakes shared by the unit tests.

use anyhow::{Result, bail};

use super::context::{ActionContext, Device, MemoryStorage};
use crate::session::{Limits, SessionAction, SessionState, record_action};

#[derive(Debug, Default)]
pub struct FakeDevice {
    pub recoveries: u32,
    pub fail_recover: bool,
}

impl Device for FakeDevice {
    fn id(&self) -> &str {
        "fake-device"
    }

    fn recover(&mut self) -> Result<()> {
        self.recoveries += 1;
        if self.fail_recover {
            bail!("device disconnected");
        }
        Ok(())
    }
}

/// Owns the collaborators and lends them out as an [`ActionContext`].
pub struct Harness {
    pub device: FakeDevice,
    pub storage: MemoryStorage,
    pub session: SessionState,
    pub limits: Limits,
    /// Usernames rejected by `is_passed_filters`; no filter is installed when empty.
    pub blocked: Vec<String>,
}

impl Harness {
    pub fn new(device: FakeDevice) -> Self {
        Self {
            device,
            storage: MemoryStorage::new(),
            session: SessionState::new(Some("me".into())),
            limits: Limits::default(),
            blocked: Vec::new(),
        }
    }

    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut ActionContext<'_>) -> R) -> R {
        let limits = self.limits;
        let blocked = self.blocked.clone();
        let on_action = |session: &mut SessionState, action: SessionAction| {
            record_action(session, action);
        };
        let is_limit_reached =
            move |session: &SessionState, source: &str| limits.check(session, source);
        let is_passed_filters =
            move |_device: &mut dyn Device, username: &str| !blocked.iter().any(|b| b == username);
        let filter_installed = !self.blocked.is_empty();

        let mut ctx = ActionContext {
            device: &mut self.device,
            storage: &mut self.storage,
            session: &mut self.session,
            on_action: &on_action,
            is_limit_reached: &is_limit_reached,
            is_passed_filters: None,
        };
        if filter_installed {
            ctx.is_passed_filters = Some(&is_passed_filters);
        }
        f(&mut ctx)
    }
}
