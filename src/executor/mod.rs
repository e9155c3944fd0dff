#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/*!
Executor module for instabot.

This module wires together:
- `context`: the collaborator seams an action runs against (`Device`, `Storage`,
  `Interactor`, callbacks) bundled in an `ActionContext`
- `safely`: the boundary that contains a failed job attempt
- `dry_run`: logging stand-ins for the device and the interactor

Typical usage:
- Build an `ActionContext` from a device, a storage and a `SessionState`.
- Hand it to the selected action's `run` together with an `Interactor`.

Example:
```no_run
use instabot::executor::{ActionContext, DryRunDevice, DryRunInteractor, MemoryStorage};
use instabot::session::{Limits, SessionState, record_action};

let mut device = DryRunDevice::default();
let mut storage = MemoryStorage::new();
let mut session = SessionState::new(None);
let limits = Limits::default();
let is_limit_reached = move |s: &SessionState, source: &str| limits.check(s, source);
let ctx = ActionContext {
    device: &mut device,
    storage: &mut storage,
    session: &mut session,
    on_action: &record_action,
    is_limit_reached: &is_limit_reached,
    is_passed_filters: None,
};
let mut interactor = DryRunInteractor::new();
// runner.run(&mut ctx, &mut interactor, &mut rand::rng());
```
*/

pub mod context;
pub mod dry_run;
pub mod safely;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{
    ActionContext, BloggerTarget, Device, FilterCheck, Interactor, LimitCheck, MemoryStorage,
    OnAction, Storage,
};
pub use dry_run::{DryRunDevice, DryRunInteractor};
pub use safely::{JobOutcome, run_safely};
