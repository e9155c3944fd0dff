//! Actions module for instabot.
//!
//! An action is one top-level behavior of the bot (interact with sources, unfollow).
//! Exactly one runs per invocation. Each implements [`ActionRunner`]:
//! - declare its CLI arguments (`args`)
//! - tell whether the run arguments select it (`is_action_selected`)
//! - bind its parameters (`set_params`)
//! - run (`run`)
//!
//! The set of actions is closed and listed in [`core_action_runners`]. Adding an action:
//! 1. Create `src/actions/your_action.rs` with a type implementing `ActionRunner`
//! 2. Append it to `core_action_runners`

use rand::RngCore;

use crate::error::ActionError;
use crate::executor::{ActionContext, Interactor};

pub mod args;
pub mod interact;
pub mod registry;
pub mod status;
pub mod unfollow;

pub use args::{ArgSchema, ArgSpec, ArgValue, RunArgs, extend_command};
pub use interact::InteractAction;
pub use registry::ActionRegistry;
pub use status::{ActionState, ActionStatus};
pub use unfollow::{UnfollowAction, UnfollowKind};

/// What happened during one `run` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sources finished, in processing order (done or stopped by their own limit).
    pub handled_sources: Vec<String>,
    /// Job attempts made across all sources, retries included.
    pub attempts: u32,
    pub session_limit_reached: bool,
}

/// Capability set shared by every action.
pub trait ActionRunner {
    /// Identifier, also the name of the argument that selects the action.
    fn id(&self) -> &'static str;

    /// Arguments this action declares.
    fn args(&self) -> &'static [ArgSpec];

    fn is_action_selected(&self, args: &RunArgs) -> bool;

    /// Bind and normalize this action's parameters, applying defaults for absent values.
    fn set_params(&mut self, args: &RunArgs, rng: &mut dyn RngCore) -> Result<(), ActionError>;

    /// Execute the action. Failures of individual jobs are contained; nothing propagates.
    fn run(
        &mut self,
        ctx: &mut ActionContext<'_>,
        interactor: &mut dyn Interactor,
        rng: &mut dyn RngCore,
    ) -> RunReport;

    /// CLI flag selecting this action (`--unfollow-any`).
    fn flag(&self) -> String {
        format!("--{}", self.id().replace('_', "-"))
    }
}

/// One instance of every built-in action, in registration order.
pub fn core_action_runners() -> Vec<Box<dyn ActionRunner>> {
    vec![
        Box::new(InteractAction::new()),
        Box::new(UnfollowAction::new(UnfollowKind::Followed)),
        Box::new(UnfollowAction::new(UnfollowKind::NonFollowers)),
        Box::new(UnfollowAction::new(UnfollowKind::Any)),
    ]
}

/// Parse an integer argument, `default` when absent.
pub(crate) fn int_arg(
    args: &RunArgs,
    name: &str,
    default: u64,
    max: u64,
) -> Result<u64, ActionError> {
    let Some(raw) = args.get_one(name) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ActionError::InvalidInteger {
            arg: name.replace('_', "-"),
            value: raw.to_string(),
        })?;
    if value > max {
        return Err(ActionError::OutOfRange {
            arg: name.replace('_', "-"),
            value,
            min: 0,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_ids() {
        let flags: Vec<String> = core_action_runners().iter().map(|r| r.flag()).collect();
        assert_eq!(
            flags,
            [
                "--interact",
                "--unfollow",
                "--unfollow-non-followers",
                "--unfollow-any"
            ]
        );
    }

    #[test]
    fn int_arg_parses_and_bounds() {
        let args = RunArgs::new()
            .with("follow_percentage", "50")
            .with("bad", "fifty")
            .with("big", "101");
        assert_eq!(int_arg(&args, "follow_percentage", 0, 100).unwrap(), 50);
        assert_eq!(int_arg(&args, "missing", 7, 100).unwrap(), 7);
        assert!(matches!(
            int_arg(&args, "bad", 0, 100),
            Err(ActionError::InvalidInteger { .. })
        ));
        assert!(matches!(
            int_arg(&args, "big", 0, 100),
            Err(ActionError::OutOfRange { value: 101, .. })
        ));
    }
}
