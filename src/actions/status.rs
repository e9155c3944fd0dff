use std::fmt;

/// Phase of the work on one source, plus the two limit signals.
///
/// Phases only move forward (`PreRun` -> `Running` -> `Done`). The limit variants are
/// never used as a phase; they travel in [`ActionStatus::limit`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionState {
    PreRun,
    Running,
    Done,
    SourceLimitReached,
    SessionLimitReached,
}

impl ActionState {
    pub fn is_limit(self) -> bool {
        matches!(
            self,
            ActionState::SourceLimitReached | ActionState::SessionLimitReached
        )
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionState::PreRun => "pre_run",
            ActionState::Running => "running",
            ActionState::Done => "done",
            ActionState::SourceLimitReached => "source_limit_reached",
            ActionState::SessionLimitReached => "session_limit_reached",
        };
        f.write_str(s)
    }
}

/// Status shared between the run loop and the interaction collaborator for one source.
///
/// The loop owns `state`; either side may raise a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStatus {
    state: ActionState,
    limit_state: Option<ActionState>,
}

impl ActionStatus {
    pub fn new(state: ActionState) -> Self {
        Self {
            state,
            limit_state: None,
        }
    }

    pub fn get(&self) -> ActionState {
        self.state
    }

    pub fn set(&mut self, state: ActionState) {
        debug_assert!(!state.is_limit(), "limit states go through set_limit");
        debug_assert!(state >= self.state, "{} -> {} goes backwards", self.state, state);
        self.state = state;
    }

    pub fn limit(&self) -> Option<ActionState> {
        self.limit_state
    }

    /// Raise a limit signal. Non-limit states are ignored.
    pub fn set_limit(&mut self, limit: ActionState) {
        if limit.is_limit() {
            self.limit_state = Some(limit);
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ActionState::Done
    }
}

impl Default for ActionStatus {
    fn default() -> Self {
        Self::new(ActionState::PreRun)
    }
}
