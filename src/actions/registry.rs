use tracing::{debug, error, info};

use super::args::{ArgSchema, RunArgs};
use super::{ActionRunner, core_action_runners};
use crate::PKG_NAME;
use crate::error::ActionError;

/// All known actions, one instance each, keyed by their identifier.
pub struct ActionRegistry {
    runners: Vec<Box<dyn ActionRunner>>,
}

impl ActionRegistry {
    /// Registry of the built-in actions.
    pub fn new() -> Self {
        Self::with_runners(core_action_runners())
    }

    /// Registry over an explicit list. A later runner replaces an earlier one with the same id.
    pub fn with_runners(runners: Vec<Box<dyn ActionRunner>>) -> Self {
        let mut registry = Self {
            runners: Vec::with_capacity(runners.len()),
        };
        for runner in runners {
            registry.register(runner);
        }
        registry
    }

    fn register(&mut self, runner: Box<dyn ActionRunner>) {
        debug!(target: "instabot::registry", action = runner.id(), "Registering action");
        match self.runners.iter().position(|r| r.id() == runner.id()) {
            Some(idx) => self.runners[idx] = runner,
            None => self.runners.push(runner),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.runners.iter().map(|r| r.id())
    }

    pub fn get(&self, id: &str) -> Option<&dyn ActionRunner> {
        self.runners
            .iter()
            .find(|r| r.id() == id)
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Every argument declared by any action. On a name collision the last declaration wins.
    pub fn get_actions_args(&self) -> ArgSchema {
        let mut schema = ArgSchema::new();
        for runner in &self.runners {
            for spec in runner.args() {
                schema.insert(spec.name, *spec);
            }
        }
        schema
    }

    /// Pick the single action selected by `args`.
    ///
    /// Zero or several selected actions is a configuration error; it is logged here and
    /// returned so the caller can abort.
    pub fn select_action_runner(
        &mut self,
        args: &RunArgs,
    ) -> Result<&mut dyn ActionRunner, ActionError> {
        let selected: Vec<usize> = self
            .runners
            .iter()
            .enumerate()
            .filter(|(_, runner)| runner.is_action_selected(args))
            .map(|(idx, _)| idx)
            .collect();

        match selected.as_slice() {
            [] => {
                let flags: Vec<String> = self.runners.iter().map(|r| r.flag()).collect();
                let err = ActionError::NoActionSelected {
                    flags: flags.join(", "),
                };
                error!(target: "instabot::registry", "{err}");
                Err(err)
            }
            [idx] => {
                let runner: &mut dyn ActionRunner = self.runners[*idx].as_mut();
                info!(
                    target: "instabot::registry",
                    "Running {PKG_NAME} with {} action.",
                    runner.id()
                );
                Ok(runner)
            }
            _ => {
                let actions: Vec<&'static str> =
                    selected.iter().map(|idx| self.runners[*idx].id()).collect();
                let err = ActionError::MultipleActionsSelected {
                    app: PKG_NAME,
                    actions: actions.clone(),
                };
                error!(target: "instabot::registry", ?actions, "{err}");
                Err(err)
            }
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
