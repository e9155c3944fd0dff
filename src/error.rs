use thiserror::Error;

/// Errors raised while selecting an action or binding its parameters.
///
/// All of them are configuration errors: the caller reports them and aborts.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("You have to specify one of the actions: {flags}")]
    NoActionSelected { flags: String },

    #[error("Running {app} with two or more actions is not supported yet.")]
    MultipleActionsSelected { app: &'static str, actions: Vec<&'static str> },

    #[error("argument --{arg} expects an integer, got '{value}'")]
    InvalidInteger { arg: String, value: String },

    #[error("argument --{arg} must be between {min} and {max}, got {value}")]
    OutOfRange {
        arg: String,
        value: u64,
        min: u64,
        max: u64,
    },
}
