//! Argument declarations and the run-time values bound to them.
//!
//! Every action declares its arguments as a static list of [`ArgSpec`]s. The registry
//! merges them into one schema, which is turned into `clap` arguments to extend the CLI.
//! Parsed values end up in a [`RunArgs`] map keyed by argument name.

use std::collections::BTreeMap;
use std::slice;

use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Combined argument schema, keyed by argument name.
pub type ArgSchema = BTreeMap<&'static str, ArgSpec>;

/// Declaration of one action argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    /// Argument name, also the key in [`RunArgs`] (e.g. `likes_count`).
    pub name: &'static str,
    pub help: &'static str,
    /// Value used when the argument is given neither on the CLI nor in the config file.
    pub default: Option<&'static str>,
    /// Placeholder(s) shown in `--help`.
    pub metavar: &'static [&'static str],
    /// Accept one or more values (`--interact a b c`).
    pub multiple: bool,
}

impl ArgSpec {
    /// Long flag without dashes: `likes_count` -> `likes-count`.
    pub fn flag(&self) -> String {
        self.name.replace('_', "-")
    }

    pub fn to_clap_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name)
            .long(self.flag())
            .help(self.help)
            .value_names(self.metavar.iter().copied());
        if self.multiple {
            arg = arg.num_args(1..);
        }
        if let Some(default) = self.default {
            arg = arg.default_value(default);
        }
        arg
    }
}

/// Add one CLI argument per schema entry to `cmd`.
pub fn extend_command(cmd: Command, schema: &ArgSchema) -> Command {
    cmd.args(schema.values().map(ArgSpec::to_clap_arg))
}

/// A bound argument value, either a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ArgValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::One(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::One(value)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(values: Vec<&str>) -> Self {
        ArgValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::Many(values)
    }
}

/// Values for the action arguments of one run, read-only for the actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    values: BTreeMap<String, ArgValue>,
}

impl RunArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Single value of `name`; the first one if a list was bound.
    pub fn get_one(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgValue::One(value) => Some(value.as_str()),
            ArgValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// All values of `name`; a single value is returned as a one-element slice.
    pub fn get_many(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            ArgValue::One(value) => Some(slice::from_ref(value)),
            ArgValue::Many(values) => Some(values.as_slice()),
        }
    }

    /// Bind values with precedence: command line, then `config`, then schema defaults.
    ///
    /// `matches` must come from a command built with [`extend_command`] over `schema`.
    pub fn resolve(
        schema: &ArgSchema,
        matches: &ArgMatches,
        config: &BTreeMap<String, ArgValue>,
    ) -> Self {
        let mut args = RunArgs::new();
        for spec in schema.values() {
            let source = matches.value_source(spec.name);
            if source != Some(ValueSource::CommandLine) {
                if let Some(value) = config.get(spec.name) {
                    args.set(spec.name, value.clone());
                    continue;
                }
            }
            let Some(values) = matches.get_many::<String>(spec.name) else {
                continue;
            };
            let values: Vec<String> = values.cloned().collect();
            if spec.multiple {
                args.set(spec.name, values);
            } else if let Some(first) = values.into_iter().next() {
                args.set(spec.name, first);
            }
        }
        args
    }
}
