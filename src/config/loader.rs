use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_valid::Validate;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use super::models::Config;
use crate::actions::{ArgSchema, ArgValue};

/// Load configuration from a string slice, validated against the action argument schema.
pub fn load_from_str(s: &str, schema: &ArgSchema) -> Result<Config> {
    let cfg: Config =
        serde_json::from_str(s).context("Failed to parse JSON config string into Config")?;
    validate_config(&cfg, schema)?;
    Ok(cfg)
}

/// Load configuration from any reader (e.g., a file).
pub fn load_from_reader<R: Read>(reader: R, schema: &ArgSchema) -> Result<Config> {
    let cfg: Config =
        serde_json::from_reader(reader).context("Failed to parse JSON config from reader")?;
    validate_config(&cfg, schema)?;
    Ok(cfg)
}

/// Load configuration from a file path.
pub fn load_from_path<P: AsRef<Path>>(path: P, schema: &ArgSchema) -> Result<Config> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open config file {}", path_ref.display()))?;
    let cfg = load_from_reader(file, schema)
        .with_context(|| format!("Invalid config file {}", path_ref.display()))?;
    debug!(target: "instabot::config", "Loaded config from {}", path_ref.display());
    Ok(cfg)
}

/// Generate the JSON Schema for the Config model (for external validation or tooling).
pub fn generate_schema() -> Schema {
    schema_for!(Config)
}

/// Write the JSON Schema for the Config model to any writer (pretty-printed).
pub fn write_schema_to_writer<W: Write>(mut writer: W) -> Result<()> {
    let schema = generate_schema();
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;
    writer
        .write_all(json.as_bytes())
        .context("Failed to write schema to writer")?;
    Ok(())
}

/// Check field constraints and that every configured argument is declared by some action.
pub fn validate_config(cfg: &Config, schema: &ArgSchema) -> Result<()> {
    cfg.validate()
        .map_err(|errors| anyhow!("Config failed validation: {errors}"))?;

    for (name, value) in &cfg.args {
        let Some(spec) = schema.get(name.as_str()) else {
            bail!("Unknown action argument '{}' in config", name);
        };
        if let ArgValue::Many(values) = value {
            if !spec.multiple {
                bail!(
                    "Argument '{}' takes a single value, got a list of {}",
                    name,
                    values.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionRegistry;

    fn schema() -> ArgSchema {
        ActionRegistry::new().get_actions_args()
    }

    #[test]
    fn loads_args_and_session() {
        let cfg = load_from_str(
            r##"{
                "args": { "interact": ["alice", "#cats"], "likes_count": "2-4" },
                "session": { "my_username": "me", "total_likes_limit": 50 }
            }"##,
            &schema(),
        )
        .unwrap();
        assert_eq!(cfg.args["interact"], ArgValue::from(vec!["alice", "#cats"]));
        assert_eq!(cfg.session.my_username.as_deref(), Some("me"));
        assert_eq!(cfg.session.limits().total_likes_limit, 50);
    }

    #[test]
    fn empty_object_is_valid() {
        let cfg = load_from_str("{}", &schema()).unwrap();
        assert!(cfg.args.is_empty());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let err = load_from_str(r#"{ "args": { "remove_mass_followers": "10" } }"#, &schema())
            .unwrap_err();
        assert!(err.to_string().contains("remove_mass_followers"));
    }

    #[test]
    fn list_for_single_valued_argument_is_rejected() {
        assert!(load_from_str(r#"{ "args": { "likes_count": ["1", "2"] } }"#, &schema()).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(
            load_from_str(r#"{ "session": { "interactions_count": 0 } }"#, &schema()).is_err()
        );
    }

    #[test]
    fn schema_mentions_sections() {
        let mut out = Vec::new();
        write_schema_to_writer(&mut out).unwrap();
        let json = String::from_utf8(out).unwrap();
        assert!(json.contains("\"args\""));
        assert!(json.contains("\"session\""));
    }
}
