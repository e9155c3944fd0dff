use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::{debug, error, info};

use instabot::actions::{ActionRegistry, ArgSchema, RunArgs, extend_command};
use instabot::config::{self as cfg, Config, SessionConfig};
use instabot::executor::{ActionContext, DryRunDevice, DryRunInteractor, MemoryStorage};
use instabot::session::{SessionState, record_action};

/// Exit code for configuration errors (no action, several actions, bad values).
const EXIT_CONFIG_ERROR: u8 = 2;

/// instabot CLI
///
/// Action arguments (`--interact`, `--unfollow`, ...) are added at runtime from the
/// action registry.
#[derive(Debug, Parser)]
#[command(
    name = instabot::PKG_NAME,
    version = instabot::PKG_VERSION,
    about = "Interact with Instagram users and hashtags, one action per run"
)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Identifier of the device to drive
    #[arg(long = "device", default_value = "dry-run")]
    device: String,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Print the JSON Schema for the configuration and exit
    #[arg(long = "print-schema")]
    print_schema: bool,

    /// Your own username, so it can be recognized among the sources
    #[arg(long = "my-username")]
    my_username: Option<String>,

    /// Successful interactions per source before moving on (default: 70)
    #[arg(long = "interactions-count", value_parser = clap::value_parser!(u32).range(1..))]
    interactions_count: Option<u32>,

    /// Likes per session before stopping (default: 300)
    #[arg(long = "total-likes-limit", value_parser = clap::value_parser!(u32).range(1..))]
    total_likes_limit: Option<u32>,

    /// Follows per session before stopping (default: 50)
    #[arg(long = "total-follow-limit", value_parser = clap::value_parser!(u32).range(1..))]
    total_follow_limit: Option<u32>,
}

impl Cli {
    fn session_overrides(&self) -> SessionConfig {
        SessionConfig {
            my_username: self.my_username.clone(),
            interactions_count: self.interactions_count,
            total_likes_limit: self.total_likes_limit,
            total_follow_limit: self.total_follow_limit,
        }
    }
}

/// Load the config file if one was given. A missing or invalid file is a configuration
/// error and maps to [`EXIT_CONFIG_ERROR`].
fn load_config(path: Option<&Path>, schema: &ArgSchema) -> Result<Config, u8> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    match cfg::load_from_path(path, schema) {
        Ok(config) => {
            debug!(target: "instabot::config", "Configuration loaded successfully");
            Ok(config)
        }
        Err(err) => {
            error!(target: "instabot::config", "Failed to load configuration: {err:#}");
            Err(EXIT_CONFIG_ERROR)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let mut registry = ActionRegistry::new();
    let schema = registry.get_actions_args();
    let matches = extend_command(Cli::command(), &schema).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    instabot::init_tracing(cli.log_level.as_deref());
    info!(
        version = instabot::PKG_VERSION,
        config = ?cli.config,
        device = %cli.device,
        "Starting instabot"
    );

    if cli.print_schema {
        let schema = cfg::generate_schema();
        let json = serde_json::to_string_pretty(&schema)?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = match load_config(cli.config.as_deref(), &schema) {
        Ok(config) => config,
        Err(code) => return Ok(ExitCode::from(code)),
    };

    let session_config = config.session.merged_with(&cli.session_overrides());
    let args = RunArgs::resolve(&schema, &matches, &config.args);

    let Ok(runner) = registry.select_action_runner(&args) else {
        return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
    };

    let mut rng = rand::rng();
    if let Err(err) = runner.set_params(&args, &mut rng) {
        error!(error = %err, "Invalid action arguments");
        return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
    }

    info!(
        device = %cli.device,
        "No device backend is linked into this build; interactions are logged only"
    );
    let mut device = DryRunDevice::new(cli.device.clone());
    let mut storage = MemoryStorage::new();
    let mut session = SessionState::new(session_config.my_username.clone());
    let limits = session_config.limits();
    let is_limit_reached = move |session: &SessionState, source: &str| limits.check(session, source);
    let mut interactor = DryRunInteractor::new();

    let mut ctx = ActionContext {
        device: &mut device,
        storage: &mut storage,
        session: &mut session,
        on_action: &record_action,
        is_limit_reached: &is_limit_reached,
        is_passed_filters: None,
    };
    let report = runner.run(&mut ctx, &mut interactor, &mut rng);

    info!(
        action = runner.id(),
        sources = report.handled_sources.len(),
        attempts = report.attempts,
        session_limit_reached = report.session_limit_reached,
        interactions = session.total_interactions,
        likes = session.total_likes,
        follows = session.total_follows,
        "instabot exited"
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn schema() -> ArgSchema {
        ActionRegistry::new().get_actions_args()
    }

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_config_path_uses_defaults() {
        let config = load_config(None, &schema()).unwrap();
        assert!(config.args.is_empty());
    }

    #[test]
    fn valid_config_file_loads() {
        let file = config_file(r#"{ "args": { "likes_count": "2-4" } }"#);
        let config = load_config(Some(file.path()), &schema()).unwrap();
        assert!(config.args.contains_key("likes_count"));
    }

    #[test]
    fn unknown_arg_in_config_is_a_config_error() {
        let file = config_file(r#"{ "args": { "remove_mass_followers": "10" } }"#);
        assert_eq!(
            load_config(Some(file.path()), &schema()).unwrap_err(),
            EXIT_CONFIG_ERROR
        );
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(load_config(Some(&path), &schema()).unwrap_err(), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn every_run_is_a_dry_run() {
        let matches = extend_command(Cli::command(), &schema())
            .try_get_matches_from(["instabot", "--interact", "alice"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.device, "dry-run");
        assert!(
            extend_command(Cli::command(), &schema())
                .try_get_matches_from(["instabot", "--dry-run", "--interact", "alice"])
                .is_err()
        );
    }

    #[test]
    fn cli_declares_every_action_flag() {
        Cli::command().debug_assert();
        extend_command(Cli::command(), &schema()).debug_assert();
    }
}
