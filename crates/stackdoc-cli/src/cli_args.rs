use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "stackdoc",
    about = "Documents Portainer management servers as Markdown or JSON reports on a daily schedule",
    version
)]
/// Command-line and environment settings. Unset values fall back to the
/// config file, then to built-in defaults.
pub struct Cli {
    #[arg(
        long = "config",
        env = "PORTAINER_CONFIG_FILE",
        help = "JSON or TOML config file listing hosts and defaults (.toml parsed as TOML)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "PORTAINER_URL",
        help = "Base URL of a single management server to document"
    )]
    pub url: Option<String>,

    #[arg(
        long,
        env = "PORTAINER_TOKEN",
        hide_env_values = true,
        help = "API token for the single host"
    )]
    pub token: Option<String>,

    #[arg(
        long,
        env = "PORTAINER_USERNAME",
        help = "Username for the single host when no token is set"
    )]
    pub username: Option<String>,

    #[arg(
        long,
        env = "PORTAINER_PASSWORD",
        hide_env_values = true,
        help = "Password for the single host when no token is set"
    )]
    pub password: Option<String>,

    #[arg(
        long = "host-name",
        env = "PORTAINER_HOST_NAME",
        help = "Name of the single host; drives the report file name (default: default)"
    )]
    pub host_name: Option<String>,

    #[arg(
        long = "output-dir",
        env = "PORTAINER_OUTPUT_DIR",
        help = "Directory reports are written to (default: ./docs)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long = "output-format",
        env = "PORTAINER_OUTPUT_FORMAT",
        help = "Report format: markdown or json (default: markdown)"
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "schedule-time",
        env = "PORTAINER_SCHEDULE_TIME",
        help = "Daily run time as HH:MM (default: 02:00)"
    )]
    pub schedule_time: Option<String>,

    #[arg(
        long,
        env = "PORTAINER_TIMEZONE",
        help = "IANA timezone for the schedule and report timestamps (default: UTC)"
    )]
    pub timezone: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "PORTAINER_REQUEST_TIMEOUT_MS",
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds (default: 30000)"
    )]
    pub request_timeout_ms: Option<u64>,

    #[arg(
        long = "max-backups",
        env = "PORTAINER_MAX_BACKUPS",
        help = "Backups kept per report; 0 keeps every backup (default: 0)"
    )]
    pub max_backups: Option<usize>,

    #[arg(
        long = "include-compose-files",
        env = "PORTAINER_INCLUDE_COMPOSE_FILES",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Fetch each stack's compose file"
    )]
    pub include_compose_files: Option<bool>,

    #[arg(
        long = "include-templates",
        env = "PORTAINER_INCLUDE_TEMPLATES",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Collect custom templates"
    )]
    pub include_templates: Option<bool>,

    #[arg(
        long = "include-registries",
        env = "PORTAINER_INCLUDE_REGISTRIES",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Collect registries"
    )]
    pub include_registries: Option<bool>,

    #[arg(
        long = "include-auth-settings",
        env = "PORTAINER_INCLUDE_AUTH_SETTINGS",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Collect authentication settings"
    )]
    pub include_auth_settings: Option<bool>,

    #[arg(
        long = "include-license-info",
        env = "PORTAINER_INCLUDE_LICENSE_INFO",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Include edition, version and license details"
    )]
    pub include_license_info: Option<bool>,

    #[arg(
        long = "include-users-teams",
        env = "PORTAINER_INCLUDE_USERS_TEAMS",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Collect users and teams"
    )]
    pub include_users_teams: Option<bool>,

    #[arg(
        long = "include-images",
        env = "PORTAINER_INCLUDE_IMAGES",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Collect docker images from every endpoint"
    )]
    pub include_images: Option<bool>,

    #[arg(
        long = "include-deployments",
        env = "PORTAINER_INCLUDE_DEPLOYMENTS",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Reconcile stacks and templates against running containers"
    )]
    pub include_deployments: Option<bool>,

    #[arg(
        long,
        default_value_t = false,
        help = "Run a single documentation pass and exit"
    )]
    pub once: bool,

    #[arg(
        long,
        env = "PORTAINER_VERBOSE",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Enable debug logging"
    )]
    pub verbose: bool,
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}
