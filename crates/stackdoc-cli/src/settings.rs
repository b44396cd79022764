use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use stackdoc_collector::CollectionOptions;
use stackdoc_core::BackupPolicy;
use stackdoc_gateway::{HostConfig, HostCredentials, DEFAULT_REQUEST_TIMEOUT_MS};
use stackdoc_render::OutputFormat;
use stackdoc_runtime::{
    resolve_timezone, DailySchedule, DEFAULT_SCHEDULE_TIME, DEFAULT_TIMEZONE,
};
use tracing::info;

use crate::cli_args::Cli;
use crate::config_file::{load_config_file, FileConfig, FileHostEntry};

pub const DEFAULT_OUTPUT_DIR: &str = "./docs";
pub const DEFAULT_HOST_NAME: &str = "default";

/// Fully merged and validated runtime settings.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub hosts: Vec<HostConfig>,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub schedule: DailySchedule,
    pub timezone: Tz,
    pub request_timeout_ms: u64,
    pub backup_policy: BackupPolicy,
    pub options: CollectionOptions,
    pub run_once: bool,
}

impl AppSettings {
    /// Loads the config file named by `cli` (if any) and merges it under the CLI values.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => load_config_file(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let hosts = merge_hosts(cli, &file.hosts)?;

        let output_format = match cli.output_format.as_deref().or(file.output_format.as_deref()) {
            Some(raw) => raw.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };
        let timezone = resolve_timezone(
            cli.timezone
                .as_deref()
                .or(file.timezone.as_deref())
                .unwrap_or(DEFAULT_TIMEZONE),
        );
        let schedule = DailySchedule::parse(
            cli.schedule_time
                .as_deref()
                .or(file.schedule_time.as_deref())
                .unwrap_or(DEFAULT_SCHEDULE_TIME),
            timezone,
        )?;
        let request_timeout_ms = cli
            .request_timeout_ms
            .or(file.request_timeout_ms)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        if request_timeout_ms == 0 {
            bail!("request_timeout_ms must be greater than 0");
        }

        let defaults = CollectionOptions::default();
        let pick = |cli_value: Option<bool>, file_value: Option<bool>, default: bool| {
            cli_value.or(file_value).unwrap_or(default)
        };
        let options = CollectionOptions {
            include_compose_files: pick(
                cli.include_compose_files,
                file.include_compose_files,
                defaults.include_compose_files,
            ),
            include_templates: pick(
                cli.include_templates,
                file.include_templates,
                defaults.include_templates,
            ),
            include_registries: pick(
                cli.include_registries,
                file.include_registries,
                defaults.include_registries,
            ),
            include_auth_settings: pick(
                cli.include_auth_settings,
                file.include_auth_settings,
                defaults.include_auth_settings,
            ),
            include_license_info: pick(
                cli.include_license_info,
                file.include_license_info,
                defaults.include_license_info,
            ),
            include_users_teams: pick(
                cli.include_users_teams,
                file.include_users_teams,
                defaults.include_users_teams,
            ),
            include_images: pick(
                cli.include_images,
                file.include_images,
                defaults.include_images,
            ),
            include_deployments: pick(
                cli.include_deployments,
                file.include_deployments,
                defaults.include_deployments,
            ),
        };

        Ok(Self {
            hosts,
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            output_format,
            schedule,
            timezone,
            request_timeout_ms,
            backup_policy: BackupPolicy {
                max_backups: cli.max_backups.or(file.max_backups).unwrap_or(0),
            },
            options,
            run_once: cli.once,
        })
    }

    /// Logs the effective configuration. Credentials are never included.
    pub fn log_startup(&self) {
        for host in &self.hosts {
            info!(
                host = %host.name,
                url = %host.url,
                auth = host
                    .credentials
                    .as_ref()
                    .map(HostCredentials::method_label)
                    .unwrap_or("none"),
                "configured host"
            );
        }
        info!(
            hosts = self.hosts.len(),
            schedule = %format!("{:02}:{:02}", self.schedule.hour(), self.schedule.minute()),
            timezone = %self.timezone,
            output_dir = %self.output_dir.display(),
            output_format = %self.output_format,
            max_backups = self.backup_policy.max_backups,
            run_once = self.run_once,
            "stackdoc configuration loaded"
        );
    }
}

fn host_from_entry(entry: &FileHostEntry) -> HostConfig {
    HostConfig {
        name: entry.name.trim().to_string(),
        url: entry.url.trim().to_string(),
        credentials: HostCredentials::from_parts(
            entry.token.as_deref(),
            entry.username.as_deref(),
            entry.password.as_deref(),
        ),
    }
}

fn cli_host(cli: &Cli) -> Option<HostConfig> {
    let url = cli.url.as_deref().map(str::trim).filter(|url| !url.is_empty())?;
    let name = cli
        .host_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_HOST_NAME);
    Some(HostConfig {
        name: name.to_string(),
        url: url.to_string(),
        credentials: HostCredentials::from_parts(
            cli.token.as_deref(),
            cli.username.as_deref(),
            cli.password.as_deref(),
        ),
    })
}

/// File hosts in file order, then the CLI host. A CLI host replaces a file host of the same name.
fn merge_hosts(cli: &Cli, file_hosts: &[FileHostEntry]) -> Result<Vec<HostConfig>> {
    let mut seen = BTreeSet::new();
    let mut hosts = Vec::with_capacity(file_hosts.len() + 1);
    for (index, entry) in file_hosts.iter().enumerate() {
        let host = host_from_entry(entry);
        validate_host(&host).with_context(|| format!("invalid host entry #{}", index + 1))?;
        if !seen.insert(host.name.clone()) {
            bail!("duplicate host name '{}' in config file", host.name);
        }
        hosts.push(host);
    }

    if let Some(host) = cli_host(cli) {
        validate_host(&host).context("invalid host from command line/environment")?;
        match hosts.iter_mut().find(|existing| existing.name == host.name) {
            Some(existing) => *existing = host,
            None => hosts.push(host),
        }
    }

    if hosts.is_empty() {
        bail!("no hosts configured: set PORTAINER_URL or list hosts in the config file");
    }
    Ok(hosts)
}

fn validate_host(host: &HostConfig) -> Result<()> {
    if host.name.is_empty() {
        bail!("host name must not be empty");
    }
    if host.url.is_empty() {
        bail!("host '{}' has no url", host.name);
    }
    if host.credentials.is_none() {
        bail!(
            "host '{}' has no credentials: set a token or username and password",
            host.name
        );
    }
    Ok(())
}
