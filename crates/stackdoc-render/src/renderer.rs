use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use stackdoc_collector::{CollectedBundle, CollectionOptions};
use stackdoc_core::{backup_existing_file, prune_backups, write_text_atomic, BackupPolicy};
use stackdoc_gateway::HostConfig;
use tracing::{info, warn};

use crate::json_report::render_json;
use crate::markdown::render_markdown;
use crate::output::{output_file_name, OutputFormat};
use crate::ReportHeader;

/// Turns a collected bundle into a written report.
pub trait ReportRenderer {
    /// Writes the report for `host` and returns the path written.
    fn generate_documentation(&self, host: &HostConfig, bundle: &CollectedBundle)
        -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct FileRendererConfig {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub backup_policy: BackupPolicy,
    pub timezone: Tz,
    pub options: CollectionOptions,
}

/// Writes one report file per host under `output_dir`.
#[derive(Debug, Clone)]
pub struct FileReportRenderer {
    config: FileRendererConfig,
}

impl FileReportRenderer {
    pub fn new(config: FileRendererConfig) -> Self {
        Self { config }
    }

    pub fn output_path(&self, host_name: &str) -> PathBuf {
        self.config
            .output_dir
            .join(output_file_name(host_name, self.config.format))
    }

    /// Renders at an explicit instant.
    pub fn generate_at(
        &self,
        host: &HostConfig,
        bundle: &CollectedBundle,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        let path = self.output_path(&host.name);
        let local = now.with_timezone(&self.config.timezone);

        self.rotate_previous_report(&path, &local.format("%Y%m%d_%H%M%S").to_string());

        let content = match self.config.format {
            OutputFormat::Markdown => {
                let generated_at_display = local.format("%Y-%m-%d %H:%M:%S %Z").to_string();
                let header = ReportHeader {
                    host_name: &host.name,
                    portainer_url: &host.url,
                    generated_at_display: &generated_at_display,
                };
                render_markdown(&header, bundle, &self.config.options)
            }
            OutputFormat::Json => render_json(
                &local.to_rfc3339_opts(SecondsFormat::Secs, false),
                &host.name,
                &host.url,
                bundle,
            )?,
        };
        write_text_atomic(&path, &content)?;
        info!(
            host = %host.name,
            path = %path.display(),
            format = %self.config.format,
            "documentation generated"
        );
        Ok(path)
    }

    fn rotate_previous_report(&self, path: &Path, stamp: &str) {
        match backup_existing_file(path, stamp) {
            Ok(Some(backup)) => {
                info!(backup = %backup.display(), "backed up previous report");
            }
            Ok(None) => {}
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "could not back up previous report"
                );
            }
        }
        match prune_backups(path, self.config.backup_policy) {
            Ok(removed) if !removed.is_empty() => {
                info!(removed = removed.len(), "pruned old report backups");
            }
            Ok(_) => {}
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "could not prune report backups"
                );
            }
        }
    }
}

impl ReportRenderer for FileReportRenderer {
    fn generate_documentation(
        &self,
        host: &HostConfig,
        bundle: &CollectedBundle,
    ) -> Result<PathBuf> {
        self.generate_at(host, bundle, Utc::now())
    }
}
