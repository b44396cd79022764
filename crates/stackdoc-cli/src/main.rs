mod bootstrap_helpers;
mod cli_args;
mod config_file;
mod settings;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use stackdoc_gateway::GatewayClientConfig;
use stackdoc_render::{FileRendererConfig, FileReportRenderer};
use stackdoc_runtime::{run_pass, run_service, HostOrchestrator, HttpHostConnector};
use tracing::warn;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::settings::AppSettings;

fn build_orchestrator(settings: &AppSettings) -> HostOrchestrator {
    let connector = HttpHostConnector::new(GatewayClientConfig {
        request_timeout_ms: settings.request_timeout_ms,
    });
    let renderer = FileReportRenderer::new(FileRendererConfig {
        output_dir: settings.output_dir.clone(),
        format: settings.output_format,
        backup_policy: settings.backup_policy,
        timezone: settings.timezone,
        options: settings.options,
    });
    HostOrchestrator::new(Arc::new(connector), Arc::new(renderer), settings.options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = AppSettings::resolve(&cli)?;
    settings.log_startup();

    let orchestrator = Arc::new(build_orchestrator(&settings));
    let hosts = Arc::new(settings.hosts.clone());
    if settings.run_once {
        let summary = run_pass(orchestrator, hosts).await?;
        if !summary.all_succeeded() {
            warn!(
                failed = summary.failed(),
                total = summary.total,
                "single pass finished with failed hosts"
            );
        }
        return Ok(());
    }
    run_service(orchestrator, hosts, settings.schedule).await
}
