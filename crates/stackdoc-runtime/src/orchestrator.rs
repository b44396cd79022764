use std::path::PathBuf;
use std::sync::Arc;

use stackdoc_collector::{CollectionOptions, ResourceCollector};
use stackdoc_gateway::{
    GatewayClientConfig, GatewayError, GatewayResult, HostConfig, PortainerApi, PortainerClient,
};
use stackdoc_render::ReportRenderer;
use thiserror::Error;
use tracing::{error, info};

/// Builds an API handle for one host.
pub trait HostConnector {
    fn connect(&self, host: &HostConfig) -> GatewayResult<Box<dyn PortainerApi>>;
}

/// Connects through the blocking HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpHostConnector {
    config: GatewayClientConfig,
}

impl HttpHostConnector {
    pub fn new(config: GatewayClientConfig) -> Self {
        Self { config }
    }
}

impl HostConnector for HttpHostConnector {
    fn connect(&self, host: &HostConfig) -> GatewayResult<Box<dyn PortainerApi>> {
        let client = PortainerClient::connect(host, &self.config)?;
        Ok(Box::new(client))
    }
}

#[derive(Debug, Error)]
pub enum HostFailure {
    #[error("host '{host}': could not create api client: {source}")]
    Connect {
        host: String,
        #[source]
        source: GatewayError,
    },
    #[error("host '{host}': connection test failed")]
    ConnectionTest { host: String },
    #[error("host '{host}': data collection failed: {source}")]
    Collection {
        host: String,
        #[source]
        source: GatewayError,
    },
    #[error("host '{host}': report generation failed: {source:#}")]
    Render {
        host: String,
        #[source]
        source: anyhow::Error,
    },
}

impl HostFailure {
    pub fn host(&self) -> &str {
        match self {
            Self::Connect { host, .. }
            | Self::ConnectionTest { host }
            | Self::Collection { host, .. }
            | Self::Render { host, .. } => host,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub host_name: String,
    pub output_path: PathBuf,
    pub endpoints: usize,
    pub stacks: usize,
    /// Optional categories that fell back to empty defaults.
    pub degraded: Vec<String>,
}

#[derive(Debug)]
pub struct HostOutcome {
    pub host_name: String,
    pub result: Result<HostReport, HostFailure>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub total: usize,
    pub outcomes: Vec<HostOutcome>,
}

impl RunSummary {
    fn record(mut self, host_name: &str, result: Result<HostReport, HostFailure>) -> Self {
        self.total += 1;
        if result.is_ok() {
            self.succeeded += 1;
        }
        self.outcomes.push(HostOutcome {
            host_name: host_name.to_string(),
            result,
        });
        self
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Runs collection and rendering for every configured host, one at a time.
#[derive(Clone)]
pub struct HostOrchestrator {
    connector: Arc<dyn HostConnector + Send + Sync>,
    renderer: Arc<dyn ReportRenderer + Send + Sync>,
    options: CollectionOptions,
}

impl HostOrchestrator {
    pub fn new(
        connector: Arc<dyn HostConnector + Send + Sync>,
        renderer: Arc<dyn ReportRenderer + Send + Sync>,
        options: CollectionOptions,
    ) -> Self {
        Self {
            connector,
            renderer,
            options,
        }
    }

    /// Processes `hosts` in order. A failing host never stops the ones after it.
    pub fn run_all_hosts(&self, hosts: &[HostConfig]) -> RunSummary {
        info!(hosts = hosts.len(), "starting documentation pass");
        let summary = hosts.iter().fold(RunSummary::default(), |summary, host| {
            let result = self.run_host(host);
            match &result {
                Ok(report) => info!(
                    host = %host.name,
                    path = %report.output_path.display(),
                    degraded = report.degraded.len(),
                    "host documented"
                ),
                Err(failure) => error!(host = %host.name, error = %failure, "host failed"),
            }
            summary.record(&host.name, result)
        });
        info!(
            "documentation pass complete: {}/{} hosts succeeded",
            summary.succeeded, summary.total
        );
        summary
    }

    pub fn run_host(&self, host: &HostConfig) -> Result<HostReport, HostFailure> {
        info!(host = %host.name, url = %host.url, "processing host");
        let api = self
            .connector
            .connect(host)
            .map_err(|source| HostFailure::Connect {
                host: host.name.clone(),
                source,
            })?;
        if !api.test_connection() {
            return Err(HostFailure::ConnectionTest {
                host: host.name.clone(),
            });
        }

        let bundle = ResourceCollector::new(api.as_ref(), self.options)
            .collect()
            .map_err(|source| HostFailure::Collection {
                host: host.name.clone(),
                source,
            })?;
        let output_path = self
            .renderer
            .generate_documentation(host, &bundle)
            .map_err(|source| HostFailure::Render {
                host: host.name.clone(),
                source,
            })?;

        Ok(HostReport {
            host_name: host.name.clone(),
            output_path,
            endpoints: bundle.endpoints.len(),
            stacks: bundle.stacks.len(),
            degraded: bundle
                .degraded
                .iter()
                .map(|entry| entry.category.clone())
                .collect(),
        })
    }
}
