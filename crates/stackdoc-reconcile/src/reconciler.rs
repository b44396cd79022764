use stackdoc_gateway::{GatewayError, PortainerApi};
use thiserror::Error;

use crate::deployment_types::{StackDeploymentMap, TemplateDeploymentMap};
use crate::matching::{reconcile_stacks, reconcile_templates};

#[derive(Debug, Error)]
#[error("{analysis} analysis degraded on host '{host}': {category} unavailable: {source}")]
/// A reconciliation input could not be fetched. Logged, then absorbed.
pub struct ReconciliationDegraded {
    pub host: String,
    pub analysis: &'static str,
    pub category: &'static str,
    #[source]
    pub source: GatewayError,
}

/// Fetches reconciliation inputs through a `PortainerApi` and joins them.
pub struct DeploymentReconciler<'a> {
    api: &'a dyn PortainerApi,
}

impl<'a> DeploymentReconciler<'a> {
    pub fn new(api: &'a dyn PortainerApi) -> Self {
        Self { api }
    }

    /// Stack deployment records; empty when stacks or containers are unavailable.
    pub fn analyze_stack_deployments(&self) -> StackDeploymentMap {
        match self.try_stack_deployments() {
            Ok(deployments) => deployments,
            Err(degraded) => {
                tracing::warn!(host = %degraded.host, error = %degraded, "stack deployment analysis degraded");
                StackDeploymentMap::new()
            }
        }
    }

    /// Template usage records; empty when templates or stacks are unavailable.
    pub fn analyze_template_deployments(&self) -> TemplateDeploymentMap {
        match self.try_template_deployments() {
            Ok(deployments) => deployments,
            Err(degraded) => {
                tracing::warn!(host = %degraded.host, error = %degraded, "template deployment analysis degraded");
                TemplateDeploymentMap::new()
            }
        }
    }

    fn try_stack_deployments(&self) -> Result<StackDeploymentMap, ReconciliationDegraded> {
        const ANALYSIS: &str = "stack deployment";
        let stacks = self
            .api
            .stacks()
            .map_err(|source| self.degraded(ANALYSIS, "stacks", source))?;
        let containers = self
            .api
            .containers(None)
            .map_err(|source| self.degraded(ANALYSIS, "containers", source))?;
        let deployments = reconcile_stacks(&stacks, &containers);
        tracing::debug!(
            host = self.api.host_name(),
            stacks = stacks.len(),
            containers = containers.len(),
            records = deployments.len(),
            "reconciled stack deployments"
        );
        Ok(deployments)
    }

    fn try_template_deployments(&self) -> Result<TemplateDeploymentMap, ReconciliationDegraded> {
        const ANALYSIS: &str = "template deployment";
        let templates = self
            .api
            .custom_templates()
            .map_err(|source| self.degraded(ANALYSIS, "templates", source))?;
        let stacks = self
            .api
            .stacks()
            .map_err(|source| self.degraded(ANALYSIS, "stacks", source))?;
        Ok(reconcile_templates(&templates, &stacks))
    }

    fn degraded(
        &self,
        analysis: &'static str,
        category: &'static str,
        source: GatewayError,
    ) -> ReconciliationDegraded {
        ReconciliationDegraded {
            host: self.api.host_name().to_string(),
            analysis,
            category,
            source,
        }
    }
}
