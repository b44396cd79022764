use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stackdoc_gateway::Container;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Runtime state of a stack derived from its matched containers.
pub enum DeploymentStatus {
    /// At least one matched container is running.
    Active,
    /// Containers matched, none of them running.
    Partial,
    /// No container matched.
    None,
}

impl DeploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateUsage {
    Deployed,
    Unused,
}

impl TemplateUsage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::Unused => "unused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The subset of a container kept on a deployment record.
pub struct MatchedContainer {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub endpoint_id: i64,
}

impl From<&Container> for MatchedContainer {
    fn from(container: &Container) -> Self {
        Self {
            id: container.id.clone(),
            name: container.primary_name(),
            image: container.image.clone(),
            state: container.state.clone(),
            endpoint_id: container.endpoint_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDeployment {
    pub stack_id: i64,
    pub stack_name: String,
    pub endpoint_id: i64,
    pub matched_containers: Vec<MatchedContainer>,
    pub total_count: usize,
    pub running_count: usize,
    pub status: DeploymentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRef {
    pub id: i64,
    pub name: String,
    pub endpoint_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDeployment {
    pub template_id: i64,
    pub title: String,
    pub matching_stacks: Vec<StackRef>,
    pub deployment_count: usize,
    pub status: TemplateUsage,
}

/// Stack deployments keyed by stack name. A later stack with the same name
/// replaces an earlier one.
pub type StackDeploymentMap = BTreeMap<String, StackDeployment>;

/// Template deployments keyed by template title, last title wins.
pub type TemplateDeploymentMap = BTreeMap<String, TemplateDeployment>;
