//! Pure join of declared stacks/templates against runtime containers.
//!
//! All comparisons are case-insensitive. A blank stack name or template title
//! never matches anything, since an empty needle would be a substring of
//! every name.

use stackdoc_gateway::{Container, CustomTemplate, Stack, COMPOSE_PROJECT_LABEL, PORTAINER_STACK_LABEL};

use crate::deployment_types::{
    DeploymentStatus, MatchedContainer, StackDeployment, StackDeploymentMap, StackRef,
    TemplateDeployment, TemplateDeploymentMap, TemplateUsage,
};

const STACK_LABEL_KEYS: [&str; 2] = [COMPOSE_PROJECT_LABEL, PORTAINER_STACK_LABEL];

/// True when `container` belongs to the stack called `stack_name`.
///
/// Matches on the compose project label, the Portainer stack label, or the
/// stack name appearing inside any container name (leading `/` stripped).
/// Endpoint scoping is the caller's job.
pub fn container_matches_stack(stack_name: &str, container: &Container) -> bool {
    let needle = stack_name.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    matches_lowercased(&needle, container)
}

fn matches_lowercased(needle: &str, container: &Container) -> bool {
    let by_label = STACK_LABEL_KEYS.iter().any(|key| {
        container
            .label(key)
            .is_some_and(|value| value.trim().to_lowercase() == needle)
    });
    by_label
        || container
            .display_names()
            .any(|name| name.to_lowercase().contains(needle))
}

pub fn classify_containers(matched: &[&Container]) -> DeploymentStatus {
    if matched.iter().any(|container| container.is_running()) {
        DeploymentStatus::Active
    } else if !matched.is_empty() {
        DeploymentStatus::Partial
    } else {
        DeploymentStatus::None
    }
}

/// Derives one deployment record per stack name.
pub fn reconcile_stacks(stacks: &[Stack], containers: &[Container]) -> StackDeploymentMap {
    let mut deployments = StackDeploymentMap::new();
    for stack in stacks {
        let needle = stack.name.trim().to_lowercase();
        let matched = if needle.is_empty() {
            Vec::new()
        } else {
            containers
                .iter()
                .filter(|container| container.endpoint_id == stack.endpoint_id)
                .filter(|container| matches_lowercased(&needle, container))
                .collect::<Vec<_>>()
        };
        let running_count = matched
            .iter()
            .filter(|container| container.is_running())
            .count();
        let record = StackDeployment {
            stack_id: stack.id,
            stack_name: stack.name.clone(),
            endpoint_id: stack.endpoint_id,
            status: classify_containers(&matched),
            total_count: matched.len(),
            running_count,
            matched_containers: matched.into_iter().map(MatchedContainer::from).collect(),
        };
        deployments.insert(stack.name.clone(), record);
    }
    deployments
}

/// Bidirectional containment: the title inside the stack name, or the stack
/// name inside the title.
pub fn template_matches_stack(template_title: &str, stack_name: &str) -> bool {
    let title = template_title.trim().to_lowercase();
    let name = stack_name.trim().to_lowercase();
    if title.is_empty() || name.is_empty() {
        return false;
    }
    name.contains(&title) || title.contains(&name)
}

pub fn reconcile_templates(
    templates: &[CustomTemplate],
    stacks: &[Stack],
) -> TemplateDeploymentMap {
    let mut deployments = TemplateDeploymentMap::new();
    for template in templates {
        let matching_stacks = stacks
            .iter()
            .filter(|stack| template_matches_stack(&template.title, &stack.name))
            .map(|stack| StackRef {
                id: stack.id,
                name: stack.name.clone(),
                endpoint_id: stack.endpoint_id,
            })
            .collect::<Vec<_>>();
        let deployment_count = matching_stacks.len();
        let status = if deployment_count > 0 {
            TemplateUsage::Deployed
        } else {
            TemplateUsage::Unused
        };
        deployments.insert(
            template.title.clone(),
            TemplateDeployment {
                template_id: template.id,
                title: template.title.clone(),
                matching_stacks,
                deployment_count,
                status,
            },
        );
    }
    deployments
}
