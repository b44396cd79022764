//! Cross-references declared stacks and templates with runtime containers.
//!
//! `matching` holds the pure joins; `DeploymentReconciler` fetches their
//! inputs through a `PortainerApi` and absorbs fetch failures.

pub mod deployment_types;
pub mod matching;
pub mod reconciler;

pub use deployment_types::{
    DeploymentStatus, MatchedContainer, StackDeployment, StackDeploymentMap, StackRef,
    TemplateDeployment, TemplateDeploymentMap, TemplateUsage,
};
pub use matching::{
    classify_containers, container_matches_stack, reconcile_stacks, reconcile_templates,
    template_matches_stack,
};
pub use reconciler::{DeploymentReconciler, ReconciliationDegraded};
