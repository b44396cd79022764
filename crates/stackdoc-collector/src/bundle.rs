use serde::{Deserialize, Serialize};
use stackdoc_gateway::{
    AuthSettings, CustomTemplate, DockerImage, Endpoint, GatewayError, LicenseInfo, Registry,
    Settings, Stack, SystemStatus, Team, User,
};
use stackdoc_reconcile::{StackDeploymentMap, TemplateDeploymentMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An optional category that fell back to its empty default.
pub struct DegradedCategory {
    pub category: String,
    pub error: String,
}

/// Everything collected from one host in one pass.
///
/// Built once by `BundleBuilder` and never mutated afterwards. Categories
/// switched off by `CollectionOptions` are `None` (views) or empty
/// (collections); categories that failed are empty and listed in `degraded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedBundle {
    pub status: SystemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_settings: Option<AuthSettings>,
    pub endpoints: Vec<Endpoint>,
    pub stacks: Vec<Stack>,
    pub templates: Vec<CustomTemplate>,
    pub registries: Vec<Registry>,
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub images: Vec<DockerImage>,
    pub stack_deployments: StackDeploymentMap,
    pub template_deployments: TemplateDeploymentMap,
    pub degraded: Vec<DegradedCategory>,
}

impl CollectedBundle {
    pub fn is_degraded(&self, category: &str) -> bool {
        self.degraded.iter().any(|entry| entry.category == category)
    }
}

/// Accumulates independently produced category results into a `CollectedBundle`.
#[derive(Debug)]
pub struct BundleBuilder {
    bundle: CollectedBundle,
}

impl BundleBuilder {
    /// Starts from the mandatory categories.
    pub fn new(status: SystemStatus, endpoints: Vec<Endpoint>, stacks: Vec<Stack>) -> Self {
        Self {
            bundle: CollectedBundle {
                status,
                license: None,
                settings: None,
                auth_settings: None,
                endpoints,
                stacks,
                templates: Vec::new(),
                registries: Vec::new(),
                users: Vec::new(),
                teams: Vec::new(),
                images: Vec::new(),
                stack_deployments: StackDeploymentMap::new(),
                template_deployments: TemplateDeploymentMap::new(),
                degraded: Vec::new(),
            },
        }
    }

    pub fn license(mut self, license: LicenseInfo) -> Self {
        self.bundle.license = Some(license);
        self
    }

    /// Stores raw settings together with the auth view derived from them.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.bundle.auth_settings = Some(AuthSettings::from_settings(&settings));
        self.bundle.settings = Some(settings);
        self
    }

    pub fn templates(mut self, templates: Vec<CustomTemplate>) -> Self {
        self.bundle.templates = templates;
        self
    }

    pub fn registries(mut self, registries: Vec<Registry>) -> Self {
        self.bundle.registries = registries;
        self
    }

    pub fn users(mut self, users: Vec<User>) -> Self {
        self.bundle.users = users;
        self
    }

    pub fn teams(mut self, teams: Vec<Team>) -> Self {
        self.bundle.teams = teams;
        self
    }

    pub fn images(mut self, images: Vec<DockerImage>) -> Self {
        self.bundle.images = images;
        self
    }

    pub fn stack_deployments(mut self, deployments: StackDeploymentMap) -> Self {
        self.bundle.stack_deployments = deployments;
        self
    }

    pub fn template_deployments(mut self, deployments: TemplateDeploymentMap) -> Self {
        self.bundle.template_deployments = deployments;
        self
    }

    /// Records that `category` fell back to its empty default.
    pub fn degraded(mut self, category: &str, error: &GatewayError) -> Self {
        self.bundle.degraded.push(DegradedCategory {
            category: category.to_string(),
            error: error.to_string(),
        });
        self
    }

    pub fn build(self) -> CollectedBundle {
        self.bundle
    }
}
