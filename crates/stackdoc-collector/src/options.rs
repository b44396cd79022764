use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Switches for the optional parts of a collection pass. Everything is on by default.
pub struct CollectionOptions {
    pub include_compose_files: bool,
    pub include_templates: bool,
    pub include_registries: bool,
    pub include_auth_settings: bool,
    pub include_license_info: bool,
    pub include_users_teams: bool,
    pub include_images: bool,
    pub include_deployments: bool,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            include_compose_files: true,
            include_templates: true,
            include_registries: true,
            include_auth_settings: true,
            include_license_info: true,
            include_users_teams: true,
            include_images: true,
            include_deployments: true,
        }
    }
}

impl CollectionOptions {
    /// Only the mandatory categories.
    pub fn minimal() -> Self {
        Self {
            include_compose_files: false,
            include_templates: false,
            include_registries: false,
            include_auth_settings: false,
            include_license_info: false,
            include_users_teams: false,
            include_images: false,
            include_deployments: false,
        }
    }
}
