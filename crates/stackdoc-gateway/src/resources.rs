//! Typed records for every management API category.
//!
//! Decoding is tolerant: a missing or `null` key becomes the field's default
//! (empty string, `0`, empty list/map) instead of failing the whole category,
//! and keys this crate does not model are kept in `extra` so the JSON report
//! carries the upstream record unchanged. Numeric type/status codes stay
//! opaque integers; label mapping belongs to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";
pub const PORTAINER_STACK_LABEL: &str = "io.portainer.stack.name";
pub const CONTAINER_STATE_RUNNING: &str = "running";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Records that can be tagged with the endpoint they were fetched from.
pub trait EndpointScoped {
    fn tag_endpoint(&mut self, endpoint_id: i64, endpoint_name: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/status`.
pub struct SystemStatus {
    #[serde(rename = "Version", deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(rename = "InstanceID", deserialize_with = "null_as_default")]
    pub instance_id: String,
    #[serde(rename = "Edition", skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(rename = "License", skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/settings`.
pub struct Settings {
    #[serde(
        rename = "AuthenticationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication_method: Option<i64>,
    #[serde(rename = "LDAPSettings", deserialize_with = "null_as_default")]
    pub ldap_settings: Value,
    #[serde(rename = "OAuthSettings", deserialize_with = "null_as_default")]
    pub oauth_settings: Value,
    #[serde(rename = "InternalAuthSettings", deserialize_with = "null_as_default")]
    pub internal_auth_settings: Value,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A registered container runtime environment (`GET /api/endpoints`).
pub struct Endpoint {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub endpoint_type: i64,
    #[serde(rename = "URL", deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "PublicURL", deserialize_with = "null_as_default")]
    pub public_url: String,
    #[serde(rename = "Status", deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(rename = "GroupId", deserialize_with = "null_as_default")]
    pub group_id: i64,
    #[serde(rename = "TagIds", deserialize_with = "null_as_default")]
    pub tag_ids: Vec<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackEnvVar {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A named deployable unit (`GET /api/stacks`). Names are not unique.
pub struct Stack {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub stack_type: i64,
    #[serde(rename = "EndpointId", deserialize_with = "null_as_default")]
    pub endpoint_id: i64,
    #[serde(rename = "Status", deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(rename = "Env", deserialize_with = "null_as_default")]
    pub env: Vec<StackEnvVar>,
    #[serde(rename = "EntryPoint", deserialize_with = "null_as_default")]
    pub entry_point: String,
    #[serde(rename = "CreationDate", deserialize_with = "null_as_default")]
    pub creation_date: i64,
    #[serde(rename = "CreatedBy", deserialize_with = "null_as_default")]
    pub created_by: String,
    #[serde(rename = "UpdateDate", deserialize_with = "null_as_default")]
    pub update_date: i64,
    /// Compose file content, attached by a follow-up `stack_file` fetch.
    #[serde(rename = "ComposeFile", skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/stacks/{id}/file`.
pub struct StackFile {
    #[serde(rename = "StackFileContent", deserialize_with = "null_as_default")]
    pub stack_file_content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateRepository {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stackfile: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A reusable stack definition (`GET /api/custom_templates`).
pub struct CustomTemplate {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Title", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "Description", deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "Note", deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub template_type: i64,
    #[serde(rename = "Platform", deserialize_with = "null_as_default")]
    pub platform: i64,
    #[serde(rename = "Logo", deserialize_with = "null_as_default")]
    pub logo: String,
    #[serde(rename = "CreatedByUserId", deserialize_with = "null_as_default")]
    pub created_by_user_id: i64,
    #[serde(rename = "Repository", skip_serializing_if = "Option::is_none")]
    pub repository: Option<TemplateRepository>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/registries`.
pub struct Registry {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub registry_type: i64,
    #[serde(rename = "URL", deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "Authentication", deserialize_with = "null_as_default")]
    pub authentication: bool,
    #[serde(rename = "Username", deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/users`.
pub struct User {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Username", deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(rename = "Role", deserialize_with = "null_as_default")]
    pub role: i64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// `GET /api/teams`.
pub struct Team {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Docker image summary proxied through `/api/endpoints/{id}/docker/images/json`.
pub struct DockerImage {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "RepoTags", deserialize_with = "null_as_default")]
    pub repo_tags: Vec<String>,
    #[serde(rename = "Size", deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(rename = "Created", deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(rename = "EndpointId", deserialize_with = "null_as_default")]
    pub endpoint_id: i64,
    #[serde(rename = "EndpointName", deserialize_with = "null_as_default")]
    pub endpoint_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EndpointScoped for DockerImage {
    fn tag_endpoint(&mut self, endpoint_id: i64, endpoint_name: &str) {
        self.endpoint_id = endpoint_id;
        self.endpoint_name = endpoint_name.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Docker container summary proxied through
/// `/api/endpoints/{id}/docker/containers/json?all=true`.
pub struct Container {
    #[serde(rename = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "Names", deserialize_with = "null_as_default")]
    pub names: Vec<String>,
    #[serde(rename = "Image", deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(rename = "State", deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(rename = "Status", deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "Labels", deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
    #[serde(rename = "EndpointId", deserialize_with = "null_as_default")]
    pub endpoint_id: i64,
    #[serde(rename = "EndpointName", deserialize_with = "null_as_default")]
    pub endpoint_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Container {
    /// Names with the leading `/` docker adds stripped off.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(|name| name.strip_prefix('/').unwrap_or(name.as_str()))
    }

    /// First display name, falling back to the short container id.
    pub fn primary_name(&self) -> String {
        self.display_names()
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| self.id.chars().take(12).collect())
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case(CONTAINER_STATE_RUNNING)
    }
}

impl EndpointScoped for Container {
    fn tag_endpoint(&mut self, endpoint_id: i64, endpoint_name: &str) {
        self.endpoint_id = endpoint_id;
        self.endpoint_name = endpoint_name.to_string();
    }
}
