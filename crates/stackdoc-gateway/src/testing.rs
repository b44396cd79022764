//! In-memory `PortainerApi` for exercising collection and reconciliation
//! without an HTTP server. Enabled with the `test-support` feature.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::api::PortainerApi;
use crate::error::{GatewayError, GatewayResult};
use crate::resources::{
    Container, CustomTemplate, DockerImage, Endpoint, Registry, Settings, Stack, StackFile,
    SystemStatus, Team, User,
};

#[derive(Debug, Default)]
pub struct FakePortainerApi {
    pub host: String,
    pub status: SystemStatus,
    pub settings: Settings,
    pub endpoints: Vec<Endpoint>,
    pub stacks: Vec<Stack>,
    pub stack_files: BTreeMap<i64, String>,
    pub templates: Vec<CustomTemplate>,
    pub registries: Vec<Registry>,
    pub users: Vec<User>,
    pub teams: Vec<Team>,
    pub images: Vec<DockerImage>,
    pub containers: Vec<Container>,
    /// Categories (`"status"`, `"templates"`, `"containers"`, ...) that fail.
    pub failing: BTreeSet<&'static str>,
    /// Stack ids whose compose file fetch fails.
    pub failing_stack_files: BTreeSet<i64>,
    calls: RefCell<Vec<String>>,
}

impl FakePortainerApi {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            ..Self::default()
        }
    }

    pub fn fail(mut self, category: &'static str) -> Self {
        self.failing.insert(category);
        self
    }

    /// Number of calls made for `category` so far.
    pub fn call_count(&self, category: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.as_str() == category)
            .count()
    }

    fn record<T: Clone>(&self, category: &'static str, path: &str, rows: &T) -> GatewayResult<T> {
        self.calls.borrow_mut().push(category.to_string());
        if self.failing.contains(category) {
            return Err(GatewayError::status(path, 503, "injected failure"));
        }
        Ok(rows.clone())
    }
}

impl PortainerApi for FakePortainerApi {
    fn host_name(&self) -> &str {
        &self.host
    }

    fn status(&self) -> GatewayResult<SystemStatus> {
        self.record("status", "/api/status", &self.status)
    }

    fn settings(&self) -> GatewayResult<Settings> {
        self.record("settings", "/api/settings", &self.settings)
    }

    fn endpoints(&self) -> GatewayResult<Vec<Endpoint>> {
        self.record("endpoints", "/api/endpoints", &self.endpoints)
    }

    fn stacks(&self) -> GatewayResult<Vec<Stack>> {
        self.record("stacks", "/api/stacks", &self.stacks)
    }

    fn stack_file(&self, stack_id: i64) -> GatewayResult<StackFile> {
        let path = format!("/api/stacks/{stack_id}/file");
        self.calls.borrow_mut().push("stack_file".to_string());
        if self.failing_stack_files.contains(&stack_id) {
            return Err(GatewayError::status(path, 404, "stack file not found"));
        }
        Ok(StackFile {
            stack_file_content: self.stack_files.get(&stack_id).cloned().unwrap_or_default(),
        })
    }

    fn custom_templates(&self) -> GatewayResult<Vec<CustomTemplate>> {
        self.record("templates", "/api/custom_templates", &self.templates)
    }

    fn registries(&self) -> GatewayResult<Vec<Registry>> {
        self.record("registries", "/api/registries", &self.registries)
    }

    fn users(&self) -> GatewayResult<Vec<User>> {
        self.record("users", "/api/users", &self.users)
    }

    fn teams(&self) -> GatewayResult<Vec<Team>> {
        self.record("teams", "/api/teams", &self.teams)
    }

    fn images(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<DockerImage>> {
        let rows = self.record("images", "/api/endpoints/docker/images/json", &self.images)?;
        Ok(rows
            .into_iter()
            .filter(|row| endpoint_id.map_or(true, |id| row.endpoint_id == id))
            .collect())
    }

    fn containers(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<Container>> {
        let rows = self.record(
            "containers",
            "/api/endpoints/docker/containers/json",
            &self.containers,
        )?;
        Ok(rows
            .into_iter()
            .filter(|row| endpoint_id.map_or(true, |id| row.endpoint_id == id))
            .collect())
    }
}
