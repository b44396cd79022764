//! Read-only gateway to a Portainer-style management API.
//!
//! Turns a `HostConfig` into an authenticated `PortainerClient`, decodes every
//! resource category into tolerant typed records, and classifies each failure
//! into a single `GatewayError`. Consumers depend on the `PortainerApi` trait.

pub mod api;
pub mod client;
pub mod error;
pub mod host;
pub mod resources;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod views;

pub use api::{collect_across_endpoints, PortainerApi};
pub use client::{
    AuthSession, AuthSource, GatewayClientConfig, PortainerClient, DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use error::{GatewayError, GatewayErrorKind, GatewayResult};
pub use host::{HostConfig, HostCredentials};
pub use resources::{
    Container, CustomTemplate, DockerImage, Endpoint, EndpointScoped, Registry, Settings, Stack,
    StackEnvVar, StackFile, SystemStatus, Team, TemplateRepository, User, COMPOSE_PROJECT_LABEL,
    CONTAINER_STATE_RUNNING, PORTAINER_STACK_LABEL,
};
pub use views::{AuthSettings, LicenseInfo};
