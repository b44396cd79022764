use tracing::{debug, warn};

use crate::error::GatewayResult;
use crate::resources::{
    Container, CustomTemplate, DockerImage, Endpoint, EndpointScoped, Registry, Settings, Stack,
    StackFile, SystemStatus, Team, User,
};

/// Read-only view of one management server.
///
/// `PortainerClient` is the HTTP implementation; the collector, reconciler
/// and host orchestrator only depend on this trait.
pub trait PortainerApi {
    /// Name of the configured host, used as log context.
    fn host_name(&self) -> &str;

    fn status(&self) -> GatewayResult<SystemStatus>;
    fn settings(&self) -> GatewayResult<Settings>;
    fn endpoints(&self) -> GatewayResult<Vec<Endpoint>>;
    fn stacks(&self) -> GatewayResult<Vec<Stack>>;
    fn stack_file(&self, stack_id: i64) -> GatewayResult<StackFile>;
    fn custom_templates(&self) -> GatewayResult<Vec<CustomTemplate>>;
    fn registries(&self) -> GatewayResult<Vec<Registry>>;
    fn users(&self) -> GatewayResult<Vec<User>>;
    fn teams(&self) -> GatewayResult<Vec<Team>>;

    /// Images of one endpoint, or of every endpoint when `endpoint_id` is `None`.
    fn images(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<DockerImage>>;

    /// Containers (any state) of one endpoint, or of every endpoint when
    /// `endpoint_id` is `None`.
    fn containers(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<Container>>;

    /// Liveness check: any successful status call counts as connected.
    fn test_connection(&self) -> bool {
        match self.status() {
            Ok(status) => {
                debug!(
                    host = self.host_name(),
                    version = %status.version,
                    "connection test succeeded"
                );
                true
            }
            Err(error) => {
                warn!(host = self.host_name(), %error, "connection test failed");
                false
            }
        }
    }
}

/// Fans one per-endpoint fetch out over `endpoints`, in order.
///
/// Every returned record is tagged with its originating endpoint. A failing
/// endpoint is logged and skipped; the others still contribute.
pub fn collect_across_endpoints<T, F>(
    host: &str,
    category: &str,
    endpoints: &[Endpoint],
    mut fetch: F,
) -> Vec<T>
where
    T: EndpointScoped,
    F: FnMut(i64) -> GatewayResult<Vec<T>>,
{
    let mut rows = Vec::new();
    for endpoint in endpoints {
        match fetch(endpoint.id) {
            Ok(chunk) => {
                rows.extend(chunk.into_iter().map(|mut row| {
                    row.tag_endpoint(endpoint.id, &endpoint.name);
                    row
                }));
            }
            Err(error) => {
                warn!(
                    host,
                    category,
                    endpoint_id = endpoint.id,
                    endpoint_name = %endpoint.name,
                    %error,
                    "skipping endpoint"
                );
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::collect_across_endpoints;
    use crate::error::GatewayError;
    use crate::resources::{Container, Endpoint};

    fn endpoint(id: i64, name: &str) -> Endpoint {
        Endpoint {
            id,
            name: name.to_string(),
            ..Endpoint::default()
        }
    }

    fn container(id: &str) -> Container {
        Container {
            id: id.to_string(),
            ..Container::default()
        }
    }

    #[test]
    fn unit_fan_out_tags_records_and_keeps_endpoint_order() {
        let endpoints = vec![endpoint(2, "edge"), endpoint(1, "local")];
        let rows = collect_across_endpoints("prod", "containers", &endpoints, |id| {
            Ok(vec![container(&format!("c{id}a")), container(&format!("c{id}b"))])
        });
        let ids = rows.iter().map(|row| row.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c2a", "c2b", "c1a", "c1b"]);
        assert_eq!(rows[0].endpoint_id, 2);
        assert_eq!(rows[0].endpoint_name, "edge");
        assert_eq!(rows[3].endpoint_name, "local");
    }

    #[test]
    fn regression_fan_out_skips_failing_endpoint_without_aborting() {
        let endpoints = vec![endpoint(1, "local"), endpoint(2, "broken"), endpoint(3, "edge")];
        let rows = collect_across_endpoints("prod", "containers", &endpoints, |id| {
            if id == 2 {
                return Err(GatewayError::status(
                    "/api/endpoints/2/docker/containers/json",
                    502,
                    "bad gateway",
                ));
            }
            Ok(vec![container(&format!("c{id}"))])
        });
        let ids = rows.iter().map(|row| row.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c1", "c3"]);
    }
}
