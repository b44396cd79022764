use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::{collect_across_endpoints, PortainerApi};
use crate::error::{GatewayError, GatewayResult};
use crate::host::{HostConfig, HostCredentials};
use crate::resources::{
    Container, CustomTemplate, DockerImage, Endpoint, EndpointScoped, Registry, Settings, Stack,
    StackFile, SystemStatus, Team, User,
};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const AUTH_PATH: &str = "/api/auth";
const ERROR_BODY_LIMIT_CHARS: usize = 512;
const CLIENT_USER_AGENT: &str = concat!("stackdoc/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Transport settings shared by every client a run creates.
pub struct GatewayClientConfig {
    pub request_timeout_ms: u64,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    StaticToken,
    SessionExchange,
}

#[derive(Clone)]
/// Bearer credential owned by exactly one client. Never refreshed.
pub struct AuthSession {
    token: String,
    source: AuthSource,
}

impl AuthSession {
    pub fn source(&self) -> AuthSource {
        self.source
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"***")
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug)]
/// Authenticated, read-only HTTP channel to one management server.
pub struct PortainerClient {
    http: Client,
    base_url: String,
    host_name: String,
    session: AuthSession,
    request_timeout_ms: u64,
}

impl PortainerClient {
    /// Opens a session for `host`.
    ///
    /// A static token is used as-is without any network call; otherwise the
    /// username/password pair is exchanged at `/api/auth` for a session token.
    pub fn connect(host: &HostConfig, config: &GatewayClientConfig) -> GatewayResult<Self> {
        let Some(credentials) = host.credentials.as_ref() else {
            return Err(GatewayError::MissingCredentials {
                host: host.name.clone(),
            });
        };

        let request_timeout_ms = config.request_timeout_ms.max(1);
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(GatewayError::ClientBuild)?;
        let base_url = host.base_url().to_string();

        let session = match credentials {
            HostCredentials::Token { token } => AuthSession {
                token: token.trim().to_string(),
                source: AuthSource::StaticToken,
            },
            HostCredentials::Password { username, password } => {
                let token = exchange_credentials(&http, &base_url, username, password)?;
                info!(host = %host.name, "authenticated with username/password");
                AuthSession {
                    token,
                    source: AuthSource::SessionExchange,
                }
            }
        };

        Ok(Self {
            http,
            base_url,
            host_name: host.name.clone(),
            session,
            request_timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> GatewayResult<T>
    where
        T: DeserializeOwned + Default,
    {
        debug!(host = %self.host_name, endpoint = path, "portainer api request");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.session.token)
            .query(query)
            .send()
            .map_err(|error| self.classify_transport_error(path, error))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| self.classify_transport_error(path, error))?;
        if !status.is_success() {
            return Err(GatewayError::status(
                path,
                status.as_u16(),
                truncate_for_error(&body, ERROR_BODY_LIMIT_CHARS),
            ));
        }
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body).map_err(|source| GatewayError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    fn classify_transport_error(&self, path: &str, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            return GatewayError::timeout(path, self.request_timeout_ms);
        }
        GatewayError::Transport {
            endpoint: path.to_string(),
            source: error,
        }
    }

    fn endpoint_images(&self, endpoint_id: i64) -> GatewayResult<Vec<DockerImage>> {
        self.get_json(
            &format!("/api/endpoints/{endpoint_id}/docker/images/json"),
            &[],
        )
    }

    fn endpoint_containers(&self, endpoint_id: i64) -> GatewayResult<Vec<Container>> {
        self.get_json(
            &format!("/api/endpoints/{endpoint_id}/docker/containers/json"),
            &[("all", "true")],
        )
    }

    fn per_endpoint<T, F>(
        &self,
        category: &str,
        endpoint_id: Option<i64>,
        fetch: F,
    ) -> GatewayResult<Vec<T>>
    where
        T: EndpointScoped,
        F: FnMut(i64) -> GatewayResult<Vec<T>>,
    {
        let mut fetch = fetch;
        match endpoint_id {
            Some(endpoint_id) => {
                let mut rows = fetch(endpoint_id)?;
                for row in &mut rows {
                    row.tag_endpoint(endpoint_id, "");
                }
                Ok(rows)
            }
            None => {
                let endpoints = self.endpoints()?;
                Ok(collect_across_endpoints(
                    &self.host_name,
                    category,
                    &endpoints,
                    fetch,
                ))
            }
        }
    }
}

impl PortainerApi for PortainerClient {
    fn host_name(&self) -> &str {
        &self.host_name
    }

    fn status(&self) -> GatewayResult<SystemStatus> {
        self.get_json("/api/status", &[])
    }

    fn settings(&self) -> GatewayResult<Settings> {
        self.get_json("/api/settings", &[])
    }

    fn endpoints(&self) -> GatewayResult<Vec<Endpoint>> {
        self.get_json("/api/endpoints", &[])
    }

    fn stacks(&self) -> GatewayResult<Vec<Stack>> {
        self.get_json("/api/stacks", &[])
    }

    fn stack_file(&self, stack_id: i64) -> GatewayResult<StackFile> {
        self.get_json(&format!("/api/stacks/{stack_id}/file"), &[])
    }

    fn custom_templates(&self) -> GatewayResult<Vec<CustomTemplate>> {
        self.get_json("/api/custom_templates", &[])
    }

    fn registries(&self) -> GatewayResult<Vec<Registry>> {
        self.get_json("/api/registries", &[])
    }

    fn users(&self) -> GatewayResult<Vec<User>> {
        self.get_json("/api/users", &[])
    }

    fn teams(&self) -> GatewayResult<Vec<Team>> {
        self.get_json("/api/teams", &[])
    }

    fn images(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<DockerImage>> {
        self.per_endpoint("images", endpoint_id, |id| self.endpoint_images(id))
    }

    fn containers(&self, endpoint_id: Option<i64>) -> GatewayResult<Vec<Container>> {
        self.per_endpoint("containers", endpoint_id, |id| self.endpoint_containers(id))
    }
}

fn exchange_credentials(
    http: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> GatewayResult<String> {
    let auth_error = |reason: String| GatewayError::Authentication {
        endpoint: AUTH_PATH.to_string(),
        reason,
    };
    let response = http
        .post(format!("{base_url}{AUTH_PATH}"))
        .json(&json!({ "Username": username, "Password": password }))
        .send()
        .map_err(|error| {
            if error.is_timeout() {
                auth_error("request timed out".to_string())
            } else {
                auth_error(format!("request failed: {error}"))
            }
        })?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|error| auth_error(format!("failed to read response: {error}")))?;
    if !status.is_success() {
        return Err(auth_error(format!(
            "status {}: {}",
            status.as_u16(),
            truncate_for_error(&body, ERROR_BODY_LIMIT_CHARS)
        )));
    }
    let payload = serde_json::from_str::<Value>(&body)
        .map_err(|error| auth_error(format!("invalid response body: {error}")))?;
    payload
        .get("jwt")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| auth_error("no jwt token in response".to_string()))
}

fn truncate_for_error(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated = trimmed.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::{
        truncate_for_error, AuthSource, GatewayClientConfig, PortainerClient,
        DEFAULT_REQUEST_TIMEOUT_MS,
    };
    use crate::api::PortainerApi;
    use crate::error::GatewayErrorKind;
    use crate::host::HostConfig;

    fn token_host(server: &MockServer) -> HostConfig {
        HostConfig::with_token("prod", format!("{}/", server.base_url()), "T")
    }

    fn fast_config() -> GatewayClientConfig {
        GatewayClientConfig {
            request_timeout_ms: 2_000,
        }
    }

    #[test]
    fn unit_default_config_uses_thirty_second_timeout() {
        assert_eq!(
            GatewayClientConfig::default().request_timeout_ms,
            DEFAULT_REQUEST_TIMEOUT_MS
        );
        assert_eq!(DEFAULT_REQUEST_TIMEOUT_MS, 30_000);
    }

    #[test]
    fn unit_truncate_for_error_caps_long_bodies() {
        assert_eq!(truncate_for_error("  short  ", 10), "short");
        assert_eq!(truncate_for_error("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn functional_static_token_skips_auth_exchange_and_sends_bearer() {
        let server = MockServer::start();
        let auth = server.mock(|when, then| {
            when.method(POST).path("/api/auth");
            then.status(200).json_body(json!({"jwt": "unused"}));
        });
        let status = server.mock(|when, then| {
            when.method(GET)
                .path("/api/status")
                .header("authorization", "Bearer T");
            then.status(200)
                .json_body(json!({"Version": "2.19.4", "InstanceID": "abc"}));
        });

        let client = PortainerClient::connect(&token_host(&server), &fast_config())
            .expect("token client");
        assert_eq!(client.session().source(), AuthSource::StaticToken);
        assert!(client.test_connection());
        auth.assert_calls(0);
        status.assert_calls(1);
    }

    #[test]
    fn functional_password_credentials_exchange_for_session_token() {
        let server = MockServer::start();
        let auth = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth")
                .json_body(json!({"Username": "admin", "Password": "secret"}));
            then.status(200).json_body(json!({"jwt": "session-jwt"}));
        });
        let stacks = server.mock(|when, then| {
            when.method(GET)
                .path("/api/stacks")
                .header("authorization", "Bearer session-jwt");
            then.status(200)
                .json_body(json!([{"Id": 1, "Name": "web", "EndpointId": 1}]));
        });

        let host =
            HostConfig::with_password("prod", server.base_url(), "admin", "secret");
        let client = PortainerClient::connect(&host, &fast_config()).expect("password client");
        assert_eq!(client.session().source(), AuthSource::SessionExchange);
        let rows = client.stacks().expect("stacks");
        auth.assert_calls(1);
        stacks.assert_calls(1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "web");
    }

    #[test]
    fn regression_missing_jwt_field_is_authentication_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/auth");
            then.status(200).json_body(json!({"token": "wrong-field"}));
        });
        let host =
            HostConfig::with_password("prod", server.base_url(), "admin", "secret");
        let error = PortainerClient::connect(&host, &fast_config()).expect_err("auth failure");
        assert_eq!(error.kind(), GatewayErrorKind::Authentication);
        assert_eq!(error.endpoint(), Some("/api/auth"));
        assert!(error.to_string().contains("no jwt token"));
    }

    #[test]
    fn regression_rejected_credentials_are_authentication_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/auth");
            then.status(422).body("Invalid credentials");
        });
        let host =
            HostConfig::with_password("prod", server.base_url(), "admin", "wrong");
        let error = PortainerClient::connect(&host, &fast_config()).expect_err("auth failure");
        assert_eq!(error.kind(), GatewayErrorKind::Authentication);
        assert!(error.to_string().contains("422"));
    }

    #[test]
    fn unit_missing_credentials_fail_fast_without_network() {
        let host = HostConfig {
            name: "prod".to_string(),
            url: "http://127.0.0.1:9".to_string(),
            credentials: None,
        };
        let error = PortainerClient::connect(&host, &fast_config()).expect_err("no credentials");
        assert_eq!(error.kind(), GatewayErrorKind::MissingCredentials);
    }

    #[test]
    fn functional_non_success_and_malformed_bodies_are_classified() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/registries");
            then.status(403).body("forbidden");
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).body("not json");
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/teams");
            then.status(204);
        });

        let client = PortainerClient::connect(&token_host(&server), &fast_config())
            .expect("client");
        let registries = client.registries().expect_err("status error");
        assert_eq!(registries.kind(), GatewayErrorKind::Status);
        assert_eq!(registries.endpoint(), Some("/api/registries"));
        let users = client.users().expect_err("decode error");
        assert_eq!(users.kind(), GatewayErrorKind::Decode);
        let teams = client.teams().expect("empty body decodes to default");
        assert!(teams.is_empty());
    }

    #[test]
    fn regression_slow_response_surfaces_timeout_kind() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/status");
            then.status(200)
                .json_body(json!({"Version": "2.19.4"}))
                .delay(Duration::from_millis(1_500));
        });
        let config = GatewayClientConfig {
            request_timeout_ms: 200,
        };
        let client = PortainerClient::connect(&token_host(&server), &config).expect("client");
        let error = client.status().expect_err("timeout");
        assert_eq!(error.kind(), GatewayErrorKind::Timeout);
        assert!(!client.test_connection());
    }

    #[test]
    fn functional_container_fan_out_tags_endpoints_and_skips_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/endpoints");
            then.status(200).json_body(json!([
                {"Id": 1, "Name": "local"},
                {"Id": 2, "Name": "edge"},
                {"Id": 3, "Name": "remote"}
            ]));
        });
        let local = server.mock(|when, then| {
            when.method(GET)
                .path("/api/endpoints/1/docker/containers/json")
                .query_param("all", "true");
            then.status(200)
                .json_body(json!([{"Id": "a1", "Names": ["/web_1"], "State": "running"}]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/endpoints/2/docker/containers/json");
            then.status(500).body("docker daemon unreachable");
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/endpoints/3/docker/containers/json");
            then.status(200)
                .json_body(json!([{"Id": "c1", "Names": ["/db_1"], "State": "exited"}]));
        });

        let client = PortainerClient::connect(&token_host(&server), &fast_config())
            .expect("client");
        let containers = client.containers(None).expect("fan-out");
        local.assert_calls(1);
        let tagged = containers
            .iter()
            .map(|row| (row.id.as_str(), row.endpoint_id, row.endpoint_name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(tagged, vec![("a1", 1, "local"), ("c1", 3, "remote")]);
    }

    #[test]
    fn functional_single_endpoint_images_are_tagged_with_id() {
        let server = MockServer::start();
        let endpoints = server.mock(|when, then| {
            when.method(GET).path("/api/endpoints");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/endpoints/4/docker/images/json");
            then.status(200).json_body(json!([
                {"Id": "sha256:1", "RepoTags": ["nginx:latest"], "Size": 1024}
            ]));
        });

        let client = PortainerClient::connect(&token_host(&server), &fast_config())
            .expect("client");
        let images = client.images(Some(4)).expect("images");
        endpoints.assert_calls(0);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].endpoint_id, 4);
        assert_eq!(images[0].repo_tags, vec!["nginx:latest".to_string()]);
    }

    #[test]
    fn functional_stack_file_fetch_targets_stack_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/stacks/12/file");
            then.status(200)
                .json_body(json!({"StackFileContent": "services:\n  web:\n    image: nginx\n"}));
        });
        let client = PortainerClient::connect(&token_host(&server), &fast_config())
            .expect("client");
        let file = client.stack_file(12).expect("stack file");
        assert!(file.stack_file_content.contains("image: nginx"));
    }
}
