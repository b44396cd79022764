use std::path::Path;
use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::{json, Value};
use stackdoc_collector::CollectionOptions;
use stackdoc_core::BackupPolicy;
use stackdoc_gateway::{GatewayClientConfig, HostConfig};
use stackdoc_render::{FileRendererConfig, FileReportRenderer, OutputFormat};
use stackdoc_runtime::{HostFailure, HostOrchestrator, HttpHostConnector};

fn mock_healthy_host(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(200)
            .json_body(json!({"Version": "2.19.4", "InstanceID": "i-1", "Edition": "CE"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/settings");
        then.status(200).json_body(json!({
            "AuthenticationMethod": 2,
            "LDAPSettings": {"URL": "ldap.example:389", "BaseDN": "dc=example"},
            "OAuthSettings": null
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/endpoints");
        then.status(200)
            .json_body(json!([{"Id": 1, "Name": "local", "Type": 1, "Status": 1}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/stacks");
        then.status(200).json_body(json!([
            {"Id": 10, "Name": "Shop", "Type": 2, "EndpointId": 1, "Status": 1,
             "Env": [{"name": "MODE", "value": "prod"}], "AutoUpdate": null},
            {"Id": 11, "Name": "batch", "Type": 2, "EndpointId": 1, "Status": 2, "Env": null}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/stacks/10/file");
        then.status(200)
            .json_body(json!({"StackFileContent": "services:\n  shop:\n    image: shop:1\n"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/stacks/11/file");
        then.status(404).body("not found");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/custom_templates");
        then.status(500).body("template store offline");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/registries");
        then.status(200)
            .json_body(json!([{"Id": 1, "Name": "ghcr", "Type": 8, "URL": "ghcr.io", "Authentication": true}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/users");
        then.status(200)
            .json_body(json!([{"Id": 1, "Username": "admin", "Role": 1}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/teams");
        then.status(200).json_body(json!([{"Id": 1, "Name": "ops"}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/endpoints/1/docker/images/json");
        then.status(200)
            .json_body(json!([{"Id": "sha256:1", "RepoTags": ["shop:1"], "Size": 1048576}]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/endpoints/1/docker/containers/json")
            .query_param("all", "true");
        then.status(200).json_body(json!([
            {"Id": "aaa", "Names": ["/shop-web-1"], "Image": "shop:1", "State": "running",
             "Labels": {"com.docker.compose.project": "shop"}},
            {"Id": "bbb", "Names": ["/batch_worker_1"], "Image": "batch:2", "State": "exited",
             "Labels": null}
        ]));
    });
}

fn mock_unreachable_host(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(503).body("maintenance");
    });
}

fn orchestrator(output_dir: &Path, format: OutputFormat) -> HostOrchestrator {
    let options = CollectionOptions::default();
    HostOrchestrator::new(
        Arc::new(HttpHostConnector::new(GatewayClientConfig {
            request_timeout_ms: 5_000,
        })),
        Arc::new(FileReportRenderer::new(FileRendererConfig {
            output_dir: output_dir.to_path_buf(),
            format,
            backup_policy: BackupPolicy::keep_all(),
            timezone: chrono_tz::Tz::UTC,
            options,
        })),
        options,
    )
}

#[test]
fn integration_failing_host_does_not_block_healthy_host_markdown() {
    let healthy = MockServer::start();
    let unreachable = MockServer::start();
    mock_healthy_host(&healthy);
    mock_unreachable_host(&unreachable);
    let temp = tempfile::tempdir().expect("tempdir");

    let hosts = vec![
        HostConfig::with_token("edge", unreachable.base_url(), "edge-token"),
        HostConfig::with_token("prod", format!("{}/", healthy.base_url()), "prod-token"),
    ];
    let summary = orchestrator(temp.path(), OutputFormat::Markdown).run_all_hosts(&hosts);

    assert_eq!((summary.succeeded, summary.total), (1, 2));
    assert!(matches!(
        summary.outcomes[0].result,
        Err(HostFailure::ConnectionTest { .. })
    ));
    let report = summary.outcomes[1].result.as_ref().expect("prod succeeds");
    assert_eq!(report.degraded, vec!["templates".to_string()]);
    assert_eq!(report.output_path, temp.path().join("prod-docs.md"));
    assert!(!temp.path().join("edge-docs.md").exists());

    let markdown = std::fs::read_to_string(&report.output_path).expect("read report");
    assert!(markdown.contains("# Portainer Environment Documentation - prod"));
    assert!(markdown.contains("- **Method**: LDAP"));
    assert!(markdown.contains("- **Server**: ldap.example:389"));
    assert!(markdown.contains("## Stacks (2 total)"));
    assert!(markdown.contains("image: shop:1"));
    assert!(markdown.contains("Could not retrieve compose file"));
    assert!(markdown.contains("- **Shop** (endpoint 1): active (1/1 running)"));
    assert!(markdown.contains("- **batch** (endpoint 1): partial (0/1 running)"));
    assert!(markdown.contains("## Custom Templates (0 total)"));
    assert!(markdown.contains("- **Type**: GitHub"));
    assert!(markdown.contains("- `shop:1` on local (1.0 MB)"));
    assert!(markdown.contains("- **templates**: GET /api/custom_templates returned status 500"));
}

#[test]
fn integration_json_report_carries_bundle_and_upstream_fields() {
    let healthy = MockServer::start();
    mock_healthy_host(&healthy);
    let temp = tempfile::tempdir().expect("tempdir");

    let hosts = vec![HostConfig::with_token("prod", healthy.base_url(), "prod-token")];
    let summary = orchestrator(temp.path(), OutputFormat::Json).run_all_hosts(&hosts);
    assert!(summary.all_succeeded());

    let path = temp.path().join("prod-docs.json");
    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(path).expect("read report"))
            .expect("parse report");
    assert_eq!(report["host_name"], "prod");
    assert_eq!(report["portainer_url"], healthy.base_url());
    let data = &report["data"];
    assert_eq!(data["license"]["edition"], "CE");
    assert_eq!(data["templates"], json!([]));
    assert_eq!(data["stacks"][0]["AutoUpdate"], Value::Null);
    assert_eq!(data["stacks"][1]["Env"], json!([]));
    assert_eq!(data["images"][0]["EndpointName"], "local");
    assert_eq!(data["stack_deployments"]["Shop"]["status"], "active");
    assert_eq!(data["stack_deployments"]["Shop"]["running_count"], 1);
    assert_eq!(data["degraded"][0]["category"], "templates");
}
