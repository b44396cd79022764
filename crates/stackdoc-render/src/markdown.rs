use serde_json::Value;
use stackdoc_collector::{CollectedBundle, CollectionOptions};

use crate::labels::{
    auth_method_label, endpoint_status_label, endpoint_type_label, registry_type_label,
    stack_status_label, stack_type_label, template_platform_label, user_role_label,
};
use crate::ReportHeader;

const NOT_CONFIGURED: &str = "Not configured";

/// Renders the full Markdown report for one host.
pub fn render_markdown(
    header: &ReportHeader<'_>,
    bundle: &CollectedBundle,
    options: &CollectionOptions,
) -> String {
    let mut lines = vec![
        format!(
            "# Portainer Environment Documentation - {}",
            header.host_name
        ),
        String::new(),
        format!("Generated on: {}", header.generated_at_display),
        format!("Portainer URL: {}", header.portainer_url),
        String::new(),
        "---".to_string(),
    ];

    if options.include_license_info {
        push_license_section(&mut lines, bundle);
    }
    if options.include_auth_settings {
        push_auth_section(&mut lines, bundle);
    }
    push_endpoints_section(&mut lines, bundle);
    push_stacks_section(&mut lines, bundle, options);
    if options.include_deployments {
        push_deployment_section(&mut lines, bundle, options);
    }
    if options.include_templates {
        push_templates_section(&mut lines, bundle);
    }
    if options.include_registries {
        push_registries_section(&mut lines, bundle);
    }
    if options.include_users_teams {
        push_users_teams_section(&mut lines, bundle);
    }
    if options.include_images {
        push_images_section(&mut lines, bundle);
    }
    if !bundle.degraded.is_empty() {
        push_degraded_section(&mut lines, bundle);
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

fn heading(lines: &mut Vec<String>, text: String) {
    lines.push(String::new());
    lines.push(text);
}

fn push_license_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(lines, "## License and Version Information".to_string());
    let Some(license) = bundle.license.as_ref() else {
        lines.push("- License information unavailable".to_string());
        return;
    };
    lines.push(format!("- **Edition**: {}", license.edition));
    lines.push(format!("- **Version**: {}", license.version));
    if let Some(license_type) = json_field(&license.license, "Type") {
        lines.push(format!("- **License Type**: {license_type}"));
    }
    if let Some(expiry) = json_field(&license.license, "ExpiryDate") {
        lines.push(format!("- **License Expiry**: {expiry}"));
    }
}

fn push_auth_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(lines, "## Authentication Configuration".to_string());
    let Some(auth) = bundle.auth_settings.as_ref() else {
        lines.push("- Authentication settings unavailable".to_string());
        return;
    };
    lines.push(format!(
        "- **Method**: {}",
        auth_method_label(auth.authentication_method)
    ));

    if is_populated(&auth.ldap_settings) {
        heading(lines, "### LDAP Configuration".to_string());
        lines.push(format!(
            "- **Server**: {}",
            json_field(&auth.ldap_settings, "URL").unwrap_or_else(|| NOT_CONFIGURED.to_string())
        ));
        lines.push(format!(
            "- **Anonymous Mode**: {}",
            json_field(&auth.ldap_settings, "AnonymousMode").unwrap_or_else(|| "false".to_string())
        ));
        lines.push(format!(
            "- **Base DN**: {}",
            json_field(&auth.ldap_settings, "BaseDN")
                .unwrap_or_else(|| NOT_CONFIGURED.to_string())
        ));
    }

    if is_populated(&auth.oauth_settings) {
        heading(lines, "### OAuth Configuration".to_string());
        lines.push(format!(
            "- **Provider**: {}",
            json_field(&auth.oauth_settings, "Provider")
                .unwrap_or_else(|| NOT_CONFIGURED.to_string())
        ));
        let client_id = if json_field(&auth.oauth_settings, "ClientID").is_some() {
            "[Configured]"
        } else {
            NOT_CONFIGURED
        };
        lines.push(format!("- **Client ID**: {client_id}"));
    }
}

fn push_endpoints_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(
        lines,
        format!("## Endpoints ({} total)", bundle.endpoints.len()),
    );
    for endpoint in &bundle.endpoints {
        heading(lines, format!("### {}", endpoint.name));
        lines.push(format!(
            "- **Type**: {}",
            endpoint_type_label(endpoint.endpoint_type)
        ));
        lines.push(format!("- **URL**: {}", or_placeholder(&endpoint.url, "Not specified")));
        if !endpoint.public_url.is_empty() {
            lines.push(format!("- **Public URL**: {}", endpoint.public_url));
        }
        lines.push(format!(
            "- **Status**: {}",
            endpoint_status_label(endpoint.status)
        ));
        if !endpoint.tag_ids.is_empty() {
            let tags = endpoint
                .tag_ids
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("- **Tags**: {tags}"));
        }
        if endpoint.group_id != 0 {
            lines.push(format!("- **Group ID**: {}", endpoint.group_id));
        }
    }
}

fn push_stacks_section(
    lines: &mut Vec<String>,
    bundle: &CollectedBundle,
    options: &CollectionOptions,
) {
    heading(lines, format!("## Stacks ({} total)", bundle.stacks.len()));
    for stack in &bundle.stacks {
        heading(lines, format!("### {}", stack.name));
        lines.push(format!("- **Type**: {}", stack_type_label(stack.stack_type)));
        lines.push(format!("- **Status**: {}", stack_status_label(stack.status)));
        lines.push(format!("- **Endpoint ID**: {}", stack.endpoint_id));
        if !stack.created_by.is_empty() {
            lines.push(format!("- **Created By**: {}", stack.created_by));
        }
        if !stack.env.is_empty() {
            lines.push("- **Environment Variables**:".to_string());
            for var in &stack.env {
                lines.push(format!("  - `{}={}`", var.name, var.value));
            }
        }
        if options.include_compose_files {
            if let Some(compose) = stack.compose_file.as_deref().filter(|c| !c.is_empty()) {
                lines.push(String::new());
                lines.push("**Docker Compose File:**".to_string());
                lines.push("```yaml".to_string());
                lines.push(compose.trim_end().to_string());
                lines.push("```".to_string());
            }
        }
    }
}

fn push_deployment_section(
    lines: &mut Vec<String>,
    bundle: &CollectedBundle,
    options: &CollectionOptions,
) {
    heading(lines, "## Deployment Status".to_string());
    heading(
        lines,
        format!("### Stacks ({} tracked)", bundle.stack_deployments.len()),
    );
    for deployment in bundle.stack_deployments.values() {
        lines.push(format!(
            "- **{}** (endpoint {}): {} ({}/{} running)",
            deployment.stack_name,
            deployment.endpoint_id,
            deployment.status.as_str(),
            deployment.running_count,
            deployment.total_count
        ));
        for container in &deployment.matched_containers {
            lines.push(format!(
                "  - `{}` {} [{}]",
                container.name, container.image, container.state
            ));
        }
    }

    if options.include_templates {
        heading(
            lines,
            format!(
                "### Templates ({} tracked)",
                bundle.template_deployments.len()
            ),
        );
        for deployment in bundle.template_deployments.values() {
            let stacks = deployment
                .matching_stacks
                .iter()
                .map(|stack| stack.name.as_str())
                .collect::<Vec<_>>();
            let suffix = if stacks.is_empty() {
                String::new()
            } else {
                format!(": {}", stacks.join(", "))
            };
            lines.push(format!(
                "- **{}**: {} ({} stacks{suffix})",
                deployment.title,
                deployment.status.as_str(),
                deployment.deployment_count
            ));
        }
    }
}

fn push_templates_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(
        lines,
        format!("## Custom Templates ({} total)", bundle.templates.len()),
    );
    for template in &bundle.templates {
        heading(lines, format!("### {}", template.title));
        lines.push(format!(
            "- **Type**: {}",
            stack_type_label(template.template_type)
        ));
        if !template.description.is_empty() {
            lines.push(format!("- **Description**: {}", template.description));
        }
        if template.platform != 0 {
            lines.push(format!(
                "- **Platform**: {}",
                template_platform_label(template.platform)
            ));
        }
        if let Some(repository) = template.repository.as_ref() {
            lines.push(format!(
                "- **Repository**: {}",
                or_placeholder(&repository.url, "Unknown")
            ));
            if !repository.stackfile.is_empty() {
                lines.push(format!("- **Stack File**: {}", repository.stackfile));
            }
        }
    }
}

fn push_registries_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(
        lines,
        format!("## Registries ({} total)", bundle.registries.len()),
    );
    for registry in &bundle.registries {
        heading(lines, format!("### {}", registry.name));
        lines.push(format!(
            "- **Type**: {}",
            registry_type_label(registry.registry_type)
        ));
        lines.push(format!("- **URL**: {}", or_placeholder(&registry.url, "Unknown")));
        lines.push(format!(
            "- **Authentication**: {}",
            if registry.authentication { "Yes" } else { "No" }
        ));
        if !registry.username.is_empty() {
            lines.push(format!("- **Username**: {}", registry.username));
        }
    }
}

fn push_users_teams_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(lines, "## Users and Teams".to_string());
    lines.push(format!("- **Users**: {} total", bundle.users.len()));
    lines.push(format!("- **Teams**: {} total", bundle.teams.len()));
    if !bundle.users.is_empty() {
        heading(lines, "### Users".to_string());
        for user in &bundle.users {
            lines.push(format!(
                "- **{}** (Role: {})",
                user.username,
                user_role_label(user.role)
            ));
        }
    }
    if !bundle.teams.is_empty() {
        heading(lines, "### Teams".to_string());
        for team in &bundle.teams {
            lines.push(format!("- **{}**", team.name));
        }
    }
}

fn push_images_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(
        lines,
        format!("## Docker Images ({} total)", bundle.images.len()),
    );
    for image in &bundle.images {
        let tags = if image.repo_tags.is_empty() {
            "<none>".to_string()
        } else {
            image.repo_tags.join(", ")
        };
        lines.push(format!(
            "- `{tags}` on {} ({})",
            or_placeholder(&image.endpoint_name, &format!("endpoint {}", image.endpoint_id)),
            format_size(image.size)
        ));
    }
}

fn push_degraded_section(lines: &mut Vec<String>, bundle: &CollectedBundle) {
    heading(lines, "## Degraded Categories".to_string());
    lines.push(
        "The following categories could not be retrieved and are shown empty:".to_string(),
    );
    for entry in &bundle.degraded {
        lines.push(format!("- **{}**: {}", entry.category, entry.error));
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn is_populated(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| !fields.is_empty())
}

/// Scalar field of a JSON object as display text; blank strings count as absent.
fn json_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn format_size(bytes: i64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes <= 0 {
        return "size unknown".to_string();
    }
    format!("{:.1} MB", bytes as f64 / MIB)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stackdoc_collector::{BundleBuilder, CollectedBundle, CollectionOptions};
    use stackdoc_gateway::{
        CustomTemplate, DockerImage, Endpoint, GatewayError, LicenseInfo, Settings, Stack,
        StackEnvVar, SystemStatus, User,
    };
    use stackdoc_reconcile::{reconcile_stacks, reconcile_templates};

    use super::{format_size, render_markdown};
    use crate::ReportHeader;

    fn header() -> ReportHeader<'static> {
        ReportHeader {
            host_name: "prod",
            portainer_url: "https://portainer.example",
            generated_at_display: "2026-01-01 02:00:00 UTC",
        }
    }

    fn sample_bundle() -> CollectedBundle {
        let status = SystemStatus {
            version: "2.19.4".to_string(),
            edition: Some("Business".to_string()),
            license: Some(json!({"Type": "Enterprise", "ExpiryDate": "2027-01-01"})),
            ..SystemStatus::default()
        };
        let stacks = vec![Stack {
            id: 1,
            name: "wordpress-prod".to_string(),
            stack_type: 2,
            endpoint_id: 1,
            status: 1,
            env: vec![StackEnvVar {
                name: "MODE".to_string(),
                value: "prod".to_string(),
            }],
            compose_file: Some("services:\n  wp:\n    image: wordpress\n".to_string()),
            ..Stack::default()
        }];
        let templates = vec![CustomTemplate {
            id: 5,
            title: "wordpress".to_string(),
            template_type: 2,
            platform: 1,
            ..CustomTemplate::default()
        }];
        BundleBuilder::new(
            status.clone(),
            vec![Endpoint {
                id: 1,
                name: "local".to_string(),
                endpoint_type: 1,
                status: 1,
                url: "unix:///var/run/docker.sock".to_string(),
                ..Endpoint::default()
            }],
            stacks.clone(),
        )
        .license(LicenseInfo::from_status(&status))
        .settings(Settings {
            authentication_method: Some(3),
            oauth_settings: json!({"Provider": "github", "ClientID": "secret-client"}),
            ..Settings::default()
        })
        .templates(templates.clone())
        .users(vec![User {
            id: 1,
            username: "admin".to_string(),
            role: 1,
            ..User::default()
        }])
        .images(vec![DockerImage {
            id: "sha256:1".to_string(),
            repo_tags: vec!["wordpress:6".to_string()],
            size: 3 * 1024 * 1024,
            endpoint_id: 1,
            endpoint_name: "local".to_string(),
            ..DockerImage::default()
        }])
        .stack_deployments(reconcile_stacks(&stacks, &[]))
        .template_deployments(reconcile_templates(&templates, &stacks))
        .degraded("teams", &GatewayError::status("/api/teams", 500, "boom"))
        .build()
    }

    #[test]
    fn functional_markdown_contains_every_enabled_section() {
        let rendered = render_markdown(&header(), &sample_bundle(), &CollectionOptions::default());

        assert!(rendered.starts_with("# Portainer Environment Documentation - prod\n"));
        assert!(rendered.contains("Generated on: 2026-01-01 02:00:00 UTC"));
        assert!(rendered.contains("- **Edition**: Business"));
        assert!(rendered.contains("- **License Type**: Enterprise"));
        assert!(rendered.contains("- **Method**: OAuth"));
        assert!(rendered.contains("- **Provider**: github"));
        assert!(rendered.contains("- **Client ID**: [Configured]"));
        assert!(!rendered.contains("secret-client"));
        assert!(rendered.contains("## Endpoints (1 total)"));
        assert!(rendered.contains("- **Type**: Docker Compose"));
        assert!(rendered.contains("  - `MODE=prod`"));
        assert!(rendered.contains("```yaml\nservices:\n  wp:\n    image: wordpress\n```"));
        assert!(rendered.contains("- **wordpress-prod** (endpoint 1): none (0/0 running)"));
        assert!(rendered.contains("- **wordpress**: deployed (1 stacks: wordpress-prod)"));
        assert!(rendered.contains("- **Platform**: Linux"));
        assert!(rendered.contains("- **admin** (Role: Administrator)"));
        assert!(rendered.contains("- `wordpress:6` on local (3.0 MB)"));
        assert!(rendered.contains("## Degraded Categories"));
        assert!(rendered.contains("- **teams**: GET /api/teams returned status 500: boom"));
    }

    #[test]
    fn unit_disabled_sections_are_omitted() {
        let rendered = render_markdown(&header(), &sample_bundle(), &CollectionOptions::minimal());

        assert!(rendered.contains("## Endpoints"));
        assert!(rendered.contains("## Stacks"));
        assert!(!rendered.contains("## License and Version Information"));
        assert!(!rendered.contains("## Authentication Configuration"));
        assert!(!rendered.contains("## Deployment Status"));
        assert!(!rendered.contains("## Custom Templates"));
        assert!(!rendered.contains("## Docker Images"));
        assert!(!rendered.contains("```yaml"));
    }

    #[test]
    fn unit_unknown_codes_render_with_number() {
        let bundle = BundleBuilder::new(
            SystemStatus::default(),
            vec![Endpoint {
                id: 9,
                name: "odd".to_string(),
                endpoint_type: 99,
                ..Endpoint::default()
            }],
            Vec::new(),
        )
        .build();
        let rendered = render_markdown(&header(), &bundle, &CollectionOptions::minimal());
        assert!(rendered.contains("- **Type**: Unknown (99)"));
        assert!(rendered.contains("- **Status**: Unknown (0)"));
    }

    #[test]
    fn unit_format_size_handles_missing_size() {
        assert_eq!(format_size(0), "size unknown");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }
}
