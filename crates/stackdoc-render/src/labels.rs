//! Human-readable labels for the management API's numeric codes.

fn known_or_unknown(label: Option<&'static str>, code: i64) -> String {
    label
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown ({code})"))
}

pub fn endpoint_type_label(code: i64) -> String {
    let label = match code {
        1 => Some("Docker"),
        2 => Some("Agent"),
        3 => Some("Azure ACI"),
        4 => Some("Edge Agent"),
        5 => Some("Kubernetes Local"),
        6 => Some("Kubernetes Agent"),
        7 => Some("Edge Kubernetes Agent"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn endpoint_status_label(code: i64) -> String {
    let label = match code {
        1 => Some("Up"),
        2 => Some("Down"),
        _ => None,
    };
    known_or_unknown(label, code)
}

/// Shared by stacks and custom templates.
pub fn stack_type_label(code: i64) -> String {
    let label = match code {
        1 => Some("Docker Swarm"),
        2 => Some("Docker Compose"),
        3 => Some("Kubernetes"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn stack_status_label(code: i64) -> String {
    let label = match code {
        1 => Some("Active"),
        2 => Some("Inactive"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn template_platform_label(code: i64) -> String {
    let label = match code {
        1 => Some("Linux"),
        2 => Some("Windows"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn registry_type_label(code: i64) -> String {
    let label = match code {
        1 => Some("Quay.io"),
        2 => Some("Azure"),
        3 => Some("Custom"),
        4 => Some("GitLab"),
        5 => Some("ProGet"),
        6 => Some("DockerHub"),
        7 => Some("AWS ECR"),
        8 => Some("GitHub"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn user_role_label(code: i64) -> String {
    let label = match code {
        1 => Some("Administrator"),
        2 => Some("Standard User"),
        _ => None,
    };
    known_or_unknown(label, code)
}

pub fn auth_method_label(code: i64) -> String {
    let label = match code {
        1 => Some("Internal"),
        2 => Some("LDAP"),
        3 => Some("OAuth"),
        _ => None,
    };
    known_or_unknown(label, code)
}
