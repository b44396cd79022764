use anyhow::{Context, Result};
use serde::Serialize;
use stackdoc_collector::CollectedBundle;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    host_name: &'a str,
    portainer_url: &'a str,
    data: &'a CollectedBundle,
}

/// Pretty JSON envelope around the bundle, newline terminated.
pub fn render_json(
    generated_at_rfc3339: &str,
    host_name: &str,
    portainer_url: &str,
    bundle: &CollectedBundle,
) -> Result<String> {
    let report = JsonReport {
        generated_at: generated_at_rfc3339,
        host_name,
        portainer_url,
        data: bundle,
    };
    let mut rendered =
        serde_json::to_string_pretty(&report).context("failed to render json report")?;
    rendered.push('\n');
    Ok(rendered)
}
