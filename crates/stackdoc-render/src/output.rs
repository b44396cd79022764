use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

const DEFAULT_FILE_STEM: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => bail!("unsupported output format '{other}': expected markdown or json"),
        }
    }
}

/// Keeps ASCII alphanumerics, `-` and `_`.
pub fn sanitize_host_name(host_name: &str) -> String {
    let sanitized = host_name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect::<String>();
    if sanitized.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        sanitized
    }
}

/// `<sanitized host>-docs.<md|json>`.
pub fn output_file_name(host_name: &str, format: OutputFormat) -> String {
    format!(
        "{}-docs.{}",
        sanitize_host_name(host_name),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::{output_file_name, sanitize_host_name, OutputFormat};

    #[test]
    fn unit_sanitize_strips_path_and_space_characters() {
        assert_eq!(sanitize_host_name("prod/eu west"), "prodeuwest");
        assert_eq!(sanitize_host_name("lab_01-b"), "lab_01-b");
        assert_eq!(sanitize_host_name("../.."), "default");
        assert_eq!(sanitize_host_name(""), "default");
    }

    #[test]
    fn unit_output_file_name_follows_format() {
        assert_eq!(
            output_file_name("prod", OutputFormat::Markdown),
            "prod-docs.md"
        );
        assert_eq!(output_file_name("prod", OutputFormat::Json), "prod-docs.json");
    }

    #[test]
    fn unit_output_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!(
            "markdown".parse::<OutputFormat>().ok(),
            Some(OutputFormat::Markdown)
        );
        let error = "html".parse::<OutputFormat>().expect_err("html is unsupported");
        assert!(error.to_string().contains("unsupported output format 'html'"));
    }
}
