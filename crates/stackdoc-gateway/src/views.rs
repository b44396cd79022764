use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resources::{Settings, SystemStatus};

pub const DEFAULT_EDITION: &str = "Community";
pub const UNKNOWN_VERSION: &str = "Unknown";
/// Portainer's code for built-in (internal) authentication.
pub const AUTH_METHOD_INTERNAL: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Edition/version/license summary derived from `/api/status`.
pub struct LicenseInfo {
    pub edition: String,
    pub version: String,
    pub license: Value,
}

impl LicenseInfo {
    pub fn from_status(status: &SystemStatus) -> Self {
        let non_blank = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        Self {
            edition: status
                .edition
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| DEFAULT_EDITION.to_string()),
            version: non_blank(&status.version).unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            license: status
                .license
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Authentication configuration derived from `/api/settings`.
pub struct AuthSettings {
    pub authentication_method: i64,
    pub ldap_settings: Value,
    pub oauth_settings: Value,
    pub internal_auth_settings: Value,
}

impl AuthSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            authentication_method: settings
                .authentication_method
                .unwrap_or(AUTH_METHOD_INTERNAL),
            ldap_settings: settings.ldap_settings.clone(),
            oauth_settings: settings.oauth_settings.clone(),
            internal_auth_settings: settings.internal_auth_settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AuthSettings, LicenseInfo, AUTH_METHOD_INTERNAL};
    use crate::resources::{Settings, SystemStatus};

    #[test]
    fn unit_license_info_applies_documented_defaults() {
        let info = LicenseInfo::from_status(&SystemStatus::default());
        assert_eq!(info.edition, "Community");
        assert_eq!(info.version, "Unknown");
        assert_eq!(info.license, json!({}));
    }

    #[test]
    fn unit_license_info_keeps_reported_values() {
        let status: SystemStatus = serde_json::from_value(json!({
            "Version": "2.19.4",
            "Edition": "Business",
            "License": {"Type": 2, "ExpiryDate": "2027-01-01"}
        }))
        .expect("decode status");
        let info = LicenseInfo::from_status(&status);
        assert_eq!(info.edition, "Business");
        assert_eq!(info.version, "2.19.4");
        assert_eq!(info.license["ExpiryDate"], json!("2027-01-01"));
    }

    #[test]
    fn unit_auth_settings_default_to_internal_method() {
        let settings: Settings = serde_json::from_value(json!({
            "OAuthSettings": {"ClientID": "abc"}
        }))
        .expect("decode settings");
        let auth = AuthSettings::from_settings(&settings);
        assert_eq!(auth.authentication_method, AUTH_METHOD_INTERNAL);
        assert_eq!(auth.oauth_settings["ClientID"], json!("abc"));
        assert!(auth.ldap_settings.is_null());
    }
}
