use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Credential used to open an `AuthSession` against one management server.
pub enum HostCredentials {
    /// Static API token sent as the bearer credential.
    Token { token: String },
    /// Username/password exchanged for a session token at connect time.
    Password { username: String, password: String },
}

impl HostCredentials {
    /// Picks the credential from loosely specified config values.
    ///
    /// A non-blank token wins; otherwise both username and password must be
    /// non-blank. Returns `None` when neither form is usable.
    pub fn from_parts(
        token: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Option<Self> {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        if let Some(token) = non_blank(token) {
            return Some(Self::Token { token });
        }
        match (non_blank(username), password.filter(|value| !value.is_empty())) {
            (Some(username), Some(password)) => Some(Self::Password {
                username,
                password: password.to_string(),
            }),
            _ => None,
        }
    }

    pub fn method_label(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Password { .. } => "password",
        }
    }
}

impl fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One configured management server. `name` is unique across a run.
pub struct HostConfig {
    pub name: String,
    pub url: String,
    pub credentials: Option<HostCredentials>,
}

impl HostConfig {
    pub fn with_token(name: impl Into<String>, url: impl Into<String>, token: &str) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            credentials: HostCredentials::from_parts(Some(token), None, None),
        }
    }

    pub fn with_password(
        name: impl Into<String>,
        url: impl Into<String>,
        username: &str,
        password: &str,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            credentials: HostCredentials::from_parts(None, Some(username), Some(password)),
        }
    }

    /// Base URL with surrounding whitespace and trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }
}
