use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Sensitive string, such as a keystore password.
///
/// Formatting never reveals the value; use [`Secret::expose`] at the point
/// where the value is handed to the TLS layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// TLS parameters handed to the network layer.
///
/// Nothing here is cross-checked against `enabled`: TLS without a keystore
/// or truststore means the platform trust material is used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TlsSettings {
    pub(crate) enabled: bool,
    pub(crate) keystore_path: Option<PathBuf>,
    #[serde(skip)]
    pub(crate) keystore_password: Option<Secret>,
    pub(crate) truststore_path: Option<PathBuf>,
    #[serde(skip)]
    pub(crate) truststore_password: Option<Secret>,
    pub(crate) verify_hostnames: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            keystore_path: None,
            keystore_password: None,
            truststore_path: None,
            truststore_password: None,
            verify_hostnames: true,
        }
    }
}

impl TlsSettings {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn keystore_path(&self) -> Option<&Path> {
        self.keystore_path.as_deref()
    }

    pub fn keystore_password(&self) -> Option<&Secret> {
        self.keystore_password.as_ref()
    }

    pub fn truststore_path(&self) -> Option<&Path> {
        self.truststore_path.as_deref()
    }

    pub fn truststore_password(&self) -> Option<&Secret> {
        self.truststore_password.as_ref()
    }

    pub fn verify_hostnames(&self) -> bool {
        self.verify_hostnames
    }

    /// Returns `true` when TLS is on but no key or trust material is configured.
    pub fn uses_platform_trust(&self) -> bool {
        self.enabled && self.keystore_path.is_none() && self.truststore_path.is_none()
    }
}
