use std::fmt::Display;
use std::net::Ipv6Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::{
    duration::{format_duration, parse_duration},
    keys, properties, RetryPolicy, Secret, SettingsError, TlsSettings, Violation,
};

pub const DEFAULT_PORT: i32 = 9200;
pub const DEFAULT_SCHEMA: &str = "default";
pub const DEFAULT_TABLE_DESCRIPTION_DIRECTORY: &str = "etc/elasticsearch/";
pub const DEFAULT_SCROLL_SIZE: u32 = 1_000;
pub const DEFAULT_SCROLL_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_REQUEST_RETRIES: u32 = 5;
pub const DEFAULT_MAX_RETRY_TIME: Duration = Duration::from_secs(10);

/// Validated, read-only connection settings.
///
/// Built once through [`ConnectionSettingsBuilder::build`] and then shared
/// freely; there are no setters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectionSettings {
    host: String,
    port: i32,
    #[serde(rename = "default-schema-name")]
    default_schema: String,
    table_description_directory: PathBuf,
    scroll_size: u32,
    #[serde(serialize_with = "serialize_duration")]
    scroll_timeout: Duration,
    #[serde(serialize_with = "serialize_duration")]
    request_timeout: Duration,
    #[serde(serialize_with = "serialize_duration")]
    connect_timeout: Duration,
    max_request_retries: u32,
    #[serde(rename = "max-request-retry-time", serialize_with = "serialize_duration")]
    max_retry_time: Duration,
    tls: TlsSettings,
}

impl ConnectionSettings {
    pub fn builder() -> ConnectionSettingsBuilder {
        ConnectionSettingsBuilder::default()
    }

    /// Builds settings from `(key, value)` configuration pairs.
    pub fn from_properties<I, K, V>(properties: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        ConnectionSettingsBuilder::from_properties(properties).build()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port as configured; range checks are left to the network layer.
    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    pub fn table_description_directory(&self) -> &Path {
        &self.table_description_directory
    }

    pub fn scroll_size(&self) -> u32 {
        self.scroll_size
    }

    pub fn scroll_timeout(&self) -> Duration {
        self.scroll_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn max_request_retries(&self) -> u32 {
        self.max_request_retries
    }

    pub fn max_retry_time(&self) -> Duration {
        self.max_retry_time
    }

    pub fn tls(&self) -> &TlsSettings {
        &self.tls
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.enabled
    }

    pub fn keystore_path(&self) -> Option<&Path> {
        self.tls.keystore_path()
    }

    pub fn keystore_password(&self) -> Option<&Secret> {
        self.tls.keystore_password()
    }

    pub fn truststore_path(&self) -> Option<&Path> {
        self.tls.truststore_path()
    }

    pub fn truststore_password(&self) -> Option<&Secret> {
        self.tls.truststore_password()
    }

    pub fn verify_hostnames(&self) -> bool {
        self.tls.verify_hostnames
    }

    /// Backoff policy derived from `max_request_retries` and `max_retry_time`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_request_retries, self.max_retry_time)
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls.enabled {
            "https"
        } else {
            "http"
        }
    }

    /// Base URL of the cluster, e.g. `http://localhost:9200`.
    pub fn endpoint(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("{}://[{}]:{}", self.scheme(), self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme(), self.host, self.port)
        }
    }

    /// Effective value of every non-sensitive key.
    ///
    /// Unset optional paths are left out.
    pub fn to_properties(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            (keys::HOST, self.host.clone()),
            (keys::PORT, self.port.to_string()),
            (keys::DEFAULT_SCHEMA, self.default_schema.clone()),
            (
                keys::TABLE_DESCRIPTION_DIRECTORY,
                self.table_description_directory.display().to_string(),
            ),
            (keys::SCROLL_SIZE, self.scroll_size.to_string()),
            (keys::SCROLL_TIMEOUT, format_duration(self.scroll_timeout)),
            (keys::REQUEST_TIMEOUT, format_duration(self.request_timeout)),
            (keys::CONNECT_TIMEOUT, format_duration(self.connect_timeout)),
            (keys::MAX_REQUEST_RETRIES, self.max_request_retries.to_string()),
            (keys::MAX_RETRY_TIME, format_duration(self.max_retry_time)),
            (keys::TLS_ENABLED, self.tls.enabled.to_string()),
        ];
        if let Some(path) = self.tls.keystore_path() {
            entries.push((keys::TLS_KEYSTORE_PATH, path.display().to_string()));
        }
        if let Some(path) = self.tls.truststore_path() {
            entries.push((keys::TLS_TRUSTSTORE_PATH, path.display().to_string()));
        }
        entries.push((
            keys::TLS_VERIFY_HOSTNAMES,
            self.tls.verify_hostnames.to_string(),
        ));
        entries
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

/// Collects overrides for [`ConnectionSettings`].
///
/// Starts from the defaults. Problems found while reading properties are
/// kept and reported by [`ConnectionSettingsBuilder::build`] together with
/// validation failures.
#[derive(Clone, Debug)]
pub struct ConnectionSettingsBuilder {
    host: Option<String>,
    port: i32,
    default_schema: Option<String>,
    table_description_directory: Option<PathBuf>,
    scroll_size: i64,
    scroll_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_request_retries: i64,
    max_retry_time: Option<Duration>,
    tls: TlsSettings,
    violations: Vec<Violation>,
}

impl Default for ConnectionSettingsBuilder {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            default_schema: Some(DEFAULT_SCHEMA.to_owned()),
            table_description_directory: Some(PathBuf::from(DEFAULT_TABLE_DESCRIPTION_DIRECTORY)),
            scroll_size: DEFAULT_SCROLL_SIZE.into(),
            scroll_timeout: Some(DEFAULT_SCROLL_TIMEOUT),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            max_request_retries: DEFAULT_MAX_REQUEST_RETRIES.into(),
            max_retry_time: Some(DEFAULT_MAX_RETRY_TIME),
            tls: TlsSettings::default(),
            violations: Vec::new(),
        }
    }
}

impl ConnectionSettingsBuilder {
    /// Creates a builder from `(key, value)` configuration pairs.
    pub fn from_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::default().apply_properties(properties)
    }

    /// Creates a builder from the text of a `.properties` file.
    pub fn from_properties_str(text: &str) -> Self {
        Self::from_properties(properties::parse(text))
    }

    /// Creates a builder from environment variables.
    ///
    /// Every supported and retired key is looked up under its
    /// [`keys::env_var_name`], e.g. `ELASTICSEARCH_HOST`.
    pub fn from_env() -> Self {
        let vars = keys::ALL
            .iter()
            .chain(keys::RETIRED_KEYS.iter())
            .filter_map(|key| {
                std::env::var(keys::env_var_name(key))
                    .ok()
                    .map(|value| (*key, value))
            })
            .collect::<Vec<_>>();
        Self::from_properties(vars)
    }

    /// Applies `(key, value)` pairs on top of the current values.
    ///
    /// Keys outside the `elasticsearch.` namespace are ignored unless retired.
    /// Values are trimmed, except for passwords which are taken verbatim.
    pub fn apply_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in properties {
            let key = key.as_ref().trim();
            let value = value.as_ref();
            if keys::is_sensitive(key) {
                self.apply(key, value);
            } else {
                self.apply(key, value.trim());
            }
        }
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: i32) -> Self {
        self.port = port;
        self
    }

    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub fn table_description_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.table_description_directory = Some(directory.into());
        self
    }

    pub fn scroll_size(mut self, size: i64) -> Self {
        self.scroll_size = size;
        self
    }

    pub fn scroll_timeout(mut self, timeout: Duration) -> Self {
        self.scroll_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn max_request_retries(mut self, retries: i64) -> Self {
        self.max_request_retries = retries;
        self
    }

    pub fn max_retry_time(mut self, ceiling: Duration) -> Self {
        self.max_retry_time = Some(ceiling);
        self
    }

    pub fn tls_enabled(mut self, enabled: bool) -> Self {
        self.tls.enabled = enabled;
        self
    }

    pub fn keystore_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls.keystore_path = Some(path.into());
        self
    }

    pub fn keystore_password(mut self, password: impl Into<Secret>) -> Self {
        self.tls.keystore_password = Some(password.into());
        self
    }

    pub fn truststore_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls.truststore_path = Some(path.into());
        self
    }

    pub fn truststore_password(mut self, password: impl Into<Secret>) -> Self {
        self.tls.truststore_password = Some(password.into());
        self
    }

    pub fn verify_hostnames(mut self, verify: bool) -> Self {
        self.tls.verify_hostnames = verify;
        self
    }

    /// Validates every field and produces the settings.
    ///
    /// Fails with every violation found, including those recorded while
    /// reading properties.
    pub fn build(self) -> crate::Result<ConnectionSettings> {
        let Self {
            host,
            port,
            default_schema,
            table_description_directory,
            scroll_size,
            scroll_timeout,
            request_timeout,
            connect_timeout,
            max_request_retries,
            max_retry_time,
            tls,
            mut violations,
        } = self;

        let host = require_text(&mut violations, keys::HOST, host);
        let default_schema = require_text(&mut violations, keys::DEFAULT_SCHEMA, default_schema);
        let table_description_directory = require(
            &mut violations,
            keys::TABLE_DESCRIPTION_DIRECTORY,
            table_description_directory.filter(|path| !path.as_os_str().is_empty()),
        );
        let scroll_size = at_least_one(&mut violations, keys::SCROLL_SIZE, scroll_size);
        let scroll_timeout = require(&mut violations, keys::SCROLL_TIMEOUT, scroll_timeout);
        let request_timeout = require(&mut violations, keys::REQUEST_TIMEOUT, request_timeout);
        let connect_timeout = require(&mut violations, keys::CONNECT_TIMEOUT, connect_timeout);
        let max_request_retries =
            at_least_one(&mut violations, keys::MAX_REQUEST_RETRIES, max_request_retries);
        let max_retry_time = require(&mut violations, keys::MAX_RETRY_TIME, max_retry_time);

        if tls.keystore_password.is_some() && tls.keystore_path.is_none() {
            violations.push(Violation::ConstraintViolation {
                key: keys::TLS_KEYSTORE_PASSWORD,
                message: format!("requires '{}' to be set", keys::TLS_KEYSTORE_PATH),
            });
        }
        if tls.truststore_password.is_some() && tls.truststore_path.is_none() {
            violations.push(Violation::ConstraintViolation {
                key: keys::TLS_TRUSTSTORE_PASSWORD,
                message: format!("requires '{}' to be set", keys::TLS_TRUSTSTORE_PATH),
            });
        }

        let (
            Some(host),
            Some(default_schema),
            Some(table_description_directory),
            Some(scroll_size),
            Some(scroll_timeout),
            Some(request_timeout),
            Some(connect_timeout),
            Some(max_request_retries),
            Some(max_retry_time),
            true,
        ) = (
            host,
            default_schema,
            table_description_directory,
            scroll_size,
            scroll_timeout,
            request_timeout,
            connect_timeout,
            max_request_retries,
            max_retry_time,
            violations.is_empty(),
        )
        else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                violations = violations.len(),
                "rejecting elasticsearch configuration"
            );
            return Err(SettingsError::new(violations));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            host = %host,
            port,
            tls = tls.enabled,
            max_request_retries,
            "elasticsearch settings validated"
        );

        Ok(ConnectionSettings {
            host,
            port,
            default_schema,
            table_description_directory,
            scroll_size,
            scroll_timeout,
            request_timeout,
            connect_timeout,
            max_request_retries,
            max_retry_time,
            tls,
        })
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            keys::HOST => self.host = non_empty(value),
            keys::PORT => {
                if let Some(port) = self.parse(keys::PORT, value) {
                    self.port = port;
                }
            }
            keys::DEFAULT_SCHEMA => self.default_schema = non_empty(value),
            keys::TABLE_DESCRIPTION_DIRECTORY => {
                self.table_description_directory = non_empty(value).map(PathBuf::from)
            }
            keys::SCROLL_SIZE => {
                if let Some(size) = self.parse(keys::SCROLL_SIZE, value) {
                    self.scroll_size = size;
                }
            }
            keys::SCROLL_TIMEOUT => self.scroll_timeout = self.duration(keys::SCROLL_TIMEOUT, value),
            keys::REQUEST_TIMEOUT => {
                self.request_timeout = self.duration(keys::REQUEST_TIMEOUT, value)
            }
            keys::CONNECT_TIMEOUT => {
                self.connect_timeout = self.duration(keys::CONNECT_TIMEOUT, value)
            }
            keys::MAX_REQUEST_RETRIES => {
                if let Some(retries) = self.parse(keys::MAX_REQUEST_RETRIES, value) {
                    self.max_request_retries = retries;
                }
            }
            keys::MAX_RETRY_TIME => self.max_retry_time = self.duration(keys::MAX_RETRY_TIME, value),
            keys::TLS_ENABLED => {
                if let Some(enabled) = self.flag(keys::TLS_ENABLED, value) {
                    self.tls.enabled = enabled;
                }
            }
            keys::TLS_KEYSTORE_PATH => self.tls.keystore_path = non_empty(value).map(PathBuf::from),
            keys::TLS_KEYSTORE_PASSWORD => {
                self.tls.keystore_password = non_empty(value).map(Secret::from)
            }
            keys::TLS_TRUSTSTORE_PATH => {
                self.tls.truststore_path = non_empty(value).map(PathBuf::from)
            }
            keys::TLS_TRUSTSTORE_PASSWORD => {
                self.tls.truststore_password = non_empty(value).map(Secret::from)
            }
            keys::TLS_VERIFY_HOSTNAMES => {
                if let Some(verify) = self.flag(keys::TLS_VERIFY_HOSTNAMES, value) {
                    self.tls.verify_hostnames = verify;
                }
            }
            retired if keys::is_retired(retired) => {
                self.violations.push(Violation::RetiredKeyUsed {
                    key: retired.to_owned(),
                });
            }
            unknown if unknown.starts_with(keys::PREFIX) => {
                self.violations.push(Violation::UnknownKey {
                    key: unknown.to_owned(),
                });
            }
            _ => {}
        }
    }

    fn parse<T>(&mut self, key: &'static str, value: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.violations.push(Violation::InvalidValue {
                    key,
                    message: format!("'{value}': {err}"),
                });
                None
            }
        }
    }

    /// Empty values unset the key; malformed ones keep it unset as well.
    fn duration(&mut self, key: &'static str, value: &str) -> Option<Duration> {
        if value.is_empty() {
            return None;
        }
        match parse_duration(value) {
            Ok(duration) => Some(duration),
            Err(message) => {
                self.violations
                    .push(Violation::InvalidValue { key, message });
                None
            }
        }
    }

    fn flag(&mut self, key: &'static str, value: &str) -> Option<bool> {
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            self.violations.push(Violation::InvalidValue {
                key,
                message: format!("'{value}' is not a boolean"),
            });
            None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn require<T>(violations: &mut Vec<Violation>, key: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        violations.push(Violation::MissingRequiredValue { key });
    }
    value
}

fn require_text(
    violations: &mut Vec<Violation>,
    key: &'static str,
    value: Option<String>,
) -> Option<String> {
    require(
        violations,
        key,
        value.filter(|text| !text.trim().is_empty()),
    )
}

fn at_least_one(violations: &mut Vec<Violation>, key: &'static str, value: i64) -> Option<u32> {
    if value < 1 {
        violations.push(Violation::ConstraintViolation {
            key,
            message: format!("must be at least 1, got {value}"),
        });
        return None;
    }
    match u32::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(Violation::ConstraintViolation {
                key,
                message: format!("must not exceed {}, got {value}", u32::MAX),
            });
            None
        }
    }
}
