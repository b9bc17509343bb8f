//! Configuration keys understood by [`crate::ConnectionSettingsBuilder`].

pub const HOST: &str = "elasticsearch.host";
pub const PORT: &str = "elasticsearch.port";
pub const DEFAULT_SCHEMA: &str = "elasticsearch.default-schema-name";
pub const TABLE_DESCRIPTION_DIRECTORY: &str = "elasticsearch.table-description-directory";
pub const SCROLL_SIZE: &str = "elasticsearch.scroll-size";
pub const SCROLL_TIMEOUT: &str = "elasticsearch.scroll-timeout";
pub const REQUEST_TIMEOUT: &str = "elasticsearch.request-timeout";
pub const CONNECT_TIMEOUT: &str = "elasticsearch.connect-timeout";
pub const MAX_REQUEST_RETRIES: &str = "elasticsearch.max-request-retries";
pub const MAX_RETRY_TIME: &str = "elasticsearch.max-request-retry-time";
pub const TLS_ENABLED: &str = "elasticsearch.tls.enabled";
pub const TLS_KEYSTORE_PATH: &str = "elasticsearch.tls.keystore-path";
pub const TLS_KEYSTORE_PASSWORD: &str = "elasticsearch.tls.keystore-password";
pub const TLS_TRUSTSTORE_PATH: &str = "elasticsearch.tls.truststore-path";
pub const TLS_TRUSTSTORE_PASSWORD: &str = "elasticsearch.tls.truststore-password";
pub const TLS_VERIFY_HOSTNAMES: &str = "elasticsearch.tls.verify-hostnames";

/// Namespace owned by this crate. Unrecognized keys inside it are rejected.
pub const PREFIX: &str = "elasticsearch.";

/// Every supported key, in documentation order.
pub const ALL: [&str; 16] = [
    HOST,
    PORT,
    DEFAULT_SCHEMA,
    TABLE_DESCRIPTION_DIRECTORY,
    SCROLL_SIZE,
    SCROLL_TIMEOUT,
    REQUEST_TIMEOUT,
    CONNECT_TIMEOUT,
    MAX_REQUEST_RETRIES,
    MAX_RETRY_TIME,
    TLS_ENABLED,
    TLS_KEYSTORE_PATH,
    TLS_KEYSTORE_PASSWORD,
    TLS_TRUSTSTORE_PATH,
    TLS_TRUSTSTORE_PASSWORD,
    TLS_VERIFY_HOSTNAMES,
];

/// Keys from earlier releases and the old searchguard TLS layer.
pub const RETIRED_KEYS: [&str; 11] = [
    "elasticsearch.max-hits",
    "elasticsearch.cluster-name",
    "searchguard.ssl.certificate-format",
    "searchguard.ssl.pemcert-filepath",
    "searchguard.ssl.pemkey-filepath",
    "searchguard.ssl.pemkey-password",
    "searchguard.ssl.pemtrustedcas-filepath",
    "searchguard.ssl.keystore-filepath",
    "searchguard.ssl.keystore-password",
    "searchguard.ssl.truststore-filepath",
    "searchguard.ssl.truststore-password",
];

/// Keys whose values must never be echoed.
pub const SENSITIVE_KEYS: [&str; 2] = [TLS_KEYSTORE_PASSWORD, TLS_TRUSTSTORE_PASSWORD];

pub fn is_retired(key: &str) -> bool {
    RETIRED_KEYS.contains(&key)
}

pub fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYS.contains(&key)
}

pub fn is_supported(key: &str) -> bool {
    ALL.contains(&key)
}

/// Documentation entry for a supported key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDescription {
    pub key: &'static str,
    /// Rendered default, or `None` when the key has no default.
    pub default: Option<&'static str>,
    pub description: &'static str,
}

/// Describes every supported key with its default and purpose.
pub fn describe() -> Vec<KeyDescription> {
    vec![
        entry(HOST, None, "Elasticsearch host to connect to"),
        entry(PORT, Some("9200"), "Elasticsearch port"),
        entry(DEFAULT_SCHEMA, Some("default"), "Default schema name to use"),
        entry(
            TABLE_DESCRIPTION_DIRECTORY,
            Some("etc/elasticsearch/"),
            "Directory that contains JSON table description files",
        ),
        entry(SCROLL_SIZE, Some("1000"), "Scroll batch size"),
        entry(SCROLL_TIMEOUT, Some("1s"), "Scroll timeout"),
        entry(REQUEST_TIMEOUT, Some("100ms"), "Elasticsearch request timeout"),
        entry(CONNECT_TIMEOUT, Some("1s"), "Elasticsearch connect timeout"),
        entry(
            MAX_REQUEST_RETRIES,
            Some("5"),
            "Maximum number of Elasticsearch request retries",
        ),
        entry(
            MAX_RETRY_TIME,
            Some("10s"),
            "Use exponential backoff starting at 1s up to the value specified by this configuration when retrying failed requests",
        ),
        entry(TLS_ENABLED, Some("false"), "Connect over TLS"),
        entry(TLS_KEYSTORE_PATH, None, "Keystore holding the client certificate"),
        entry(TLS_KEYSTORE_PASSWORD, None, "Keystore password"),
        entry(TLS_TRUSTSTORE_PATH, None, "Truststore holding trusted certificates"),
        entry(TLS_TRUSTSTORE_PASSWORD, None, "Truststore password"),
        entry(
            TLS_VERIFY_HOSTNAMES,
            Some("true"),
            "Verify that the server certificate matches the host name",
        ),
    ]
}

fn entry(
    key: &'static str,
    default: Option<&'static str>,
    description: &'static str,
) -> KeyDescription {
    KeyDescription {
        key,
        default,
        description,
    }
}

/// Maps a key to its environment variable name.
///
/// Example: `"elasticsearch.tls.keystore-path"` → `"ELASTICSEARCH_TLS_KEYSTORE_PATH"`
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
