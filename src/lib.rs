//! `elasticsearch-settings` holds the validated connection settings of an
//! Elasticsearch connector and the retry backoff policy derived from them.
//!
//! - [`ConnectionSettingsBuilder`] collects overrides from code, properties
//!   text or the environment, and validates them all at once.
//! - [`ConnectionSettings`] is the read-only result handed to the client.
//! - [`RetryPolicy`] computes exponential backoff delays capped by
//!   `elasticsearch.max-request-retry-time`.

mod duration;
mod error;
mod properties;
mod retry;
mod settings;
mod tls;

pub mod keys;

pub use duration::{format_duration, parse_duration};
pub use error::{SettingsError, Violation};
pub use retry::{RetryDecision, RetryPolicy, BASE_DELAY};
pub use settings::{
    ConnectionSettings, ConnectionSettingsBuilder, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_REQUEST_RETRIES, DEFAULT_MAX_RETRY_TIME, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SCHEMA, DEFAULT_SCROLL_SIZE, DEFAULT_SCROLL_TIMEOUT,
    DEFAULT_TABLE_DESCRIPTION_DIRECTORY,
};
pub use tls::{Secret, TlsSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;
