use std::{path::Path, time::Duration};

use elasticsearch_settings::{
    keys, ConnectionSettings, ConnectionSettingsBuilder, RetryDecision, Violation,
};
use serde_json::Value as JsonValue;

const KEYSTORE_PASSWORD: &str = "ks-Pa55word";
const TRUSTSTORE_PASSWORD: &str = "ts-Pa55word";

fn full_properties() -> Vec<(&'static str, &'static str)> {
    vec![
        (keys::HOST, "search.internal"),
        (keys::PORT, "9300"),
        (keys::DEFAULT_SCHEMA, "logs"),
        (keys::TABLE_DESCRIPTION_DIRECTORY, "/etc/presto/es"),
        (keys::SCROLL_SIZE, "500"),
        (keys::SCROLL_TIMEOUT, "2s"),
        (keys::REQUEST_TIMEOUT, "1s"),
        (keys::CONNECT_TIMEOUT, "250ms"),
        (keys::MAX_REQUEST_RETRIES, "3"),
        (keys::MAX_RETRY_TIME, "30s"),
        (keys::TLS_ENABLED, "true"),
        (keys::TLS_KEYSTORE_PATH, "/etc/presto/keystore.jks"),
        (keys::TLS_KEYSTORE_PASSWORD, KEYSTORE_PASSWORD),
        (keys::TLS_TRUSTSTORE_PATH, "/etc/presto/truststore.jks"),
        (keys::TLS_TRUSTSTORE_PASSWORD, TRUSTSTORE_PASSWORD),
        (keys::TLS_VERIFY_HOSTNAMES, "false"),
    ]
}

#[test]
fn every_override_is_reflected_by_accessors() {
    let settings = ConnectionSettings::from_properties(full_properties())
        .expect("full property set must validate");

    assert_eq!(settings.host(), "search.internal");
    assert_eq!(settings.port(), 9300);
    assert_eq!(settings.default_schema(), "logs");
    assert_eq!(
        settings.table_description_directory(),
        Path::new("/etc/presto/es")
    );
    assert_eq!(settings.scroll_size(), 500);
    assert_eq!(settings.scroll_timeout(), Duration::from_secs(2));
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    assert_eq!(settings.connect_timeout(), Duration::from_millis(250));
    assert_eq!(settings.max_request_retries(), 3);
    assert_eq!(settings.max_retry_time(), Duration::from_secs(30));
    assert!(settings.tls_enabled());
    assert_eq!(
        settings.keystore_path(),
        Some(Path::new("/etc/presto/keystore.jks"))
    );
    assert_eq!(
        settings.keystore_password().map(|secret| secret.expose()),
        Some(KEYSTORE_PASSWORD)
    );
    assert_eq!(
        settings.truststore_path(),
        Some(Path::new("/etc/presto/truststore.jks"))
    );
    assert_eq!(
        settings.truststore_password().map(|secret| secret.expose()),
        Some(TRUSTSTORE_PASSWORD)
    );
    assert!(!settings.verify_hostnames());
    assert_eq!(settings.endpoint(), "https://search.internal:9300");
}

#[test]
fn properties_text_is_accepted() {
    let settings = ConnectionSettingsBuilder::from_properties_str(
        "# elasticsearch catalog\n\
         connector.name=elasticsearch\n\
         elasticsearch.host=localhost\n\
         elasticsearch.request-timeout=2s\n",
    )
    .build()
    .expect("catalog file must validate");

    assert_eq!(settings.host(), "localhost");
    assert_eq!(settings.request_timeout(), Duration::from_secs(2));
    assert_eq!(settings.port(), 9200);
}

#[test]
fn properties_text_keeps_password_whitespace() {
    let settings = ConnectionSettingsBuilder::from_properties_str(
        "elasticsearch.host = localhost  \n\
         elasticsearch.tls.keystore-path = etc/keystore.jks \n\
         elasticsearch.tls.keystore-password = pw  \n",
    )
    .build()
    .expect("catalog file must validate");

    assert_eq!(settings.host(), "localhost");
    assert_eq!(settings.keystore_path(), Some(Path::new("etc/keystore.jks")));
    assert_eq!(
        settings.keystore_password().map(|secret| secret.expose()),
        Some("pw  ")
    );
}

#[test]
fn out_of_range_port_is_left_to_the_network_layer() {
    let settings =
        ConnectionSettings::from_properties([(keys::HOST, "localhost"), (keys::PORT, "70000")])
            .expect("port range is not checked here");
    assert_eq!(settings.port(), 70_000);
    assert_eq!(settings.endpoint(), "http://localhost:70000");
}

#[test]
fn scroll_size_bounds() {
    for value in ["0", "-5"] {
        let error = ConnectionSettings::from_properties([
            (keys::HOST, "localhost"),
            (keys::SCROLL_SIZE, value),
        ])
        .unwrap_err();
        assert!(matches!(
            error.violations(),
            [Violation::ConstraintViolation { key, .. }] if *key == keys::SCROLL_SIZE
        ));
    }

    let settings =
        ConnectionSettings::from_properties([(keys::HOST, "localhost"), (keys::SCROLL_SIZE, "1")])
            .unwrap();
    assert_eq!(settings.scroll_size(), 1);
}

#[test]
fn zero_retries_are_rejected() {
    let error = ConnectionSettings::from_properties([
        (keys::HOST, "localhost"),
        (keys::MAX_REQUEST_RETRIES, "0"),
    ])
    .unwrap_err();
    assert!(matches!(
        error.violations(),
        [Violation::ConstraintViolation { key, .. }] if *key == keys::MAX_REQUEST_RETRIES
    ));
}

#[test]
fn unset_or_empty_host_is_missing() {
    let error = ConnectionSettings::from_properties(Vec::<(&str, &str)>::new()).unwrap_err();
    assert_eq!(
        error.violations(),
        [Violation::MissingRequiredValue { key: keys::HOST }]
    );

    let error = ConnectionSettings::from_properties([(keys::HOST, "")]).unwrap_err();
    assert_eq!(
        error.violations(),
        [Violation::MissingRequiredValue { key: keys::HOST }]
    );
}

#[test]
fn emptied_required_values_are_missing() {
    let error = ConnectionSettings::from_properties([
        (keys::HOST, "localhost"),
        (keys::SCROLL_TIMEOUT, ""),
        (keys::TABLE_DESCRIPTION_DIRECTORY, ""),
        (keys::MAX_RETRY_TIME, " "),
    ])
    .unwrap_err();
    assert_eq!(
        error.violations(),
        [
            Violation::MissingRequiredValue {
                key: keys::TABLE_DESCRIPTION_DIRECTORY
            },
            Violation::MissingRequiredValue {
                key: keys::SCROLL_TIMEOUT
            },
            Violation::MissingRequiredValue {
                key: keys::MAX_RETRY_TIME
            },
        ]
    );
}

#[test]
fn retired_keys_fail_even_when_everything_else_is_valid() {
    for retired in keys::RETIRED_KEYS {
        let error =
            ConnectionSettings::from_properties([(keys::HOST, "localhost"), (retired, "x")])
                .unwrap_err();
        assert_eq!(
            error.violations(),
            [Violation::RetiredKeyUsed {
                key: retired.to_owned()
            }]
        );
        assert!(error.to_string().contains("no longer supported"));
    }
}

#[test]
fn all_problems_are_reported_together() {
    let error = ConnectionSettings::from_properties([
        ("elasticsearch.cluster-name", "prod"),
        ("elasticsearch.scroll-sise", "10"),
        (keys::PORT, "http"),
        (keys::CONNECT_TIMEOUT, "soon"),
        (keys::TLS_ENABLED, "yes"),
        (keys::SCROLL_SIZE, "0"),
    ])
    .unwrap_err();

    let reported: Vec<_> = error
        .violations()
        .iter()
        .map(|violation| match violation {
            Violation::MissingRequiredValue { .. } => "missing",
            Violation::ConstraintViolation { .. } => "constraint",
            Violation::RetiredKeyUsed { .. } => "retired",
            Violation::InvalidValue { .. } => "invalid",
            Violation::UnknownKey { .. } => "unknown",
        })
        .collect();
    // connect-timeout stays unset after failing to parse
    assert_eq!(
        reported,
        [
            "retired",
            "unknown",
            "invalid",
            "invalid",
            "invalid",
            "missing",
            "constraint",
            "missing",
        ]
    );
    assert!(error.to_string().contains("(8 errors)"));
}

#[test]
fn foreign_namespaces_are_ignored() {
    let settings = ConnectionSettings::from_properties([
        ("connector.name", "elasticsearch"),
        ("hive.metastore.uri", "thrift://localhost:9083"),
        (keys::HOST, "localhost"),
    ])
    .unwrap();
    assert_eq!(settings.host(), "localhost");
}

#[test]
fn default_retry_policy_schedule() {
    let settings = ConnectionSettings::builder()
        .host("localhost")
        .build()
        .unwrap();
    let policy = settings.retry_policy();

    let mut attempt = 1;
    let mut waits = Vec::new();
    while let RetryDecision::RetryAfter(delay) = policy.decide(attempt) {
        waits.push(delay);
        attempt += 1;
    }
    assert_eq!(
        waits,
        [1, 2, 4, 8].map(Duration::from_secs).to_vec()
    );
    assert_eq!(attempt, 5);
}

#[test]
fn clamped_retry_policy_schedule() {
    let settings = ConnectionSettings::from_properties([
        (keys::HOST, "localhost"),
        (keys::MAX_RETRY_TIME, "3s"),
    ])
    .unwrap();
    let delays: Vec<_> = settings.retry_policy().delays().collect();
    assert_eq!(delays, [1, 2, 3, 3].map(Duration::from_secs).to_vec());
}

#[test]
fn single_attempt_policy_is_exhausted_immediately() {
    let settings = ConnectionSettings::from_properties([
        (keys::HOST, "localhost"),
        (keys::MAX_REQUEST_RETRIES, "1"),
    ])
    .unwrap();
    assert_eq!(settings.retry_policy().decide(1), RetryDecision::Exhausted);
}

#[test]
fn passwords_never_leak_into_output() {
    let settings = ConnectionSettings::from_properties(full_properties()).unwrap();

    let debug = format!("{settings:?}");
    let json = serde_json::to_string(&settings).expect("settings must serialize");
    let dump = settings
        .to_properties()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    for output in [&debug, &json, &dump] {
        assert!(!output.contains(KEYSTORE_PASSWORD), "leaked in {output}");
        assert!(!output.contains(TRUSTSTORE_PASSWORD), "leaked in {output}");
    }
    assert!(debug.contains("<redacted>"));
}

#[test]
fn json_dump_uses_readable_durations() {
    let settings = ConnectionSettings::from_properties(full_properties()).unwrap();
    let json: JsonValue = serde_json::to_value(&settings).unwrap();

    assert_eq!(json["host"], "search.internal");
    assert_eq!(json["scroll-timeout"], "2s");
    assert_eq!(json["connect-timeout"], "250ms");
    assert_eq!(json["max-request-retry-time"], "30s");
    assert_eq!(json["default-schema-name"], "logs");
    assert!(json.get("max-retry-time").is_none());
    assert!(json.get("default-schema").is_none());
    assert_eq!(json["tls"]["enabled"], true);
    assert_eq!(json["tls"]["keystore-path"], "/etc/presto/keystore.jks");
    assert!(json["tls"].get("keystore-password").is_none());
}

#[test]
fn env_vars_map_to_keys() {
    std::env::set_var("ELASTICSEARCH_HOST", "env-host");
    std::env::set_var("ELASTICSEARCH_TLS_VERIFY_HOSTNAMES", "false");
    let settings = ConnectionSettingsBuilder::from_env().build();
    std::env::remove_var("ELASTICSEARCH_HOST");
    std::env::remove_var("ELASTICSEARCH_TLS_VERIFY_HOSTNAMES");

    let settings = settings.expect("environment must validate");
    assert_eq!(settings.host(), "env-host");
    assert!(!settings.verify_hostnames());
}
