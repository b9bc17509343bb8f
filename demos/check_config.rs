//! Validates an Elasticsearch catalog file and prints the effective settings.
//!
//! ```text
//! cargo run --example check_config -- etc/catalog/elasticsearch.properties
//! ```
//!
//! Files ending in `.json` are read as a flat object of key/value pairs.

use std::{collections::BTreeMap, process::ExitCode};

use anyhow::{bail, Context};
use elasticsearch_settings::{format_duration, ConnectionSettingsBuilder};
use serde_json::Value as JsonValue;

fn load(path: &str) -> anyhow::Result<ConnectionSettingsBuilder> {
    let text = std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    if !path.ends_with(".json") {
        return Ok(ConnectionSettingsBuilder::from_properties_str(&text));
    }

    let object: BTreeMap<String, JsonValue> =
        serde_json::from_str(&text).with_context(|| format!("{path} is not a JSON object"))?;
    let mut pairs = Vec::with_capacity(object.len());
    for (key, value) in object {
        let value = match value {
            JsonValue::String(text) => text,
            JsonValue::Number(number) => number.to_string(),
            JsonValue::Bool(flag) => flag.to_string(),
            JsonValue::Null => String::new(),
            _ => bail!("value of '{key}' must be a scalar"),
        };
        pairs.push((key, value));
    }
    Ok(ConnectionSettingsBuilder::from_properties(pairs))
}

fn main() -> anyhow::Result<ExitCode> {
    let builder = match std::env::args().nth(1) {
        Some(path) => load(&path)?,
        None => ConnectionSettingsBuilder::from_env(),
    };

    let settings = match builder.build() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    for (key, value) in settings.to_properties() {
        println!("{key}={value}");
    }

    let schedule: Vec<_> = settings
        .retry_policy()
        .delays()
        .map(format_duration)
        .collect();
    println!("retry schedule: [{}]", schedule.join(", "));
    Ok(ExitCode::SUCCESS)
}
