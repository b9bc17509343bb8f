/// A single problem found while building [`crate::ConnectionSettings`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A required key has no value after defaults and overrides are applied.
    #[error("missing required value for '{key}'")]
    MissingRequiredValue { key: &'static str },
    /// A value is present but breaks a numeric or non-empty constraint.
    #[error("invalid value for '{key}': {message}")]
    ConstraintViolation { key: &'static str, message: String },
    /// A retired key was supplied.
    #[error("configuration property '{key}' is no longer supported")]
    RetiredKeyUsed { key: String },
    /// A value could not be parsed into the key's type.
    #[error("could not parse '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
    /// A key in the `elasticsearch.` namespace that is not recognized.
    #[error("unknown configuration property '{key}'")]
    UnknownKey { key: String },
}

impl Violation {
    /// Returns the configuration key this violation refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingRequiredValue { key }
            | Self::ConstraintViolation { key, .. }
            | Self::InvalidValue { key, .. } => *key,
            Self::RetiredKeyUsed { key } | Self::UnknownKey { key } => key.as_str(),
        }
    }
}

/// Error returned when settings fail validation.
///
/// Holds every violation found in a single pass, in discovery order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.violations))]
pub struct SettingsError {
    violations: Vec<Violation>,
}

impl SettingsError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

fn render(violations: &[Violation]) -> String {
    let count = violations.len();
    let noun = if count == 1 { "error" } else { "errors" };
    let mut rendered = format!("invalid elasticsearch configuration ({count} {noun})");
    for (index, violation) in violations.iter().enumerate() {
        rendered.push_str(&format!("\n  {}) {violation}", index + 1));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::{SettingsError, Violation};

    #[test]
    fn display_lists_every_violation() {
        let error = SettingsError::new(vec![
            Violation::MissingRequiredValue {
                key: "elasticsearch.host",
            },
            Violation::RetiredKeyUsed {
                key: "elasticsearch.max-hits".to_owned(),
            },
        ]);
        let rendered = error.to_string();
        assert!(rendered.starts_with("invalid elasticsearch configuration (2 errors)"));
        assert!(rendered.contains("1) missing required value for 'elasticsearch.host'"));
        assert!(rendered
            .contains("2) configuration property 'elasticsearch.max-hits' is no longer supported"));
    }

    #[test]
    fn key_is_reported_for_all_kinds() {
        let violation = Violation::UnknownKey {
            key: "elasticsearch.nope".to_owned(),
        };
        assert_eq!(violation.key(), "elasticsearch.nope");
    }
}
