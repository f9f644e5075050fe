use std::path::PathBuf;

use anyhow::{bail, Context};

/// Demo configuration loaded from environment variables.
///
/// Without a schema or data file the built-in signup form and sample
/// answers are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// JSON form schema to validate against.
    pub schema_path: Option<PathBuf>,
    /// JSON object with the answers to validate.
    pub data_path: Option<PathBuf>,
    pub validate_on_change: bool,
    pub validate_on_blur: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            data_path: None,
            validate_on_change: true,
            validate_on_blur: true,
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default    |
    /// |-----------------------------|------------|
    /// | `MAKSUDI_SCHEMA`            | built-in   |
    /// | `MAKSUDI_DATA`              | built-in   |
    /// | `MAKSUDI_VALIDATE_ON_CHANGE`| `true`     |
    /// | `MAKSUDI_VALIDATE_ON_BLUR`  | `true`     |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let path = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
        };
        let flag = |key: &str, default: bool| match lookup(key) {
            Some(raw) => parse_flag(&raw).with_context(|| format!("{key} must be a boolean")),
            None => Ok(default),
        };

        Ok(Self {
            schema_path: path("MAKSUDI_SCHEMA"),
            data_path: path("MAKSUDI_DATA"),
            validate_on_change: flag("MAKSUDI_VALIDATE_ON_CHANGE", true)?,
            validate_on_blur: flag("MAKSUDI_VALIDATE_ON_BLUR", true)?,
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised flag value {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DemoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn reads_paths_and_flags() {
        let config = DemoConfig::from_lookup(lookup(&[
            ("MAKSUDI_SCHEMA", " forms/signup.json "),
            ("MAKSUDI_DATA", ""),
            ("MAKSUDI_VALIDATE_ON_CHANGE", "off"),
            ("MAKSUDI_VALIDATE_ON_BLUR", "Yes"),
        ]))
        .unwrap();
        assert_eq!(config.schema_path, Some(PathBuf::from("forms/signup.json")));
        assert_eq!(config.data_path, None);
        assert!(!config.validate_on_change);
        assert!(config.validate_on_blur);
    }

    #[test]
    fn bad_flag_is_an_error() {
        let err = DemoConfig::from_lookup(lookup(&[("MAKSUDI_VALIDATE_ON_BLUR", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAKSUDI_VALIDATE_ON_BLUR"));
    }
}
