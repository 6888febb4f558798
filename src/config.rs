use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How `/tasks/...` requests reach the todo routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegacyPaths {
    /// Route internally as if `/todos/...` had been requested.
    #[default]
    Rewrite,
    /// Answer with `302 Found` pointing at `/todos/...`.
    Redirect,
}

impl FromStr for LegacyPaths {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rewrite" => Ok(LegacyPaths::Rewrite),
            "redirect" => Ok(LegacyPaths::Redirect),
            _ => Err("expected `rewrite` or `redirect`".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub legacy_paths: LegacyPaths,
    /// Start the store with the three sample todos.
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            legacy_paths: LegacyPaths::default(),
            seed: true,
        }
    }
}

impl Config {
    /// Load configuration from `TODO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: parse_var(&lookup, "TODO_HOST", |v| v.parse::<IpAddr>())?
                .unwrap_or(defaults.host),
            port: parse_var(&lookup, "TODO_PORT", |v| v.parse::<u16>())?
                .unwrap_or(defaults.port),
            legacy_paths: parse_var(&lookup, "TODO_LEGACY_PATHS", |v| v.parse::<LegacyPaths>())?
                .unwrap_or(defaults.legacy_paths),
            seed: parse_var(&lookup, "TODO_SEED", parse_bool)?.unwrap_or(defaults.seed),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T, P, E>(lookup: &F, var: &'static str, parse: P) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, E>,
    E: ToString,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .map_err(|err| ConfigError::Invalid {
                var,
                reason: err.to_string(),
                value,
            }),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected a boolean".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TODO_HOST", "127.0.0.1"),
            ("TODO_PORT", "8080"),
            ("TODO_LEGACY_PATHS", "Redirect"),
            ("TODO_SEED", "off"),
        ]))
        .unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.legacy_paths, LegacyPaths::Redirect);
        assert!(!config.seed);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = Config::from_lookup(lookup(&[("TODO_PORT", "eighty")])).unwrap_err();
        let ConfigError::Invalid { var, value, .. } = err;
        assert_eq!(var, "TODO_PORT");
        assert_eq!(value, "eighty");

        assert!(Config::from_lookup(lookup(&[("TODO_LEGACY_PATHS", "proxy")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TODO_SEED", "maybe")])).is_err());
    }
}
