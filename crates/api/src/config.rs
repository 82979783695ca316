//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use supplychain_auth::PolicyKind;

pub const BIND_ADDR_VAR: &str = "SUPPLYCHAIN_BIND_ADDR";
pub const AUTH_POLICY_VAR: &str = "SUPPLYCHAIN_AUTH_POLICY";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SUPPLYCHAIN_BIND_ADDR: invalid socket address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("SUPPLYCHAIN_AUTH_POLICY: {0}")]
    InvalidPolicy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub auth_policy: PolicyKind,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a closure over a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let auth_policy = match lookup(AUTH_POLICY_VAR) {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidPolicy)?,
            None => PolicyKind::default(),
        };

        Ok(Self {
            bind_addr,
            auth_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.auth_policy, PolicyKind::Trust);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (AUTH_POLICY_VAR, "credential"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.auth_policy, PolicyKind::Credential);
    }

    #[test]
    fn invalid_values_are_reported_with_the_variable_name() {
        let err = ApiConfig::from_lookup(lookup_from(&[(BIND_ADDR_VAR, "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().starts_with(BIND_ADDR_VAR));

        let err = ApiConfig::from_lookup(lookup_from(&[(AUTH_POLICY_VAR, "root")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy(_)));
    }
}
