//! Server configuration from the environment.

use std::net::SocketAddr;

use crate::datastore::DatastoreConfig;
use crate::domain::BanScope;
use crate::fieldtrip::DEFAULT_GROUP_SIZE;
use crate::otp::OtpConfig;
use crate::planner::GroupPlanConfig;

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Trip planner web service base URL (`OTP_BASE_URL`)
    pub otp: OtpConfig,
    /// Datastore base URL (`DATASTORE_URL`)
    pub datastore: DatastoreConfig,
    /// Listen address (`FIELDTRIP_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Group size when none is given (`FIELDTRIP_GROUP_SIZE`)
    pub default_group_size: u32,
    /// Group planning limits (`FIELDTRIP_MAX_ITERATIONS`)
    pub planning: GroupPlanConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            otp: OtpConfig::default(),
            datastore: DatastoreConfig::default(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_group_size: DEFAULT_GROUP_SIZE,
            planning: GroupPlanConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or empty variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("OTP_BASE_URL") {
            config.otp.base_url = url;
        }
        if let Some(url) = get("DATASTORE_URL") {
            config.datastore.base_url = url;
        }
        if let Some(addr) = get("FIELDTRIP_BIND_ADDR") {
            config.bind_addr = parse("FIELDTRIP_BIND_ADDR", addr)?;
        }
        if let Some(size) = get("FIELDTRIP_GROUP_SIZE") {
            config.default_group_size = parse("FIELDTRIP_GROUP_SIZE", size)?;
        }
        if let Some(n) = get("FIELDTRIP_MAX_ITERATIONS") {
            config.planning.max_iterations = parse("FIELDTRIP_MAX_ITERATIONS", n)?;
        }
        if let Some(scope) = get("FIELDTRIP_BAN_SCOPE") {
            config.otp.ban_scope = match scope.to_ascii_lowercase().as_str() {
                "trip" => BanScope::Trip,
                "stops" => BanScope::StopRange,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "FIELDTRIP_BAN_SCOPE",
                        value: scope,
                        reason: "expected \"trip\" or \"stops\"".to_string(),
                    });
                }
            };
        }
        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.default_group_size, 100);
        assert_eq!(config.planning.max_iterations, 50);
        assert_eq!(config.otp.ban_scope, BanScope::Trip);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("OTP_BASE_URL", "http://otp:8080/ws"),
            ("DATASTORE_URL", "http://store:9090"),
            ("FIELDTRIP_BIND_ADDR", "0.0.0.0:8000"),
            ("FIELDTRIP_GROUP_SIZE", "120"),
            ("FIELDTRIP_MAX_ITERATIONS", " 20 "),
            ("FIELDTRIP_BAN_SCOPE", "stops"),
        ])
        .unwrap();
        assert_eq!(config.otp.base_url, "http://otp:8080/ws");
        assert_eq!(config.datastore.base_url, "http://store:9090");
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.default_group_size, 120);
        assert_eq!(config.planning.max_iterations, 20);
        assert_eq!(config.otp.ban_scope, BanScope::StopRange);
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = config(&[("FIELDTRIP_GROUP_SIZE", "")]).unwrap();
        assert_eq!(config.default_group_size, 100);
    }

    #[test]
    fn rejects_bad_values() {
        let err = config(&[("FIELDTRIP_GROUP_SIZE", "lots")]).unwrap_err();
        assert!(err.to_string().starts_with("FIELDTRIP_GROUP_SIZE has invalid value \"lots\""));

        assert!(config(&[("FIELDTRIP_BIND_ADDR", "localhost")]).is_err());
        assert!(config(&[("FIELDTRIP_BAN_SCOPE", "route")]).is_err());
    }
}
