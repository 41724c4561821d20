//! Controller configuration read from the environment.

use crate::error::ControllerError;

/// Env var restricting the watch to one namespace
pub const WATCH_NAMESPACE_ENV: &str = "WATCH_NAMESPACE";

/// Env var overriding the server-side apply field manager
pub const FIELD_MANAGER_ENV: &str = "FIELD_MANAGER";

/// Field manager used when `FIELD_MANAGER` is unset
pub const DEFAULT_FIELD_MANAGER: &str = "appops-app-service-controller";

/// Runtime configuration of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace to watch; all namespaces when `None`
    pub namespace: Option<String>,
    /// Field manager owning the applied fields
    pub field_manager: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let namespace = match lookup(WATCH_NAMESPACE_ENV) {
            Some(ns) if ns.trim().is_empty() => {
                return Err(ControllerError::InvalidConfig(format!(
                    "{WATCH_NAMESPACE_ENV} is set but empty; unset it to watch all namespaces"
                )));
            }
            other => other,
        };

        let field_manager =
            lookup(FIELD_MANAGER_ENV).unwrap_or_else(|| DEFAULT_FIELD_MANAGER.to_string());
        if field_manager.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(format!(
                "{FIELD_MANAGER_ENV} must not be empty"
            )));
        }

        Ok(Self {
            namespace,
            field_manager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ControllerError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.namespace, None);
        assert_eq!(config.field_manager, "appops-app-service-controller");
    }

    #[test]
    fn test_overrides() {
        let config =
            config_from(&[("WATCH_NAMESPACE", "ns1"), ("FIELD_MANAGER", "custom")]).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("ns1"));
        assert_eq!(config.field_manager, "custom");
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(matches!(
            config_from(&[("WATCH_NAMESPACE", " ")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            config_from(&[("FIELD_MANAGER", "")]),
            Err(ControllerError::InvalidConfig(_))
        ));
    }
}
