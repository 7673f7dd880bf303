//! Configuration snapshot: string properties plus active/default profiles.

use std::collections::HashMap;

use crate::env_utils::{parse_bool, parse_bool_or, parse_list, relaxed_name};

/// Property listing the active profiles when none are set explicitly.
pub const ACTIVE_PROFILES_PROPERTY: &str = "profiles.active";

/// Property listing the default profiles when none are set explicitly.
pub const DEFAULT_PROFILES_PROPERTY: &str = "profiles.default";

/// Profile in effect when nothing else is configured.
pub const DEFAULT_PROFILE: &str = "default";

/// Immutable view of configuration properties.
///
/// Lookups try the property name as given and then its relaxed
/// environment-variable form, so `cache.data.import.enabled` also matches
/// `CACHE_DATA_IMPORT_ENABLED`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    properties: HashMap<String, String>,
    active_profiles: Vec<String>,
    default_profiles: Vec<String>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment variables.
    pub fn from_process() -> Self {
        Self {
            properties: std::env::vars().collect(),
            active_profiles: Vec::new(),
            default_profiles: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_active_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .or_else(|| self.properties.get(&relaxed_name(key)))
            .map(String::as_str)
    }

    /// Look up a property value, ignoring blank values.
    pub fn non_blank_property(&self, key: &str) -> Option<&str> {
        self.property(key).filter(|v| !v.trim().is_empty())
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.property(key).is_some()
    }

    /// Boolean property; blank or unrecognised values fall back to `default`.
    pub fn bool_property_or(&self, key: &str, default: bool) -> bool {
        let value = self.non_blank_property(key);
        if let Some(v) = value {
            if parse_bool(v).is_none() {
                tracing::warn!("ignoring unrecognised boolean [{}] for property {}", v, key);
            }
        }
        parse_bool_or(value, default)
    }

    /// Comma-delimited property as a list; empty when unset or blank.
    pub fn list_property(&self, key: &str) -> Vec<String> {
        self.property(key).map(parse_list).unwrap_or_default()
    }

    /// Explicitly activated profiles.
    pub fn active_profiles(&self) -> Vec<String> {
        if !self.active_profiles.is_empty() {
            return self.active_profiles.clone();
        }
        self.list_property(ACTIVE_PROFILES_PROPERTY)
    }

    /// Profiles in effect when none are active.
    pub fn default_profiles(&self) -> Vec<String> {
        if !self.default_profiles.is_empty() {
            return self.default_profiles.clone();
        }
        let configured = self.list_property(DEFAULT_PROFILES_PROPERTY);
        if configured.is_empty() {
            vec![DEFAULT_PROFILE.to_string()]
        } else {
            configured
        }
    }

    /// Active profiles, or the default profiles if none are active.
    pub fn effective_profiles(&self) -> Vec<String> {
        let active = self.active_profiles();
        if active.is_empty() {
            self.default_profiles()
        } else {
            active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_relaxed_lookup() {
        let env = Environment::new()
            .with_property("cache.data.export.enabled", "false")
            .with_property("CACHE_DATA_IMPORT_ENABLED", "true");

        assert_eq!(env.property("cache.data.export.enabled"), Some("false"));
        assert!(env.bool_property_or("cache.data.import.enabled", false));
        assert!(!env.bool_property_or("cache.data.export.enabled", true));
        assert!(env.bool_property_or("missing.flag", true));
    }

    #[test]
    fn test_non_blank_property() {
        let env = Environment::new().with_property("blank", "  ");
        assert!(env.contains_property("blank"));
        assert_eq!(env.non_blank_property("blank"), None);
    }

    #[test]
    fn test_profiles() {
        let env = Environment::new();
        assert!(env.active_profiles().is_empty());
        assert_eq!(env.effective_profiles(), vec!["default"]);

        let env = Environment::new().with_property("profiles.active", "dev, qa");
        assert_eq!(env.effective_profiles(), vec!["dev", "qa"]);

        let env = Environment::new()
            .with_property("profiles.active", "dev")
            .with_active_profiles(["TEST"]);
        assert_eq!(env.effective_profiles(), vec!["TEST"]);

        let env = Environment::new().with_default_profiles(["local"]);
        assert_eq!(env.effective_profiles(), vec!["local"]);
    }

    #[test]
    fn test_from_process_reads_variables() {
        std::env::set_var("CACHE_DATA_TEST_FROM_PROCESS_FLAG", "on");
        let env = Environment::from_process();
        assert!(env.bool_property_or("cache.data.test.from.process.flag", false));
        std::env::remove_var("CACHE_DATA_TEST_FROM_PROCESS_FLAG");
    }
}
