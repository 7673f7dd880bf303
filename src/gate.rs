//! Decides whether a region is exported or imported.
//!
//! Every check reads the environment at call time; nothing is cached.

use std::fmt;
use std::sync::Arc;

use cache_data_types::{Environment, Region};

use crate::config;

/// Selects the regions the importer/exporter acts on.
pub type RegionPredicate = Arc<dyn Fn(&dyn Region) -> bool + Send + Sync>;

/// `cache.data.export.enabled`, default `true`.
pub fn is_export_enabled(environment: &Environment) -> bool {
    environment.bool_property_or(config::EXPORT_ENABLED, config::DEFAULT_EXPORT_ENABLED)
}

/// `cache.data.import.enabled`, default `false`.
pub fn is_import_enabled(environment: &Environment) -> bool {
    environment.bool_property_or(config::IMPORT_ENABLED, config::DEFAULT_IMPORT_ENABLED)
}

/// Whether the active profiles (or the default profiles when none are
/// active) intersect the allowed import profiles. An empty allowed list
/// permits every profile.
pub fn is_import_profile_active(environment: &Environment) -> bool {
    let allowed = config::import_profiles(environment);
    if allowed.is_empty() {
        return true;
    }
    environment
        .effective_profiles()
        .iter()
        .any(|profile| allowed.contains(profile))
}

/// Gate combining the enabled flags, profile matching and a region predicate.
#[derive(Clone)]
pub struct ImportExportGate {
    environment: Option<Arc<Environment>>,
    region_predicate: RegionPredicate,
}

impl ImportExportGate {
    /// Gate accepting every region.
    pub fn new(environment: Option<Arc<Environment>>) -> Self {
        Self {
            environment,
            region_predicate: Arc::new(|_: &dyn Region| true),
        }
    }

    pub fn with_region_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn Region) -> bool + Send + Sync + 'static,
    {
        self.region_predicate = Arc::new(predicate);
        self
    }

    pub fn environment(&self) -> Option<&Arc<Environment>> {
        self.environment.as_ref()
    }

    pub fn should_export(&self, region: &dyn Region) -> bool {
        let Some(environment) = &self.environment else {
            tracing::debug!("no environment; skipping export of [{}]", region.full_path());
            return false;
        };
        if !is_export_enabled(environment) {
            tracing::debug!("export disabled; skipping [{}]", region.full_path());
            return false;
        }
        if !(self.region_predicate)(region) {
            tracing::debug!("region [{}] not selected for export", region.full_path());
            return false;
        }
        true
    }

    pub fn should_import(&self, region: &dyn Region) -> bool {
        let Some(environment) = &self.environment else {
            tracing::debug!("no environment; skipping import of [{}]", region.full_path());
            return false;
        };
        if !is_import_enabled(environment) {
            tracing::debug!("import disabled; skipping [{}]", region.full_path());
            return false;
        }
        if !(self.region_predicate)(region) {
            tracing::debug!("region [{}] not selected for import", region.full_path());
            return false;
        }
        if !is_import_profile_active(environment) {
            tracing::debug!(
                "profiles {:?} not among import profiles; skipping [{}]",
                environment.effective_profiles(),
                region.full_path()
            );
            return false;
        }
        true
    }
}

impl fmt::Debug for ImportExportGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportExportGate")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_data_types::InMemoryRegion;

    fn import_env(active: &[&str], allowed: &str) -> Environment {
        Environment::new()
            .with_property(config::IMPORT_ENABLED, "true")
            .with_property(config::IMPORT_ACTIVE_PROFILES, allowed)
            .with_active_profiles(active.iter().copied())
    }

    #[test]
    fn test_defaults_are_asymmetric() {
        let env = Environment::new();
        assert!(is_export_enabled(&env));
        assert!(!is_import_enabled(&env));
        // Unchanged environment, unchanged answer.
        assert_eq!(is_export_enabled(&env), is_export_enabled(&env));
        assert_eq!(is_import_enabled(&env), is_import_enabled(&env));
    }

    #[test]
    fn test_flags_parse_relaxed_booleans() {
        let env = Environment::new()
            .with_property("CACHE_DATA_EXPORT_ENABLED", "off")
            .with_property(config::IMPORT_ENABLED, "YES");
        assert!(!is_export_enabled(&env));
        assert!(is_import_enabled(&env));
    }

    #[test]
    fn test_blank_or_unrecognised_flags_keep_defaults() {
        let blank = Environment::new()
            .with_property(config::EXPORT_ENABLED, "")
            .with_property(config::IMPORT_ENABLED, "  ");
        assert!(is_export_enabled(&blank));
        assert!(!is_import_enabled(&blank));

        let unrecognised = Environment::new()
            .with_property("CACHE_DATA_EXPORT_ENABLED", "maybe")
            .with_property(config::IMPORT_ENABLED, "sometimes");
        assert!(is_export_enabled(&unrecognised));
        assert!(!is_import_enabled(&unrecognised));

        let explicit_off = Environment::new().with_property(config::EXPORT_ENABLED, "0");
        assert!(!is_export_enabled(&explicit_off));
    }

    #[test]
    fn test_profile_matching() {
        assert!(is_import_profile_active(&import_env(&["TEST"], "DEV,TEST")));
        assert!(!is_import_profile_active(&import_env(&["PROD"], "DEV,TEST")));
        assert!(is_import_profile_active(&import_env(&["PROD"], "")));
        assert!(is_import_profile_active(&import_env(&[], "default")));

        let defaults = import_env(&[], "DEV").with_default_profiles(["DEV"]);
        assert!(is_import_profile_active(&defaults));
    }

    #[test]
    fn test_gate_checks() {
        let region = InMemoryRegion::new("Example");
        let other = InMemoryRegion::new("Other");

        let gate = ImportExportGate::new(None);
        assert!(!gate.should_export(&region));
        assert!(!gate.should_import(&region));

        let gate = ImportExportGate::new(Some(Arc::new(Environment::new())));
        assert!(gate.should_export(&region));
        assert!(!gate.should_import(&region));

        let gate = ImportExportGate::new(Some(Arc::new(import_env(&["TEST"], "DEV,TEST"))))
            .with_region_predicate(|region| region.name() == "Example");
        assert!(gate.should_import(&region));
        assert!(gate.should_export(&region));
        assert!(!gate.should_import(&other));
        assert!(!gate.should_export(&other));

        let gate = ImportExportGate::new(Some(Arc::new(import_env(&["PROD"], "DEV,TEST"))));
        assert!(!gate.should_import(&region));
    }
}
