//! Property keys and defaults.
//!
//! Every key can also be supplied as an environment variable using relaxed
//! binding, e.g. `cache.data.import.enabled` as `CACHE_DATA_IMPORT_ENABLED`.

use cache_data_resource::Classpath;
use cache_data_types::{Environment, Region};

pub const EXPORT_ENABLED: &str = "cache.data.export.enabled";
pub const IMPORT_ENABLED: &str = "cache.data.import.enabled";
/// Comma-delimited profiles for which import may run. Blank means any.
pub const IMPORT_ACTIVE_PROFILES: &str = "cache.data.import.active-profiles";
/// Location template used instead of the export convention.
pub const EXPORT_RESOURCE_LOCATION: &str = "cache.data.export.resource.location";
/// Location template used instead of the import convention.
pub const IMPORT_RESOURCE_LOCATION: &str = "cache.data.import.resource.location";
/// Resource name pattern; `{}` is replaced by the lowercased region name.
pub const RESOURCE_NAME_PATTERN: &str = "cache.data.resource.name-pattern";
/// OS path list of directories searched for `classpath:` resources.
pub const CLASSPATH: &str = "cache.data.classpath";

pub const DEFAULT_EXPORT_ENABLED: bool = true;
pub const DEFAULT_IMPORT_ENABLED: bool = false;
pub const DEFAULT_RESOURCE_NAME_PATTERN: &str = "{}.json";

/// Resource name for `region`, e.g. `example.json` for region `Example`.
pub fn resource_name(environment: &Environment, region: &dyn Region) -> String {
    let pattern = environment
        .non_blank_property(RESOURCE_NAME_PATTERN)
        .unwrap_or(DEFAULT_RESOURCE_NAME_PATTERN);
    let region_name = region.name().to_lowercase();
    if pattern.contains("{}") {
        pattern.replace("{}", &region_name)
    } else {
        format!("{}{}", region_name, pattern)
    }
}

/// Classpath configured by [`CLASSPATH`], else the default `resources` root.
pub fn classpath(environment: &Environment) -> Classpath {
    environment
        .non_blank_property(CLASSPATH)
        .map(Classpath::parse)
        .unwrap_or_default()
}

/// Parsed allowed-profile list; empty means unrestricted.
pub fn import_profiles(environment: &Environment) -> Vec<String> {
    environment.list_property(IMPORT_ACTIVE_PROFILES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_data_types::InMemoryRegion;

    #[test]
    fn test_resource_name_defaults_to_lowercase_json() {
        let region = InMemoryRegion::new("Example");
        assert_eq!(resource_name(&Environment::new(), &region), "example.json");
    }

    #[test]
    fn test_resource_name_pattern() {
        let region = InMemoryRegion::new("Customers");
        let env = Environment::new().with_property(RESOURCE_NAME_PATTERN, "snapshot-{}.dat");
        assert_eq!(resource_name(&env, &region), "snapshot-customers.dat");

        let env = Environment::new().with_property(RESOURCE_NAME_PATTERN, ".bak");
        assert_eq!(resource_name(&env, &region), "customers.bak");
    }

    #[test]
    fn test_import_profiles() {
        let env = Environment::new().with_property(IMPORT_ACTIVE_PROFILES, " DEV, ,TEST ");
        assert_eq!(import_profiles(&env), vec!["DEV", "TEST"]);
        assert!(import_profiles(&Environment::new()).is_empty());
    }
}
