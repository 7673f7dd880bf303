//! Integration tests for per-region resource resolution.
//!
//! These tests verify:
//! 1. Export resolution tolerates targets that do not exist yet
//! 2. Import resolution fails with distinct errors for missing and unreadable resources
//! 3. Override templates see the region, environment properties and named components
//! 4. Nothing is cached between calls

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use cache_data::{
    config, CacheResourceResolver, Components, ExportResourceResolver, ImportExportError,
    ImportResourceResolver,
};
use cache_data_resource::{BufferedResourceWriter, ResourceWriter};
use cache_data_types::{Environment, InMemoryRegion};
use tempfile::TempDir;

fn file_root(dir: &TempDir) -> String {
    format!("file://{}", dir.path().display())
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_target_need_not_exist() -> Result<()> {
    let dir = TempDir::new()?;
    let resolver = ExportResourceResolver::new(Some(Arc::new(Environment::new())))
        .with_resource_path(format!("{}/nested/snapshots", file_root(&dir)));
    let region = InMemoryRegion::new("Example");

    let resource = resolver.resolve(&region)?.expect("export resource");
    assert!(!resource.exists());
    assert_eq!(
        resource.location(),
        format!("{}/nested/snapshots/example.json", file_root(&dir))
    );

    BufferedResourceWriter::new().write(resource.as_ref(), b"[]")?;
    assert_eq!(
        fs::read_to_string(dir.path().join("nested/snapshots/example.json"))?,
        "[]"
    );
    Ok(())
}

#[test]
fn test_export_default_is_working_directory() -> Result<()> {
    let resolver = ExportResourceResolver::new(None);
    let resource = resolver
        .resolve(&InMemoryRegion::new("Example"))?
        .expect("export resource");
    let cwd = std::env::current_dir()?;
    assert_eq!(
        resource.location(),
        format!("file://{}/example.json", cwd.display())
    );
    Ok(())
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_import_missing_and_unreadable_are_distinct() -> Result<()> {
    let dir = TempDir::new()?;
    let region = InMemoryRegion::subregion("/Parent", "Example");
    let resolver = ImportResourceResolver::new(None).with_resource_path(file_root(&dir));

    let missing = resolver.resolve(&region).unwrap_err();
    assert!(matches!(missing, ImportExportError::ResourceDoesNotExist { .. }));
    let message = missing.to_string();
    assert!(message.contains(&format!("{}/example.json", file_root(&dir))));
    assert!(message.contains("/Parent/Example"));

    fs::create_dir(dir.path().join("example.json"))?;
    let unreadable = resolver.resolve(&region).unwrap_err();
    assert!(matches!(
        unreadable,
        ImportExportError::ResourceNotReadable { .. }
    ));
    let message = unreadable.to_string();
    assert!(message.contains("example.json"));
    assert!(message.contains("/Parent/Example"));
    Ok(())
}

#[test]
fn test_import_resolution_is_not_cached() -> Result<()> {
    let dir = TempDir::new()?;
    let env = Environment::new().with_property(config::CLASSPATH, dir.path().display().to_string());
    let resolver = ImportResourceResolver::new(Some(Arc::new(env)));
    let region = InMemoryRegion::new("Example");

    assert!(resolver.resolve(&region).is_err());
    fs::write(dir.path().join("example.json"), "[]")?;
    let resource = resolver.resolve(&region)?.expect("import resource");
    assert_eq!(resource.location(), "classpath:example.json");
    Ok(())
}

// =============================================================================
// Override templates
// =============================================================================

#[test]
fn test_override_template_uses_region_properties_and_components() -> Result<()> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("eu"))?;
    fs::write(dir.path().join("eu/CUSTOMERS-v2.json"), "[]")?;

    let env = Environment::new()
        .with_property("snapshot.root", dir.path().display().to_string())
        .with_property(
            config::IMPORT_RESOURCE_LOCATION,
            "file://${snapshot.root}/#{@site.zone}/#{#regionName.toUpperCase() + '-' + @site.version}.json",
        );
    let mut components = Components::new();
    components.register("site", serde_json::json!({"zone": "eu", "version": "v2"}));

    let resolver =
        ImportResourceResolver::new(Some(Arc::new(env))).with_components(Arc::new(components));
    let resource = resolver
        .resolve(&InMemoryRegion::new("Customers"))?
        .expect("import resource");
    assert!(resource.location().ends_with("/eu/CUSTOMERS-v2.json"));
    Ok(())
}

#[test]
fn test_override_template_errors_are_reported() {
    let env = Environment::new().with_property(
        config::EXPORT_RESOURCE_LOCATION,
        "file:///tmp/#{#region.delete()}",
    );
    let resolver = ExportResourceResolver::new(Some(Arc::new(env)));
    match resolver.resolve(&InMemoryRegion::new("Example")) {
        Err(ImportExportError::Expression { template, .. }) => {
            assert_eq!(template, "file:///tmp/#{#region.delete()}")
        }
        other => panic!("expected Expression error, got {:?}", other),
    }
}

#[test]
fn test_relaxed_environment_variable_names() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("example.snap"), "[]")?;
    let env = Environment::new()
        .with_property("CACHE_DATA_RESOURCE_NAME_PATTERN", "{}.snap")
        .with_property("CACHE_DATA_CLASSPATH", dir.path().display().to_string());

    let resource = ImportResourceResolver::new(Some(Arc::new(env)))
        .resolve(&InMemoryRegion::new("Example"))?
        .expect("import resource");
    assert_eq!(resource.location(), "classpath:example.snap");
    Ok(())
}
