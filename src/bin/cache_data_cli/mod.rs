//! Shared setup for the cache-data commands.

pub mod inspect;
pub mod normalize;
pub mod resolve;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use cache_data::config;
use cache_data_resource::{
    ByteArrayResourceReader, LoaderResourceResolver, Resource, ResourceLoader, ResourceReader,
    ResourceResolver,
};
use cache_data_types::Environment;

pub struct CliContext {
    pub environment: Arc<Environment>,
    pub json: bool,
}

impl CliContext {
    pub fn resource_resolver(&self) -> LoaderResourceResolver {
        LoaderResourceResolver::new(ResourceLoader::new(config::classpath(&self.environment)))
    }

    /// Resolve `location` and read it fully.
    pub fn read(&self, location: &str) -> Result<(Arc<dyn Resource>, Vec<u8>)> {
        let resource = self.resource_resolver().resolve(location)?;
        let resource = cache_data_resource::readable(resource)
            .with_context(|| format!("Cannot read snapshot at {}", location))?;
        let bytes = ByteArrayResourceReader::new().read(resource.as_ref())?;
        Ok((resource, bytes))
    }
}

/// Parse a `key=value` argument.
pub fn parse_property(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("property name must not be blank in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Process environment overlaid with command-line properties and profiles.
pub fn build_environment(properties: Vec<(String, String)>, profiles: Vec<String>) -> Environment {
    let mut environment = Environment::from_process();
    for (key, value) in properties {
        environment = environment.with_property(key, value);
    }
    if !profiles.is_empty() {
        environment = environment.with_active_profiles(profiles);
    }
    environment
}

/// Log to stderr; `RUST_LOG` wins over the default level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
