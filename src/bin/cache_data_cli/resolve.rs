//! `resolve`: show the resource a region maps to.

use std::sync::Arc;

use anyhow::Result;
use cache_data::{CacheResourceResolver, ExportResourceResolver, ImportResourceResolver};
use cache_data_types::{InMemoryRegion, Region, REGION_SEPARATOR};
use clap::Parser;

use super::CliContext;

#[derive(Parser, Debug)]
pub struct ResolveCmd {
    /// Region name or full path, e.g. `Example` or `/Parent/Example`
    #[arg(long)]
    region: String,

    /// Resolve the import resource instead of the export resource
    #[arg(long)]
    import: bool,
}

impl ResolveCmd {
    pub fn execute(&self, context: &CliContext) -> Result<()> {
        let region = region_from_path(&self.region);
        let environment = Some(Arc::clone(&context.environment));
        let (direction, resolved) = if self.import {
            ("import", ImportResourceResolver::new(environment).resolve(&region)?)
        } else {
            ("export", ExportResourceResolver::new(environment).resolve(&region)?)
        };

        let Some(resource) = resolved else {
            println!("No {} resource for region {}", direction, region.full_path());
            return Ok(());
        };

        if context.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "region": region.full_path(),
                    "direction": direction,
                    "location": resource.location(),
                    "description": resource.description(),
                    "exists": resource.exists(),
                    "readable": resource.is_readable(),
                    "writable": resource.is_writable(),
                }))?
            );
        } else {
            println!("Region:      {}", region.full_path());
            println!("Direction:   {}", direction);
            println!("Location:    {}", resource.location());
            println!("Resource:    {}", resource.description());
            println!(
                "Exists: {}  Readable: {}  Writable: {}",
                resource.exists(),
                resource.is_readable(),
                resource.is_writable()
            );
        }
        Ok(())
    }
}

fn region_from_path(path: &str) -> InMemoryRegion {
    let trimmed = path.trim_end_matches(REGION_SEPARATOR);
    match trimmed.rsplit_once(REGION_SEPARATOR) {
        Some((parent, name)) if !parent.is_empty() => InMemoryRegion::subregion(parent, name),
        Some((_, name)) => InMemoryRegion::new(name),
        None => InMemoryRegion::new(trimmed),
    }
}
