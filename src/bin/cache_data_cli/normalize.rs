//! `normalize`: rewrite a snapshot through portable form.

use anyhow::{Context, Result};
use cache_data_json::JsonCodec;
use cache_data_resource::{BufferedResourceWriter, ResourceResolver, ResourceWriter};
use clap::Parser;

use super::CliContext;

#[derive(Parser, Debug)]
pub struct NormalizeCmd {
    /// Snapshot to read
    location: String,

    /// Where to write the result (defaults to stdout)
    #[arg(long)]
    output: Option<String>,
}

impl NormalizeCmd {
    pub fn execute(&self, context: &CliContext) -> Result<()> {
        let (resource, bytes) = context.read(&self.location)?;
        let codec = JsonCodec::default();
        let instances = codec
            .decode_entries(&bytes)
            .with_context(|| format!("Invalid snapshot in {}", resource.description()))?;
        let normalized = codec.encode_instances(&instances)?;

        let Some(output) = &self.output else {
            println!("{}", String::from_utf8_lossy(&normalized));
            return Ok(());
        };

        let target = context.resource_resolver().resolve(output)?;
        let target = cache_data_resource::writable(target)
            .with_context(|| format!("Cannot write normalized snapshot to {}", output))?;
        BufferedResourceWriter::new().write(target.as_ref(), &normalized)?;

        if context.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "source": resource.location(),
                    "output": target.location(),
                    "entries": instances.len(),
                    "bytes": normalized.len(),
                }))?
            );
        } else {
            println!(
                "Wrote {} entries ({} bytes) to {}",
                instances.len(),
                normalized.len(),
                target.description()
            );
        }
        Ok(())
    }
}
