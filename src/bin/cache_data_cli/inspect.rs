//! `inspect`: list the entries of a snapshot.

use anyhow::{Context, Result};
use cache_data_json::JsonCodec;
use clap::Parser;

use super::CliContext;

#[derive(Parser, Debug)]
pub struct InspectCmd {
    /// Snapshot location (`classpath:`, `file://`, `http(s)://` or a bare classpath entry)
    location: String,
}

impl InspectCmd {
    pub fn execute(&self, context: &CliContext) -> Result<()> {
        let (resource, bytes) = context.read(&self.location)?;
        let instances = JsonCodec::default()
            .decode_entries(&bytes)
            .with_context(|| format!("Invalid snapshot in {}", resource.description()))?;

        if context.json {
            let entries: Vec<serde_json::Value> = instances
                .iter()
                .map(|instance| {
                    serde_json::json!({
                        "key": instance.resolve_key().map(|key| key.to_json()),
                        "type": instance.class_name(),
                        "fields": instance.field_names().collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!("{} entries in {}", instances.len(), resource.description());
        for (index, instance) in instances.iter().enumerate() {
            let key = instance
                .resolve_key()
                .map(|key| key.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>4}  {:<20}  {}  ({} fields)",
                index,
                key,
                instance.class_name(),
                instance.fields().len()
            );
        }
        Ok(())
    }
}
