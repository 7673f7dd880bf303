//! Region snapshot import and export.
//!
//! [`JsonCacheDataImporterExporter`] writes a region's entries to a JSON
//! resource before the region is destroyed and repopulates an empty region
//! from that resource once it is created. [`CacheDataLifecycleListener`]
//! hooks both into an [`InMemoryCache`](cache_data_types::InMemoryCache).
//!
//! Export is best effort: a missing or unwritable target abandons the
//! export with a warning. Import is strict: an unresolvable resource is an
//! error, and a region is never left partially populated by a failed import.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use cache_data_json::JsonCodec;
use cache_data_resource::{
    BufferedResourceWriter, ByteArrayResourceReader, ResourceReader, ResourceWriter,
};
use cache_data_types::{
    CacheKey, CacheValue, Environment, PortableInstance, Region, RegionLifecycleListener,
};

use crate::error::ImportExportError;
use crate::expression::Components;
use crate::gate::ImportExportGate;
use crate::resolver::{CacheResourceResolver, ExportResourceResolver, ImportResourceResolver};

/// Exports regions to, and imports regions from, JSON resources.
pub struct JsonCacheDataImporterExporter {
    gate: ImportExportGate,
    export_resolver: Arc<dyn CacheResourceResolver>,
    import_resolver: Arc<dyn CacheResourceResolver>,
    reader: Arc<dyn ResourceReader>,
    writer: Arc<dyn ResourceWriter>,
    codec: Arc<JsonCodec>,
}

impl JsonCacheDataImporterExporter {
    /// Importer/exporter with the file-system export policy, the classpath
    /// import policy and buffered byte I/O.
    pub fn new(environment: Option<Arc<Environment>>) -> Self {
        Self {
            gate: ImportExportGate::new(environment.clone()),
            export_resolver: Arc::new(ExportResourceResolver::new(environment.clone())),
            import_resolver: Arc::new(ImportResourceResolver::new(environment)),
            reader: Arc::new(ByteArrayResourceReader::new()),
            writer: Arc::new(BufferedResourceWriter::new()),
            codec: Arc::new(JsonCodec::default()),
        }
    }

    /// Make `components` visible to location templates of the default resolvers.
    pub fn with_components(self, components: Arc<Components>) -> Self {
        let environment = self.gate.environment().cloned();
        self.with_export_resolver(Arc::new(
            ExportResourceResolver::new(environment.clone()).with_components(Arc::clone(&components)),
        ))
        .with_import_resolver(Arc::new(
            ImportResourceResolver::new(environment).with_components(components),
        ))
    }

    pub fn with_gate(mut self, gate: ImportExportGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_export_resolver(mut self, resolver: Arc<dyn CacheResourceResolver>) -> Self {
        self.export_resolver = resolver;
        self
    }

    pub fn with_import_resolver(mut self, resolver: Arc<dyn CacheResourceResolver>) -> Self {
        self.import_resolver = resolver;
        self
    }

    pub fn with_reader(mut self, reader: Arc<dyn ResourceReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn ResourceWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_codec(mut self, codec: Arc<JsonCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn gate(&self) -> &ImportExportGate {
        &self.gate
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Export `region` if the gate allows it. Returns the number of entries written.
    pub fn export_from(&self, region: &dyn Region) -> Result<usize, ImportExportError> {
        if !self.gate.should_export(region) {
            return Ok(0);
        }
        self.do_export_from(region)
    }

    /// Import into `region` if the gate allows it. Returns the number of entries stored.
    pub fn import_into(&self, region: &dyn Region) -> Result<usize, ImportExportError> {
        if !self.gate.should_import(region) {
            return Ok(0);
        }
        self.do_import_into(region)
    }

    /// Export without consulting the gate.
    pub fn do_export_from(&self, region: &dyn Region) -> Result<usize, ImportExportError> {
        let Some(resource) = self.export_resolver.resolve(region)? else {
            tracing::warn!("no export resource for region [{}]; skipping", region.full_path());
            return Ok(0);
        };
        if !self.writer.is_writable(resource.as_ref()) {
            tracing::warn!(
                "cannot write {} for region [{}]; skipping export",
                resource.description(),
                region.full_path()
            );
            return Ok(0);
        }

        let entries = region.entries();
        let bytes = self.codec.encode_entries(&entries)?;
        self.writer.write(resource.as_ref(), &bytes)?;

        tracing::info!(
            "exported {} entries from region [{}] to {}",
            entries.len(),
            region.full_path(),
            resource.description()
        );
        Ok(entries.len())
    }

    /// Import without consulting the gate. Regions that already hold
    /// entries are left untouched.
    pub fn do_import_into(&self, region: &dyn Region) -> Result<usize, ImportExportError> {
        if !region.is_empty() {
            tracing::debug!(
                "region [{}] already holds {} entries; skipping import",
                region.full_path(),
                region.len()
            );
            return Ok(0);
        }

        let Some(resource) = self.import_resolver.resolve(region)? else {
            return Ok(0);
        };
        let bytes = self.reader.read(resource.as_ref())?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("{} is empty; nothing to import", resource.description());
            return Ok(0);
        }

        let instances = self.codec.decode_entries(&bytes)?;
        let entries = instances
            .into_iter()
            .enumerate()
            .map(|(index, instance)| self.entry(region, index, instance))
            .collect::<Result<Vec<_>, _>>()?;

        let count = entries.len();
        region.put_all(entries);
        tracing::info!(
            "imported {} entries into region [{}] from {}",
            count,
            region.full_path(),
            resource.description()
        );
        Ok(count)
    }

    /// Key and stored value for one imported instance. Instances of
    /// registered types are stored as typed objects.
    fn entry(
        &self,
        region: &dyn Region,
        index: usize,
        instance: PortableInstance,
    ) -> Result<(CacheKey, CacheValue), ImportExportError> {
        let key = instance
            .resolve_key()
            .ok_or_else(|| ImportExportError::UnresolvableKey {
                region: region.full_path(),
                index,
            })?;

        if self.codec.registry().contains(instance.class_name()) {
            let object = self.codec.to_object(&instance)?;
            return Ok((key, CacheValue::Object(object)));
        }
        Ok((key, CacheValue::Portable(instance)))
    }
}

impl Default for JsonCacheDataImporterExporter {
    fn default() -> Self {
        Self::new(Some(Arc::new(Environment::from_process())))
    }
}

impl fmt::Debug for JsonCacheDataImporterExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCacheDataImporterExporter")
            .field("gate", &self.gate)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

/// Imports after a region is created and exports before it is destroyed.
///
/// Import failures abort region creation. Export failures are logged and
/// the region is destroyed regardless.
#[derive(Debug, Clone)]
pub struct CacheDataLifecycleListener {
    importer_exporter: Arc<JsonCacheDataImporterExporter>,
}

impl CacheDataLifecycleListener {
    pub fn new(importer_exporter: Arc<JsonCacheDataImporterExporter>) -> Self {
        Self { importer_exporter }
    }
}

impl RegionLifecycleListener for CacheDataLifecycleListener {
    fn after_create(&self, region: &dyn Region) -> Result<()> {
        self.importer_exporter.import_into(region)?;
        Ok(())
    }

    fn before_destroy(&self, region: &dyn Region) -> Result<()> {
        if let Err(e) = self.importer_exporter.export_from(region) {
            tracing::error!("failed to export region [{}]: {}", region.full_path(), e);
        }
        Ok(())
    }
}
