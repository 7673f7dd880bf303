//! Regions: named key/value containers owned by the cache runtime.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::key::CacheKey;
use crate::object::CacheObject;
use crate::portable::PortableInstance;

/// Separator between the segments of a region's full path.
pub const REGION_SEPARATOR: &str = "/";

/// A value stored in a region.
#[derive(Clone)]
pub enum CacheValue {
    /// A live typed object.
    Object(Arc<dyn CacheObject>),
    /// The serialized portable form, as produced by an import.
    Portable(PortableInstance),
}

impl CacheValue {
    pub fn object<T: CacheObject>(value: T) -> Self {
        CacheValue::Object(Arc::new(value))
    }

    /// Type name of the value: the object's type or the instance's class.
    pub fn type_name(&self) -> &str {
        match self {
            CacheValue::Object(object) => object.type_name(),
            CacheValue::Portable(instance) => instance.class_name(),
        }
    }

    pub fn as_portable(&self) -> Option<&PortableInstance> {
        match self {
            CacheValue::Portable(instance) => Some(instance),
            CacheValue::Object(_) => None,
        }
    }

    /// Borrow the typed object, looking through portable instances that wrap one.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            CacheValue::Object(object) => object.downcast_ref::<T>(),
            CacheValue::Portable(instance) => {
                instance.object().and_then(|object| object.downcast_ref::<T>())
            }
        }
    }
}

impl fmt::Debug for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Object(object) => f.debug_tuple("Object").field(object).finish(),
            CacheValue::Portable(instance) => f.debug_tuple("Portable").field(instance).finish(),
        }
    }
}

impl From<PortableInstance> for CacheValue {
    fn from(instance: PortableInstance) -> Self {
        CacheValue::Portable(instance)
    }
}

/// A named, enumerable key/value container.
pub trait Region: Send + Sync {
    /// Simple name of the region, e.g. `Example`.
    fn name(&self) -> &str;

    /// Hierarchical path of the region, e.g. `/Example`.
    fn full_path(&self) -> String {
        format!("{}{}", REGION_SEPARATOR, self.name())
    }

    /// Snapshot of all entries.
    fn entries(&self) -> Vec<(CacheKey, CacheValue)>;

    fn get(&self, key: &CacheKey) -> Option<CacheValue>;

    /// Store a value, returning the previous one.
    fn put(&self, key: CacheKey, value: CacheValue) -> Option<CacheValue>;

    fn put_all(&self, entries: Vec<(CacheKey, CacheValue)>) {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe in-memory region.
pub struct InMemoryRegion {
    name: String,
    full_path: String,
    entries: RwLock<BTreeMap<CacheKey, CacheValue>>,
}

impl InMemoryRegion {
    /// Create a root region, i.e. one whose full path is `/{name}`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let full_path = format!("{}{}", REGION_SEPARATOR, name);
        Self {
            name,
            full_path,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a subregion of the region at `parent_path`.
    pub fn subregion(parent_path: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let full_path = format!(
            "{}{}{}",
            parent_path.trim_end_matches(REGION_SEPARATOR),
            REGION_SEPARATOR,
            name
        );
        Self {
            name,
            full_path,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn remove(&self, key: &CacheKey) -> Option<CacheValue> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Region for InMemoryRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> String {
        self.full_path.clone()
    }

    fn entries(&self) -> Vec<(CacheKey, CacheValue)> {
        self.entries
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: CacheKey, value: CacheValue) -> Option<CacheValue> {
        self.entries.write().insert(key, value)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl fmt::Debug for InMemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRegion")
            .field("full_path", &self.full_path)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_entries() {
        let region = InMemoryRegion::new("Example");
        assert_eq!(region.full_path(), "/Example");
        assert!(region.is_empty());

        region.put("A".into(), CacheValue::object(1i64));
        region.put("B".into(), CacheValue::object(2i64));
        let previous = region.put("A".into(), CacheValue::object(10i64));

        assert_eq!(previous.and_then(|v| v.downcast_ref::<i64>().copied()), Some(1));
        assert_eq!(region.len(), 2);

        let entries = region.entries();
        assert_eq!(entries[0].0, CacheKey::from("A"));
        assert_eq!(entries[0].1.downcast_ref::<i64>(), Some(&10));
        assert_eq!(entries[1].1.type_name(), "i64");
    }

    #[test]
    fn test_subregion_path() {
        let region = InMemoryRegion::subregion("/Parent/", "Child");
        assert_eq!(region.name(), "Child");
        assert_eq!(region.full_path(), "/Parent/Child");
    }

    #[test]
    fn test_portable_value_downcast() {
        let instance = PortableInstance::from_object(Arc::new(5i32)).unwrap();
        let value = CacheValue::from(instance);
        assert_eq!(value.downcast_ref::<i32>(), Some(&5));
        assert!(value.as_portable().is_some());
    }
}
