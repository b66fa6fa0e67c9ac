use std::collections::BTreeMap;

use profile_error::Result;

use crate::base_storage::KeyValueStorage;

/// Volatile storage, lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("key1").unwrap(), None);

        storage.set("key1", "value1".to_string()).unwrap();
        storage.set("key1", "value2".to_string()).unwrap();
        assert_eq!(storage.get("key1").unwrap().as_deref(), Some("value2"));
        assert_eq!(storage.len(), 1);

        storage.remove("key1").unwrap();
        assert!(storage.is_empty());

        // second removal is a no-op
        storage.remove("key1").unwrap();
    }
}
