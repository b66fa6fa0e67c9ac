use profile_error::Result;

/// String-keyed, string-valued storage with whole-value reads and writes.
///
/// This is the port through which the profile page reaches its persisted
/// document, so tests can swap the file-backed store for
/// [`MemoryStorage`](crate::MemoryStorage).
pub trait KeyValueStorage {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite the entry under `key`.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Remove the entry under `key`.
    /// Removing a missing key succeeds and changes nothing.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
