use crate::core::error::ProgressResult;
use crate::core::models::{ProgressKey, ProgressRecord};
use crate::core::traits::ProgressStore;
use std::collections::HashMap;

/// Transient store living for the lifetime of the process
///
/// Used as the fallback when the durable store is unreachable, and as a
/// self-contained store in tests.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: HashMap<ProgressKey, ProgressRecord>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self, key: &ProgressKey) -> ProgressResult<Option<ProgressRecord>> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> ProgressResult<()> {
        self.records.insert(key.clone(), record.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_isolated() {
        let mut store = MemoryProgressStore::new();
        let record = ProgressRecord {
            last_position: 12.0,
            ..Default::default()
        };

        store.save(&ProgressKey::new("u", "a"), &record).unwrap();

        assert_eq!(store.load(&ProgressKey::new("u", "a")).unwrap(), Some(record));
        assert!(store.load(&ProgressKey::new("u", "b")).unwrap().is_none());
        assert!(store.load(&ProgressKey::new("other", "a")).unwrap().is_none());
    }
}
