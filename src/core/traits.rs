use crate::core::error::ProgressResult;
use crate::core::models::{ProgressKey, ProgressRecord};

/// Abstraction for progress persistence
///
/// Stores only load and save whole records; merging and percentage math
/// happen above them so every backend honours the same contract.
pub trait ProgressStore: Send {
    /// Load the record for `key`, `None` when nothing was ever recorded
    fn load(&self, key: &ProgressKey) -> ProgressResult<Option<ProgressRecord>>;

    /// Replace the record for `key`
    fn save(&mut self, key: &ProgressKey, record: &ProgressRecord) -> ProgressResult<()>;

    /// Load, modify and save the record for `key` as one step
    ///
    /// Backends shared with other processes override this to hold their
    /// lock from the read through the write.
    fn update(
        &mut self,
        key: &ProgressKey,
        modify: &mut dyn FnMut(&mut ProgressRecord),
    ) -> ProgressResult<ProgressRecord> {
        let mut record = self.load(key)?.unwrap_or_default();
        modify(&mut record);
        self.save(key, &record)?;
        Ok(record)
    }

    /// Backend name used in log lines
    fn name(&self) -> &'static str;
}
