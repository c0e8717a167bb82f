//! In-memory history store.

use log::warn;
use thiserror::Error;

use super::HistoryStore;
use crate::{HistoryRecord, RecordId};

/// Errors raised by [`MemoryHistoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryHistoryStoreError {
    /// The stored record has ended and can no longer be replaced.
    #[error("record {id} has ended and cannot be replaced")]
    Finalised {
        /// Identifier of the frozen record.
        id: RecordId,
    },
}

/// History store that keeps records in a `Vec`.
///
/// Suitable for tests and for hosts that sync records elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    records: Vec<HistoryRecord>,
}

impl MemoryHistoryStore {
    /// Create a store seeded with `records`.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = HistoryRecord>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    type Error = MemoryHistoryStoreError;

    fn save(&mut self, record: &HistoryRecord) -> Result<(), Self::Error> {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) if existing.ended_at().is_some() => {
                warn!("refusing to overwrite ended record {}", record.id());
                Err(MemoryHistoryStoreError::Finalised { id: record.id() })
            }
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => {
                self.records.push(record.clone());
                Ok(())
            }
        }
    }

    fn get(&self, id: RecordId) -> Result<Option<HistoryRecord>, Self::Error> {
        Ok(self.records.iter().find(|r| r.id() == id).cloned())
    }

    fn list(&self, user_id: Option<&str>) -> Result<Vec<HistoryRecord>, Self::Error> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|r| user_id.is_none_or(|user| r.user_id() == Some(user)))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.started_at().cmp(&a.started_at()));
        Ok(records)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, Self::Error> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        Ok(self.records.len() != before)
    }
}
