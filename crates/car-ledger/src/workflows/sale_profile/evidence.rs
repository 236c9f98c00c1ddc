use std::collections::HashSet;

use super::domain::{Evidence, RecordId};

/// Reverse index of the records that have at least one evidence document.
///
/// Built from the full evidence set: a pending or failed mask still proves the
/// record is backed, even though the file itself is not publishable.
#[derive(Debug, Clone, Default)]
pub struct EvidenceIndex {
    record_ids: HashSet<RecordId>,
}

impl EvidenceIndex {
    pub fn from_evidence<'a, I>(evidence: I) -> Self
    where
        I: IntoIterator<Item = &'a Evidence>,
    {
        let record_ids = evidence
            .into_iter()
            .filter_map(|item| item.record_id.clone())
            .collect();
        Self { record_ids }
    }

    pub fn has_evidence(&self, record_id: &RecordId) -> bool {
        self.record_ids.contains(record_id)
    }

    pub fn len(&self) -> usize {
        self.record_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_ids.is_empty()
    }
}
