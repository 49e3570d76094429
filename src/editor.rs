use crate::record::{Patch, Record};
use std::sync::Arc;

/// Copy of `records` with the record under `key` replaced by its patched
/// version. Unknown keys leave the contents unchanged.
pub fn patch<R, P>(records: &[R], key: &R::Key, patch: &P) -> Vec<R>
where
    R: Record,
    P: Patch<R>,
{
    records
        .iter()
        .map(|record| {
            if record.key() == key {
                patch.apply_to(record)
            } else {
                record.clone()
            }
        })
        .collect()
}

/// Copy of `records` with `record` in front. The caller mints the key.
pub fn add<R: Record>(records: &[R], record: R) -> Vec<R> {
    let mut next = Vec::with_capacity(records.len() + 1);
    next.push(record);
    next.extend(records.iter().cloned());
    next
}

/// Copy of `records` without `key`. Unknown keys are a no-op.
pub fn remove<R: Record>(records: &[R], key: &R::Key) -> Vec<R> {
    records
        .iter()
        .filter(|record| record.key() != key)
        .cloned()
        .collect()
}

pub fn contains_key<R: Record>(records: &[R], key: &R::Key) -> bool {
    records.iter().any(|record| record.key() == key)
}

/// Working copy of an editable table plus its unsaved-changes flag.
///
/// Every edit swaps in a new collection, so holders of an earlier
/// [`RowEditor::rows`] snapshot never observe a change. Several saves may be
/// in flight at once; the editor stays saving until the last one finishes.
#[derive(Debug, Clone)]
pub struct RowEditor<R: Record> {
    rows: Arc<Vec<R>>,
    dirty: bool,
    saves_in_flight: usize,
}

impl<R: Record> RowEditor<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(rows),
            dirty: false,
            saves_in_flight: 0,
        }
    }

    pub fn rows(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.rows)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saves_in_flight > 0
    }

    pub fn saves_in_flight(&self) -> usize {
        self.saves_in_flight
    }

    /// Returns `false`, leaving the flag alone, when `key` is unknown.
    pub fn patch<P: Patch<R>>(&mut self, key: &R::Key, field_patch: &P) -> bool {
        if !contains_key(&self.rows, key) {
            tracing::warn!(record_id = %key, "ignoring patch for unknown row");
            return false;
        }
        self.rows = Arc::new(patch(&self.rows, key, field_patch));
        self.dirty = true;
        tracing::debug!(record_id = %key, "row patched");
        true
    }

    /// Replaces the working rows with a fresh derivation and clears the flag.
    pub fn reset(&mut self, source: Vec<R>) {
        self.rows = Arc::new(source);
        self.dirty = false;
    }

    /// Marks a commit as started and hands back the rows to send.
    /// Editing stays allowed while it is in flight.
    pub fn begin_save(&mut self) -> Arc<Vec<R>> {
        self.saves_in_flight += 1;
        self.rows()
    }

    /// Clears the dirty flag on success. Edits made during the save are not
    /// reconciled and are treated as saved too.
    pub fn finish_save(&mut self, success: bool) {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);
        if success {
            self.dirty = false;
        }
    }
}
