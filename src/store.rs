use crate::errors::AppError;
use crate::models::{BristolType, DayCounts, Entry, EntryKind, EntryMap};
use crate::storage::{KeyValueStore, load_entries, persist_entries};
use chrono::NaiveDateTime;
use std::iter;
use tracing::info;

/// Largest number of entries a single day can be saved with.
pub const MAX_ENTRIES_PER_DAY: u64 = 10_000;

/// In-memory entry map mirrored to a key-value backend.
///
/// The map is only ever swapped wholesale, and only after the backend has
/// accepted the new snapshot.
pub struct EntryStore<S> {
    backend: S,
    entries: EntryMap,
}

impl<S: KeyValueStore> EntryStore<S> {
    pub async fn load(backend: S) -> Self {
        let entries = load_entries(&backend).await;
        info!(days = entries.len(), "loaded entries");
        Self { backend, entries }
    }

    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn day(&self, date_key: &str) -> &[Entry] {
        self.entries.get(date_key).map(Vec::as_slice).unwrap_or_default()
    }

    pub async fn persist(&mut self, next: EntryMap) -> Result<(), AppError> {
        persist_entries(&self.backend, &next).await?;
        self.entries = next;
        Ok(())
    }

    /// Replaces everything logged on `date_key` with freshly built entries.
    pub async fn apply_bulk_edit(
        &mut self,
        date_key: &str,
        counts: DayCounts,
        bristol_type: Option<BristolType>,
        now: NaiveDateTime,
    ) -> Result<(), AppError> {
        if counts.total() > MAX_ENTRIES_PER_DAY {
            return Err(AppError::bad_request(format!(
                "a day holds at most {MAX_ENTRIES_PER_DAY} entries, got {}",
                counts.total()
            )));
        }
        let day = build_day_entries(date_key, counts, bristol_type, now);
        let next = replace_day(&self.entries, date_key, day);
        self.persist(next).await?;
        info!(
            date = date_key,
            successful = counts.successful,
            accidents = counts.accidents,
            failed = counts.failed,
            "saved day"
        );
        Ok(())
    }
}

/// An empty `day` is still stored under its key.
pub fn replace_day(entries: &EntryMap, date_key: &str, day: Vec<Entry>) -> EntryMap {
    let mut next = entries.clone();
    next.insert(date_key.to_string(), day);
    next
}

pub fn build_day_entries(
    date_key: &str,
    counts: DayCounts,
    bristol_type: Option<BristolType>,
    now: NaiveDateTime,
) -> Vec<Entry> {
    let base_id = now.and_utc().timestamp_millis();
    let time = now.format("%H:%M:%S").to_string();

    EntryKind::ALL
        .into_iter()
        .flat_map(|kind| iter::repeat_n(kind, counts.get(kind) as usize))
        .enumerate()
        .map(|(index, kind)| Entry {
            id: base_id + index as i64,
            date: date_key.to_string(),
            time: time.clone(),
            kind,
            bristol_type,
            notes: String::new(),
            rating: kind.rating(),
        })
        .collect()
}
