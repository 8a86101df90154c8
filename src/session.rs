use crate::errors::AppError;
use crate::models::{BristolType, DayCounts, Entry, EntryKind, EntryMap};
use crate::stats::counts_for_day;
use crate::storage::KeyValueStore;
use crate::store::EntryStore;
use chrono::NaiveDateTime;

/// Stepper state for editing one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    date: String,
    counts: DayCounts,
    bristol_type: Option<BristolType>,
    open: bool,
}

impl EditSession {
    pub fn open(entries: &EntryMap, date_key: &str) -> Self {
        let bristol_type = entries
            .get(date_key)
            .and_then(|day| existing_bristol_type(day));
        Self {
            date: date_key.to_string(),
            counts: counts_for_day(entries, date_key),
            bristol_type,
            open: true,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn counts(&self) -> DayCounts {
        self.counts
    }

    pub fn bristol_type(&self) -> Option<BristolType> {
        self.bristol_type
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Stepping down stops at zero.
    pub fn step(&mut self, kind: EntryKind, delta: i64) {
        self.counts.step(kind, delta);
    }

    /// Steps every count until it reaches `target`.
    pub fn step_to(&mut self, target: DayCounts) {
        for kind in EntryKind::ALL {
            let delta = i64::from(target.get(kind)) - i64::from(self.counts.get(kind));
            self.step(kind, delta);
        }
    }

    pub fn set_bristol_type(&mut self, bristol_type: Option<BristolType>) {
        self.bristol_type = bristol_type;
    }

    /// Closes the session once the day reached storage. On error the
    /// session stays open with its counts so the save can be retried.
    pub async fn save<S: KeyValueStore>(
        &mut self,
        store: &mut EntryStore<S>,
        now: NaiveDateTime,
    ) -> Result<(), AppError> {
        if !self.open {
            return Err(AppError::bad_request("edit session is closed"));
        }
        store
            .apply_bulk_edit(&self.date, self.counts, self.bristol_type, now)
            .await?;
        self.open = false;
        Ok(())
    }
}

/// Classification shared by a saved day, taken from its first classified entry.
pub fn existing_bristol_type(day: &[Entry]) -> Option<BristolType> {
    day.iter().find_map(|entry| entry.bristol_type)
}
