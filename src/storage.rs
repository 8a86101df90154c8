use crate::calendar::parse_date_key;
use crate::errors::AppError;
use crate::models::{Entry, EntryMap};
use std::{
    collections::{BTreeMap, HashMap},
    future::Future,
    io,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tokio::fs;
use tracing::{error, info, warn};

/// Storage key holding the serialized entry map.
pub const ENTRIES_KEY: &str = "habit_entries";

/// String key-value persistence the entry store is written to.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = io::Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = io::Result<()>> + Send;
}

/// Keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value).await?;
        // A reader sees either the old snapshot or the new one.
        if let Err(err) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err);
        }
        Ok(())
    }
}

/// In-process backend. Writes can be switched to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.into());
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("storage unavailable"));
        }
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }
}

pub async fn load_entries<S: KeyValueStore>(backend: &S) -> EntryMap {
    match backend.get(ENTRIES_KEY).await {
        Ok(Some(raw)) => match decode_entries(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse stored entries: {err}");
                EntryMap::new()
            }
        },
        Ok(None) => {
            info!("no stored entries found");
            EntryMap::new()
        }
        Err(err) => {
            error!("failed to read stored entries: {err}");
            EntryMap::new()
        }
    }
}

/// Parses a stored snapshot. Keys that are not `YYYY-MM-DD` dates are
/// skipped. Entries with an unknown kind, an invalid classification, a rating
/// that does not match their kind, or a date that differs from their key are
/// dropped.
pub fn decode_entries(raw: &str) -> Result<EntryMap, serde_json::Error> {
    let days: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(raw)?;
    let mut dropped_days = 0usize;
    let mut dropped = 0usize;
    let mut entries = EntryMap::new();

    for (date, values) in days {
        if parse_date_key(&date).is_none() {
            dropped_days += 1;
            dropped += values.len();
            continue;
        }
        let day: Vec<Entry> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Entry>(value) {
                Ok(entry) if entry.date == date && entry.rating == entry.kind.rating() => Some(entry),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        entries.insert(date, day);
    }

    if dropped_days > 0 || dropped > 0 {
        warn!(dropped_days, dropped, "ignored unreadable stored entries");
    }
    Ok(entries)
}

pub fn encode_entries(entries: &EntryMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

pub async fn persist_entries<S: KeyValueStore>(backend: &S, entries: &EntryMap) -> Result<(), AppError> {
    let payload = encode_entries(entries).map_err(AppError::save_failed)?;
    backend
        .set(ENTRIES_KEY, payload)
        .await
        .map_err(AppError::save_failed)?;
    Ok(())
}
