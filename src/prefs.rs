use chrono::{NaiveDateTime, Timelike};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::goal::Goal;

/// Namespace every preference lives under (one flat map per namespace)
pub const NAMESPACE: &str = "info";

pub const KEY_START_TIME: &str = "start_time";
pub const KEY_STARTED: &str = "started";
pub const KEY_GOAL_HOUR: &str = "goal_hour";
pub const KEY_GOAL_MINUTE: &str = "goal_minute";
pub const KEY_GOAL_24: &str = "goal_24";
pub const KEY_MUSIC: &str = "music";

const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque string-keyed store. Reads never fail; a missing key is `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Preferences namespace persisted as a JSON object on disk.
/// Every `set` rewrites the whole file before returning.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Opens the default namespace file, falling back to the working directory
    pub fn open_default() -> Self {
        let path = AppDirs::prefs_path(NAMESPACE)
            .unwrap_or_else(|| PathBuf::from(format!("fastwatch_{}.json", NAMESPACE)));
        Self::with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let values = Self::load(&path);
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Map<String, Value> {
        let Ok(bytes) = fs::read(path) else {
            return Map::new();
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!(
                    "ignoring unreadable preferences at {}, starting fresh",
                    path.display()
                );
                Map::new()
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`].
///
/// Getters substitute documented defaults for missing or mistyped values.
/// Setters write through immediately; failures are logged and dropped.
#[derive(Debug)]
pub struct Preferences<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored session start, or `now` when missing or unparsable
    pub fn get_start_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.store
            .get(KEY_START_TIME)
            .and_then(|v| v.as_str().and_then(parse_start_time))
            .unwrap_or(now)
    }

    pub fn set_start_time(&mut self, time: NaiveDateTime) {
        let encoded = time.format(START_TIME_FORMAT).to_string();
        self.write(KEY_START_TIME, Value::String(encoded));
    }

    pub fn get_running(&self) -> bool {
        self.get_bool(KEY_STARTED).unwrap_or(false)
    }

    pub fn set_running(&mut self, running: bool) {
        self.write(KEY_STARTED, Value::Bool(running));
    }

    pub fn get_goal(&self) -> Goal {
        Goal {
            hours: self.get_u32(KEY_GOAL_HOUR).unwrap_or(0),
            minutes: self.get_u32(KEY_GOAL_MINUTE).unwrap_or(0),
            clock_24h: self.get_bool(KEY_GOAL_24).unwrap_or(true),
        }
    }

    /// Three separate writes; a crash in between may leave them mismatched
    pub fn set_goal(&mut self, goal: Goal) {
        self.write(KEY_GOAL_HOUR, Value::from(goal.hours));
        self.write(KEY_GOAL_MINUTE, Value::from(goal.minutes));
        self.write(KEY_GOAL_24, Value::Bool(goal.clock_24h));
    }

    pub fn get_music_enabled(&self) -> bool {
        self.get_bool(KEY_MUSIC).unwrap_or(true)
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.write(KEY_MUSIC, Value::Bool(enabled));
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.store.get(key).and_then(|v| v.as_bool())
    }

    fn get_u32(&self, key: &str) -> Option<u32> {
        self.store
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok())
    }

    fn write(&mut self, key: &str, value: Value) {
        if let Err(err) = self.store.set(key, value) {
            log::warn!("could not persist '{}': {}", key, err);
        }
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds
fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<NaiveDateTime>() {
        Ok(t) => t.with_nanosecond(0),
        Err(err) => {
            log::debug!("unparsable start_time '{}': {}", raw, err);
            None
        }
    }
}
