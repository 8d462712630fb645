// src/store.rs
//! Bounded, self-pruning memory of previously accepted articles, plus
//! the persistence seam that round-trips it as a JSON state file.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Seen entries older than this are dropped on every pass.
const RETENTION_DAYS: i64 = 7;

/// A tagged seen-store entry. The article id key carries the full
/// record; the domain+hour bucket key carries only its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeenValue {
    Article {
        ts: DateTime<Utc>,
        normalized_title: String,
        domain: String,
    },
    DomainHour {
        ts: DateTime<Utc>,
    },
}

impl SeenValue {
    pub fn ts(&self) -> DateTime<Utc> {
        match self {
            SeenValue::Article { ts, .. } | SeenValue::DomainHour { ts } => *ts,
        }
    }
}

/// In-memory mapping from fingerprint key to seen entry. Owned by one
/// deduplication pass at a time; callers serialize access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenStore {
    entries: HashMap<String, SeenValue>,
}

impl SeenStore {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&SeenValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SeenValue) {
        self.entries.insert(key.into(), value);
    }

    /// Drop every entry older than the retention window. Returns the
    /// number of removed entries. Entries exactly at the boundary are
    /// retained.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - ChronoDuration::days(RETENTION_DAYS);
        let before = self.entries.len();
        self.entries.retain(|_, v| v.ts() >= cutoff);
        before - self.entries.len()
    }

    /// Full-record entries, for the fuzzy-title scan. Iteration order
    /// is unspecified; the first match above the threshold suffices.
    pub fn articles(&self) -> impl Iterator<Item = (DateTime<Utc>, &str)> {
        self.entries.values().filter_map(|v| match v {
            SeenValue::Article {
                ts,
                normalized_title,
                ..
            } => Some((*ts, normalized_title.as_str())),
            SeenValue::DomainHour { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persistence round-trip for the seen store: load the whole map at
/// pass start, save it at pass end. A failing load is what the dedup
/// pass fails open on.
#[async_trait::async_trait]
pub trait SeenStorePersistence: Send + Sync {
    async fn load(&self) -> Result<SeenStore>;
    async fn save(&self, store: &SeenStore) -> Result<()>;
}

/// JSON state file under `state/`. A missing file is a fresh start,
/// not a failure; a corrupt file is an error so the caller can decide
/// to fail open.
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SeenStorePersistence for JsonStateFile {
    async fn load(&self) -> Result<SeenStore> {
        match fs::read_to_string(&self.path).await {
            Ok(body) => serde_json::from_str(&body)
                .with_context(|| format!("parsing seen store {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SeenStore::default()),
            Err(e) => {
                Err(e).with_context(|| format!("reading seen store {}", self.path.display()))
            }
        }
    }

    async fn save(&self, store: &SeenStore) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating state dir {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(store).context("serializing seen store")?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("writing seen store {}", self.path.display()))
    }
}
