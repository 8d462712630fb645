// src/recent.rs
//! Bounded most-recent-first log of accepted articles, backing the
//! `/recent` endpoint and surviving restarts as a JSON state file.

use std::path::Path;
use std::sync::Mutex;

use tokio::fs;

use crate::ingest::types::Candidate;

/// At most this many articles are retained; older ones are evicted.
pub const RECENT_CAP: usize = 100;

#[derive(Debug)]
pub struct RecentLog {
    inner: Mutex<Vec<Candidate>>,
    cap: usize,
}

impl RecentLog {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            cap,
        }
    }

    /// Load a previously persisted log. Missing or unreadable state is
    /// a fresh start, never an error.
    pub async fn load(path: &Path, cap: usize) -> Self {
        let items: Vec<Candidate> = match fs::read_to_string(path).await {
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
                tracing::warn!(error = ?e, path = %path.display(), "recent log unreadable, starting empty");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        let log = Self::with_capacity(cap);
        {
            let mut v = log.inner.lock().expect("recent log mutex poisoned");
            *v = items;
            v.truncate(cap);
        }
        log
    }

    /// Prepend a batch of newly accepted articles, keeping batch order,
    /// and evict past the cap.
    pub fn push_batch(&self, accepted: &[Candidate]) {
        if accepted.is_empty() {
            return;
        }
        let mut v = self.inner.lock().expect("recent log mutex poisoned");
        let mut updated = Vec::with_capacity(accepted.len() + v.len());
        updated.extend_from_slice(accepted);
        updated.append(&mut v);
        updated.truncate(self.cap);
        *v = updated;
    }

    /// Most-recent-first snapshot, at most `limit` items.
    pub fn snapshot(&self, limit: usize) -> Vec<Candidate> {
        let v = self.inner.lock().expect("recent log mutex poisoned");
        v.iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("recent log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist the log. Failure is logged and swallowed; losing the
    /// recent list must never block news delivery.
    pub async fn save(&self, path: &Path) {
        let body = {
            let v = self.inner.lock().expect("recent log mutex poisoned");
            serde_json::to_vec_pretty(&*v).unwrap_or_default()
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = fs::create_dir_all(dir).await {
                tracing::warn!(error = ?e, "recent log state dir create failed");
            }
        }
        if let Err(e) = fs::write(path, body).await {
            tracing::warn!(error = ?e, path = %path.display(), "write recent log failed");
        }
    }
}
