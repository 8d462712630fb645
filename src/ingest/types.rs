// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw feed entry as parsed out of RSS. The publication date is kept
/// as unvalidated text; the recency filter decides what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub title: String,
    pub link: String,
    pub pub_date: Option<String>,
    pub source: String,
}

/// A fingerprinted article that passed the recency filter and is ready
/// for deduplication. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub link: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub query_term: String,
    pub id: String,
    pub normalized_title: String,
}

/// Feed locale hints (Google News `hl`/`gl` query parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub hl: &'static str,
    pub gl: &'static str,
}

impl Locale {
    pub const EN_US: Locale = Locale { hl: "en", gl: "US" };
    pub const KO_KR: Locale = Locale { hl: "ko", gl: "KR" };

    pub fn from_language(lang: &str) -> Self {
        match lang {
            "ko" => Self::KO_KR,
            _ => Self::EN_US,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::EN_US
    }
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_latest(&self, keyword: &str, locale: Locale) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}
