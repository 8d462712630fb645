// src/monitor.rs
//! Poll cycle orchestration: per-keyword fetch, deduplication pass,
//! recent-log persistence, notification dispatch, and adaptive
//! interval feedback.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::MonitorConfig;
use crate::dedup;
use crate::ingest::{
    self,
    types::{Candidate, FeedSource, Locale},
};
use crate::interval::IntervalController;
use crate::notify::{NotificationEvent, NotifierMux};
use crate::recent::{RecentLog, RECENT_CAP};
use crate::store::SeenStorePersistence;

/// Keyword-list changes schedule a follow-up cycle after this delay
/// instead of re-entering a possibly running one.
const KEYWORDS_DEBOUNCE: std::time::Duration = std::time::Duration::from_secs(1);

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("monitor_cycles_total", "Completed poll cycles.");
        describe_counter!(
            "monitor_term_errors_total",
            "Per-keyword fetch/parse failures (isolated, non-fatal)."
        );
        describe_counter!(
            "monitor_new_articles_total",
            "Articles accepted as new across all keywords."
        );
        describe_counter!(
            "monitor_store_failures_total",
            "Seen-store load/save failures (load failures fail open)."
        );
        describe_counter!(
            "dedup_rejected_exact_total",
            "Candidates rejected by the exact-id tier."
        );
        describe_counter!(
            "dedup_rejected_domain_hour_total",
            "Candidates rejected by the domain+hour tier."
        );
        describe_counter!(
            "dedup_rejected_fuzzy_total",
            "Candidates rejected by the fuzzy-title tier."
        );
        describe_counter!(
            "monitor_feed_records_total",
            "Raw records parsed from feeds."
        );
        describe_histogram!("monitor_feed_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("monitor_interval_minutes", "Current polling interval.");
        describe_gauge!("seen_store_entries", "Entries in the seen store after a pass.");
        describe_gauge!("monitor_last_cycle_ts", "Unix ts of the last completed cycle.");
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub active: bool,
    pub last_check_time: Option<DateTime<Utc>>,
    pub current_interval_minutes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub found_new: bool,
}

pub struct Monitor {
    feed: Box<dyn FeedSource>,
    persistence: Box<dyn SeenStorePersistence>,
    notifiers: NotifierMux,
    recent: RecentLog,
    recent_path: PathBuf,
    config: RwLock<MonitorConfig>,
    controller: Mutex<IntervalController>,
    last_check: RwLock<Option<DateTime<Utc>>>,
    active: AtomicBool,
    trigger_tx: mpsc::Sender<()>,
    trigger_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl Monitor {
    pub fn new(
        feed: Box<dyn FeedSource>,
        persistence: Box<dyn SeenStorePersistence>,
        notifiers: NotifierMux,
        config: MonitorConfig,
        recent: RecentLog,
        recent_path: impl Into<PathBuf>,
    ) -> Self {
        // Capacity 1: a second trigger while one is pending collapses
        // into it.
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        let initial =
            std::time::Duration::from_secs(config.check_interval_minutes.saturating_mul(60));
        Self {
            feed,
            persistence,
            notifiers,
            recent,
            recent_path: recent_path.into(),
            config: RwLock::new(config),
            controller: Mutex::new(IntervalController::starting_at(initial)),
            last_check: RwLock::new(None),
            active: AtomicBool::new(false),
            trigger_tx,
            trigger_rx: Mutex::new(Some(trigger_rx)),
        }
    }

    /// Execute one full poll cycle. The poll loop is the single
    /// driver; callers other than tests go through `force_check`.
    pub async fn run_cycle(&self) -> CycleOutcome {
        ensure_metrics_described();

        let cfg = self.config.read().await.clone();
        let started = Utc::now();
        counter!("monitor_cycles_total").increment(1);

        let locale = cfg
            .language
            .as_deref()
            .map(Locale::from_language)
            .unwrap_or_default();
        let threshold = cfg.threshold();

        let mut found_new = false;

        if cfg.keywords.is_empty() {
            tracing::debug!("no tracked keywords");
        }

        for keyword in &cfg.keywords {
            match self.check_keyword(keyword, locale, threshold, &cfg).await {
                Ok(accepted) => {
                    if accepted > 0 {
                        found_new = true;
                    }
                }
                Err(e) => {
                    counter!("monitor_term_errors_total").increment(1);
                    tracing::warn!(error = ?e, keyword = %keyword, "keyword check failed");
                }
            }
        }

        self.complete_cycle(found_new, started).await;
        CycleOutcome { found_new }
    }

    /// Fetch, recency-filter, dedup, persist, and notify for a single
    /// keyword. A failure here is isolated by the caller and never
    /// aborts the remaining keywords.
    async fn check_keyword(
        &self,
        keyword: &str,
        locale: Locale,
        threshold: f64,
        cfg: &MonitorConfig,
    ) -> Result<usize> {
        let now = Utc::now();
        let raw = self.feed.fetch_latest(keyword, locale).await?;
        let candidates = ingest::recency_filter(now, keyword, raw);
        if candidates.is_empty() {
            return Ok(0);
        }

        let total = candidates.len();
        let accepted = self.dedup_pass(keyword, candidates, threshold, now).await;
        tracing::info!(
            keyword = %keyword,
            total,
            accepted = accepted.len(),
            "keyword checked"
        );
        if accepted.is_empty() {
            return Ok(0);
        }

        counter!("monitor_new_articles_total").increment(accepted.len() as u64);
        self.recent.push_batch(&accepted);
        self.recent.save(&self.recent_path).await;

        if cfg.notifications_enabled {
            let ev = NotificationEvent {
                keyword: keyword.to_string(),
                items: accepted.clone(),
                sound: cfg.sound_enabled,
                ts: now,
            };
            self.notifiers.dispatch(&ev).await;
        }

        Ok(accepted.len())
    }

    /// One deduplication pass: load, filter, prune, save. A load
    /// failure fails open — every candidate is delivered unfiltered
    /// rather than blocking news on a broken store. A save failure is
    /// logged and does not withhold accepted items.
    async fn dedup_pass(
        &self,
        keyword: &str,
        candidates: Vec<Candidate>,
        threshold: f64,
        now: DateTime<Utc>,
    ) -> Vec<Candidate> {
        let mut store = match self.persistence.load().await {
            Ok(store) => store,
            Err(e) => {
                counter!("monitor_store_failures_total").increment(1);
                tracing::warn!(error = ?e, keyword = %keyword, "seen store unavailable, delivering unfiltered");
                return candidates;
            }
        };

        let outcome = dedup::filter_new(&mut store, candidates, threshold, now);
        counter!("dedup_rejected_exact_total").increment(outcome.rejected_exact as u64);
        counter!("dedup_rejected_domain_hour_total")
            .increment(outcome.rejected_domain_hour as u64);
        counter!("dedup_rejected_fuzzy_total").increment(outcome.rejected_fuzzy as u64);
        gauge!("seen_store_entries").set(store.len() as f64);

        if let Err(e) = self.persistence.save(&store).await {
            counter!("monitor_store_failures_total").increment(1);
            tracing::warn!(error = ?e, keyword = %keyword, "seen store save failed");
        }

        outcome.accepted
    }

    async fn complete_cycle(&self, found_new: bool, started: DateTime<Utc>) {
        let interval_minutes = {
            let mut controller = self.controller.lock().await;
            controller.on_cycle_complete(found_new);
            controller.minutes()
        };
        gauge!("monitor_interval_minutes").set(interval_minutes as f64);
        gauge!("monitor_last_cycle_ts").set(started.timestamp() as f64);
        *self.last_check.write().await = Some(started);
        tracing::info!(found_new, interval_minutes, "cycle complete");
    }

    /// Spawn the single poll-loop task: one immediate cycle, then
    /// sleep-or-trigger, forever. Cycles never overlap.
    pub fn spawn_poll_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let Some(mut rx) = self.trigger_rx.lock().await.take() else {
                tracing::error!("poll loop already running");
                return;
            };
            self.active.store(true, Ordering::SeqCst);

            self.run_cycle().await;
            loop {
                let interval = { self.controller.lock().await.current() };
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    msg = rx.recv() => {
                        if msg.is_none() {
                            break;
                        }
                    }
                }
                self.run_cycle().await;
            }

            self.active.store(false, Ordering::SeqCst);
        })
    }

    /// Request an out-of-band cycle. Returns false when one is already
    /// queued (the request collapses into it).
    pub fn force_check(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }

    /// Replace the tracked keyword list and schedule a debounced
    /// follow-up cycle.
    pub async fn update_keywords(&self, keywords: Vec<String>) {
        {
            let mut cfg = self.config.write().await;
            cfg.keywords = keywords;
        }
        let tx = self.trigger_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(KEYWORDS_DEBOUNCE).await;
            let _ = tx.try_send(());
        });
    }

    /// Replace the runtime configuration. Takes effect on the next
    /// cycle; an in-flight cycle keeps its snapshot.
    pub async fn update_config(&self, config: MonitorConfig) {
        *self.config.write().await = config;
    }

    pub async fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            active: self.active.load(Ordering::SeqCst),
            last_check_time: *self.last_check.read().await,
            current_interval_minutes: self.controller.lock().await.minutes(),
        }
    }

    pub fn recent_snapshot(&self, limit: usize) -> Vec<Candidate> {
        self.recent.snapshot(limit)
    }
}

/// Default state-file locations and wiring for the service binary.
pub struct MonitorBuilder {
    config: MonitorConfig,
    seen_path: PathBuf,
    recent_path: PathBuf,
}

impl MonitorBuilder {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            seen_path: PathBuf::from("state/seen_articles.json"),
            recent_path: PathBuf::from("state/recent_articles.json"),
        }
    }

    pub fn seen_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seen_path = path.into();
        self
    }

    pub fn recent_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.recent_path = path.into();
        self
    }

    pub async fn build(self, feed: Box<dyn FeedSource>, notifiers: NotifierMux) -> Monitor {
        let recent = RecentLog::load(&self.recent_path, RECENT_CAP).await;
        Monitor::new(
            feed,
            Box::new(crate::store::JsonStateFile::new(self.seen_path)),
            notifiers,
            self.config,
            recent,
            self.recent_path,
        )
    }
}
