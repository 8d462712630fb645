// src/notify/mod.rs
pub mod discord;
pub mod slack;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::ingest::types::Candidate;

pub use discord::DiscordNotifier;
pub use slack::SlackNotifier;

/// One grouped notification per keyword per cycle.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub keyword: String,
    pub items: Vec<Candidate>,
    /// Channels that can ping louder (e.g. Slack `<!here>`) do so when
    /// this is set.
    pub sound: bool,
    pub ts: DateTime<Utc>,
}

impl NotificationEvent {
    /// e.g. `3 new articles for "rates"`.
    pub fn headline(&self) -> String {
        let n = self.items.len();
        let noun = if n == 1 { "article" } else { "articles" };
        format!("{n} new {noun} for \"{}\"", self.keyword)
    }

    /// First title, with a trailing count for grouped batches.
    pub fn summary(&self) -> String {
        match self.items.as_slice() {
            [] => String::new(),
            [only] => only.title.clone(),
            [first, rest @ ..] => format!("{} and {} more", first.title, rest.len()),
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, ev: &NotificationEvent) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fan-out to every configured channel. Dispatch failures are logged
/// and swallowed; notifications are fire-and-forget and never retried
/// within the same cycle.
pub struct NotifierMux {
    sinks: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn from_env() -> Self {
        Self {
            sinks: vec![
                Box::new(DiscordNotifier::from_env()),
                Box::new(SlackNotifier::from_env()),
            ],
        }
    }

    pub fn with_sinks(sinks: Vec<Box<dyn Notifier>>) -> Self {
        Self { sinks }
    }

    pub async fn dispatch(&self, ev: &NotificationEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(ev).await {
                tracing::warn!(error = ?e, sink = sink.name(), "notification dispatch failed");
            }
        }
    }
}
