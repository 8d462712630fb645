// src/bin/notify_demo.rs
// Sends one synthetic notification through the configured channels.
// Useful for verifying webhook URLs without waiting for real news.

use chrono::Utc;
use keyword_news_monitor::{Candidate, NotificationEvent, NotifierMux};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let mux = NotifierMux::from_env();

    let ev = NotificationEvent {
        keyword: "demo".into(),
        items: vec![Candidate {
            title: "Notify demo: it works".into(),
            link: "https://example.com/demo".into(),
            source: "Demo".into(),
            published_at: Utc::now(),
            query_term: "demo".into(),
            id: "0".repeat(32),
            normalized_title: "notify demo it works".into(),
        }],
        sound: false,
        ts: Utc::now(),
    };

    mux.dispatch(&ev).await;
    println!("demo notification dispatched");
}
