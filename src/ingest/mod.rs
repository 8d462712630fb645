// src/ingest/mod.rs
pub mod providers;
pub mod types;

use chrono::{DateTime, Duration, Utc};

use crate::fingerprint::{compute_id, normalize_title};
use types::{Candidate, RawRecord};

/// Parse an RSS `pubDate` (RFC 2822, including the obsolete `GMT`
/// zone Google News emits) into UTC. Returns `None` for anything
/// unparseable; such records never become candidates.
pub fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Keep only records observable right now — published within the last
/// hour, not in the future, not older than 30 days — and fingerprint
/// the survivors into candidates for the given query term.
pub fn recency_filter(now: DateTime<Utc>, keyword: &str, raw: Vec<RawRecord>) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(raw.len());
    for rec in raw {
        let Some(published_at) = rec.pub_date.as_deref().and_then(parse_pub_date) else {
            tracing::debug!(title = %rec.title, "record without a usable pubDate, skipping");
            continue;
        };
        if published_at > now {
            tracing::debug!(title = %rec.title, "future-dated record, skipping");
            continue;
        }
        if published_at < now - Duration::days(30) {
            continue;
        }
        if now - published_at > Duration::hours(1) {
            continue;
        }

        let id = compute_id(&rec.title, &rec.link);
        let normalized_title = normalize_title(&rec.title);
        out.push(Candidate {
            title: rec.title,
            link: rec.link,
            source: rec.source,
            published_at,
            query_term: keyword.to_string(),
            id,
            normalized_title,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, pub_date: Option<String>) -> RawRecord {
        RawRecord {
            title: title.into(),
            link: format!("https://a.com/{}", title.len()),
            pub_date,
            source: "A Times".into(),
        }
    }

    fn rfc2822(ts: DateTime<Utc>) -> Option<String> {
        Some(ts.to_rfc2822())
    }

    #[test]
    fn keeps_only_the_fresh_window() {
        let now = Utc::now();
        let records = vec![
            raw("fresh", rfc2822(now - Duration::minutes(10))),
            raw("stale", rfc2822(now - Duration::hours(2))),
            raw("future", rfc2822(now + Duration::minutes(5))),
            raw("ancient", rfc2822(now - Duration::days(31))),
            raw("dateless", None),
            raw("garbage date", Some("yesterday-ish".into())),
        ];

        let kept = recency_filter(now, "rates", records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "fresh");
        assert_eq!(kept[0].query_term, "rates");
    }

    #[test]
    fn survivors_are_fingerprinted() {
        let now = Utc::now();
        let kept = recency_filter(
            now,
            "rates",
            vec![raw("Fed Raises Rates!", rfc2822(now - Duration::minutes(1)))],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.len(), 32);
        assert_eq!(kept[0].normalized_title, "fed raises rates");
    }

    #[test]
    fn pub_date_parses_rfc2822() {
        let dt = parse_pub_date("Sat, 06 Sep 2025 09:30:00 GMT").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-09-06T09:30:00+00:00");
        assert!(parse_pub_date("").is_none());
        assert!(parse_pub_date("2025-09-06T09:30:00Z").is_none());
    }
}
