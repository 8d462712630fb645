// src/dedup.rs
//! Three-tier duplicate classification for one batch of candidates:
//! exact id, domain+hour bucket, then fuzzy title similarity.

use chrono::{DateTime, Utc};

use crate::fingerprint::{domain_time_key, extract_domain};
use crate::ingest::types::Candidate;
use crate::similarity::similarity;
use crate::store::{SeenStore, SeenValue};

/// Fuzzy-title comparisons only consider seen entries published within
/// a day of the candidate.
const FUZZY_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Accepted candidates, input order preserved.
    pub accepted: Vec<Candidate>,
    pub rejected_exact: usize,
    pub rejected_domain_hour: usize,
    pub rejected_fuzzy: usize,
}

impl FilterOutcome {
    pub fn rejected(&self) -> usize {
        self.rejected_exact + self.rejected_domain_hour + self.rejected_fuzzy
    }
}

/// Classify each candidate in input order against the store, writing
/// accepted ones back immediately so that later candidates in the same
/// batch are deduplicated against earlier ones. Prunes the store after
/// the batch.
///
/// The threshold is a per-batch argument; it is snapshotted once per
/// cycle, never re-read mid-batch.
pub fn filter_new(
    store: &mut SeenStore,
    candidates: Vec<Candidate>,
    threshold: f64,
    now: DateTime<Utc>,
) -> FilterOutcome {
    let mut out = FilterOutcome::default();

    for candidate in candidates {
        // Tier 1: exact id. Short-circuits the cheaper-to-dodge tiers.
        if store.contains(&candidate.id) {
            out.rejected_exact += 1;
            continue;
        }

        // Tier 2: same outlet, same clock hour.
        let domain = extract_domain(&candidate.link);
        let bucket_key = domain_time_key(&domain, candidate.published_at);
        if store.contains(&bucket_key) {
            out.rejected_domain_hour += 1;
            continue;
        }

        // Tier 3: fuzzy title match against recent full records.
        if is_fuzzy_duplicate(store, &candidate, threshold) {
            out.rejected_fuzzy += 1;
            continue;
        }

        store.insert(
            candidate.id.clone(),
            SeenValue::Article {
                ts: candidate.published_at,
                normalized_title: candidate.normalized_title.clone(),
                domain,
            },
        );
        store.insert(
            bucket_key,
            SeenValue::DomainHour {
                ts: candidate.published_at,
            },
        );
        out.accepted.push(candidate);
    }

    store.prune(now);
    out
}

/// First seen record within the window whose similarity crosses the
/// threshold wins; this is a predicate, not a best-match search.
fn is_fuzzy_duplicate(store: &SeenStore, candidate: &Candidate, threshold: f64) -> bool {
    for (ts, seen_title) in store.articles() {
        let age_secs = (candidate.published_at - ts).num_seconds().abs();
        if age_secs > FUZZY_WINDOW_SECS {
            continue;
        }
        if similarity(&candidate.normalized_title, seen_title) >= threshold {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{compute_id, normalize_title};
    use chrono::Duration;

    fn candidate(title: &str, link: &str, published_at: DateTime<Utc>) -> Candidate {
        Candidate {
            title: title.into(),
            link: link.into(),
            source: "A Times".into(),
            published_at,
            query_term: "rates".into(),
            id: compute_id(title, link),
            normalized_title: normalize_title(title),
        }
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut store = SeenStore::default();
        let outcome = filter_new(&mut store, vec![], 0.8, Utc::now());
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected(), 0);
    }

    #[test]
    fn accepted_candidate_writes_both_keys() {
        let now = Utc::now();
        let mut store = SeenStore::default();
        let c = candidate("Fed raises rates", "https://a.com/1", now - Duration::minutes(10));
        let id = c.id.clone();
        let bucket = domain_time_key("a.com", c.published_at);

        let outcome = filter_new(&mut store, vec![c], 0.8, now);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(store.contains(&id));
        assert!(store.contains(&bucket));
        assert_eq!(store.len(), 2);
    }
}
