// tests/dedup_tiers.rs
use chrono::{DateTime, Duration, Utc};
use keyword_news_monitor::dedup::filter_new;
use keyword_news_monitor::fingerprint::{compute_id, domain_time_key, normalize_title};
use keyword_news_monitor::store::{SeenStore, SeenValue};
use keyword_news_monitor::Candidate;

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

fn seen_article(ts: DateTime<Utc>, normalized_title: &str, domain: &str) -> SeenValue {
    SeenValue::Article {
        ts,
        normalized_title: normalized_title.into(),
        domain: domain.into(),
    }
}

#[test]
fn exact_id_tier_short_circuits() {
    let now = Utc::now();
    let c = candidate("Fed raises rates", "https://a.com/1", now - Duration::minutes(10));

    // Same id in the store, but with a different hour bucket and a
    // dissimilar title: tier 1 must reject before the others run.
    let mut store = SeenStore::default();
    store.insert(
        c.id.clone(),
        seen_article(now - Duration::hours(5), "완전히 다른 제목", "b.com"),
    );

    let outcome = filter_new(&mut store, vec![c], 0.8, now);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected_exact, 1);
    assert_eq!(outcome.rejected_domain_hour, 0);
    assert_eq!(outcome.rejected_fuzzy, 0);
}

#[test]
fn domain_hour_tier_catches_same_outlet_same_hour() {
    let now = Utc::now();
    let c = candidate(
        "A completely reworded headline",
        "https://a.com/2",
        now - Duration::minutes(10),
    );

    let mut store = SeenStore::default();
    store.insert(
        domain_time_key("a.com", c.published_at),
        SeenValue::DomainHour { ts: c.published_at },
    );

    let outcome = filter_new(&mut store, vec![c], 0.8, now);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected_domain_hour, 1);
}

#[test]
fn fuzzy_tier_catches_attribution_variants() {
    let now = Utc::now();
    // Stored: one outlet's version, published a few hours ago from a
    // different domain and hour bucket.
    let mut store = SeenStore::default();
    store.insert(
        "someid",
        seen_article(
            now - Duration::hours(5),
            &normalize_title("Fed raises rates by 0.25% - KBS"),
            "b.com",
        ),
    );

    let c = candidate(
        "[연합뉴스] Fed raises rates by 0.25%",
        "https://a.com/3",
        now - Duration::minutes(10),
    );
    let outcome = filter_new(&mut store, vec![c], 0.8, now);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected_fuzzy, 1);
}

#[test]
fn fuzzy_tier_ignores_records_older_than_a_day() {
    let now = Utc::now();
    let mut store = SeenStore::default();
    store.insert(
        "someid",
        seen_article(
            now - Duration::days(3),
            &normalize_title("Fed raises rates by 0.25%"),
            "b.com",
        ),
    );

    let c = candidate(
        "Fed raises rates by 0.25%!",
        "https://a.com/4",
        now - Duration::minutes(10),
    );
    let outcome = filter_new(&mut store, vec![c], 0.8, now);
    assert_eq!(outcome.accepted.len(), 1);
}

#[test]
fn batch_self_dedup_accepts_exactly_one() {
    let now = Utc::now();
    let mut store = SeenStore::default();

    // Different links and domains, so tiers 1 and 2 cannot fire; the
    // titles normalize identically, so tier 3 must catch the second
    // against the first accepted in the same batch.
    let a = candidate(
        "Fed raises rates by 0.25% - KBS",
        "https://a.com/5",
        now - Duration::minutes(20),
    );
    let b = candidate(
        "[연합뉴스] Fed raises rates by 0.25%",
        "https://b.com/9",
        now - Duration::minutes(5),
    );

    let outcome = filter_new(&mut store, vec![a.clone(), b], 0.8, now);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].id, a.id);
    assert_eq!(outcome.rejected_fuzzy, 1);
}

#[test]
fn same_batch_same_outlet_same_hour_collides() {
    let now = Utc::now().date_naive().and_hms_opt(9, 10, 0).unwrap().and_utc();
    let mut store = SeenStore::default();

    let a = candidate("First story of the hour", "https://a.com/6", now);
    let b = candidate(
        "Entirely unrelated second story",
        "https://a.com/7",
        now + Duration::minutes(30),
    );

    let outcome = filter_new(&mut store, vec![a, b], 0.8, now + Duration::hours(1));
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.rejected_domain_hour, 1);
}

#[test]
fn rewordings_pass_at_default_threshold() {
    let now = Utc::now();
    let mut store = SeenStore::default();

    let a = candidate(
        "Fed raises rates by 0.25%",
        "https://a.com/8",
        now - Duration::minutes(20),
    );
    let b = candidate(
        "Fed raises interest rates 0.25 percent",
        "https://b.com/8",
        now - Duration::minutes(5),
    );

    // Substantial rewording sits near 0.53 similarity: distinct at the
    // default threshold, duplicate under a stricter configuration.
    let outcome = filter_new(&mut store, vec![a.clone(), b.clone()], 0.8, now);
    assert_eq!(outcome.accepted.len(), 2);

    let mut store = SeenStore::default();
    let outcome = filter_new(&mut store, vec![a, b], 0.5, now);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.rejected_fuzzy, 1);
}

#[test]
fn pass_prunes_stale_records() {
    let now = Utc::now();
    let mut store = SeenStore::default();
    store.insert(
        "stale",
        seen_article(now - Duration::days(8), "old title", "a.com"),
    );
    store.insert(
        "recent",
        seen_article(now - Duration::days(6), "recent title", "a.com"),
    );

    let outcome = filter_new(&mut store, vec![], 0.8, now);
    assert!(outcome.accepted.is_empty());
    assert!(!store.contains("stale"));
    assert!(store.contains("recent"));
}

#[test]
fn accepted_order_is_input_order() {
    let now = Utc::now();
    let mut store = SeenStore::default();
    let batch: Vec<Candidate> = (0..4)
        .map(|n| {
            candidate(
                &format!("Distinct headline number {n}"),
                &format!("https://s{n}.com/{n}"),
                now - Duration::minutes(30) + Duration::minutes(n),
            )
        })
        .collect();
    let expected: Vec<String> = batch.iter().map(|c| c.id.clone()).collect();

    let outcome = filter_new(&mut store, batch, 0.8, now);
    let got: Vec<String> = outcome.accepted.iter().map(|c| c.id.clone()).collect();
    assert_eq!(got, expected);
}

#[test]
fn acceptance_writes_id_and_bucket_keys() {
    let now = Utc::now();
    let mut store = SeenStore::default();
    let c = candidate("Fed raises rates", "https://a.com/1", now - Duration::minutes(10));
    let id = c.id.clone();
    let bucket = domain_time_key("a.com", c.published_at);

    let outcome = filter_new(&mut store, vec![c], 0.8, now);
    assert_eq!(outcome.accepted.len(), 1);
    assert!(store.contains(&id));
    assert!(store.contains(&bucket));
}
