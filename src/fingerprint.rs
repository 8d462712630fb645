// src/fingerprint.rs
//! Fingerprint primitives for dedup lookups: stable article ids,
//! normalized comparison titles, and domain+hour bucket keys.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

/// Publisher attributions stripped from titles before comparison.
/// Wire feeds routinely append or prepend these to otherwise identical
/// headlines.
const PUBLISHER_TOKENS: &str = "연합뉴스|뉴스1|뉴시스|YTN|KBS|MBC|SBS";

/// Stable article identifier: SHA-256 over `title + link`, hex-encoded
/// and truncated to 32 characters. Identical inputs always produce the
/// same id; distinct (title, link) pairs collide with negligible
/// probability within the store's retention window.
pub fn compute_id(title: &str, link: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(link.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(32);
    for b in digest.iter().take(16) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Normalize a title into its comparison key: strip embedded clock
/// times (`H:MM` / `HH:MM`), replace symbols with spaces (word
/// characters of any script survive), drop known publisher tokens,
/// collapse whitespace, trim, lower-case.
///
/// Idempotent: normalizing an already-normalized title is a no-op.
pub fn normalize_title(title: &str) -> String {
    // 1) Clock tokens first, while the `:` separator is still present.
    static RE_CLOCK: OnceCell<Regex> = OnceCell::new();
    let re_clock = RE_CLOCK.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}\b").expect("clock regex"));
    let mut out = re_clock.replace_all(title, " ").to_string();

    // 2) Symbols and punctuation become spaces; `(?u)\w` keeps letters,
    //    digits, and native scripts such as Hangul.
    static RE_SYMBOLS: OnceCell<Regex> = OnceCell::new();
    let re_symbols =
        RE_SYMBOLS.get_or_init(|| Regex::new(r"(?u)[^\w\s]").expect("symbols regex"));
    out = re_symbols.replace_all(&out, " ").to_string();

    // 3) Publisher attributions.
    static RE_PUBLISHERS: OnceCell<Regex> = OnceCell::new();
    let re_publishers = RE_PUBLISHERS.get_or_init(|| {
        Regex::new(&format!(r"(?u)\b(?:{PUBLISHER_TOKENS})\b")).expect("publisher regex")
    });
    out = re_publishers.replace_all(&out, " ").to_string();

    // 4) Collapse whitespace, trim, case-fold.
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_lowercase()
}

/// Hostname of `link`, or the literal `"unknown"` when the link does
/// not parse as a URL. Never fails.
pub fn extract_domain(link: &str) -> String {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Domain + clock-hour bucket key. Two items from the same domain
/// published within the same hour collide here, which is the second
/// deduplication tier.
pub fn domain_time_key(domain: &str, published_at: DateTime<Utc>) -> String {
    format!("{}_{}", domain, published_at.timestamp().div_euclid(3600))
}
