// src/ingest/providers/google_news_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::{FeedSource, Locale, RawRecord};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<SourceTag>,
}

/// `<source url="...">Outlet Name</source>` as Google News emits it.
#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text")]
    name: Option<String>,
}

/// Google News keyword-search RSS provider. Fetches over HTTP, or
/// parses fixture content directly in tests.
pub struct GoogleNewsRss {
    client: reqwest::Client,
    fixture: Option<String>,
}

impl GoogleNewsRss {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            fixture: None,
        }
    }

    pub fn from_fixture(content: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            fixture: Some(content.to_string()),
        }
    }

    /// Keyword-search feed URL with locale parameters, e.g.
    /// `https://news.google.com/rss/search?q=rates&hl=en&gl=US&ceid=US:en`.
    pub fn search_url(keyword: &str, locale: Locale) -> String {
        let mut url =
            url::Url::parse("https://news.google.com/rss/search").expect("static feed url");
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("hl", locale.hl)
            .append_pair("gl", locale.gl)
            .append_pair("ceid", &format!("{}:{}", locale.gl, locale.hl));
        url.to_string()
    }

    fn parse(&self, xml: &str) -> Result<Vec<RawRecord>> {
        let t0 = std::time::Instant::now();

        let rss: Rss = from_str(xml).context("parsing google news rss xml")?;
        let mut out = Vec::with_capacity(rss.channel.item.len());

        for it in rss.channel.item {
            let (Some(title), Some(link)) = (it.title, it.link) else {
                continue;
            };
            let title = title.trim().to_string();
            let link = link.trim().to_string();
            if title.is_empty() || link.is_empty() {
                continue;
            }
            out.push(RawRecord {
                title,
                link,
                pub_date: it.pub_date.map(|d| d.trim().to_string()),
                source: it
                    .source
                    .and_then(|s| s.name)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "Google News".to_string()),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("monitor_feed_parse_ms").record(ms);
        counter!("monitor_feed_records_total").increment(out.len() as u64);

        Ok(out)
    }
}

impl Default for GoogleNewsRss {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for GoogleNewsRss {
    async fn fetch_latest(&self, keyword: &str, locale: Locale) -> Result<Vec<RawRecord>> {
        let xml = match &self.fixture {
            Some(content) => content.clone(),
            None => {
                let url = Self::search_url(keyword, locale);
                self.client
                    .get(&url)
                    .send()
                    .await
                    .context("fetching google news rss")?
                    .error_for_status()
                    .context("google news rss status")?
                    .text()
                    .await
                    .context("reading google news rss body")?
            }
        };
        self.parse(&xml)
    }

    fn name(&self) -> &'static str {
        "Google News"
    }
}
