pub mod google_news_rss;
