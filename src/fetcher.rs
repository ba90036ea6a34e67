use std::time::Duration;

use reqwest::{header, Client};

use crate::errors::{AppError, AppResult};

// See: https://stackoverflow.com/a/7001617/5155484
const ACCEPT: &str = "application/rss+xml, application/rdf+xml, application/atom+xml, application/feed+json, application/xml;q=0.9, text/xml;q=0.8";
const USER_AGENT: &str = concat!("Feedvote/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloads and parses feeds. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| {
                log::error!("Failed to create HTTP client: {}", e);
                AppError::InternalError
            })?;
        Ok(FeedFetcher { client })
    }

    pub async fn fetch(&self, url: &str) -> AppResult<feed_rs::model::Feed> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!(
                "Got non-success response for feed {}: {}",
                url,
                response.status()
            );
            return Err(AppError::FeedNotFound);
        }

        let body = response.bytes().await?;
        let parsed = feed_rs::parser::parse(&body[..])?;
        log::debug!("Fetched feed {} with {} entries", url, parsed.entries.len());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel>
          <title>Sample Feed</title>
          <link>http://example.com/</link>
          <description>Sample feed</description>
          <item><title>Item 1</title><link>http://example.com/item1</link></item>
        </channel></rss>"#;

    #[tokio::test]
    async fn test_fetch_parses_feed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rss")
            .match_header("accept", ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body(RSS)
            .create_async()
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let feed = fetcher
            .fetch(&format!("{}/rss", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(feed.title.unwrap().content, "Sample Feed");
        assert_eq!(feed.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::FeedNotFound);
    }

    #[tokio::test]
    async fn test_fetch_garbage_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/html")
            .with_status(200)
            .with_body("<html><body>not a feed</body></html>")
            .create_async()
            .await;

        let fetcher = FeedFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/html", server.url()))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::FeedParseError);
    }
}
