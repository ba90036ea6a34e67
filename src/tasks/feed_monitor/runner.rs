use std::time::{Duration, Instant};

use diesel::SqliteConnection;

use super::ingest;
use crate::{
    fetcher::FeedFetcher,
    models::feed::{Feed, PartialFeed},
    DbPool,
};

pub async fn start(pool: DbPool, fetcher: FeedFetcher, interval: Duration) {
    loop {
        match pool.get() {
            Ok(mut conn) => sync_all(&mut conn, &fetcher).await,
            Err(e) => log::error!("Error getting DB connection: {e:?}"),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Fetch every subscribed feed once, storing new items and per-feed errors.
pub async fn sync_all(conn: &mut SqliteConnection, fetcher: &FeedFetcher) {
    let feeds = match Feed::get_all(conn) {
        Ok(feeds) => feeds,
        Err(e) => {
            log::warn!("Error getting feeds: {e:?}");
            return;
        }
    };
    if feeds.is_empty() {
        log::info!("No feeds found");
        return;
    }

    for feed in &feeds {
        let started = Instant::now();
        let now = chrono::Utc::now().timestamp() as i32;
        match fetcher.fetch(&feed.url).await {
            Ok(parsed) => {
                let added = ingest::store_parsed(conn, feed, &parsed);
                tracing::info!(
                    feed_url = %feed.url,
                    items_added = added,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Feed processing completed"
                );

                // Clear any previous errors on successful fetch
                let update = PartialFeed {
                    last_checked: Some(now),
                    error_time: Some(0),
                    error_message: Some(String::new()),
                    ..Default::default()
                };
                Feed::update(conn, feed.id, &update);
            }
            Err(e) => {
                let update = PartialFeed {
                    last_checked: Some(now),
                    error_time: Some(now),
                    error_message: Some(e.to_string()),
                    ..Default::default()
                };
                Feed::update(conn, feed.id, &update);
                log::warn!("Error getting feed {}: {}", feed.url, e);
            }
        }
    }

    log::info!("Checked {} feeds", feeds.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::feed_item::FeedItem;
    use crate::test_helpers::{get_test_db_connection, insert_test_feed};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel>
          <title>Sample Feed</title>
          <link>http://example.com/</link>
          <description>Sample feed</description>
          <item><title>Item 1</title><guid>item-1</guid><link>http://example.com/item1</link></item>
        </channel></rss>"#;

    #[tokio::test]
    async fn test_sync_all_records_items_and_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/good")
            .with_status(200)
            .with_body(RSS)
            .create_async()
            .await;
        server
            .mock("GET", "/bad")
            .with_status(500)
            .create_async()
            .await;

        let mut conn = get_test_db_connection();
        let good = insert_test_feed(&mut conn, &format!("{}/good", server.url()));
        let bad = insert_test_feed(&mut conn, &format!("{}/bad", server.url()));

        let fetcher = FeedFetcher::new().unwrap();
        sync_all(&mut conn, &fetcher).await;

        let good = Feed::get_by_id(&mut conn, good.id).unwrap();
        assert!(good.last_checked > 0);
        assert_eq!(good.error_time, 0);
        assert_eq!(FeedItem::get_by_feed(&mut conn, good.id).unwrap().len(), 1);

        let bad = Feed::get_by_id(&mut conn, bad.id).unwrap();
        assert!(bad.error_time > 0);
        assert_eq!(
            bad.error_message.as_deref(),
            Some("Feed not found or inaccessible")
        );
        assert!(FeedItem::get_by_feed(&mut conn, bad.id).unwrap().is_empty());
    }
}
