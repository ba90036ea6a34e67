//! Adding, removing and listing feed subscriptions.

use diesel::{
    result::{DatabaseErrorKind, Error as DieselError},
    Connection, SqliteConnection,
};

use crate::{
    errors::{AppError, AppResult},
    fetcher::FeedFetcher,
    models::{
        feed::{Feed, NewFeed},
        feed_item::FeedItem,
    },
    security::validation,
    tasks::feed_monitor::ingest,
    DbPool,
};

/// Subscribe to the feed at `url`, storing its current entries.
///
/// The feed is fetched and parsed before anything is stored, so a URL that
/// does not serve a feed is rejected.
pub async fn subscribe(pool: &DbPool, fetcher: &FeedFetcher, url: &str) -> AppResult<Feed> {
    let url = url.trim();
    if let Err(e) = validation::validate_url(url) {
        log::warn!("Invalid feed URL submitted: {}", e);
        return Err(AppError::invalid_input("url", &e));
    }

    let mut conn = pool.get()?;
    if Feed::get_by_url(&mut conn, url)?.is_some() {
        return Err(AppError::FeedAlreadySubscribed);
    }
    // not held across the fetch
    drop(conn);

    let parsed = fetcher.fetch(url).await?;

    let mut conn = pool.get()?;
    let new_feed = NewFeed {
        url,
        feed_type: parsed.feed_type.clone().into(),
        title: parsed
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default(),
        last_checked: chrono::Utc::now().timestamp() as i32,
        ..Default::default()
    };
    let feed = new_feed.insert(&mut conn).map_err(|e| match e {
        // lost a race with a concurrent subscribe
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AppError::FeedAlreadySubscribed
        }
        other => other.into(),
    })?;

    let added = ingest::store_parsed(&mut conn, &feed, &parsed);
    log::info!("Subscribed to {} with {} items", feed.url, added);

    Ok(Feed::get_by_id(&mut conn, feed.id).unwrap_or(feed))
}

/// Remove the subscription for `url` together with its unread items.
pub fn unsubscribe(conn: &mut SqliteConnection, url: &str) -> AppResult<Feed> {
    let url = url.trim();
    conn.transaction::<_, AppError, _>(|conn| {
        let feed = Feed::get_by_url(conn, url)?
            .ok_or_else(|| AppError::resource_not_found("Feed subscription"))?;

        let removed_items = FeedItem::delete_unvoted_for_feed(conn, feed.id)?;
        Feed::delete(conn, feed.id)?;
        log::info!("Unsubscribed from {} ({} unread items removed)", feed.url, removed_items);
        Ok(feed)
    })
}

pub fn list(conn: &mut SqliteConnection) -> AppResult<Vec<Feed>> {
    Ok(Feed::get_all(conn)?)
}
