use diesel::SqliteConnection;

use super::types::FeedUpdates;
use crate::models::{
    feed::Feed,
    feed_item::NewFeedItem,
};

/// Refresh the stored feed's metadata and insert entries not seen before.
///
/// Returns the number of newly stored items. Nothing is stored when the feed
/// was unsubscribed while it was being fetched.
pub fn store_parsed(conn: &mut SqliteConnection, feed: &Feed, parsed: &feed_rs::model::Feed) -> usize {
    let result = conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        if Feed::get_by_id(conn, feed.id).is_none() {
            log::info!("Feed {} is no longer subscribed, skipping its items", feed.url);
            return Ok(0);
        }

        let feed_updates = FeedUpdates::from_feed_rs(parsed, feed);
        if feed_updates.is_some() {
            log::info!("Found updates: {feed_updates:?}, updating feed");
            Feed::update(conn, feed.id, &feed_updates.into());
        }

        log::info!("Found {} items in {}", parsed.entries.len(), feed.url);
        let mut num_added = 0;

        for entry in &parsed.entries {
            let item = NewFeedItem::from_entry(feed, entry);
            match item.insert_if_not_present(conn) {
                Ok(Some(_)) => {
                    num_added += 1;
                }
                Ok(None) => {
                    log::debug!("Item already exists: {:?}", item.guid);
                }
                Err(e) => {
                    log::warn!("Error inserting item: {e:?}");
                }
            }
        }
        Ok(num_added)
    });

    match result {
        Ok(num_added) => {
            log::info!("Added {num_added} items");
            num_added
        }
        Err(e) => {
            log::warn!("Error storing items for {}: {e:?}", feed.url);
            0
        }
    }
}
