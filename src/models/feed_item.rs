use super::feed::Feed;
use crate::schema::*;
use diesel::prelude::*;
use feed_rs::model::Entry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Associations, PartialEq)]
#[diesel(belongs_to(Feed))]
#[diesel(table_name = feed_items)]
pub struct FeedItem {
    pub id: i32,
    pub feed_id: i32,
    pub guid: String,
    pub title: String,
    pub link: String,
    pub pub_date: i32,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub authors: String,
    pub categories: String,
    pub shown_at: i32, // zero if never shown
    pub liked: Option<bool>,
    pub voted_at: i32,
}

#[derive(Debug, Default, Serialize, Deserialize, Insertable)]
#[diesel(table_name = feed_items)]
pub struct NewFeedItem {
    pub feed_id: i32,
    pub guid: String,
    pub title: String,
    pub link: String,
    pub pub_date: i32,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub authors: String,
    pub categories: String,
}

impl NewFeedItem {
    /// Build a storable item from a parsed feed entry.
    pub fn from_entry(feed: &Feed, entry: &Entry) -> Self {
        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .filter(|s| !s.trim().is_empty());
        // Many feeds repeat the summary as the content body
        let content = entry
            .content
            .as_ref()
            .and_then(|c| c.body.clone())
            .filter(|body| !body.trim().is_empty() && Some(body) != summary.as_ref());

        let title = entry
            .title
            .as_ref()
            .or(entry.summary.as_ref())
            .map(|t| t.content.clone())
            .unwrap_or_else(|| feed.title.clone());

        let pub_date = entry
            .published
            .or(entry.updated)
            .map(|p| p.timestamp() as i32)
            .unwrap_or(0);

        let authors = entry
            .authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let categories = entry
            .categories
            .iter()
            .map(|c| c.label.as_deref().unwrap_or(&c.term))
            .collect::<Vec<_>>()
            .join(", ");

        NewFeedItem {
            feed_id: feed.id,
            guid: entry.id.clone(),
            title,
            link: entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default(),
            pub_date,
            summary,
            content,
            authors,
            categories,
        }
    }

    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<FeedItem> {
        use crate::schema::feed_items::dsl::*;
        diesel::insert_into(feed_items).values(self).get_result(conn)
    }

    pub fn insert_if_not_present(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<FeedItem>, diesel::result::Error> {
        if FeedItem::has(conn, self) {
            return Ok(None);
        }
        match self.insert(conn) {
            Ok(item) => Ok(Some(item)),
            Err(e) => {
                log::warn!("Error inserting feed item: {e:?}");
                Err(e)
            }
        }
    }
}

impl FeedItem {
    pub fn get_by_id(conn: &mut SqliteConnection, id: i32) -> Option<FeedItem> {
        use crate::schema::feed_items::dsl::feed_items;
        match feed_items.find(id).first::<FeedItem>(conn) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Error getting feed item: {e:?}");
                None
            }
        }
    }

    pub fn get_by_feed(conn: &mut SqliteConnection, feed_id: i32) -> QueryResult<Vec<FeedItem>> {
        use crate::schema::feed_items::dsl::{feed_id as fid, feed_items, id};
        feed_items
            .filter(fid.eq(feed_id))
            .order(id.asc())
            .load::<FeedItem>(conn)
    }

    /// The item on screen: the latest shown item that has not been voted on.
    pub fn current(conn: &mut SqliteConnection) -> QueryResult<Option<FeedItem>> {
        use crate::schema::feed_items::dsl::{feed_items, id, liked, shown_at};
        feed_items
            .filter(shown_at.gt(0))
            .filter(liked.is_null())
            .order((shown_at.desc(), id.desc()))
            .first::<FeedItem>(conn)
            .optional()
    }

    /// Items that were never shown.
    pub fn unseen(conn: &mut SqliteConnection) -> QueryResult<Vec<FeedItem>> {
        use crate::schema::feed_items::dsl::{feed_items, id, shown_at};
        feed_items
            .filter(shown_at.eq(0))
            .order(id.asc())
            .load::<FeedItem>(conn)
    }

    pub fn voted(conn: &mut SqliteConnection) -> QueryResult<Vec<FeedItem>> {
        use crate::schema::feed_items::dsl::{feed_items, id, liked};
        feed_items
            .filter(liked.is_not_null())
            .order(id.asc())
            .load::<FeedItem>(conn)
    }

    pub fn mark_shown(conn: &mut SqliteConnection, item_id: i32, at: i32) -> QueryResult<FeedItem> {
        use crate::schema::feed_items::dsl::{feed_items, id, shown_at};
        diesel::update(feed_items.filter(id.eq(item_id)))
            .set(shown_at.eq(at.max(1)))
            .get_result(conn)
    }

    pub fn record_vote(
        conn: &mut SqliteConnection,
        item_id: i32,
        is_liked: bool,
        at: i32,
    ) -> QueryResult<FeedItem> {
        use crate::schema::feed_items::dsl::{feed_items, id, liked, voted_at};
        diesel::update(feed_items.filter(id.eq(item_id)))
            .set((liked.eq(Some(is_liked)), voted_at.eq(at)))
            .get_result(conn)
    }

    /// Drop a feed's items that carry no vote. Voted items stay as training data.
    pub fn delete_unvoted_for_feed(conn: &mut SqliteConnection, feed_id: i32) -> QueryResult<usize> {
        use crate::schema::feed_items::dsl::{feed_id as fid, feed_items, liked};
        diesel::delete(feed_items.filter(fid.eq(feed_id)).filter(liked.is_null())).execute(conn)
    }

    /// Whether `item` is already stored for its feed, or was voted on under
    /// any feed. Voted entries come back when a feed is re-subscribed.
    pub fn has(conn: &mut SqliteConnection, item: &NewFeedItem) -> bool {
        use crate::schema::feed_items::dsl::{feed_id, feed_items, guid, liked};
        feed_items
            .filter(guid.eq(&item.guid))
            .filter(feed_id.eq(item.feed_id).or(liked.is_not_null()))
            .first::<FeedItem>(conn)
            .is_ok()
    }

    /// All text the classifier looks at.
    pub fn document_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.title,
            self.summary.as_deref().unwrap_or_default(),
            self.content.as_deref().unwrap_or_default(),
            self.authors,
            self.categories,
            self.link,
        )
    }
}
