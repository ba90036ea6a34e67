use crate::models::feed::{Feed, FeedType, PartialFeed};

/// Metadata changes learned from a freshly parsed copy of a stored feed.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct FeedUpdates {
    feed_type: Option<FeedType>,
    title: Option<String>,
    last_updated: Option<i32>,
}

impl From<FeedUpdates> for PartialFeed {
    fn from(updates: FeedUpdates) -> Self {
        PartialFeed {
            feed_type: updates.feed_type,
            title: updates.title,
            last_updated: updates.last_updated,
            ..Default::default()
        }
    }
}

impl FeedUpdates {
    fn new() -> Self {
        Self::default()
    }

    fn set_feed_type(&mut self, parsed: &feed_rs::model::Feed, existing: &Feed) -> &mut Self {
        if existing.feed_type == FeedType::Unknown {
            self.feed_type = Some(parsed.feed_type.clone().into());
        }
        self
    }

    fn set_title(&mut self, parsed: &feed_rs::model::Feed, existing: &Feed) -> &mut Self {
        if existing.title.is_empty() {
            if let Some(title) = &parsed.title {
                self.title = Some(title.content.clone());
            }
        }
        self
    }

    fn set_last_updated(&mut self, parsed: &feed_rs::model::Feed, existing: &Feed) -> &mut Self {
        let newest_item_ts = parsed
            .entries
            .first()
            .and_then(|i| i.published.map(|p| p.timestamp() as i32));
        let feed_ts = parsed.updated.map(|updated| updated.timestamp() as i32);

        let last_updated = match (feed_ts, newest_item_ts) {
            (Some(feed_ts), Some(item_ts)) => Some(feed_ts.max(item_ts)),
            (feed_ts, item_ts) => feed_ts.or(item_ts),
        };

        self.last_updated = last_updated.filter(|ts| *ts != existing.last_updated);
        self
    }

    fn build(&mut self) -> Self {
        Self {
            feed_type: self.feed_type.take(),
            title: self.title.take(),
            last_updated: self.last_updated.take(),
        }
    }

    pub(crate) fn from_feed_rs(parsed_feed: &feed_rs::model::Feed, existing_feed: &Feed) -> Self {
        FeedUpdates::new()
            .set_feed_type(parsed_feed, existing_feed)
            .set_title(parsed_feed, existing_feed)
            .set_last_updated(parsed_feed, existing_feed)
            .build()
    }

    pub(crate) fn is_some(&self) -> bool {
        self.feed_type.is_some() || self.title.is_some() || self.last_updated.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <feed xmlns="http://www.w3.org/2005/Atom">
          <title>Example Atom</title>
          <id>urn:example</id>
          <updated>2024-01-01T00:00:00Z</updated>
          <entry>
            <title>Newest</title>
            <id>urn:example:1</id>
            <updated>2024-01-02T00:00:00Z</updated>
            <published>2024-01-02T00:00:00Z</published>
          </entry>
        </feed>"#;

    fn stored(title: &str, feed_type: FeedType, last_updated: i32) -> Feed {
        Feed {
            id: 1,
            url: "http://example.com/atom".to_string(),
            feed_type,
            title: title.to_string(),
            last_checked: 0,
            last_updated,
            error_time: 0,
            error_message: None,
        }
    }

    #[test]
    fn test_fills_in_unknown_metadata() {
        let parsed = feed_rs::parser::parse(ATOM.as_bytes()).unwrap();
        let updates = FeedUpdates::from_feed_rs(&parsed, &stored("", FeedType::Unknown, 0));

        assert!(updates.is_some());
        let partial: PartialFeed = updates.into();
        assert_eq!(partial.feed_type, Some(FeedType::Atom));
        assert_eq!(partial.title.as_deref(), Some("Example Atom"));
        // newest entry is newer than the feed's own timestamp
        assert_eq!(partial.last_updated, Some(1704153600));
    }

    #[test]
    fn test_no_updates_when_unchanged() {
        let parsed = feed_rs::parser::parse(ATOM.as_bytes()).unwrap();
        let existing = stored("Renamed by hand", FeedType::Atom, 1704153600);
        let updates = FeedUpdates::from_feed_rs(&parsed, &existing);
        assert!(!updates.is_some());
    }
}
