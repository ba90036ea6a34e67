use serde::{Deserialize, Serialize};

use crate::models::feed::Feed;

#[derive(Debug, Deserialize)]
pub struct FeedUrlRequest {
    pub url: String,
}

/// What the page needs to list a subscription.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedSummary {
    pub url: String,
    pub title: String,
}

impl From<Feed> for FeedSummary {
    fn from(feed: Feed) -> Self {
        FeedSummary {
            url: feed.url,
            title: feed.title,
        }
    }
}
