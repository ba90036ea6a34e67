pub mod feed;
pub mod feed_item;
