use actix_web::{get, web, HttpResponse};
use askama::Template;

use crate::{errors::AppResult, models::feed_item::FeedItem};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    version: &'static str,
}

#[derive(Template)]
#[template(path = "feed_item.html")]
struct FeedItemTemplate<'a> {
    title: &'a str,
    link: &'a str,
    published: Option<String>,
    authors: &'a str,
    categories: &'a str,
    summary: Option<&'a str>,
    content: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "no_items.html")]
struct NoItemsTemplate {}

/// HTML fragment for one item, inserted into the page as-is.
pub fn render_item(item: &FeedItem) -> AppResult<String> {
    let published = match item.pub_date {
        0 => None,
        ts => chrono::DateTime::from_timestamp(ts as i64, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string()),
    };
    let template = FeedItemTemplate {
        title: &item.title,
        link: &item.link,
        published,
        authors: &item.authors,
        categories: &item.categories,
        summary: item.summary.as_deref(),
        content: item.content.as_deref(),
    };
    Ok(template.render()?)
}

pub fn render_no_items() -> AppResult<String> {
    Ok(NoItemsTemplate {}.render()?)
}

/// Serve the reader page
#[get("/")]
pub async fn index() -> AppResult<HttpResponse> {
    let template = IndexTemplate {
        version: env!("CARGO_PKG_VERSION"),
    };
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(template.render()?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
}
