use actix_web::{get, post, web, HttpResponse};

use super::types::NextRequest;
use crate::{
    errors::{AppError, AppResult},
    models::feed_item::FeedItem,
    reader::Reader,
    web_ui, RqDbPool,
};

fn item_response(item: Option<FeedItem>) -> AppResult<HttpResponse> {
    let body = match item {
        Some(item) => web_ui::render_item(&item)?,
        None => web_ui::render_no_items()?,
    };
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Vote on the item on screen (if `liked` is set) and get the next one.
///
/// A missing or unreadable body counts as no vote.
#[post("/next")]
pub async fn next_item(
    pool: RqDbPool,
    reader: web::Data<Reader>,
    req: Option<web::Json<NextRequest>>,
) -> AppResult<HttpResponse> {
    let vote = req.and_then(|r| r.liked);
    let mut conn = pool.get().map_err(|_| AppError::ConnectionPoolError)?;

    item_response(reader.next(&mut conn, vote)?)
}

#[get("/next")]
pub async fn current_item(pool: RqDbPool, reader: web::Data<Reader>) -> AppResult<HttpResponse> {
    let mut conn = pool.get().map_err(|_| AppError::ConnectionPoolError)?;

    item_response(reader.current(&mut conn)?)
}
