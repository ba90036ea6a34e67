use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use super::types::{FeedSummary, FeedUrlRequest};
use crate::{
    errors::{AppError, AppResult},
    fetcher::FeedFetcher,
    subscriptions, RqDbPool,
};

#[get("/feeds")]
pub async fn list_feeds(pool: RqDbPool) -> AppResult<HttpResponse> {
    let mut conn = pool.get().map_err(|_| AppError::ConnectionPoolError)?;

    let feeds: Vec<FeedSummary> = subscriptions::list(&mut conn)?
        .into_iter()
        .map(FeedSummary::from)
        .collect();

    Ok(HttpResponse::Ok().json(feeds))
}

#[post("/add-feed")]
pub async fn add_feed(
    pool: RqDbPool,
    fetcher: web::Data<FeedFetcher>,
    req: web::Json<FeedUrlRequest>,
) -> AppResult<HttpResponse> {
    let feed = subscriptions::subscribe(&pool, &fetcher, &req.url).await?;
    Ok(HttpResponse::Ok().json(FeedSummary::from(feed)))
}

#[post("/delete-feed")]
pub async fn delete_feed(pool: RqDbPool, req: web::Json<FeedUrlRequest>) -> AppResult<HttpResponse> {
    let mut conn = pool.get().map_err(|_| AppError::ConnectionPoolError)?;

    let feed = subscriptions::unsubscribe(&mut conn, &req.url)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Unsubscribed from {}", feed.url)
    })))
}
