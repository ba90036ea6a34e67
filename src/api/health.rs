use crate::{schema::feed_items, schema::feeds, RqDbPool};
use actix_web::{get, web, HttpResponse, Responder};
use diesel::prelude::*;
use serde_json::json;

#[derive(Debug, PartialEq)]
struct StoreCounts {
    feeds: i64,
    unread: i64,
    votes: i64,
}

fn store_counts(conn: &mut SqliteConnection) -> QueryResult<StoreCounts> {
    Ok(StoreCounts {
        feeds: feeds::table.count().get_result(conn)?,
        unread: feed_items::table
            .filter(feed_items::shown_at.eq(0))
            .count()
            .get_result(conn)?,
        votes: feed_items::table
            .filter(feed_items::liked.is_not_null())
            .count()
            .get_result(conn)?,
    })
}

/// Health check - the database answers queries, with a summary of what it holds
#[get("")]
pub async fn health_check(pool: RqDbPool) -> impl Responder {
    let counts = pool
        .get()
        .map_err(|e| e.to_string())
        .and_then(|mut conn| store_counts(&mut conn).map_err(|e| e.to_string()));

    match counts {
        Ok(counts) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "database": "connected",
            "feeds": counts.feeds,
            "unread_items": counts.unread,
            "votes": counts.votes,
        })),
        Err(e) => {
            log::warn!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Liveness check - the process is up
#[get("/live")]
pub async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn routes() -> actix_web::Scope {
    web::scope("/health")
        .service(health_check)
        .service(liveness_check)
}
