use super::handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::list_feeds)
        .service(handlers::add_feed)
        .service(handlers::delete_feed);
}
