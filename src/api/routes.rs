use super::{feeds, health, reader};
use actix_web::web;

/// Register every API endpoint on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::routes())
        .configure(reader::routes::configure)
        .configure(feeds::routes::configure);
}
