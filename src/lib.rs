pub mod api;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod observability;
pub mod reader;
pub mod schema;
pub mod security;
pub mod subscriptions;
pub mod tasks;
#[cfg(test)]
pub mod test_helpers;
pub mod web_ui;

use actix_web::web;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type RqDbPool = web::Data<DbPool>;

pub fn initialize_db_pool(db_path: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    r2d2::Pool::builder().build(manager)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), String> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| {
            for migration in applied {
                log::info!("Applied migration {}", migration);
            }
        })
        .map_err(|e| e.to_string())
}
