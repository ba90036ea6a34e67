use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::TempDir;

use crate::{
    models::{
        feed::{Feed, NewFeed},
        feed_item::{FeedItem, NewFeedItem},
    },
    DbPool, MIGRATIONS,
};

/// Create a test database with a temporary file
pub fn create_test_db() -> (TempDir, DbPool) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create pool");

    // Run migrations
    let mut conn = pool.get().expect("Failed to get connection");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    (temp_dir, pool)
}

/// Create an in-memory test database connection
pub fn get_test_db_connection() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:")
        .unwrap_or_else(|_| panic!("Error connecting to in-memory SQLite database"));

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    conn
}

pub fn insert_test_feed(conn: &mut SqliteConnection, url: &str) -> Feed {
    NewFeed {
        url,
        title: format!("Feed at {url}"),
        ..Default::default()
    }
    .insert(conn)
    .expect("Failed to insert feed")
}

/// Insert an item with the given title and publication date.
pub fn insert_test_item(
    conn: &mut SqliteConnection,
    feed_id: i32,
    title: &str,
    pub_date: i32,
) -> FeedItem {
    NewFeedItem {
        feed_id,
        guid: format!("{feed_id}:{title}"),
        title: title.to_string(),
        link: format!("http://example.com/{}", title.replace(' ', "-")),
        pub_date,
        ..Default::default()
    }
    .insert(conn)
    .expect("Failed to insert feed item")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::feeds;

    #[derive(QueryableByName)]
    struct TestResult {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        test: i32,
    }

    #[test]
    fn test_create_test_db() {
        let (_temp_dir, pool) = create_test_db();
        let mut conn = pool.get().expect("Failed to get connection");

        let result: i32 = diesel::sql_query("SELECT 1 as test")
            .get_result::<TestResult>(&mut conn)
            .map(|r| r.test)
            .expect("Failed to query test database");

        assert_eq!(result, 1);
    }

    #[test]
    fn test_migrations_create_empty_tables() {
        let mut conn = get_test_db_connection();
        let feed_count: i64 = feeds::table.count().first(&mut conn).expect("Failed to count feeds");
        assert_eq!(feed_count, 0);
    }
}
