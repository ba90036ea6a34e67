use std::time::Duration;

/// How often subscribed feeds are re-fetched unless configured otherwise.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(15 * 60);
