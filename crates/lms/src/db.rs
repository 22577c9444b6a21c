//! SQLite connection pools.
//!
//! Pools are created lazily: nothing connects until the first statement runs, which
//! at start-up is the schema check.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Build a lazily connected pool for `url`.
///
/// An in-memory database lives only as long as a connection to it, so in-memory
/// pools hold a single connection that is never retired.
pub fn connect_lazy(
    url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);
    let pool_options = if is_in_memory(url) {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections)
    };

    debug!(url, max_connections, "sqlite pool configured");
    Ok(pool_options.connect_lazy_with(options))
}
