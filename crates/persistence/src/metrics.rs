//! Query timing and pool gauges.
//!
//! Everything goes through the `metrics` facade; without an installed
//! recorder the calls are no-ops.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record how long a repository operation took.
pub fn record_query_duration(operation: &'static str, duration_secs: f64) {
    histogram!("phonebook_query_duration_seconds", "operation" => operation).record(duration_secs);
}

/// Record the connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("phonebook_pool_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("phonebook_pool_connections_idle").set(idle as f64);
    gauge!("phonebook_pool_connections_total").set(size as f64);
}

/// Times a repository operation from creation until it is dropped.
///
/// Early returns on `?` are timed like successful paths.
pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for QueryTimer {
    fn drop(&mut self) {
        record_query_duration(self.operation, self.start.elapsed().as_secs_f64());
    }
}
