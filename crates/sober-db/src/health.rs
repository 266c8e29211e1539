use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::{Database, DbError};

impl Database {
    /// Round-trips `SELECT 1` on the blocking pool. Gives up after `timeout`
    /// so a wedged store is reported instead of hanging the caller.
    pub async fn health_check(self: Arc<Self>, timeout: Duration) -> Result<(), DbError> {
        let ping = tokio::task::spawn_blocking(move || {
            self.with_conn(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
        });

        match tokio::time::timeout(timeout, ping).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(DbError::Task(e.to_string())),
            Err(_) => {
                warn!("Database ping exceeded {:?}", timeout);
                Err(DbError::Timeout)
            }
        }
    }
}
