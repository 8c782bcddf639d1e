use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::db::store::{Collection, Document};
use crate::errors::ServerError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Thread-local connection slots, keyed by database path.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

/// Handle to the listing store. Cheap to clone; every worker thread lazily
/// opens its own connection on first use, so requests on different threads
/// never wait on each other in-process.
#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    /// Open the store at `path`, verify it is reachable and apply the schema.
    pub fn open(path: impl Into<String>) -> Result<Self, ServerError> {
        let db = Self { path: path.into() };

        db.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ServerError::Store(format!("Failed to apply schema: {e}")))
        })?;

        info!(path = %db.path, "database ready");
        Ok(db)
    }

    /// Typed access to one document collection.
    pub fn collection<T: Document>(&self) -> Collection<'_, T> {
        Collection::new(self)
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut slots = cell.borrow_mut();
                if !slots.contains_key(&self.path) {
                    let conn = open_connection(&self.path)?;
                    slots.insert(self.path.clone(), conn);
                }
                let conn = slots.get_mut(&self.path).ok_or(ServerError::Internal)?;
                f(conn)
            })
            .map_err(|_| ServerError::Internal)?
    }

    /// Flush the write-ahead log and drop this thread's connection.
    /// Connections owned by worker threads close when those threads exit.
    pub fn close(self) -> Result<(), ServerError> {
        self.with_conn(|conn| {
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
                .map_err(|e| ServerError::Store(format!("WAL checkpoint failed: {e}")))
        })?;

        DB_CONNS
            .try_with(|cell| cell.borrow_mut().remove(&self.path))
            .map_err(|_| ServerError::Internal)?;

        info!(path = %self.path, "database closed");
        Ok(())
    }
}

fn open_connection(path: &str) -> Result<Connection, ServerError> {
    let conn =
        Connection::open(path).map_err(|e| ServerError::Store(format!("Open DB failed: {e}")))?;

    conn.busy_timeout(BUSY_TIMEOUT)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

    register_functions(&conn)?;

    debug!(path, journal_mode = %mode, "opened sqlite connection");
    Ok(conn)
}

/// `ulower(text)`: Unicode lower-casing, matching `str::to_lowercase`.
/// The builtin `lower()` folds ASCII only.
fn register_functions(conn: &Connection) -> Result<(), ServerError> {
    conn.create_scalar_function(
        "ulower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}
