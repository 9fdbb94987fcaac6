use log::info;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::ServerError;

// Thread-local connection slots, one per database file.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
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
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;
                    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
                        .map_err(|e| ServerError::DbError(format!("Pragmas failed: {e}")))?;
                    slots.insert(self.path.clone(), conn);
                }
                let conn = slots
                    .get_mut(&self.path)
                    .ok_or(ServerError::InternalError)?;
                f(conn)
            })
            .map_err(|_| ServerError::InternalError)?
    }
}

/// Apply a schema (a batch of idempotent statements) to the database.
pub fn init_db(db: &Database, schema_sql: &str) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute_batch(schema_sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!("database ready at {}", db.path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> String {
        std::env::temp_dir()
            .join(format!("conn_test_{tag}_{}.sqlite", crate::backend::unique_id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn two_databases_on_one_thread_stay_separate() {
        let a = Database::new(temp_path("a"));
        let b = Database::new(temp_path("b"));
        init_db(&a, "create table only_in_a (id integer primary key);").unwrap();
        init_db(&b, "create table only_in_b (id integer primary key);").unwrap();

        let count = |db: &Database, table: &str| {
            db.with_conn(|conn| {
                conn.query_row(
                    "select count(*) from sqlite_master where type = 'table' and name = ?",
                    [table],
                    |r| r.get::<_, i64>(0),
                )
                .map_err(|e| ServerError::DbError(e.to_string()))
            })
            .unwrap()
        };

        assert_eq!(count(&a, "only_in_a"), 1);
        assert_eq!(count(&a, "only_in_b"), 0);
        assert_eq!(count(&b, "only_in_b"), 1);
    }
}
