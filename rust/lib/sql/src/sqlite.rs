use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use rusqlite::types::{ToSql, ValueRef};
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Statement, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// One connection is shared by all callers; each call holds it only for the
/// duration of its statements.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Text(s) => Box::new(s.as_str()),
            }
        })
        .collect()
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn ToSql> = bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn ToSql> = bound.iter().map(|b| b.as_ref()).collect();

        let affected = conn
            .execute(sql, param_refs.as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        Ok(affected as u64)
    }

    fn transaction(&self, statements: &[Statement]) -> Result<Vec<u64>, SQLError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        let mut counts = Vec::with_capacity(statements.len());
        for statement in statements {
            let bound = bind_params(&statement.params);
            let param_refs: Vec<&dyn ToSql> = bound.iter().map(|b| b.as_ref()).collect();

            // An early return drops `tx`, which rolls back.
            let affected = tx
                .execute(&statement.sql, param_refs.as_slice())
                .map_err(|e| SQLError::Execution(e.to_string()))?;
            counts.push(affected as u64);
        }

        tx.commit()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        Ok(counts)
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> Value {
    match row.get_ref(idx) {
        Ok(ValueRef::Integer(i)) => Value::Integer(i),
        Ok(ValueRef::Text(t)) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "CREATE TABLE items (\
        id INTEGER PRIMARY KEY AUTOINCREMENT, \
        name TEXT NOT NULL UNIQUE, \
        note TEXT)";

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.exec(SCHEMA, &[]).unwrap();
        store
    }

    fn count(store: &SqliteStore) -> i64 {
        store
            .query("SELECT COUNT(*) AS cnt FROM items", &[])
            .unwrap()[0]
            .get_i64("cnt")
            .unwrap()
    }

    #[test]
    fn exec_and_query() {
        let store = store();
        let affected = store
            .exec(
                "INSERT INTO items (name, note) VALUES (?1, ?2)",
                &[Value::Text("alpha".into()), Value::Null],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = store.query("SELECT id, name, note FROM items", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_i64("id"), Some(1));
        assert_eq!(rows[0].get_str("name"), Some("alpha"));
        assert_eq!(rows[0].get("note"), Some(&Value::Null));
    }

    #[test]
    fn insert_returning_id() {
        let store = store();
        let rows = store
            .query(
                "INSERT INTO items (name) VALUES (?1) RETURNING id",
                &[Value::Text("beta".into())],
            )
            .unwrap();
        assert_eq!(rows[0].get_i64("id"), Some(1));
    }

    #[test]
    fn affected_rows_zero_when_nothing_matches() {
        let store = store();
        let affected = store
            .exec("DELETE FROM items WHERE id = ?1", &[Value::Integer(99)])
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn transaction_commits_all() {
        let store = store();
        let counts = store
            .transaction(&[
                Statement::new("INSERT INTO items (name) VALUES (?1)", vec![Value::Text("a".into())]),
                Statement::new("INSERT INTO items (name) VALUES (?1)", vec![Value::Text("b".into())]),
                Statement::new("DELETE FROM items WHERE name = ?1", vec![Value::Text("a".into())]),
            ])
            .unwrap();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(count(&store), 1);
    }

    #[test]
    fn transaction_rolls_back_on_failure() {
        let store = store();
        store
            .exec("INSERT INTO items (name) VALUES ('keep')", &[])
            .unwrap();

        let result = store.transaction(&[
            Statement::new("DELETE FROM items", vec![]),
            Statement::new("INSERT INTO items (name) VALUES (?1)", vec![Value::Text("dup".into())]),
            Statement::new("INSERT INTO items (name) VALUES (?1)", vec![Value::Text("dup".into())]),
        ]);
        assert!(matches!(result, Err(SQLError::Execution(_))));

        let rows = store.query("SELECT name FROM items", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("name"), Some("keep"));
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.exec(SCHEMA, &[]).unwrap();
            store
                .exec("INSERT INTO items (name) VALUES ('persisted')", &[])
                .unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(count(&reopened), 1);
    }
}
