use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::json;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const ATTENDANCE: &str = "attendance";

/// Document store backed by a single SQLite table. Every record is one row:
/// a store-assigned id, the collection it belongs to, and the record body as
/// a JSON object. Field filters are compiled to `json_extract` predicates.
pub struct DocStore {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub matched: bool,
    pub modified: bool,
    pub upserted_id: Option<String>,
}

pub fn open_store(data_dir: &Path) -> anyhow::Result<DocStore> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("schoold.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents(
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            body TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;

    Ok(DocStore {
        conn: Mutex::new(conn),
    })
}

impl DocStore {
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts one record into the named collection and returns its new id.
    /// No uniqueness or referential checks beyond the id itself.
    pub fn create(&self, collection: &str, body: &serde_json::Value) -> rusqlite::Result<String> {
        let conn = self.conn();
        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO documents(id, collection, body) VALUES(?, ?, ?)",
            (&id, collection, body.to_string()),
        )?;
        Ok(id)
    }

    /// Inserts a batch of records in one transaction. All-or-nothing: any
    /// failure rolls back the whole batch.
    pub fn create_many(
        &self,
        collection: &str,
        bodies: &[serde_json::Value],
    ) -> rusqlite::Result<Vec<String>> {
        let conn = self.conn();
        let tx = conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(bodies.len());
        {
            let mut ins = tx.prepare(
                "INSERT INTO documents(id, collection, body) VALUES(?, ?, ?)",
            )?;
            for body in bodies {
                let id = Uuid::new_v4().to_string();
                ins.execute((&id, collection, body.to_string()))?;
                ids.push(id);
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Returns every record in the collection matching all equality filters,
    /// in insertion order, each annotated with its `_id`. Field names come
    /// from a fixed set chosen by the caller, never from request input.
    pub fn list(
        &self,
        collection: &str,
        filter: &[(&str, String)],
    ) -> rusqlite::Result<Vec<serde_json::Value>> {
        let conn = self.conn();

        let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
        let mut binds: Vec<rusqlite::types::Value> =
            vec![rusqlite::types::Value::Text(collection.to_string())];
        for (field, value) in filter {
            sql.push_str(&format!(" AND json_extract(body, '$.{}') = ?", field));
            binds.push(rusqlite::types::Value::Text(value.clone()));
        }
        sql.push_str(" ORDER BY rowid");

        let mut stmt = conn.prepare(&sql)?;
        stmt.query_map(params_from_iter(binds), |row| {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            let mut doc: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            doc["_id"] = json!(id);
            Ok(doc)
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())
    }

    /// Update-or-insert keyed on exactly (student_id, date). The select and
    /// the write run in one transaction while the connection lock is held, so
    /// two concurrent calls for the same pair can never both insert.
    pub fn set_attendance(
        &self,
        student_id: &str,
        date: &str,
        status: &str,
    ) -> rusqlite::Result<UpsertOutcome> {
        let conn = self.conn();
        let tx = conn.unchecked_transaction()?;

        let existing: Option<(String, Option<String>)> = tx
            .query_row(
                "SELECT id, json_extract(body, '$.status') FROM documents
                 WHERE collection = ?
                   AND json_extract(body, '$.student_id') = ?
                   AND json_extract(body, '$.date') = ?",
                (ATTENDANCE, student_id, date),
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let outcome = match existing {
            Some((id, current)) => {
                let modified = current.as_deref() != Some(status);
                if modified {
                    tx.execute(
                        "UPDATE documents SET body = json_set(body, '$.status', ?) WHERE id = ?",
                        (status, &id),
                    )?;
                }
                UpsertOutcome {
                    matched: true,
                    modified,
                    upserted_id: None,
                }
            }
            None => {
                let id = Uuid::new_v4().to_string();
                let body = json!({
                    "student_id": student_id,
                    "date": date,
                    "status": status,
                });
                tx.execute(
                    "INSERT INTO documents(id, collection, body) VALUES(?, ?, ?)",
                    (&id, ATTENDANCE, body.to_string()),
                )?;
                UpsertOutcome {
                    matched: false,
                    modified: false,
                    upserted_id: Some(id),
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Distinct collection names, capped, for the health probe.
    pub fn collection_names(&self, limit: usize) -> rusqlite::Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT ?",
        )?;
        stmt.query_map([limit as i64], |row| row.get::<_, String>(0))
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())
    }
}
