use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use crate::db::connection::Database;

impl Database {
    pub async fn set_kv(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (k, v) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_kv(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row("SELECT v FROM kv WHERE k = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
        .await
    }
}
