//! Quote queries. All statements are parameterized; quote ids come from
//! clients and are never interpolated into SQL.

use rusqlite::{params, OptionalExtension};

use super::Db;
use crate::error::AppError;
use crate::models::Quote;

/// All quotes, in storage order.
pub async fn list_quotes(db: &Db) -> Result<Vec<Quote>, AppError> {
    db.call(|conn| {
        let mut stmt = conn.prepare("SELECT id, text FROM quote")?;
        let rows = stmt.query_map([], |row| {
            Ok(Quote {
                id: row.get(0)?,
                text: row.get(1)?,
            })
        })?;
        rows.collect()
    })
    .await
}

/// Text of the quote with the given id, if any.
pub async fn find_quote(db: &Db, id: &str) -> Result<Option<String>, AppError> {
    let id = id.to_string();
    db.call(move |conn| {
        conn.query_row(
            "SELECT text FROM quote WHERE id = ?1 LIMIT 1",
            params![id],
            |row| row.get(0),
        )
        .optional()
    })
    .await
}

/// Insert a quote. Fails on duplicate id.
pub async fn insert_quote(db: &Db, quote: Quote) -> Result<(), AppError> {
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO quote (id, text) VALUES (?1, ?2)",
            params![quote.id, quote.text],
        )?;
        Ok(())
    })
    .await
}
