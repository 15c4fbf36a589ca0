use crate::model::{MatchResult, StorageError};
use crate::storage::ResultSink;
use crate::utils::RecordKey;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens the database and creates the assignment table if needed.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS brand_assignments (
                record_key TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                country TEXT NOT NULL,
                source_id TEXT NOT NULL,
                matched_brands TEXT NOT NULL,
                canonical_brand TEXT,
                assigned_at TEXT NOT NULL
            );
            ",
        )?;

        // Tables created before the source columns existed
        for column in ["source", "country", "source_id"] {
            Self::migrate_add_column_if_missing(
                &conn,
                "brand_assignments",
                column,
                "TEXT NOT NULL DEFAULT ''",
            )?;
        }
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_brand_assignments_source
                ON brand_assignments (source, country)",
            [],
        )?;

        Ok(Self { conn })
    }

    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    pub fn get_result(&self, record_key: &str) -> Result<Option<MatchResult>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT matched_brands, canonical_brand FROM brand_assignments WHERE record_key = ?1",
                params![record_key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        match row {
            Some((brands, canonical_brand)) => Ok(Some(MatchResult {
                matched_brands: serde_json::from_str(&brands)?,
                canonical_brand,
            })),
            None => Ok(None),
        }
    }

    pub fn is_mapped(&self, record_key: &str) -> Result<bool, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM brand_assignments WHERE record_key = ?1")?;
        let mut rows = stmt.query(params![record_key])?;
        Ok(rows.next()?.is_some())
    }

    /// Ids of the products of one source and country that already have a stored result.
    pub fn mapped_source_ids(
        &self,
        source: &str,
        country: &str,
    ) -> Result<HashSet<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT source_id FROM brand_assignments WHERE source = ?1 AND country = ?2",
        )?;
        let rows = stmt.query_map(params![source, country], |row| row.get::<_, String>(0))?;

        let mut ids = HashSet::new();
        for id in rows {
            ids.insert(id?);
        }
        Ok(ids)
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM brand_assignments", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl ResultSink for SqliteSink {
    fn save_result(&self, key: &RecordKey<'_>, result: &MatchResult) -> Result<(), StorageError> {
        let brands = serde_json::to_string(&result.matched_brands)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO brand_assignments (
                record_key, source, country, source_id,
                matched_brands, canonical_brand, assigned_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &key.key(),
                key.source,
                key.country,
                key.source_id,
                &brands,
                &result.canonical_brand,
                &Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(brands: &[&str], canonical: Option<&str>) -> MatchResult {
        MatchResult {
            matched_brands: brands.iter().map(|b| b.to_string()).collect(),
            canonical_brand: canonical.map(str::to_string),
        }
    }

    fn key(id: &str) -> RecordKey<'_> {
        RecordKey::new("APO", "lt", id)
    }

    #[test]
    fn saves_and_reads_back() {
        let sink = SqliteSink::open_in_memory().unwrap();
        let stored = result(&["isdin", "isdin deo"], Some("isdin"));
        sink.save_result(&key("1"), &stored).unwrap();

        assert_eq!(sink.get_result("APO_lt_1").unwrap(), Some(stored));
        assert!(sink.is_mapped("APO_lt_1").unwrap());
        assert!(!sink.is_mapped("APO_lt_2").unwrap());
        assert_eq!(sink.get_result("APO_lt_2").unwrap(), None);
    }

    #[test]
    fn unmatched_result_keeps_null_canonical() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.save_result(&key("k"), &result(&[], None)).unwrap();
        assert_eq!(sink.get_result("APO_lt_k").unwrap(), Some(result(&[], None)));
    }

    #[test]
    fn save_is_an_upsert() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.save_result(&key("k"), &result(&["a"], Some("a"))).unwrap();
        sink.save_result(&key("k"), &result(&["b"], Some("b"))).unwrap();
        assert_eq!(sink.count().unwrap(), 1);
        assert_eq!(
            sink.get_result("APO_lt_k").unwrap(),
            Some(result(&["b"], Some("b")))
        );
    }

    #[test]
    fn source_columns_are_stored() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.save_result(&RecordKey::new("BENU", "lv", "77"), &result(&[], None))
            .unwrap();

        let row: (String, String, String) = sink
            .conn
            .query_row(
                "SELECT source, country, source_id FROM brand_assignments WHERE record_key = 'BENU_lv_77'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(row, ("BENU".into(), "lv".into(), "77".into()));
    }

    #[test]
    fn old_table_gains_source_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE brand_assignments (
                record_key TEXT PRIMARY KEY,
                matched_brands TEXT NOT NULL,
                canonical_brand TEXT,
                assigned_at TEXT NOT NULL
            );",
        )
        .unwrap();

        let sink = SqliteSink::init(conn).unwrap();
        sink.save_result(&key("9"), &result(&["nivea"], Some("beiersdorf")))
            .unwrap();
        assert!(sink.mapped_source_ids("APO", "lt").unwrap().contains("9"));
    }

    #[test]
    fn mapped_ids_are_scoped_to_source_and_country() {
        let sink = SqliteSink::open_in_memory().unwrap();
        for (source, country, id) in [
            ("APO", "lt", "1"),
            ("APO", "lt", "2"),
            ("APO", "lv", "3"),
            ("BENU", "lt", "4"),
            ("APO_lt", "x", "5"),
        ] {
            sink.save_result(&RecordKey::new(source, country, id), &result(&[], None))
                .unwrap();
        }
        let ids = sink.mapped_source_ids("APO", "lt").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("1"));
        assert!(ids.contains("2"));
    }
}
