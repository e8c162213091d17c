use crate::db::models::{IdentityRecord, NewIdentityRecord};
use crate::db::schema::SQLITE_INIT;
use crate::error::NexusError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Persists one identity record per successful extraction.
///
/// Cloning is cheap; all clones share the same connection pool.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, NexusError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database. The pool is pinned to a single connection
    /// that never expires, since each SQLite memory connection is its own database.
    pub async fn connect_in_memory() -> Result<Self, NexusError> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), NexusError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert one record and return its id. The row only becomes visible on commit;
    /// any failure drops the transaction, which rolls it back.
    pub async fn insert(&self, record: &NewIdentityRecord) -> Result<i64, NexusError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO identity_documents (
                document_number, full_name, date_of_birth, gender, address
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.document_number)
        .bind(&record.full_name)
        .bind(record.date_of_birth)
        .bind(&record.gender)
        .bind(&record.address)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        tx.commit().await?;
        debug!(record_id = id, "identity record inserted");
        Ok(id)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<IdentityRecord>, NexusError> {
        let rec = sqlx::query_as::<_, IdentityRecord>(
            r#"SELECT id, document_number, full_name, date_of_birth, gender, address
               FROM identity_documents WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    pub async fn count(&self) -> Result<i64, NexusError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM identity_documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(dob: Option<NaiveDate>) -> NewIdentityRecord {
        NewIdentityRecord {
            document_number: "123".to_string(),
            full_name: "A B".to_string(),
            date_of_birth: dob,
            gender: "M".to_string(),
            address: "X".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_round_trips_fields() {
        let store = RecordStore::connect_in_memory().await.unwrap();
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1);

        let first = store.insert(&sample(dob)).await.unwrap();
        let second = store.insert(&sample(None)).await.unwrap();
        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 2);

        let row = store.get_by_id(first).await.unwrap().unwrap();
        assert_eq!(row.date_of_birth, dob);
        assert_eq!(row.full_name, "A B");
        let row = store.get_by_id(second).await.unwrap().unwrap();
        assert_eq!(row.date_of_birth, None);

        assert!(store.get_by_id(second + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_document_numbers_are_kept() {
        let store = RecordStore::connect_in_memory().await.unwrap();
        store.insert(&sample(None)).await.unwrap();
        store.insert(&sample(None)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_insert_leaves_no_row() {
        let store = RecordStore::connect_in_memory().await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_inserts BEFORE INSERT ON identity_documents \
             BEGIN SELECT RAISE(ABORT, 'inserts disabled'); END",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let err = store.insert(&sample(None)).await.unwrap_err();
        assert!(matches!(err, NexusError::DatabaseError(_)));
        assert!(err.to_string().contains("inserts disabled"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let store = RecordStore::connect_in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
