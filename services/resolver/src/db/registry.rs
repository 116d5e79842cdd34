//! Postgres implementation of the [`Registry`] trait.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::registry::{ArkMutation, ArkRecord, Naan, Registry, RegistryError};

/// Registry backed by the Postgres connection pool.
#[derive(Clone)]
pub struct PgRegistry {
    pool: PgPool,
}

impl PgRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

fn map_insert_error(ark: &str, e: sqlx::Error) -> RegistryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RegistryError::Conflict(ark.to_string());
        }
    }
    RegistryError::Backend(e.into())
}

#[async_trait]
impl Registry for PgRegistry {
    async fn create_ark(&self, record: &ArkRecord) -> Result<(), RegistryError> {
        record.verify_consistent()?;

        sqlx::query(
            r#"
            INSERT INTO arks (ark, naan, shoulder, assigned_name, url, metadata, commitment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.ark)
        .bind(record.naan)
        .bind(&record.shoulder)
        .bind(&record.assigned_name)
        .bind(&record.url)
        .bind(&record.metadata)
        .bind(&record.commitment)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(&record.ark, e))?;

        Ok(())
    }

    async fn get_ark(&self, ark: &str) -> Result<Option<ArkRecord>, RegistryError> {
        sqlx::query_as::<_, ArkRow>(
            r#"
            SELECT ark, naan, shoulder, assigned_name, url, metadata, commitment
            FROM arks
            WHERE ark = $1
            "#,
        )
        .bind(ark)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(ArkRecord::from))
        .map_err(|e| RegistryError::Backend(e.into()))
    }

    async fn update_ark(&self, ark: &str, changes: &ArkMutation) -> Result<bool, RegistryError> {
        let result = sqlx::query(
            r#"
            UPDATE arks
            SET url = $2, metadata = $3, commitment = $4
            WHERE ark = $1
            "#,
        )
        .bind(ark)
        .bind(&changes.url)
        .bind(&changes.metadata)
        .bind(&changes.commitment)
        .execute(&self.pool)
        .await
        .map_err(|e| RegistryError::Backend(e.into()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_naan(&self, naan: i64) -> Result<Option<Naan>, RegistryError> {
        sqlx::query_as::<_, NaanRow>(
            r#"
            SELECT naan, name, description, url
            FROM naans
            WHERE naan = $1
            "#,
        )
        .bind(naan)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Naan::from))
        .map_err(|e| RegistryError::Backend(e.into()))
    }

    async fn naan_for_key(&self, key: Uuid) -> Result<Option<i64>, RegistryError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT naan
            FROM keys
            WHERE key = $1 AND active
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistryError::Backend(e.into()))?;

        Ok(row.map(|(naan,)| naan))
    }

    async fn health_check(&self) -> Result<(), RegistryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RegistryError::Backend(e.into()))?;
        Ok(())
    }
}

// Database row types

#[derive(Debug)]
struct ArkRow {
    ark: String,
    naan: i64,
    shoulder: String,
    assigned_name: String,
    url: String,
    metadata: String,
    commitment: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ArkRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            ark: row.try_get("ark")?,
            naan: row.try_get("naan")?,
            shoulder: row.try_get("shoulder")?,
            assigned_name: row.try_get("assigned_name")?,
            url: row.try_get("url")?,
            metadata: row.try_get("metadata")?,
            commitment: row.try_get("commitment")?,
        })
    }
}

impl From<ArkRow> for ArkRecord {
    fn from(row: ArkRow) -> Self {
        Self {
            ark: row.ark,
            naan: row.naan,
            shoulder: row.shoulder,
            assigned_name: row.assigned_name,
            url: row.url,
            metadata: row.metadata,
            commitment: row.commitment,
        }
    }
}

#[derive(Debug)]
struct NaanRow {
    naan: i64,
    name: String,
    description: String,
    url: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for NaanRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            naan: row.try_get("naan")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            url: row.try_get("url")?,
        })
    }
}

impl From<NaanRow> for Naan {
    fn from(row: NaanRow) -> Self {
        Self {
            naan: row.naan,
            name: row.name,
            description: row.description,
            url: row.url,
        }
    }
}
