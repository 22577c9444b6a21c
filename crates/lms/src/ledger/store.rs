use std::marker::PhantomData;
use std::sync::Arc;

use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::resource::Resource;
use super::status::LifecycleStatus;

/// Failures surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid {noun} ID '{raw}'")]
    InvalidId { noun: &'static str, raw: String },
    #[error("invalid {noun} status '{value}': allowed values are {allowed}")]
    InvalidStatus {
        noun: &'static str,
        value: String,
        allowed: String,
    },
    #[error("{column} '{value}' already exists")]
    DuplicateKey { column: &'static str, value: String },
    #[error("{noun} with ID {id} not found")]
    NotFound { noun: &'static str, id: i64 },
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

struct Statements {
    schema: String,
    select_all: String,
    select_one: String,
    insert: String,
    update: String,
    delete: String,
}

impl Statements {
    fn for_resource<R: Resource>() -> Self {
        let columns = R::COLUMNS.join(", ");
        let select = format!(
            "SELECT {}, {}, created_at, updated_at FROM {}",
            R::ID_COLUMN,
            columns,
            R::TABLE
        );
        let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");
        let assignments = R::COLUMNS
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            schema: R::schema(),
            select_one: format!("{select} WHERE {} = ?", R::ID_COLUMN),
            select_all: select,
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                R::TABLE,
                columns,
                placeholders
            ),
            update: format!(
                "UPDATE {} SET {}, updated_at = CURRENT_TIMESTAMP WHERE {} = ?",
                R::TABLE,
                assignments,
                R::ID_COLUMN
            ),
            delete: format!("DELETE FROM {} WHERE {} = ?", R::TABLE, R::ID_COLUMN),
        }
    }
}

/// CRUD over one resource table through a shared connection pool.
///
/// Each statement runs on its own; there are no transactions and no version
/// checks, so concurrent writers to the same row race and the last one wins.
pub struct Store<R> {
    pool: SqlitePool,
    statements: Arc<Statements>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            statements: self.statements.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Store<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            statements: Arc::new(Statements::for_resource::<R>()),
            _resource: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table(&self) -> &'static str {
        R::TABLE
    }

    /// Parse an identifier from its path form.
    pub fn parse_id(raw: &str) -> Result<i64, StoreError> {
        raw.trim().parse::<i64>().map_err(|_| StoreError::InvalidId {
            noun: R::NOUN,
            raw: raw.to_string(),
        })
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&self.statements.schema)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Unavailable)?;
        info!(table = R::TABLE, "table ready");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<R::Row>, StoreError> {
        sqlx::query_as::<_, R::Row>(&self.statements.select_all)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::Unavailable)
    }

    pub async fn get(&self, id: i64) -> Result<R::Row, StoreError> {
        sqlx::query_as::<_, R::Row>(&self.statements.select_one)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Unavailable)?
            .ok_or(StoreError::NotFound { noun: R::NOUN, id })
    }

    /// Insert a row and return the identifier storage assigned to it.
    pub async fn create(&self, input: &R::Input) -> Result<i64, StoreError> {
        let status = validate_status::<R>(input)?;
        let result = R::bind(input, sqlx::query(&self.statements.insert))
            .execute(&self.pool)
            .await
            .map_err(|err| classify_write_error::<R>(err, input))?;

        let id = result.last_insert_rowid();
        debug!(table = R::TABLE, id, status = status.label(), "row inserted");
        Ok(id)
    }

    /// Replace every mutable column of row `id`. The identifier and creation time
    /// never change; `updated_at` is refreshed.
    pub async fn update(&self, id: i64, input: &R::Input) -> Result<(), StoreError> {
        let status = validate_status::<R>(input)?;
        let result = R::bind(input, sqlx::query(&self.statements.update))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| classify_write_error::<R>(err, input))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { noun: R::NOUN, id });
        }

        debug!(table = R::TABLE, id, status = status.label(), "row updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(&self.statements.delete)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { noun: R::NOUN, id });
        }

        debug!(table = R::TABLE, id, "row deleted");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn validate_status<R: Resource>(input: &R::Input) -> Result<R::Status, StoreError> {
    let raw = R::status(input);
    R::Status::parse(raw).ok_or_else(|| StoreError::InvalidStatus {
        noun: R::NOUN,
        value: raw.to_string(),
        allowed: R::Status::allowed_labels(),
    })
}

/// Map a failed insert/update onto the store taxonomy.
///
/// The table's CHECK and UNIQUE constraints stay authoritative: a status the
/// database refuses is reported as `InvalidStatus` even if it passed validation.
pub(crate) fn classify_write_error<R: Resource>(err: sqlx::Error, input: &R::Input) -> StoreError {
    let sqlx::Error::Database(db_error) = &err else {
        return StoreError::Unavailable(err);
    };
    let message = db_error.message().to_string();

    match db_error.kind() {
        ErrorKind::UniqueViolation => {
            let column = R::UNIQUE_COLUMNS
                .iter()
                .copied()
                .find(|column| message.contains(&format!("{}.{}", R::TABLE, column)))
                .unwrap_or(R::ID_COLUMN);
            StoreError::DuplicateKey {
                column,
                value: R::unique_value(input, column)
                    .unwrap_or_default()
                    .to_string(),
            }
        }
        ErrorKind::CheckViolation => {
            let raw = R::status(input);
            if message.contains(&R::status_constraint()) || R::Status::parse(raw).is_none() {
                StoreError::InvalidStatus {
                    noun: R::NOUN,
                    value: raw.to_string(),
                    allowed: R::Status::allowed_labels(),
                }
            } else {
                StoreError::ConstraintViolation(message)
            }
        }
        _ => StoreError::Unavailable(err),
    }
}
