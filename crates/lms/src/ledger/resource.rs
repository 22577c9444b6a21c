use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

use super::status::LifecycleStatus;

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Table-level description of one ledger collection.
///
/// A resource names its table, its columns and constraints, the wire types it reads
/// and writes, and its status enum. [`Store`](super::store::Store) and the HTTP router
/// are written once against this trait.
pub trait Resource: Send + Sync + 'static {
    /// Stored row, as returned by list/get.
    type Row: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static;
    /// Request body for create and full update; carries no identifier.
    type Input: DeserializeOwned + Send + Sync + 'static;
    type Status: LifecycleStatus;

    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Mutable columns in the order [`Resource::bind`] binds them. The status column is last.
    const COLUMNS: &'static [&'static str];
    /// DDL for the mutable columns other than the status column.
    const COLUMN_DEFINITIONS: &'static [&'static str];
    const STATUS_COLUMN: &'static str;
    const UNIQUE_COLUMNS: &'static [&'static str] = &[];

    /// Human-readable name used in success messages, e.g. `Loan applicant`.
    const LABEL: &'static str;
    /// Lower-case name used in error messages.
    const NOUN: &'static str;
    /// Key under which the assigned identifier is returned after creation.
    const CREATED_ID_FIELD: &'static str;

    fn status(input: &Self::Input) -> &str;

    fn unique_value<'a>(_input: &'a Self::Input, _column: &str) -> Option<&'a str> {
        None
    }

    fn bind<'q>(input: &'q Self::Input, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    fn status_constraint() -> String {
        format!("{}_status_check", Self::TABLE)
    }

    fn schema() -> String {
        let mut columns = vec![format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            Self::ID_COLUMN
        )];
        columns.extend(Self::COLUMN_DEFINITIONS.iter().map(|column| column.to_string()));
        columns.push(format!(
            "{} TEXT NOT NULL CONSTRAINT {} CHECK ({})",
            Self::STATUS_COLUMN,
            Self::status_constraint(),
            Self::Status::check_predicate(Self::STATUS_COLUMN),
        ));
        columns.push("created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string());
        columns.push("updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP".to_string());

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            Self::TABLE,
            columns.join(",\n    ")
        )
    }
}
