//! Start-up seeding from static JSON arrays.
//!
//! Records are inserted one at a time in file order through the owning store. The
//! first failure stops everything: rows already inserted stay, nothing after the
//! failing record is attempted. Seeding a populated applicant table therefore
//! fails on the first repeated email.

use std::path::{Path, PathBuf};

use tracing::info;

use super::resource::Resource;
use super::store::{Store, StoreError};
use super::Ledger;

pub const APPLICANTS_FILE: &str = "applicants.json";
pub const SUBMISSIONS_FILE: &str = "submissions.json";
pub const PAYMENTS_FILE: &str = "payments.json";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed data in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seeding {table} stopped at record {position}: {source}")]
    Insert {
        table: &'static str,
        position: usize,
        #[source]
        source: StoreError,
    },
}

impl SeedError {
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SeedError::Insert { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Number of rows inserted per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub applicants: usize,
    pub submissions: usize,
    pub payments: usize,
}

/// Decode a JSON array of `R::Input` from `path`.
pub fn read_seed_file<R: Resource>(path: &Path) -> Result<Vec<R::Input>, SeedError> {
    let bytes = std::fs::read(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert `records` in order, stopping at the first failure.
pub async fn seed_records<R: Resource>(
    store: &Store<R>,
    records: &[R::Input],
) -> Result<Vec<i64>, SeedError> {
    let mut inserted = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let id = store
            .create(record)
            .await
            .map_err(|source| SeedError::Insert {
                table: R::TABLE,
                position: index + 1,
                source,
            })?;
        info!(table = R::TABLE, id, "seeded row");
        inserted.push(id);
    }
    Ok(inserted)
}

pub async fn seed_from_file<R: Resource>(
    store: &Store<R>,
    path: &Path,
) -> Result<Vec<i64>, SeedError> {
    let records = read_seed_file::<R>(path)?;
    seed_records(store, &records).await
}

/// Seed applicants, then submissions, then payments from `directory`.
pub async fn seed_ledger(ledger: &Ledger, directory: &Path) -> Result<SeedSummary, SeedError> {
    let applicants = seed_from_file(&ledger.applicants, &directory.join(APPLICANTS_FILE)).await?;
    let submissions =
        seed_from_file(&ledger.submissions, &directory.join(SUBMISSIONS_FILE)).await?;
    let payments = seed_from_file(&ledger.payments, &directory.join(PAYMENTS_FILE)).await?;

    let summary = SeedSummary {
        applicants: applicants.len(),
        submissions: submissions.len(),
        payments: payments.len(),
    };
    info!(
        applicants = summary.applicants,
        submissions = summary.submissions,
        payments = summary.payments,
        directory = %directory.display(),
        "seeding complete"
    );
    Ok(summary)
}
