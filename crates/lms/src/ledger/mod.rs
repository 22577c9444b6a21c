//! Applicants, loan submissions and loan payments.
//!
//! Each collection is a [`Resource`] served by the generic [`Store`]. The three
//! tables reference each other only through plain integer identifiers: a
//! submission names an applicant and a payment names a submission, but nothing
//! checks those rows exist and deletes never cascade.

pub mod applicants;
pub mod payments;
pub mod resource;
pub mod router;
pub mod seed;
pub mod status;
pub mod store;
pub mod submissions;

#[cfg(test)]
mod tests;

pub use applicants::{Applicant, ApplicantInput, Applicants};
pub use payments::{Payment, PaymentInput, Payments};
pub use resource::Resource;
pub use router::{ledger_router, resource_router, ErrorExposure};
pub use seed::{seed_ledger, seed_records, SeedError, SeedSummary};
pub use status::{ApplicantStatus, LifecycleStatus, LoanStatus, PaymentStatus};
pub use store::{Store, StoreError};
pub use submissions::{Submission, SubmissionInput, Submissions};

use crate::config::DatabaseConfig;
use crate::db;

/// The three stores, each holding its own pool for the life of the process.
#[derive(Clone)]
pub struct Ledger {
    pub applicants: Store<Applicants>,
    pub submissions: Store<Submissions>,
    pub payments: Store<Payments>,
}

impl Ledger {
    /// Create one lazily connected pool per store.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = |url: &str| {
            db::connect_lazy(url, config.max_connections, config.acquire_timeout)
                .map_err(StoreError::Unavailable)
        };

        Ok(Self {
            applicants: Store::new(pool(config.applicants_url())?),
            submissions: Store::new(pool(config.submissions_url())?),
            payments: Store::new(pool(config.payments_url())?),
        })
    }

    /// Open a ledger on private in-memory databases and create its tables.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let ledger = Self::open(&DatabaseConfig::in_memory())?;
        ledger.ensure_schema().await?;
        Ok(ledger)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.applicants.ensure_schema().await?;
        self.submissions.ensure_schema().await?;
        self.payments.ensure_schema().await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.applicants.close().await;
        self.submissions.close().await;
        self.payments.close().await;
    }
}
