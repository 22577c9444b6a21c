//! Loan management back end: applicants, loan submissions, and loan payments.

pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod telemetry;
