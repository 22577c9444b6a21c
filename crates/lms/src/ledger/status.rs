use serde::{Deserialize, Serialize};

/// Lifecycle status stored in a constrained text column.
///
/// Every status enum has two states and no transition rules: any member may
/// replace any other member on update.
pub trait LifecycleStatus: Copy + Send + Sync + 'static {
    /// Every allowed member, in the order used in error messages.
    const ALLOWED: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALLOWED
            .iter()
            .copied()
            .find(|status| status.label() == raw)
    }

    /// `'a' or 'b'` rendering used by validation errors.
    fn allowed_labels() -> String {
        Self::ALLOWED
            .iter()
            .map(|status| format!("'{}'", status.label()))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// SQL `CHECK` predicate mirroring the enum for `column`.
    fn check_predicate(column: &str) -> String {
        let members = Self::ALLOWED
            .iter()
            .map(|status| format!("'{}'", status.label()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{column} IN ({members})")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub enum ApplicantStatus {
    NewBorrower,
    CurrentBorrower,
}

impl LifecycleStatus for ApplicantStatus {
    const ALLOWED: &'static [Self] = &[Self::NewBorrower, Self::CurrentBorrower];

    fn label(self) -> &'static str {
        match self {
            ApplicantStatus::NewBorrower => "newBorrower",
            ApplicantStatus::CurrentBorrower => "currentBorrower",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoanStatus {
    Ongoing,
    Completed,
}

impl LifecycleStatus for LoanStatus {
    const ALLOWED: &'static [Self] = &[Self::Ongoing, Self::Completed];

    fn label(self) -> &'static str {
        match self {
            LoanStatus::Ongoing => "ongoing",
            LoanStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum PaymentStatus {
    #[serde(rename = "not-complete")]
    #[sqlx(rename = "not-complete")]
    NotComplete,
    #[serde(rename = "completed")]
    #[sqlx(rename = "completed")]
    Completed,
}

impl LifecycleStatus for PaymentStatus {
    const ALLOWED: &'static [Self] = &[Self::NotComplete, Self::Completed];

    fn label(self) -> &'static str {
        match self {
            PaymentStatus::NotComplete => "not-complete",
            PaymentStatus::Completed => "completed",
        }
    }
}
