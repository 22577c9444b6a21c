use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::resource::{Resource, SqliteQuery};
use super::status::LoanStatus;
use crate::codec::{Amount, CalendarDate, Rate};

/// `loan_submits`: loan applications.
///
/// `applicant_id` is a soft reference. Nothing checks that the applicant exists and
/// deleting an applicant leaves its submissions in place.
pub struct Submissions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Submission {
    #[serde(rename = "LoanSubmitID")]
    #[sqlx(rename = "loanSubmit_id")]
    pub id: i64,
    #[serde(rename = "ApplicantID")]
    pub applicant_id: i64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: Amount,
    #[serde(rename = "InterestRate")]
    pub interest_rate: Rate,
    #[serde(rename = "LoanDate")]
    pub loan_date: CalendarDate,
    #[serde(rename = "DueDate")]
    pub due_date: CalendarDate,
    #[serde(rename = "LoanStatus")]
    #[sqlx(rename = "loan_status")]
    pub status: LoanStatus,
    #[serde(rename = "CreatedAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionInput {
    #[serde(rename = "ApplicantID")]
    pub applicant_id: i64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: Amount,
    #[serde(rename = "InterestRate")]
    pub interest_rate: Rate,
    #[serde(rename = "LoanDate")]
    pub loan_date: CalendarDate,
    #[serde(rename = "DueDate")]
    pub due_date: CalendarDate,
    #[serde(rename = "LoanStatus")]
    pub status: String,
}

impl Resource for Submissions {
    type Row = Submission;
    type Input = SubmissionInput;
    type Status = LoanStatus;

    const TABLE: &'static str = "loan_submits";
    const ID_COLUMN: &'static str = "loanSubmit_id";
    const COLUMNS: &'static [&'static str] = &[
        "applicant_id",
        "loan_amount",
        "interest_rate",
        "loan_date",
        "due_date",
        "loan_status",
    ];
    // Money and dates are TEXT so SQLite never applies numeric affinity to them.
    const COLUMN_DEFINITIONS: &'static [&'static str] = &[
        "applicant_id INTEGER NOT NULL",
        "loan_amount TEXT NOT NULL",
        "interest_rate TEXT NOT NULL",
        "loan_date TEXT NOT NULL",
        "due_date TEXT NOT NULL",
    ];
    const STATUS_COLUMN: &'static str = "loan_status";

    const LABEL: &'static str = "Loan submission";
    const NOUN: &'static str = "loan submission";
    const CREATED_ID_FIELD: &'static str = "loanSubmit_id";

    fn status(input: &SubmissionInput) -> &str {
        &input.status
    }

    fn bind<'q>(input: &'q SubmissionInput, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(input.applicant_id)
            .bind(input.loan_amount)
            .bind(input.interest_rate)
            .bind(input.loan_date)
            .bind(input.due_date)
            .bind(input.status.as_str())
    }
}
