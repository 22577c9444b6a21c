use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::resource::{Resource, SqliteQuery};
use super::status::PaymentStatus;
use crate::codec::{Amount, CalendarDate};

/// `loan_payments`: payments recorded against a submission (soft reference).
pub struct Payments;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    #[serde(rename = "LoanPaymentID")]
    #[sqlx(rename = "loanPayment_id")]
    pub id: i64,
    #[serde(rename = "LoanSubmitID")]
    #[sqlx(rename = "loanSubmit_id")]
    pub submission_id: i64,
    #[serde(rename = "PaymentAmount")]
    pub payment_amount: Amount,
    #[serde(rename = "PaymentDate")]
    pub payment_date: CalendarDate,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "PaymentStatus")]
    #[sqlx(rename = "payment_status")]
    pub status: PaymentStatus,
    #[serde(rename = "CreatedAt")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInput {
    #[serde(rename = "LoanSubmitID")]
    pub submission_id: i64,
    #[serde(rename = "PaymentAmount")]
    pub payment_amount: Amount,
    #[serde(rename = "PaymentDate")]
    pub payment_date: CalendarDate,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "PaymentStatus")]
    pub status: String,
}

impl Resource for Payments {
    type Row = Payment;
    type Input = PaymentInput;
    type Status = PaymentStatus;

    const TABLE: &'static str = "loan_payments";
    const ID_COLUMN: &'static str = "loanPayment_id";
    const COLUMNS: &'static [&'static str] = &[
        "loanSubmit_id",
        "payment_amount",
        "payment_date",
        "payment_method",
        "payment_status",
    ];
    const COLUMN_DEFINITIONS: &'static [&'static str] = &[
        "loanSubmit_id INTEGER NOT NULL",
        "payment_amount TEXT NOT NULL",
        "payment_date TEXT NOT NULL",
        "payment_method TEXT CHECK (length(payment_method) <= 50)",
    ];
    const STATUS_COLUMN: &'static str = "payment_status";

    const LABEL: &'static str = "Loan payment";
    const NOUN: &'static str = "loan payment";
    const CREATED_ID_FIELD: &'static str = "loanPayment_id";

    fn status(input: &PaymentInput) -> &str {
        &input.status
    }

    fn bind<'q>(input: &'q PaymentInput, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(input.submission_id)
            .bind(input.payment_amount)
            .bind(input.payment_date)
            .bind(input.payment_method.as_deref())
            .bind(input.status.as_str())
    }
}
