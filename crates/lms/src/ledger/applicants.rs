use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::resource::{Resource, SqliteQuery};
use super::status::ApplicantStatus;

/// `loan_applicants`: people who may take a loan. Email is unique.
pub struct Applicants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Applicant {
    #[serde(rename = "Applicant_id")]
    #[sqlx(rename = "applicant_id")]
    pub id: i64,
    #[serde(rename = "First_name")]
    pub first_name: String,
    #[serde(rename = "Last_name")]
    pub last_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Applicant_Status")]
    #[sqlx(rename = "applicant_status")]
    pub status: ApplicantStatus,
    #[serde(rename = "Created_at")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "Updated_at")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantInput {
    #[serde(rename = "First_name")]
    pub first_name: String,
    #[serde(rename = "Last_name")]
    pub last_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Applicant_Status")]
    pub status: String,
}

impl Resource for Applicants {
    type Row = Applicant;
    type Input = ApplicantInput;
    type Status = ApplicantStatus;

    const TABLE: &'static str = "loan_applicants";
    const ID_COLUMN: &'static str = "applicant_id";
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "address",
        "phone",
        "email",
        "applicant_status",
    ];
    const COLUMN_DEFINITIONS: &'static [&'static str] = &[
        "first_name TEXT NOT NULL CHECK (length(first_name) <= 50)",
        "last_name TEXT NOT NULL CHECK (length(last_name) <= 50)",
        "address TEXT NOT NULL CHECK (length(address) <= 100)",
        "phone TEXT NOT NULL CHECK (length(phone) <= 15)",
        "email TEXT NOT NULL UNIQUE CHECK (length(email) <= 100)",
    ];
    const STATUS_COLUMN: &'static str = "applicant_status";
    const UNIQUE_COLUMNS: &'static [&'static str] = &["email"];

    const LABEL: &'static str = "Loan applicant";
    const NOUN: &'static str = "loan applicant";
    const CREATED_ID_FIELD: &'static str = "applicant_id";

    fn status(input: &ApplicantInput) -> &str {
        &input.status
    }

    fn unique_value<'a>(input: &'a ApplicantInput, column: &str) -> Option<&'a str> {
        match column {
            "email" => Some(&input.email),
            _ => None,
        }
    }

    fn bind<'q>(input: &'q ApplicantInput, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(input.first_name.as_str())
            .bind(input.last_name.as_str())
            .bind(input.address.as_str())
            .bind(input.phone.as_str())
            .bind(input.email.as_str())
            .bind(input.status.as_str())
    }
}
