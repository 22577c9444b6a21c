use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::codec::{Amount, CalendarDate, Rate};
use crate::ledger::{
    ledger_router, ApplicantInput, ErrorExposure, Ledger, PaymentInput, SubmissionInput,
};

pub(super) async fn ledger() -> Ledger {
    Ledger::in_memory().await.expect("in-memory ledger")
}

pub(super) fn router(ledger: &Ledger) -> Router {
    ledger_router(ledger, ErrorExposure::Detailed)
}

pub(super) fn applicant(email: &str) -> ApplicantInput {
    ApplicantInput {
        first_name: "Ada".to_string(),
        last_name: "Okafor".to_string(),
        address: "12 Marina Road, Lagos".to_string(),
        phone: "+2348010000001".to_string(),
        email: email.to_string(),
        status: "newBorrower".to_string(),
    }
}

pub(super) fn submission(applicant_id: i64) -> SubmissionInput {
    SubmissionInput {
        applicant_id,
        loan_amount: Amount::parse("10000.00").expect("amount"),
        interest_rate: Rate::parse("5.25").expect("rate"),
        loan_date: CalendarDate::parse("2024-01-01").expect("loan date"),
        due_date: CalendarDate::parse("2025-01-01").expect("due date"),
        status: "ongoing".to_string(),
    }
}

pub(super) fn payment(submission_id: i64) -> PaymentInput {
    PaymentInput {
        submission_id,
        payment_amount: Amount::parse("850.00").expect("amount"),
        payment_date: CalendarDate::parse("2024-02-01").expect("payment date"),
        payment_method: Some("bank transfer".to_string()),
        status: "not-complete".to_string(),
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(super) fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

pub(super) fn error_message(body: &Value) -> &str {
    body["error"].as_str().expect("error message")
}
