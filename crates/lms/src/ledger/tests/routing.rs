use super::common::*;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::ledger::{ledger_router, ApplicantStatus, ErrorExposure};

#[tokio::test]
async fn created_submission_reads_back_identically() {
    let ledger = ledger().await;
    let app = router(&ledger);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/loan_submits/create",
            json!({
                "ApplicantID": 1,
                "LoanAmount": "10000.00",
                "InterestRate": "5.25",
                "LoanDate": "2024-01-01",
                "DueDate": "2025-01-01",
                "LoanStatus": "ongoing"
            }),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(
        body["message"],
        "Loan submission information has been successfully created."
    );
    let id = body["loanSubmit_id"].as_i64().expect("assigned id");
    assert!(id > 0);

    let response = app
        .oneshot(empty_request("GET", &format!("/loan_submits/{id}")))
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::OK);
    let row = read_json_body(response).await;
    assert_eq!(row["LoanSubmitID"], id);
    assert_eq!(row["ApplicantID"], 1);
    assert_eq!(row["LoanAmount"], "10000.00");
    assert_eq!(row["InterestRate"], "5.25");
    assert_eq!(row["LoanDate"], "2024-01-01");
    assert_eq!(row["DueDate"], "2025-01-01");
    assert_eq!(row["LoanStatus"], "ongoing");
    assert!(row["CreatedAt"].is_string());
    assert!(row["UpdatedAt"].is_string());
}

#[tokio::test]
async fn applicant_creation_reports_its_identifier() {
    let ledger = ledger().await;
    let response = router(&ledger)
        .oneshot(json_request(
            "POST",
            "/loan_applicants/create",
            serde_json::to_value(applicant("route@example.com")).expect("json"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert!(body["applicant_id"].as_i64().expect("id") > 0);
    assert_eq!(
        body["message"],
        "Loan applicant information has been successfully created."
    );
}

#[tokio::test]
async fn list_returns_every_row_as_an_array() {
    let ledger = ledger().await;
    ledger.payments.create(&payment(1)).await.expect("first");
    ledger.payments.create(&payment(2)).await.expect("second");

    let response = router(&ledger)
        .oneshot(empty_request("GET", "/loan_payments/all"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["PaymentStatus"], "not-complete");
    assert_eq!(rows[0]["PaymentMethod"], "bank transfer");
}

#[tokio::test]
async fn empty_list_is_an_empty_array() {
    let ledger = ledger().await;
    let response = router(&ledger)
        .oneshot(empty_request("GET", "/loan_applicants/all"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn missing_identifier_is_not_found_for_every_operation() {
    let ledger = ledger().await;
    let app = router(&ledger);
    let update = serde_json::to_value(payment(1)).expect("json");

    for request in [
        empty_request("GET", "/loan_payments/999999"),
        json_request("PUT", "/loan_payments/update/999999", update),
        empty_request("DELETE", "/loan_payments/delete/999999"),
    ] {
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json_body(response).await;
        assert_eq!(error_message(&body), "loan payment with ID 999999 not found");
    }
}

#[tokio::test]
async fn non_numeric_identifier_is_a_bad_request() {
    let ledger = ledger().await;
    let response = router(&ledger)
        .oneshot(empty_request("GET", "/loan_applicants/abc"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(error_message(&body), "invalid loan applicant ID 'abc'");
}

#[tokio::test]
async fn bad_identifier_wins_over_bad_body_on_update() {
    let ledger = ledger().await;
    let response = router(&ledger)
        .oneshot(raw_request("PUT", "/loan_submits/update/abc", "{not json"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(error_message(&body).contains("ID 'abc'"));
}

#[tokio::test]
async fn unknown_status_is_a_bad_request() {
    let ledger = ledger().await;
    let mut input = serde_json::to_value(submission(1)).expect("json");
    input["LoanStatus"] = json!("frozen");

    let response = router(&ledger)
        .oneshot(json_request("POST", "/loan_submits/create", input))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        error_message(&body),
        "invalid loan submission status 'frozen': allowed values are 'ongoing' or 'completed'"
    );
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let ledger = ledger().await;
    ledger.applicants.create(&applicant("taken@example.com")).await.expect("first");

    let response = router(&ledger)
        .oneshot(json_request(
            "POST",
            "/loan_applicants/create",
            serde_json::to_value(applicant("taken@example.com")).expect("json"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(error_message(&body), "email 'taken@example.com' already exists");
}

#[tokio::test]
async fn undecodable_bodies_are_bad_requests() {
    let ledger = ledger().await;
    let app = router(&ledger);

    let float_amount = json!({
        "ApplicantID": 1,
        "LoanAmount": 10000.5,
        "InterestRate": "5.25",
        "LoanDate": "2024-01-01",
        "DueDate": "2025-01-01",
        "LoanStatus": "ongoing"
    });
    let malformed_date = json!({
        "ApplicantID": 1,
        "LoanAmount": "10000.00",
        "InterestRate": "5.25",
        "LoanDate": "01/02/2024",
        "DueDate": "2025-01-01",
        "LoanStatus": "ongoing"
    });

    for body in [float_amount, malformed_date] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/loan_submits/create", body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(!error_message(&body).is_empty());
    }

    let response = app
        .oneshot(raw_request("POST", "/loan_submits/create", "{\"ApplicantID\":"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(ledger.submissions.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn update_uses_the_path_identifier() {
    let ledger = ledger().await;
    let first = ledger.applicants.create(&applicant("first@example.com")).await.expect("first");
    let second = ledger.applicants.create(&applicant("second@example.com")).await.expect("second");

    let mut body = serde_json::to_value(applicant("second@example.com")).expect("json");
    body["Applicant_id"] = json!(first);
    body["Applicant_Status"] = json!("currentBorrower");

    let response = router(&ledger)
        .oneshot(json_request(
            "PUT",
            &format!("/loan_applicants/update/{second}"),
            body,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let message = read_json_body(response).await;
    assert_eq!(
        message["message"],
        format!("Loan applicant with ID {second} updated successfully")
    );

    let untouched = ledger.applicants.get(first).await.expect("first row");
    assert_eq!(untouched.email, "first@example.com");
    let updated = ledger.applicants.get(second).await.expect("second row");
    assert_eq!(updated.status, ApplicantStatus::CurrentBorrower);
}

#[tokio::test]
async fn delete_reports_success_then_not_found() {
    let ledger = ledger().await;
    let id = ledger.submissions.create(&submission(1)).await.expect("create");
    let app = router(&ledger);
    let uri = format!("/loan_submits/delete/{id}");

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body["message"],
        format!("Loan submission with ID {id} deleted successfully")
    );

    let response = app
        .oneshot(empty_request("DELETE", &uri))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_failures_are_masked_when_requested() {
    let ledger = ledger().await;
    ledger.close().await;

    let response = ledger_router(&ledger, ErrorExposure::Masked)
        .oneshot(empty_request("GET", "/loan_applicants/all"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(error_message(&body), "internal storage error");

    let response = ledger_router(&ledger, ErrorExposure::Detailed)
        .oneshot(empty_request("GET", "/loan_applicants/all"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(error_message(&body).starts_with("storage unavailable"));
}
