use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use super::resource::Resource;
use super::store::{Store, StoreError};
use super::Ledger;
use crate::config::AppEnvironment;

/// Whether storage failure details reach the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorExposure {
    Detailed,
    Masked,
}

impl ErrorExposure {
    pub fn for_environment(environment: AppEnvironment) -> Self {
        match environment {
            AppEnvironment::Production => Self::Masked,
            AppEnvironment::Development | AppEnvironment::Test => Self::Detailed,
        }
    }
}

pub(crate) struct ResourceState<R> {
    store: Store<R>,
    exposure: ErrorExposure,
}

impl<R> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            exposure: self.exposure,
        }
    }
}

/// Request failure rendered as `{"error": "..."}`.
#[derive(Debug)]
pub(crate) enum ApiError {
    Decode(String),
    Store {
        error: StoreError,
        exposure: ErrorExposure,
    },
}

impl ApiError {
    fn store(error: StoreError, exposure: ErrorExposure) -> Self {
        Self::Store { error, exposure }
    }
}

pub(crate) fn status_for(error: &StoreError) -> StatusCode {
    match error {
        StoreError::InvalidId { .. }
        | StoreError::InvalidStatus { .. }
        | StoreError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
        StoreError::DuplicateKey { .. } => StatusCode::CONFLICT,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Decode(message) => {
                warn!(%message, "rejected request body");
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Store { error, exposure } => {
                let status = status_for(&error);
                if status.is_server_error() {
                    error!(error = %error, "storage operation failed");
                }
                let message = match (&error, exposure) {
                    (StoreError::Unavailable(_), ErrorExposure::Masked) => {
                        "internal storage error".to_string()
                    }
                    _ => error.to_string(),
                };
                (status, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Decode(rejection.body_text())
    }
}

/// Routes for one resource under `/<table>/...`.
pub fn resource_router<R: Resource>(store: Store<R>, exposure: ErrorExposure) -> Router {
    let base = format!("/{}", R::TABLE);
    Router::new()
        .route(&format!("{base}/all"), get(list_handler::<R>))
        .route(&format!("{base}/create"), post(create_handler::<R>))
        .route(&format!("{base}/update/:id"), put(update_handler::<R>))
        .route(&format!("{base}/delete/:id"), delete(delete_handler::<R>))
        .route(&format!("{base}/:id"), get(get_handler::<R>))
        .with_state(ResourceState { store, exposure })
}

/// Routes for all three ledger collections.
pub fn ledger_router(ledger: &Ledger, exposure: ErrorExposure) -> Router {
    Router::new()
        .merge(resource_router(ledger.applicants.clone(), exposure))
        .merge(resource_router(ledger.submissions.clone(), exposure))
        .merge(resource_router(ledger.payments.clone(), exposure))
}

pub(crate) async fn list_handler<R: Resource>(
    State(state): State<ResourceState<R>>,
) -> Result<Json<Vec<R::Row>>, ApiError> {
    let rows = state
        .store
        .list()
        .await
        .map_err(|err| ApiError::store(err, state.exposure))?;
    Ok(Json(rows))
}

pub(crate) async fn get_handler<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<R::Row>, ApiError> {
    let fail = |err| ApiError::store(err, state.exposure);
    let id = Store::<R>::parse_id(&raw_id).map_err(fail)?;
    let row = state.store.get(id).await.map_err(fail)?;
    Ok(Json(row))
}

pub(crate) async fn create_handler<R: Resource>(
    State(state): State<ResourceState<R>>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = payload?;
    let id = state
        .store
        .create(&input)
        .await
        .map_err(|err| ApiError::store(err, state.exposure))?;

    let mut body = Map::new();
    body.insert(
        "message".to_string(),
        Value::String(format!(
            "{} information has been successfully created.",
            R::LABEL
        )),
    );
    body.insert(R::CREATED_ID_FIELD.to_string(), Value::from(id));
    Ok((StatusCode::CREATED, Json(Value::Object(body))).into_response())
}

/// Full replace of row `id`; any identifier inside the body is ignored.
pub(crate) async fn update_handler<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<R::Input>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let fail = |err| ApiError::store(err, state.exposure);
    let id = Store::<R>::parse_id(&raw_id).map_err(fail)?;
    let Json(input) = payload?;
    state.store.update(id, &input).await.map_err(fail)?;

    Ok(Json(json!({
        "message": format!("{} with ID {} updated successfully", R::LABEL, id),
    })))
}

pub(crate) async fn delete_handler<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let fail = |err| ApiError::store(err, state.exposure);
    let id = Store::<R>::parse_id(&raw_id).map_err(fail)?;
    state.store.delete(id).await.map_err(fail)?;

    Ok(Json(json!({
        "message": format!("{} with ID {} deleted successfully", R::LABEL, id),
    })))
}
