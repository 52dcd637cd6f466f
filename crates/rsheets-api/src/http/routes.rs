//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::error;

use rsheets_domain::{
    BatchResult, Dimension, DomainError, RangeRequest, TitleFilter, ValueRange,
};
use rsheets_server::handlers::{BatchGetError, SpreadsheetTitles, TitlesError};
use rsheets_upstream::{GetRangeParams, SheetsClient, UpstreamError, WriteRangeParams};

use super::state::AppState;
use crate::middleware::{cors_layer, RequestIdLayer, RequestLoggingLayer};
use crate::validation::{selector_to_ref, validate_range, validate_values};

/// Custom JSON extractor that returns 400 Bad Request instead of 422
/// Unprocessable Entity for deserialization errors.
///
/// Preserves 413 Payload Too Large for body limit errors.
pub struct JsonBadRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBadRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBadRequest(value)),
            Err(rejection) => {
                use axum::extract::rejection::JsonRejection;

                let status = match &rejection {
                    // BytesRejection wraps body limit errors
                    JsonRejection::BytesRejection(_) => {
                        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            StatusCode::PAYLOAD_TOO_LARGE
                        } else {
                            StatusCode::BAD_REQUEST
                        }
                    }
                    _ => StatusCode::BAD_REQUEST,
                };

                let message = rejection.body_text();
                let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::new(error_codes::PAYLOAD_TOO_LARGE, message)
                } else {
                    ApiError::validation_error(message)
                };

                Err((status, Json(error)))
            }
        }
    }
}

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

fn api_routes<C: SheetsClient>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route(
            "/sheets/range",
            post(get_range::<C>).patch(update_range::<C>),
        )
        .route("/sheets/range/append", post(append_range::<C>))
        .route("/sheets/ranges", post(get_ranges::<C>))
        .route("/sheets/titles", post(get_titles::<C>))
        .route("/sheets/batch/titles", post(batch_titles::<C>))
}

/// Creates the HTTP router with all endpoints and the default body size
/// limit (1MB).
pub fn create_router<C: SheetsClient>(state: AppState<C>) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit<C: SheetsClient>(
    state: AppState<C>,
    body_limit: usize,
) -> Router {
    let shared_state = Arc::new(state);
    api_routes::<C>()
        .route("/health", get(health_check))
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors_layer())
        .layer(RequestLoggingLayer::new())
        .layer(RequestIdLayer::new())
}

// ============================================================
// Error Handling
// ============================================================

/// API error codes.
///
/// Each code maps to an HTTP status via [`ApiError::into_response`], except
/// [`UPSTREAM_ERROR`] which carries the upstream status through unchanged.
pub mod error_codes {
    /// Input validation failure, including unresolvable spreadsheet
    /// references (400).
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// The upstream service rejected the call; the upstream status is
    /// passed through.
    pub const UPSTREAM_ERROR: &str = "upstream_error";
    /// Request body exceeds the size limit (413).
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    /// Unexpected internal error (500).
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Explicit status override, used for upstream pass-through.
    #[serde(skip)]
    status: Option<StatusCode>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Creates a validation error (400).
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// Creates an upstream error carrying the upstream status code through.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: error_codes::UPSTREAM_ERROR.to_string(),
            message: message.into(),
            status: StatusCode::from_u16(status).ok(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use error_codes::*;

        let status = match self.status {
            Some(status) => status,
            None => match self.code.as_str() {
                VALIDATION_ERROR => StatusCode::BAD_REQUEST,
                PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        (status, Json(self)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        // Unknown aliases and empty identifiers are caller input errors.
        ApiError::validation_error(err.to_string())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match &err {
            UpstreamError::Api { status, .. } => {
                let message = err
                    .primary_message()
                    .unwrap_or("upstream request failed")
                    .to_string();
                ApiError::upstream(*status, message)
            }
            UpstreamError::Network { .. } | UpstreamError::InvalidResponse { .. } => {
                error!("Upstream call failed: {}", err);
                ApiError::internal_error("internal server error")
            }
        }
    }
}

impl From<BatchGetError> for ApiError {
    fn from(err: BatchGetError) -> Self {
        match err {
            BatchGetError::Resolution(e) => e.into(),
            BatchGetError::Upstream(e) => e.into(),
            other => ApiError::validation_error(other.to_string()),
        }
    }
}

impl From<TitlesError> for ApiError {
    fn from(err: TitlesError) -> Self {
        match err {
            TitlesError::Resolution(e) => e.into(),
            TitlesError::Upstream(e) => e.into(),
        }
    }
}

// ============================================================
// Request / Response Types
// ============================================================

/// Response envelope: every successful endpoint wraps its payload in
/// `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Selects one spreadsheet: exactly one of `spreadsheet` (configured
/// symbolic name) or `spreadsheetId` (raw identifier).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetSelector {
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: Option<String>,
}

/// One range selection within a spreadsheet.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelector {
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub range: String,
    #[serde(default)]
    pub major_dimension: Dimension,
}

#[derive(Debug, Deserialize)]
pub struct GetRangesRequest {
    pub ranges: Vec<RangeSelector>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitlesRequest {
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub filter: Option<TitleFilter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTitlesRequest {
    pub spreadsheets: Vec<SpreadsheetSelector>,
    #[serde(default)]
    pub filter: Option<TitleFilter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRangeRequest {
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub range: String,
    #[serde(default)]
    pub major_dimension: Dimension,
    pub values: Vec<Vec<String>>,
}

/// Grid echoed back from a write.
#[derive(Debug, Serialize)]
pub struct WrittenValues {
    pub values: Vec<Vec<String>>,
}

// ============================================================
// Handlers
// ============================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_range<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<RangeSelector>,
) -> Result<Json<DataResponse<ValueRange>>, ApiError> {
    let spreadsheet = selector_to_ref(body.spreadsheet.as_deref(), body.spreadsheet_id.as_deref())
        .map_err(ApiError::validation_error)?;
    validate_range(&body.range).map_err(ApiError::validation_error)?;

    let spreadsheet_id = state.aliases.resolve(&spreadsheet)?;
    let value_range = state
        .client
        .get_range(&GetRangeParams {
            spreadsheet_id,
            range: body.range,
            dimension: body.major_dimension,
        })
        .await?;

    Ok(Json(DataResponse { data: value_range }))
}

async fn get_ranges<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<GetRangesRequest>,
) -> Result<Json<DataResponse<Vec<BatchResult>>>, ApiError> {
    let requests = body
        .ranges
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let spreadsheet =
                selector_to_ref(item.spreadsheet.as_deref(), item.spreadsheet_id.as_deref())
                    .map_err(|m| ApiError::validation_error(format!("ranges[{index}]: {m}")))?;
            Ok(RangeRequest {
                spreadsheet,
                range: item.range,
                dimension: item.major_dimension,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let results = state.batch_handler.get_ranges(&requests).await?;
    Ok(Json(DataResponse { data: results }))
}

async fn get_titles<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<TitlesRequest>,
) -> Result<Json<DataResponse<SpreadsheetTitles>>, ApiError> {
    let spreadsheet = selector_to_ref(body.spreadsheet.as_deref(), body.spreadsheet_id.as_deref())
        .map_err(ApiError::validation_error)?;

    let titles = state
        .titles_handler
        .list_titles(&spreadsheet, body.filter.as_ref())
        .await?;

    Ok(Json(DataResponse { data: titles }))
}

async fn batch_titles<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<BatchTitlesRequest>,
) -> Result<Json<DataResponse<Vec<SpreadsheetTitles>>>, ApiError> {
    if body.spreadsheets.is_empty() {
        return Err(ApiError::validation_error(
            "'spreadsheets' must contain at least one entry",
        ));
    }

    let spreadsheets = body
        .spreadsheets
        .iter()
        .enumerate()
        .map(|(index, selector)| {
            selector_to_ref(
                selector.spreadsheet.as_deref(),
                selector.spreadsheet_id.as_deref(),
            )
            .map_err(|m| ApiError::validation_error(format!("spreadsheets[{index}]: {m}")))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let results = state
        .titles_handler
        .batch_titles(&spreadsheets, body.filter.as_ref())
        .await?;

    Ok(Json(DataResponse { data: results }))
}

async fn update_range<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<WriteRangeRequest>,
) -> Result<Json<DataResponse<WrittenValues>>, ApiError> {
    let params = write_params(&state, body)?;
    let values = state.client.update_range(&params).await?;
    Ok(Json(DataResponse {
        data: WrittenValues { values },
    }))
}

async fn append_range<C: SheetsClient>(
    State(state): State<Arc<AppState<C>>>,
    JsonBadRequest(body): JsonBadRequest<WriteRangeRequest>,
) -> Result<Json<DataResponse<WrittenValues>>, ApiError> {
    let params = write_params(&state, body)?;
    let values = state.client.append_range(&params).await?;
    Ok(Json(DataResponse {
        data: WrittenValues { values },
    }))
}

fn write_params<C: SheetsClient>(
    state: &AppState<C>,
    body: WriteRangeRequest,
) -> Result<WriteRangeParams, ApiError> {
    let spreadsheet = selector_to_ref(body.spreadsheet.as_deref(), body.spreadsheet_id.as_deref())
        .map_err(ApiError::validation_error)?;
    validate_range(&body.range).map_err(ApiError::validation_error)?;
    validate_values(&body.values).map_err(ApiError::validation_error)?;

    let spreadsheet_id = state.aliases.resolve(&spreadsheet)?;
    Ok(WriteRangeParams {
        spreadsheet_id,
        range: body.range,
        dimension: body.major_dimension,
        values: body.values,
    })
}
