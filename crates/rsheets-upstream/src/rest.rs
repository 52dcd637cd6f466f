//! REST client for the Google Sheets v4 value endpoints.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use rsheets_domain::{BatchPayload, ValueRange};

use crate::error::{UpstreamError, UpstreamErrorDetail, UpstreamResult};
use crate::traits::{BatchGetResponse, GetRangeParams, SheetsClient, WriteRangeParams};

/// Configuration for [`RestSheetsClient`].
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Server root, e.g. `https://sheets.googleapis.com`. Trailing slashes
    /// are stripped.
    pub base_url: String,
    /// Bearer token attached to every request, when present.
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            auth_token: None,
            request_timeout_secs: 30,
        }
    }
}

/// HTTP client for spreadsheet value operations against the upstream
/// service.
///
/// Constructed once at startup and shared via `Arc`; no lazy process-global
/// state.
#[derive(Clone)]
pub struct RestSheetsClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl fmt::Debug for RestSheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestSheetsClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.auth_token.is_some())
            .finish()
    }
}

// ============================================================
// Wire shapes
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetBody {
    spreadsheet_id: String,
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    #[serde(default)]
    updated_data: Option<GridBody>,
}

#[derive(Debug, Default, Deserialize)]
struct GridBody {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppendBody {
    #[serde(default)]
    updates: Option<UpdateBody>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetBody {
    #[serde(default)]
    sheets: Vec<SheetBody>,
}

#[derive(Debug, Deserialize)]
struct SheetBody {
    properties: SheetPropertiesBody,
}

#[derive(Debug, Deserialize)]
struct SheetPropertiesBody {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorObjectBody,
}

#[derive(Debug, Deserialize)]
struct ErrorObjectBody {
    message: String,
    #[serde(default)]
    errors: Vec<UpstreamErrorDetail>,
}

/// Percent-encodes an A1 range for use as a URL path segment. `!` and `:`
/// are valid path characters and the upstream service expects them literal.
fn encode_range(range: &str) -> String {
    urlencoding::encode(range)
        .replace("%21", "!")
        .replace("%3A", ":")
}

impl RestSheetsClient {
    pub fn new(config: &RestClientConfig) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            encode_range(range),
        )
    }

    fn add_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.auth_token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    /// Sends a request and parses a 2xx response body, mapping everything
    /// else to a structured [`UpstreamError`].
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> UpstreamResult<T> {
        let resp = self
            .add_auth(req)
            .send()
            .await
            .map_err(Self::map_network_error)?;

        let status = resp.status();
        if status.is_success() {
            resp.json::<T>()
                .await
                .map_err(|e| UpstreamError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(Self::map_error(status, body))
        }
    }

    /// Maps a non-2xx response to an `UpstreamError::Api`, preserving the
    /// upstream status and error detail list when the body parses.
    fn map_error(status: StatusCode, body: String) -> UpstreamError {
        tracing::debug!(status = status.as_u16(), "Upstream returned error status");
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
            let errors = if parsed.error.errors.is_empty() {
                vec![UpstreamErrorDetail {
                    reason: None,
                    message: parsed.error.message,
                }]
            } else {
                parsed.error.errors
            };
            return UpstreamError::Api {
                status: status.as_u16(),
                errors,
            };
        }

        UpstreamError::api(
            status.as_u16(),
            if body.is_empty() {
                format!("status {status}")
            } else {
                body
            },
        )
    }

    fn map_network_error(e: reqwest::Error) -> UpstreamError {
        let message = if e.is_timeout() {
            format!("request timed out: {e}")
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        UpstreamError::Network { message }
    }
}

#[async_trait]
impl SheetsClient for RestSheetsClient {
    async fn get_range(&self, params: &GetRangeParams) -> UpstreamResult<ValueRange> {
        let url = self.values_url(&params.spreadsheet_id, &params.range);
        let req = self
            .client
            .get(url)
            .query(&[("majorDimension", params.dimension.as_str())]);
        self.execute(req).await
    }

    async fn batch_get_ranges(&self, payload: &BatchPayload) -> UpstreamResult<BatchGetResponse> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values:batchGet",
            self.base_url,
            urlencoding::encode(&payload.spreadsheet_id),
        );

        let mut query: Vec<(&str, &str)> = vec![("majorDimension", payload.dimension.as_str())];
        for range in &payload.ranges {
            query.push(("ranges", range));
        }

        let body: BatchGetBody = self.execute(self.client.get(url).query(&query)).await?;
        Ok(BatchGetResponse {
            spreadsheet_id: body.spreadsheet_id,
            value_ranges: body.value_ranges,
        })
    }

    async fn update_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>> {
        let url = self.values_url(&params.spreadsheet_id, &params.range);
        let req = self
            .client
            .put(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("includeValuesInResponse", "true"),
            ])
            .json(&ValueRange {
                range: params.range.clone(),
                major_dimension: params.dimension,
                values: params.values.clone(),
            });

        let body: UpdateBody = self.execute(req).await?;
        Ok(body.updated_data.unwrap_or_default().values)
    }

    async fn append_range(&self, params: &WriteRangeParams) -> UpstreamResult<Vec<Vec<String>>> {
        let url = format!(
            "{}:append",
            self.values_url(&params.spreadsheet_id, &params.range)
        );
        let req = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("includeValuesInResponse", "true"),
            ])
            .json(&ValueRange {
                range: params.range.clone(),
                major_dimension: params.dimension,
                values: params.values.clone(),
            });

        let body: AppendBody = self.execute(req).await?;
        Ok(body
            .updates
            .unwrap_or_default()
            .updated_data
            .unwrap_or_default()
            .values)
    }

    async fn list_titles(&self, spreadsheet_id: &str) -> UpstreamResult<Vec<String>> {
        let url = format!(
            "{}/v4/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
        );
        let req = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);

        let body: SpreadsheetBody = self.execute(req).await?;
        Ok(body
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }
}
