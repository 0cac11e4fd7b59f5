//! HTTP client for the content API.
//!
//! [`ContentApi`] is the seam the editors are written against;
//! [`HttpContentApi`] is the `reqwest` implementation used in production.

use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
    ChangePasswordRequest, DashboardStats, LoginRequest, LoginResponse, UploadResponse, UploadTarget,
};
use crate::config::{Config, MAX_ERROR_BODY_CHARS};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

/// The content API as seen by an editor.
///
/// `resource` is a path relative to the API root, e.g. `careers` or
/// `community-settings`.
#[allow(async_fn_in_trait)]
pub trait ContentApi {
    /// `GET /<resource>`: the whole current document.
    async fn fetch(&self, resource: &str) -> ApiResult<Value>;

    /// `POST /<resource>`: persist the whole document, returns the stored form.
    async fn store(&self, resource: &str, document: &Value) -> ApiResult<Value>;

    /// `DELETE /<resource>/<id>`.
    async fn delete(&self, resource: &str, id: &str) -> ApiResult<()>;

    /// `PUT /<resource>/<id>/read`.
    async fn mark_read(&self, resource: &str, id: &str) -> ApiResult<()>;
}

/// `reqwest`-backed content API client.
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpContentApi {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        log::info!("POST {} (user {})", self.url("auth/login"), username);

        let response = self
            .http
            .post(self.url("auth/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        read_json(response).await
    }

    /// Change the logged-in user's password. Requires a session.
    pub async fn change_password(
        &self,
        session: Option<&Session>,
        current_password: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        let session = session.ok_or(ApiError::Unauthorized)?;
        log::info!("POST {}", self.url("auth/change-password"));

        let response = self
            .http
            .post(self.url("auth/change-password"))
            .bearer_auth(&session.token)
            .json(&ChangePasswordRequest {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
            })
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    /// Upload one file as multipart form data (field `file`).
    pub async fn upload(
        &self,
        target: &UploadTarget,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<UploadResponse> {
        let url = self.url(&target.path());
        log::info!("POST {} ({} bytes, {})", url, bytes.len(), file_name);

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .http
            .post(url)
            .query(&target.query())
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    /// Dashboard counters and recent activity.
    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let response = self.http.get(self.url("dashboard/stats")).send().await?;
        read_json(response).await
    }
}

impl ContentApi for HttpContentApi {
    async fn fetch(&self, resource: &str) -> ApiResult<Value> {
        let url = self.url(resource);
        log::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json_or_null(response).await
    }

    async fn store(&self, resource: &str, document: &Value) -> ApiResult<Value> {
        let url = self.url(resource);
        log::debug!("POST {}", url);
        let response = self.http.post(url).json(document).send().await?;
        read_json_or_null(response).await
    }

    async fn delete(&self, resource: &str, id: &str) -> ApiResult<()> {
        let url = self.url(&format!("{}/{}", resource.trim_end_matches('/'), id));
        log::debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        check_status(response).await.map(|_| ())
    }

    async fn mark_read(&self, resource: &str, id: &str) -> ApiResult<()> {
        let url = self.url(&format!("{}/{}/read", resource.trim_end_matches('/'), id));
        log::debug!("PUT {}", url);
        let response = self.http.put(url).send().await?;
        check_status(response).await.map(|_| ())
    }
}

// =============================================================================
// Response handling
// =============================================================================

/// Return the body text of a 2xx response, or a [`ApiError::Server`].
async fn check_status(response: Response) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = describe_error_body(status, &body);
        log::warn!("HTTP {}: {}", status.as_u16(), message);
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = check_status(response).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Like [`read_json`], but an empty body reads as `null`.
async fn read_json_or_null(response: Response) -> ApiResult<Value> {
    let body = check_status(response).await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turn an error response body into something fit for a status badge.
///
/// JSON bodies yield their `message`, then `error` field. Anything else
/// (HTML error pages from the hosting proxy) is truncated raw text.
pub fn describe_error_body(status: StatusCode, body: &str) -> String {
    let fallback = format!(
        "Server error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
    .trim_end()
    .to_string();

    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "error"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) if !body.is_empty() => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        Err(_) => fallback,
    }
}
