//! # HTTP Client Adapter
//!
//! [`HttpClient`] is the production [`Transport`]: it prefixes paths with the
//! configured base URL, attaches `Authorization: Bearer <token>` when the
//! injected session holds one, and turns every response into either a JSON
//! payload or an [`ApiError`] value.

use crate::config::ApiConfig;
use crate::http::{ApiError, ApiRequest, Method, MultipartForm, RequestBody, Transport};
use crate::session::SessionContext;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Shape of the API's error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the inventory REST API.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionContext>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionContext>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Header value for the current session, read fresh on every call.
    pub fn authorization(&self) -> Option<String> {
        self.session.token().map(|token| format!("Bearer {token}"))
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        if let Some(auth) = self.authorization() {
            builder = builder.header(AUTHORIZATION, auth);
        }

        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(form)) => builder.multipart(multipart_form(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!(status = status.as_u16(), %message, "Request rejected");
            return Err(ApiError::Http {
                status_code: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Response received");
        parse_body(&text)
    }
}

fn multipart_form(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    for (name, file) in form.files {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        out = out.part(name, part);
    }
    Ok(out)
}

/// The API's JSON `message`, else the status reason. Other bodies (proxy
/// HTML pages, stack traces) are only logged.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { message: Some(message) }) = serde_json::from_str::<ErrorBody>(body) {
        return message;
    }
    if !body.trim().is_empty() {
        debug!(status = status.as_u16(), bytes = body.len(), "Error body without message");
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

/// An empty success body reads as JSON `null`.
fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
