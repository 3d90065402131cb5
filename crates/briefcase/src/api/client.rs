//! Document API HTTP client
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic. The session token
//! lives in memory only and is sent as the `access_token` cookie.

use anyhow::{Context, Result};
use log::debug;
use std::sync::RwLock;
use std::time::Duration;
use ureq::http::Response;
use ureq::unversioned::multipart::{Form, Part};
use ureq::{Agent, Body};
use url::Url;

use super::wire::{ErrorBody, LoginRequest, LoginResponse};
use super::{DocumentApi, UploadRequest};
use crate::error::ApiError;
use crate::models::{DocumentId, DocumentLists, Recipient, UploadReceipt, User};

/// Largest document body accepted from the server
const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// HTTP client for the document server
pub struct HttpDocumentApi {
    agent: Agent,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpDocumentApi {
    /// Create a client for the server at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - Server root, e.g. `http://localhost:8000`
    /// * `timeout` - Upper bound on each request, connection included
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).with_context(|| format!("Invalid server URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported server URL scheme: {}", parsed.scheme());
        }

        // Non-2xx responses are inspected for their `detail` body, so they
        // must not be turned into transport errors.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Ok(Self {
            agent: Agent::new_with_config(config),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// Reuse an existing session token instead of logging in
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn cookie(&self) -> Option<String> {
        self.token
            .read()
            .ok()
            .and_then(|t| t.as_ref().map(|token| format!("access_token={token}")))
    }

    fn get(&self, path: &str) -> Result<Response<Body>, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        let mut request = self.agent.get(&url);
        if let Some(cookie) = self.cookie() {
            request = request.header("Cookie", &cookie);
        }
        Ok(request.call()?)
    }

    fn post_empty(&self, path: &str) -> Result<Response<Body>, ApiError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let mut request = self.agent.post(&url);
        if let Some(cookie) = self.cookie() {
            request = request.header("Cookie", &cookie);
        }
        Ok(request.send_empty()?)
    }
}

/// Pass 2xx responses through; turn anything else into an `ApiError`
fn check(mut response: Response<Body>) -> Result<Response<Body>, ApiError> {
    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        return Ok(response);
    }
    let detail = response
        .body_mut()
        .read_json::<ErrorBody>()
        .ok()
        .and_then(ErrorBody::into_detail);
    debug!("Request rejected with {}: {:?}", status, detail);
    Err(ApiError::from_status(status, detail))
}

fn read_json<T: serde::de::DeserializeOwned>(mut response: Response<Body>) -> Result<T, ApiError> {
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Upload form values, rendered up front so the form can borrow them
///
/// `view_limit` and `expires_in_days` are omitted unless positive.
struct UploadFields {
    filename: String,
    recipient_id: String,
    view_limit: Option<String>,
    expires_in_days: Option<String>,
}

impl UploadFields {
    fn new(upload: &UploadRequest) -> Self {
        Self {
            // The part header quotes the name verbatim
            filename: upload.filename.replace(['"', '\r', '\n'], "_"),
            recipient_id: upload.recipient_id.to_string(),
            view_limit: upload.view_limit.filter(|v| *v > 0).map(|v| v.to_string()),
            expires_in_days: upload.expires_in_days.filter(|d| *d > 0).map(|d| d.to_string()),
        }
    }

    fn form<'a>(&'a self, content: &'a [u8]) -> Form<'a> {
        let mut form = Form::new()
            .part("file", Part::bytes(content).file_name(&self.filename))
            .text("recipient_id", &self.recipient_id);
        if let Some(limit) = &self.view_limit {
            form = form.text("view_limit", limit);
        }
        if let Some(days) = &self.expires_in_days {
            form = form.text("expires_in_days", days);
        }
        form
    }
}

impl DocumentApi for HttpDocumentApi {
    fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let url = self.endpoint("/api/login");
        debug!("POST {}", url);
        let response = self.agent.post(&url).send_json(&LoginRequest { email, password })?;
        let login: LoginResponse = read_json(check(response)?)?;
        self.set_token(Some(login.access_token));
        Ok(login.user)
    }

    fn me(&self) -> Result<User, ApiError> {
        read_json(check(self.get("/api/me")?)?)
    }

    fn users(&self) -> Result<Vec<Recipient>, ApiError> {
        read_json(check(self.get("/api/users")?)?)
    }

    fn upload(&self, upload: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        let fields = UploadFields::new(upload);
        let url = self.endpoint("/api/documents/upload");
        debug!("POST {} ({} bytes)", url, upload.content.len());
        let mut request = self.agent.post(&url);
        if let Some(cookie) = self.cookie() {
            request = request.header("Cookie", &cookie);
        }
        let response = request.send(fields.form(&upload.content))?;
        read_json(check(response)?)
    }

    fn documents(&self) -> Result<DocumentLists, ApiError> {
        read_json(check(self.get("/api/documents")?)?)
    }

    fn download(&self, id: &DocumentId) -> Result<Vec<u8>, ApiError> {
        let path = format!("/api/documents/{}/download", urlencoding::encode(id.as_str()));
        let mut response = check(self.get(&path)?)?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_DOWNLOAD_BYTES)
            .read_to_vec()?;
        Ok(bytes)
    }

    fn logout(&self) -> Result<(), ApiError> {
        let result = self.post_empty("/api/logout").and_then(check);
        self.set_token(None);
        result.map(|_| ())
    }
}
