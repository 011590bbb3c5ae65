//! Blocking HTTP client for the proposal workflow backend.

use crate::types::{
    ApprovalRequest, DownloadRequest, LoginRequest, LoginResponse, StartResponse, StatusResponse,
};
use estima_core::session::Auth;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = concat!("estima-client/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads could be multi-megabyte but a proposal document never is.
const MAX_DOWNLOAD_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 404: the workflow id no longer exists on the server.
    #[error("workflow not found on server")]
    Gone,

    /// 401: missing or stale auth cookie.
    #[error("authentication required or token expired")]
    Unauthorized,

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("failed to decode API response: {0}")]
    Decode(#[from] std::io::Error),
}

impl ApiError {
    fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(404, _) => Self::Gone,
            ureq::Error::Status(401, _) => Self::Unauthorized,
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Self::Status { status, body }
            }
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Client bound to one backend base URL, optionally authenticated.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, auth: Option<Auth>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn set_auth(&mut self, auth: Option<Auth>) {
        self.auth = auth;
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticates against the portal and returns the session token.
    pub fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let payload = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .request("POST", &self.url("/login"))
            .send_json(&payload)
            .map_err(ApiError::from_ureq)?;

        decode_json(response)
    }

    /// Uploads a source document and starts a new workflow.
    pub fn start(&self, file_name: &str, bytes: &[u8]) -> ApiResult<StartResponse> {
        let boundary = multipart_boundary();
        let body = multipart_file_body(&boundary, "file", file_name, bytes);

        let response = self
            .request("POST", &self.url("/start"))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(ApiError::from_ureq)?;

        decode_json(response)
    }

    /// Fetches the current snapshot for a workflow.
    pub fn status(&self, workflow_id: &str) -> ApiResult<StatusResponse> {
        let response = self
            .request("GET", &self.url(&format!("/status/{workflow_id}")))
            .call()
            .map_err(ApiError::from_ureq)?;

        decode_json(response)
    }

    /// Approves a paused workflow with the edited data and final estimate.
    pub fn approve(&self, workflow_id: &str, payload: &ApprovalRequest) -> ApiResult<()> {
        self.request("POST", &self.url(&format!("/approve/{workflow_id}")))
            .send_json(payload)
            .map_err(ApiError::from_ureq)?;
        Ok(())
    }

    /// Renders the proposal text server-side and returns the document bytes.
    pub fn download_docx(&self, text: &str) -> ApiResult<Vec<u8>> {
        let payload = DownloadRequest {
            text: text.to_string(),
        };

        let response = self
            .request("POST", &self.url("/download_docx"))
            .send_json(&payload)
            .map_err(ApiError::from_ureq)?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, url)
            .set("User-Agent", USER_AGENT);

        if let Some(auth) = &self.auth {
            request = request.set(
                "Cookie",
                &format!(
                    "portal_auth_token={}; portal_user={}",
                    auth.token, auth.user
                ),
            );
        }

        request
    }
}

fn decode_json<T: DeserializeOwned>(response: ureq::Response) -> ApiResult<T> {
    response.into_json::<T>().map_err(ApiError::Decode)
}

fn multipart_boundary() -> String {
    // Nanosecond timestamp is unique enough for one upload per process.
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    format!("----estima-{nanos:032x}")
}

fn multipart_file_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
