//! Command handlers for the `est` binary.

pub mod approve;
pub mod diff;
pub mod download;
pub mod edit;
pub mod hours;
pub mod init;
pub mod issues;
pub mod login;
pub mod risk;
pub mod role;
pub mod show;
pub mod stage;
pub mod start;
pub mod status;
pub mod watch;

use anyhow::Result;
use estima_client::{ApiClient, ApiError};
use estima_core::config::{self, ProjectConfig};
use estima_core::session::Session;
use estima_core::ErrorCode;
use std::fmt;
use std::path::Path;

/// An error carrying a stable [`ErrorCode`] through the `anyhow` chain, so
/// the output layer can render the code and hint as separate fields.
#[derive(Debug)]
pub struct CodedError {
    pub code: ErrorCode,
    pub detail: Option<String>,
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => {
                write!(f, "{}: {detail} ({})", self.code.message(), self.code.code())
            }
            None => write!(f, "{} ({})", self.code.message(), self.code.code()),
        }
    }
}

impl std::error::Error for CodedError {}

/// Turn a stable [`ErrorCode`] into the error surfaced to the operator.
pub fn fail(code: ErrorCode) -> anyhow::Error {
    anyhow::Error::new(CodedError { code, detail: None })
}

/// Same as [`fail`] but with extra detail appended to the message.
pub fn fail_with(code: ErrorCode, detail: &str) -> anyhow::Error {
    anyhow::Error::new(CodedError {
        code,
        detail: Some(detail.to_string()),
    })
}

/// Map a transport-layer failure onto the CLI's stable error codes.
pub fn api_fail(err: &ApiError) -> anyhow::Error {
    match err {
        ApiError::Gone => fail(ErrorCode::WorkflowGone),
        ApiError::Unauthorized => fail(ErrorCode::Unauthorized),
        other => fail_with(ErrorCode::ApiRequestFailed, &other.to_string()),
    }
}

/// Load config and session together; nearly every networked command needs
/// both.
pub fn load_state(project_root: &Path) -> Result<(ProjectConfig, Session)> {
    let config = config::load_project_config(project_root)?;
    let session = Session::load(project_root)?;
    Ok((config, session))
}

/// Build an API client pointed at the configured backend, carrying the
/// session's auth cookie when one exists.
pub fn api_client(config: &ProjectConfig, session: &Session) -> ApiClient {
    ApiClient::new(&config.resolved_base_url(), session.auth.clone())
}

/// The active workflow id, or the canonical "start one first" error.
pub fn require_workflow(session: &Session) -> Result<String> {
    session
        .workflow_id
        .clone()
        .ok_or_else(|| fail(ErrorCode::NoActiveWorkflow))
}
