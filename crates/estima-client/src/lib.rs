//! HTTP client for the proposal workflow backend: wire types, a blocking
//! `ureq` client, and a cancellable fixed-interval status poller.

pub mod api;
pub mod poll;
pub mod types;

pub use api::{ApiClient, ApiError, ApiResult};
pub use poll::{poll_until_settled, PollHandle, PollOutcome, DEFAULT_POLL_INTERVAL};
pub use types::{ApprovalRequest, LoginResponse, StartResponse, StatusResponse};
