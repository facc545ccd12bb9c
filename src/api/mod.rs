//! REST collaborators of the console.
//!
//! [`IdentityApi`] is the seam every screen talks through: the real
//! [`http::HttpClient`] speaks to the identity server with `ureq`, tests plug
//! an in-memory fake in. Calls are blocking; [`worker::Worker`] moves them off
//! the UI thread.
pub mod http;
pub mod models;
pub mod worker;

use crate::scim::UserPayload;
use models::{Application, ApplicationList, ApplicationUpdate, IdentityProviderList, UserList};

/// What the console can read back from a failed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed before a response was received: {0}")]
    Transport(String),
    #[error("server responded with status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("could not decode response body (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// The structured response attached to the failure, if the server answered at all.
    pub fn response(&self) -> Option<ErrorResponse> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::Status { status, detail } => Some(ErrorResponse {
                status: *status,
                detail: detail.clone(),
            }),
            ApiError::Decode { status, .. } => Some(ErrorResponse {
                status: *status,
                detail: None,
            }),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Operations the console needs from the identity server.
pub trait IdentityApi {
    fn list_users(&self, offset: usize, limit: usize) -> Result<UserList, ApiError>;
    fn create_user(&self, user: &UserPayload) -> Result<(), ApiError>;
    fn list_applications(&self, offset: usize, limit: usize) -> Result<ApplicationList, ApiError>;
    fn get_application(&self, id: &str) -> Result<Application, ApiError>;
    fn update_application(&self, update: &ApplicationUpdate) -> Result<(), ApiError>;
    fn delete_application(&self, id: &str) -> Result<(), ApiError>;
    fn list_identity_providers(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<IdentityProviderList, ApiError>;
    fn delete_identity_provider(&self, id: &str) -> Result<(), ApiError>;
}
