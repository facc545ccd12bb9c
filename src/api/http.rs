//! Blocking `ureq` client for the identity server REST and SCIM APIs.
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{Application, ApplicationList, ApplicationUpdate, IdentityProviderList, UserList};
use super::{ApiError, IdentityApi};
use crate::scim::UserPayload;

const SCIM_CONTENT_TYPE: &str = "application/scim+json";
const SERVER_API: &str = "api/server/v1";

/// Error bodies: SCIM carries `detail`, the server API carries `description`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ErrorBody {
    fn into_detail(self) -> Option<String> {
        self.detail
            .or(self.description)
            .filter(|d| !d.trim().is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = self.endpoint(path);
        debug!(%method, %url, "dispatching request");
        let req = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json");
        match &self.token {
            Some(token) => req.set("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request("GET", path).call().map_err(map_ureq_error)?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    let status = response.status();
    response.into_json::<T>().map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
    })
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let detail = response
                .into_json::<ErrorBody>()
                .unwrap_or_default()
                .into_detail();
            ApiError::Status { status, detail }
        }
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}

impl IdentityApi for HttpClient {
    fn list_users(&self, offset: usize, limit: usize) -> Result<UserList, ApiError> {
        // SCIM pagination is 1-based.
        self.get_json(&format!(
            "scim2/Users?startIndex={}&count={}",
            offset + 1,
            limit
        ))
    }

    fn create_user(&self, user: &UserPayload) -> Result<(), ApiError> {
        self.request("POST", "scim2/Users")
            .set("Content-Type", SCIM_CONTENT_TYPE)
            .send_json(user)
            .map(|_| ())
            .map_err(map_ureq_error)
    }

    fn list_applications(&self, offset: usize, limit: usize) -> Result<ApplicationList, ApiError> {
        self.get_json(&format!(
            "{SERVER_API}/applications?offset={offset}&limit={limit}"
        ))
    }

    fn get_application(&self, id: &str) -> Result<Application, ApiError> {
        self.get_json(&format!(
            "{SERVER_API}/applications/{}",
            urlencoding::encode(id)
        ))
    }

    fn update_application(&self, update: &ApplicationUpdate) -> Result<(), ApiError> {
        self.request(
            "PATCH",
            &format!("{SERVER_API}/applications/{}", urlencoding::encode(&update.id)),
        )
        .send_json(update)
        .map(|_| ())
        .map_err(map_ureq_error)
    }

    fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        self.request(
            "DELETE",
            &format!("{SERVER_API}/applications/{}", urlencoding::encode(id)),
        )
        .call()
        .map(|_| ())
        .map_err(map_ureq_error)
    }

    fn list_identity_providers(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<IdentityProviderList, ApiError> {
        self.get_json(&format!(
            "{SERVER_API}/identity-providers?offset={offset}&limit={limit}"
        ))
    }

    fn delete_identity_provider(&self, id: &str) -> Result<(), ApiError> {
        self.request(
            "DELETE",
            &format!("{SERVER_API}/identity-providers/{}", urlencoding::encode(id)),
        )
        .call()
        .map(|_| ())
        .map_err(map_ureq_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let c = HttpClient::new("https://iam.local:9443/", None, Duration::from_secs(1));
        assert_eq!(
            c.endpoint("/scim2/Users"),
            "https://iam.local:9443/scim2/Users"
        );
    }

    #[test]
    fn error_body_prefers_scim_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Invalid email", "description": "other"}"#)
                .unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("Invalid email"));
        let body: ErrorBody =
            serde_json::from_str(r#"{"code": "APP-60001", "description": "Application in use"}"#)
                .unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("Application in use"));
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "  "}"#).unwrap();
        assert_eq!(body.into_detail(), None);
    }

    #[test]
    fn status_error_keeps_server_detail() {
        let response =
            ureq::Response::new(409, "Conflict", r#"{"detail": "User already exists"}"#).unwrap();
        let err = map_ureq_error(ureq::Error::Status(409, response));
        assert_eq!(
            err,
            ApiError::Status {
                status: 409,
                detail: Some("User already exists".into()),
            }
        );
    }

    #[test]
    fn status_error_without_json_body_has_no_detail() {
        let response = ureq::Response::new(401, "Unauthorized", "<html>denied</html>").unwrap();
        let err = map_ureq_error(ureq::Error::Status(401, response));
        assert_eq!(
            err,
            ApiError::Status {
                status: 401,
                detail: None,
            }
        );
    }
}
