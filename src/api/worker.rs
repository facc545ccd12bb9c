//! Background thread that runs blocking [`IdentityApi`] calls.
//!
//! The UI thread sends a [`Request`], keeps drawing, and picks the matching
//! [`Response`] up on a later tick with [`Worker::try_recv`].
//!
//! Mutations echo what they targeted (a wizard session or a resource id) so
//! an outcome that arrives after its screen was closed is never applied to
//! whatever opened since.
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::models::{Application, ApplicationList, ApplicationUpdate, IdentityProviderList, UserList};
use super::{ApiError, IdentityApi};
use crate::scim::UserPayload;

#[derive(Clone, Debug)]
pub enum Request {
    ListUsers { offset: usize, limit: usize },
    /// `session` identifies the wizard that submitted the payload.
    CreateUser { session: u64, payload: UserPayload },
    ListApplications { offset: usize, limit: usize },
    GetApplication(String),
    UpdateApplication(ApplicationUpdate),
    DeleteApplication(String),
    ListIdentityProviders { offset: usize, limit: usize },
    DeleteIdentityProvider(String),
}

#[derive(Debug)]
pub enum Response {
    Users(Result<UserList, ApiError>),
    UserCreated { session: u64, result: Result<(), ApiError> },
    Applications(Result<ApplicationList, ApiError>),
    Application(Result<Application, ApiError>),
    ApplicationUpdated { id: String, result: Result<(), ApiError> },
    ApplicationDeleted { id: String, result: Result<(), ApiError> },
    IdentityProviders(Result<IdentityProviderList, ApiError>),
    IdentityProviderDeleted { id: String, result: Result<(), ApiError> },
}

/// Run one request against `api`.
pub fn execute<A: IdentityApi + ?Sized>(api: &A, request: Request) -> Response {
    match request {
        Request::ListUsers { offset, limit } => Response::Users(api.list_users(offset, limit)),
        Request::CreateUser { session, payload } => Response::UserCreated {
            session,
            result: api.create_user(&payload),
        },
        Request::ListApplications { offset, limit } => {
            Response::Applications(api.list_applications(offset, limit))
        }
        Request::GetApplication(id) => Response::Application(api.get_application(&id)),
        Request::UpdateApplication(update) => Response::ApplicationUpdated {
            result: api.update_application(&update),
            id: update.id,
        },
        Request::DeleteApplication(id) => Response::ApplicationDeleted {
            result: api.delete_application(&id),
            id,
        },
        Request::ListIdentityProviders { offset, limit } => {
            Response::IdentityProviders(api.list_identity_providers(offset, limit))
        }
        Request::DeleteIdentityProvider(id) => Response::IdentityProviderDeleted {
            result: api.delete_identity_provider(&id),
            id,
        },
    }
}

pub struct Worker {
    requests: Sender<Request>,
    responses: Receiver<Response>,
    in_flight: usize,
}

impl Worker {
    /// Move `api` onto its own thread. The thread exits once the worker is dropped.
    pub fn spawn<A: IdentityApi + Send + 'static>(api: A) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();
        thread::spawn(move || {
            for request in req_rx {
                debug!(?request, "worker: executing");
                if resp_tx.send(execute(&api, request)).is_err() {
                    break;
                }
            }
            debug!("worker: channel closed, exiting");
        });
        Self {
            requests: req_tx,
            responses: resp_rx,
            in_flight: 0,
        }
    }

    pub fn send(&mut self, request: Request) {
        if self.requests.send(request).is_err() {
            warn!("worker thread is gone; request dropped");
            return;
        }
        self.in_flight += 1;
    }

    /// Next finished response, if any, without blocking.
    pub fn try_recv(&mut self) -> Option<Response> {
        match self.responses.try_recv() {
            Ok(resp) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(resp)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = 0;
                None
            }
        }
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Response> {
        match self.responses.recv_timeout(timeout) {
            Ok(resp) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(resp)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.in_flight = 0;
                None
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::IdentityProvider;

    struct Fixed;

    impl IdentityApi for Fixed {
        fn list_users(&self, _: usize, _: usize) -> Result<UserList, ApiError> {
            Ok(UserList::default())
        }
        fn create_user(&self, _: &UserPayload) -> Result<(), ApiError> {
            Err(ApiError::Status {
                status: 409,
                detail: Some("exists".into()),
            })
        }
        fn list_applications(&self, _: usize, _: usize) -> Result<ApplicationList, ApiError> {
            Ok(ApplicationList::default())
        }
        fn get_application(&self, _: &str) -> Result<Application, ApiError> {
            Err(ApiError::Transport("down".into()))
        }
        fn update_application(&self, _: &ApplicationUpdate) -> Result<(), ApiError> {
            Ok(())
        }
        fn delete_application(&self, _: &str) -> Result<(), ApiError> {
            Ok(())
        }
        fn list_identity_providers(
            &self,
            _: usize,
            limit: usize,
        ) -> Result<IdentityProviderList, ApiError> {
            Ok(IdentityProviderList {
                total_results: limit,
                identity_providers: vec![IdentityProvider {
                    id: "1".into(),
                    name: "Google".into(),
                    description: None,
                    is_enabled: true,
                    image: None,
                }],
            })
        }
        fn delete_identity_provider(&self, _: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[test]
    fn responses_arrive_in_request_order() {
        let mut worker = Worker::spawn(Fixed);
        worker.send(Request::ListIdentityProviders { offset: 0, limit: 7 });
        worker.send(Request::DeleteApplication("a".into()));
        assert_eq!(worker.in_flight(), 2);

        let first = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        match first {
            Response::IdentityProviders(Ok(list)) => assert_eq!(list.total_results, 7),
            other => panic!("unexpected {other:?}"),
        }
        let second = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        match second {
            Response::ApplicationDeleted { id, result } => {
                assert_eq!(id, "a");
                assert!(result.is_ok());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!worker.is_busy());
    }

    #[test]
    fn create_outcome_echoes_the_session() {
        let payload = crate::scim::build_user_payload(&crate::scim::UserDetails::default());
        match execute(&Fixed, Request::CreateUser { session: 7, payload }) {
            Response::UserCreated { session, result } => {
                assert_eq!(session, 7);
                assert!(result.is_err());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn execute_passes_errors_through() {
        match execute(&Fixed, Request::GetApplication("x".into())) {
            Response::Application(Err(ApiError::Transport(msg))) => assert_eq!(msg, "down"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
