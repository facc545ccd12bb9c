//! Turns wizard output and panel actions into server calls, and server
//! outcomes into exactly one notification each.
//!
//! Every mutating operation shares the same failure policy, see
//! [`classify_failure`].
use tracing::{info, warn};

use crate::api::{ApiError, IdentityApi};
use crate::notify::{Notification, Notifier};
use crate::scim::{UserDetails, UserPayload, build_user_payload};
use crate::wizard::state::Summary;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    AddUser,
    UpdateApplication,
    DeleteApplication,
    DeleteIdentityProvider,
}

/// How a failed mutation is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// No response, or 401. Bodies of 401s are not trusted, so nothing is echoed.
    Auth,
    /// The server explained itself.
    Detailed(String),
    Generic,
}

pub fn classify_failure(err: &ApiError) -> FailureKind {
    match err.response() {
        None => FailureKind::Auth,
        Some(resp) if resp.status == 401 => FailureKind::Auth,
        Some(resp) => match resp.detail {
            Some(detail) => FailureKind::Detailed(detail),
            None => FailureKind::Generic,
        },
    }
}

pub mod messages {
    use super::Operation;

    pub struct Messages {
        pub success_title: &'static str,
        pub success_description: &'static str,
        pub error_title: &'static str,
        pub auth_description: &'static str,
        pub generic_title: &'static str,
        pub generic_description: &'static str,
    }

    pub fn for_operation(op: Operation) -> Messages {
        match op {
            Operation::AddUser => Messages {
                success_title: "User added successfully",
                success_description: "The new user was added successfully.",
                error_title: "Error adding the new user",
                auth_description: "The server could not be reached or the session is not authorized to add users.",
                generic_title: "Something went wrong",
                generic_description: "Couldn't add the new user.",
            },
            Operation::UpdateApplication => Messages {
                success_title: "Update successful",
                success_description: "Successfully updated the application.",
                error_title: "Update error",
                auth_description: "The server could not be reached or the session is not authorized to update the application.",
                generic_title: "Something went wrong",
                generic_description: "Application update failed.",
            },
            Operation::DeleteApplication => Messages {
                success_title: "Deletion successful",
                success_description: "Successfully deleted the application.",
                error_title: "Deletion error",
                auth_description: "The server could not be reached or the session is not authorized to delete the application.",
                generic_title: "Something went wrong",
                generic_description: "Application deletion failed.",
            },
            Operation::DeleteIdentityProvider => Messages {
                success_title: "Delete successful",
                success_description: "Successfully deleted the identity provider",
                error_title: "Identity Provider Delete Error",
                auth_description: "The server could not be reached or the session is not authorized to delete the identity provider.",
                generic_title: "Identity Provider Delete Error",
                generic_description: "An error occurred while deleting the identity provider",
            },
        }
    }
}

pub fn success_notification(op: Operation) -> Notification {
    let m = messages::for_operation(op);
    Notification::success(m.success_title, m.success_description)
}

/// Shown when the wizard's summary cannot be turned into a user payload.
pub fn malformed_summary_notification() -> Notification {
    let m = messages::for_operation(Operation::AddUser);
    Notification::error(m.generic_title, m.generic_description)
}

pub fn failure_notification(op: Operation, err: &ApiError) -> Notification {
    let m = messages::for_operation(op);
    match classify_failure(err) {
        FailureKind::Auth => Notification::error(m.error_title, m.auth_description),
        FailureKind::Detailed(detail) => Notification::error(m.error_title, detail),
        FailureKind::Generic => Notification::error(m.generic_title, m.generic_description),
    }
}

/// Emit the single notification for an operation's outcome. Returns whether it succeeded.
pub fn report(op: Operation, result: &Result<(), ApiError>, notifier: &mut impl Notifier) -> bool {
    match result {
        Ok(()) => {
            info!(?op, "operation succeeded");
            notifier.notify(success_notification(op));
            true
        }
        Err(err) => {
            warn!(?op, error = %err, "operation failed");
            notifier.notify(failure_notification(op, err));
            false
        }
    }
}

/// Side effects the add-user wizard's owner performs after a successful creation.
pub trait WizardHost {
    fn refresh_list(&mut self);
    fn close_wizard(&mut self);
}

/// Apply a user-creation outcome: refresh, close, then notify on success;
/// notify only on failure, leaving the wizard open for another try.
pub fn settle(
    result: Result<(), ApiError>,
    host: &mut impl WizardHost,
    notifier: &mut impl Notifier,
) -> bool {
    if result.is_ok() {
        host.refresh_list();
        host.close_wizard();
    }
    report(Operation::AddUser, &result, notifier)
}

pub fn prepare_user_payload(summary: &Summary) -> Result<UserPayload, serde_json::Error> {
    UserDetails::from_summary(summary).map(|details| build_user_payload(&details))
}

/// Build the payload, create the user and settle the outcome in one blocking call.
pub fn submit_new_user<A: IdentityApi + ?Sized>(
    api: &A,
    summary: &Summary,
    host: &mut impl WizardHost,
    notifier: &mut impl Notifier,
) -> bool {
    let payload = match prepare_user_payload(summary) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "wizard summary does not describe a user");
            notifier.notify(malformed_summary_notification());
            return false;
        }
    };
    info!(user = %payload.user_name, "creating user");
    settle(api.create_user(&payload), host, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::AlertLevel;

    fn status(code: u16, detail: Option<&str>) -> ApiError {
        ApiError::Status {
            status: code,
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn classification_follows_three_way_policy() {
        assert_eq!(
            classify_failure(&ApiError::Transport("reset".into())),
            FailureKind::Auth
        );
        assert_eq!(classify_failure(&status(401, None)), FailureKind::Auth);
        assert_eq!(
            classify_failure(&status(401, Some("token expired"))),
            FailureKind::Auth
        );
        assert_eq!(
            classify_failure(&status(400, Some("Invalid email"))),
            FailureKind::Detailed("Invalid email".into())
        );
        assert_eq!(classify_failure(&status(500, None)), FailureKind::Generic);
    }

    #[test]
    fn detailed_failure_embeds_server_detail() {
        let n = failure_notification(Operation::AddUser, &status(400, Some("Invalid email")));
        assert_eq!(n.level, AlertLevel::Error);
        assert!(n.description.contains("Invalid email"));
    }

    #[test]
    fn auth_failure_does_not_echo_body() {
        let n = failure_notification(Operation::DeleteApplication, &status(401, Some("secret")));
        assert!(!n.description.contains("secret"));
        assert_eq!(n.title, "Deletion error");
    }

    #[test]
    fn idp_messages_keep_literal_wording() {
        let ok = success_notification(Operation::DeleteIdentityProvider);
        assert_eq!(ok.title, "Delete successful");
        let generic = failure_notification(Operation::DeleteIdentityProvider, &status(500, None));
        assert_eq!(
            generic.description,
            "An error occurred while deleting the identity provider"
        );
    }

    #[test]
    fn report_emits_exactly_one_notification() {
        let mut sink: Vec<Notification> = Vec::new();
        assert!(report(Operation::UpdateApplication, &Ok(()), &mut sink));
        assert!(!report(Operation::UpdateApplication, &Err(status(500, None)), &mut sink));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].level, AlertLevel::Success);
        assert_eq!(sink[1].level, AlertLevel::Error);
    }
}
