// Unit tests for iam-console
// These tests exercise the public API of each module in isolation

#[cfg(test)]
mod wizard_tests {
    use iam_console::wizard::steps::{StepContent, StepId, USER_WIZARD_STEPS, step_content};
    use iam_console::wizard::{Advance, WizardController, WizardError};
    use serde_json::{Value, json};

    fn values(v: Value) -> serde_json::Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_controller_walks_forward_and_back() {
        let mut c = WizardController::new(&USER_WIZARD_STEPS);
        assert_eq!(c.index(), 0);
        assert!(!c.can_retreat());
        assert_eq!(c.advance(), Advance::SubmitStep(StepId::GeneralDetails));
        assert_eq!(c.retreat(), Err(WizardError::AtFirstStep));

        c.complete_step(StepId::GeneralDetails, values(json!({"userName": "bob"})));
        assert_eq!(c.index(), 1);
        assert!(c.is_last_step());
        assert_eq!(c.advance(), Advance::Finish);

        c.retreat().unwrap();
        assert_eq!(c.index(), 0);
        // Values survive going back.
        assert_eq!(
            c.state().get(StepId::GeneralDetails).unwrap()["userName"],
            json!("bob")
        );
    }

    #[test]
    fn test_summary_unions_steps() {
        let mut c = WizardController::new(&USER_WIZARD_STEPS);
        assert!(c.summary().is_none());
        c.complete_step(
            StepId::GeneralDetails,
            values(json!({"userName": "bob", "email": "bob@x.com"})),
        );
        let s = c.summary().unwrap();
        assert_eq!(s.get_str("userName"), Some("bob"));
        assert_eq!(s.get_str("email"), Some("bob@x.com"));
    }

    #[test]
    fn test_submission_slot_is_single() {
        let mut c = WizardController::new(&USER_WIZARD_STEPS);
        assert!(c.begin_submission().is_none());
        c.complete_step(StepId::GeneralDetails, values(json!({"userName": "bob"})));
        assert!(c.begin_submission().is_some());
        assert!(c.in_flight());
        assert!(c.begin_submission().is_none());
        c.end_submission();
        assert!(c.begin_submission().is_some());
    }

    #[test]
    fn test_step_content_is_seeded_from_state() {
        let mut c = WizardController::new(&USER_WIZARD_STEPS);
        let domains = vec!["primary".to_string(), "CORP".to_string()];
        c.complete_step(
            StepId::GeneralDetails,
            values(json!({"domain": "CORP", "userName": "bob"})),
        );
        match step_content(c.steps(), 0, c.state(), &domains) {
            Some(StepContent::GeneralDetails(form)) => {
                assert_eq!(form.domain(), "CORP");
                assert_eq!(form.user_name, "bob");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            step_content(c.steps(), 1, c.state(), &domains),
            Some(StepContent::Summary(Some(_)))
        ));
        assert!(step_content(c.steps(), 2, c.state(), &domains).is_none());
    }
}

#[cfg(test)]
mod form_tests {
    use iam_console::wizard::form::{PasswordOption, UserField, UserForm};

    fn filled() -> UserForm {
        let mut form = UserForm::new(&["primary".to_string()]);
        form.user_name = "bob".into();
        form.first_name = "Bob".into();
        form.last_name = "Smith".into();
        form.email = "bob@x.com".into();
        form
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let mut form = UserForm::new(&[]);
        assert!(form.validate().is_none());
        assert!(form.error_for(UserField::UserName).is_some());
        assert!(form.error_for(UserField::Email).is_some());
        assert_eq!(form.domain(), "primary");
    }

    #[test]
    fn test_create_password_requires_matching_confirmation() {
        let mut form = filled();
        form.password_option = PasswordOption::CreatePassword;
        assert!(form.visible_fields().contains(&UserField::NewPassword));
        form.new_password = "s3cretpass".into();
        form.confirm_password = "different".into();
        assert!(form.validate().is_none());
        form.confirm_password = "s3cretpass".into();
        let details = form.validate().unwrap();
        assert_eq!(details.new_password.as_deref(), Some("s3cretpass"));
        assert_eq!(details.password_option, "createPw");
    }

    #[test]
    fn test_secret_fields_are_masked() {
        let mut form = filled();
        form.password_option = PasswordOption::CreatePassword;
        form.new_password = "abc".into();
        assert_eq!(form.display_value(UserField::NewPassword), "***");
    }
}

#[cfg(test)]
mod scim_tests {
    use iam_console::scim::{UserDetails, build_user_payload};
    use serde_json::json;

    #[test]
    fn test_ask_password_payload_shape() {
        let details = UserDetails {
            domain: "primary".into(),
            user_name: "bob".into(),
            email: "bob@x.com".into(),
            first_name: "Bob".into(),
            last_name: "Smith".into(),
            password_option: Some("askPw".into()),
            new_password: None,
        };
        let v = serde_json::to_value(build_user_payload(&details)).unwrap();
        assert_eq!(
            v,
            json!({
                "emails": [{"primary": true, "value": "bob@x.com"}],
                "name": {"familyName": "Smith", "givenName": "Bob"},
                "password": "password",
                "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User": {"askPassword": "true"},
                "userName": "bob"
            })
        );
    }

    #[test]
    fn test_secondary_domain_prefixes_user_name() {
        let details = UserDetails {
            domain: "CORP".into(),
            user_name: "alice".into(),
            password_option: Some("createPw".into()),
            new_password: Some("Secr3t!!".into()),
            ..UserDetails::default()
        };
        let payload = build_user_payload(&details);
        assert_eq!(payload.user_name, "CORP/alice");
        assert_eq!(payload.password.as_deref(), Some("Secr3t!!"));
        assert!(payload.enterprise.is_none());
    }
}

#[cfg(test)]
mod gateway_tests {
    use iam_console::api::ApiError;
    use iam_console::gateway::{FailureKind, Operation, classify_failure, failure_notification};
    use iam_console::notify::AlertLevel;

    #[test]
    fn test_no_response_is_auth_failure() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(classify_failure(&err), FailureKind::Auth);
        let n = failure_notification(Operation::AddUser, &err);
        assert_eq!(n.level, AlertLevel::Error);
        assert_eq!(n.title, "Error adding the new user");
    }

    #[test]
    fn test_detail_is_shown_for_non_auth_errors() {
        let err = ApiError::Status {
            status: 409,
            detail: Some("User already exists".into()),
        };
        let n = failure_notification(Operation::AddUser, &err);
        assert_eq!(n.description, "User already exists");
    }

    #[test]
    fn test_missing_detail_is_generic() {
        let err = ApiError::Decode {
            status: 500,
            message: "bad json".into(),
        };
        let n = failure_notification(Operation::AddUser, &err);
        assert_eq!(n.title, "Something went wrong");
    }
}

#[cfg(test)]
mod keymap_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use iam_console::app::keymap::{KeyAction, Keymap};

    #[test]
    fn test_keymap_file_roundtrip() {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("iamc_keys_{}_{}.conf", std::process::id(), nonce));
        let path = path.to_string_lossy().to_string();

        std::fs::write(&path, "Refresh = Ctrl+r\n").unwrap();
        let km = Keymap::from_file(&path).unwrap();
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_r), Some(KeyAction::Refresh));

        km.write_file(&path).unwrap();
        let back = Keymap::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.resolve(&ctrl_r), Some(KeyAction::Refresh));
        assert_eq!(
            back.resolve(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
    }
}

#[cfg(test)]
mod config_tests {
    use iam_console::app::config::ConsoleConfig;

    #[test]
    fn test_defaults() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.list_item_limit, 10);
        assert_eq!(cfg.user_store_domains, ["primary"]);
        assert_eq!(cfg.deleting_forbidden_applications, ["Console", "My Account"]);
    }

    #[test]
    fn test_load_or_init_reads_existing_file() {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("iamc_init_{}_{}.conf", std::process::id(), nonce));
        let path = path.to_string_lossy().to_string();

        std::fs::write(&path, "base_url = https://iam.test\nlist_item_limit = 3\n").unwrap();
        let cfg = ConsoleConfig::load_or_init(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.base_url, "https://iam.test");
        assert_eq!(cfg.list_item_limit, 3);
    }
}
