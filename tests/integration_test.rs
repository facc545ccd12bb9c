// Integration tests for iam-console
// The identity server is replaced by an in-memory MockApi; nothing touches the network.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use iam_console::api::models::{
    AdvancedConfigurations, Application, ApplicationList, ApplicationSummary, ApplicationUpdate,
    IdentityProvider, IdentityProviderList, User, UserList,
};
use iam_console::api::worker::{Response, Worker};
use iam_console::api::{ApiError, IdentityApi};
use iam_console::app::config::ConsoleConfig;
use iam_console::app::update::{Flow, handle_key};
use iam_console::app::{ActiveTab, AppState};
use iam_console::gateway::{self, WizardHost};
use iam_console::notify::{AlertLevel, Notification, Notifier};
use iam_console::scim::UserPayload;
use iam_console::wizard::state::WizardState;
use iam_console::wizard::steps::StepId;

#[derive(Clone)]
struct MockApi {
    calls: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<UserPayload>>>,
    create_result: Result<(), ApiError>,
    delete_app_result: Result<(), ApiError>,
    delete_idp_result: Result<(), ApiError>,
    idps: Vec<IdentityProvider>,
}

impl MockApi {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            create_result: Ok(()),
            delete_app_result: Ok(()),
            delete_idp_result: Ok(()),
            idps: vec![idp("1", "Google"), idp("2", "LOCAL")],
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn idp(id: &str, name: &str) -> IdentityProvider {
    IdentityProvider {
        id: id.into(),
        name: name.into(),
        description: None,
        is_enabled: true,
        image: None,
    }
}

fn application(name: &str) -> Application {
    Application {
        id: "app-1".into(),
        name: name.into(),
        description: None,
        image_url: None,
        access_url: Some("https://pickup.example.com".into()),
        advanced_configurations: AdvancedConfigurations::default(),
    }
}

impl IdentityApi for MockApi {
    fn list_users(&self, offset: usize, limit: usize) -> Result<UserList, ApiError> {
        self.record(format!("list_users {offset} {limit}"));
        Ok(UserList {
            total_results: 1,
            start_index: 1,
            resources: vec![User {
                id: "u1".into(),
                user_name: "bob".into(),
                name: None,
                emails: Vec::new(),
            }],
        })
    }

    fn create_user(&self, user: &UserPayload) -> Result<(), ApiError> {
        self.record("create_user");
        self.created.lock().unwrap().push(user.clone());
        self.create_result.clone()
    }

    fn list_applications(&self, _offset: usize, _limit: usize) -> Result<ApplicationList, ApiError> {
        self.record("list_applications");
        Ok(ApplicationList {
            total_results: 1,
            applications: vec![ApplicationSummary {
                id: "app-1".into(),
                name: "Pickup".into(),
                description: None,
                access_url: None,
            }],
        })
    }

    fn get_application(&self, id: &str) -> Result<Application, ApiError> {
        self.record(format!("get_application {id}"));
        Ok(application("Pickup"))
    }

    fn update_application(&self, update: &ApplicationUpdate) -> Result<(), ApiError> {
        self.record(format!("update_application {}", update.name));
        Ok(())
    }

    fn delete_application(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_application {id}"));
        self.delete_app_result.clone()
    }

    fn list_identity_providers(
        &self,
        _offset: usize,
        _limit: usize,
    ) -> Result<IdentityProviderList, ApiError> {
        self.record("list_identity_providers");
        Ok(IdentityProviderList {
            total_results: self.idps.len(),
            identity_providers: self.idps.clone(),
        })
    }

    fn delete_identity_provider(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_identity_provider {id}"));
        self.delete_idp_result.clone()
    }
}

fn app_with(api: MockApi, config: ConsoleConfig) -> AppState {
    AppState::new(config, Worker::spawn(api))
}

/// Apply responses until the worker has nothing outstanding.
fn settle(app: &mut AppState) {
    while app.worker.is_busy() {
        match app.worker.recv_timeout(Duration::from_secs(5)) {
            Some(resp) => app.apply_response(resp),
            None => panic!("worker did not answer"),
        }
    }
}

fn press(app: &mut AppState, code: KeyCode) -> Flow {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn fill_general_details(app: &mut AppState) {
    // Focus starts on the domain selector.
    press(app, KeyCode::Down);
    type_text(app, "bob");
    press(app, KeyCode::Down);
    type_text(app, "Bob");
    press(app, KeyCode::Down);
    type_text(app, "Smith");
    press(app, KeyCode::Down);
    type_text(app, "bob@x.com");
}

// 1) The add-user flow end to end: one create, then refresh, close and notify in that order
#[test]
fn submit_new_user_refreshes_closes_then_notifies() {
    #[derive(Clone)]
    struct Log(Rc<RefCell<Vec<String>>>);
    impl WizardHost for Log {
        fn refresh_list(&mut self) {
            self.0.borrow_mut().push("refresh".into());
        }
        fn close_wizard(&mut self) {
            self.0.borrow_mut().push("close".into());
        }
    }
    impl Notifier for Log {
        fn notify(&mut self, n: Notification) {
            self.0.borrow_mut().push(format!("notify {}", n.title));
        }
    }

    let mut state = WizardState::new();
    let values = serde_json::json!({
        "domain": "primary",
        "userName": "bob",
        "firstName": "Bob",
        "lastName": "Smith",
        "email": "bob@x.com",
        "passwordOption": "askPw"
    });
    let serde_json::Value::Object(values) = values else {
        unreachable!()
    };
    state.record_step_values(StepId::GeneralDetails, values);
    let summary = state.compute_summary().unwrap();

    let api = MockApi::new();
    let log = Log(Rc::new(RefCell::new(Vec::new())));
    let mut host = log.clone();
    let mut notifier = log.clone();
    assert!(gateway::submit_new_user(&api, &summary, &mut host, &mut notifier));

    assert_eq!(api.calls(), ["create_user"]);
    let payload = api.created.lock().unwrap()[0].clone();
    assert_eq!(payload.user_name, "bob");
    assert_eq!(payload.password.as_deref(), Some("password"));
    assert!(payload.enterprise.is_some());
    assert_eq!(
        *log.0.borrow(),
        ["refresh", "close", "notify User added successfully"]
    );
}

// 2) Failure leaves the wizard untouched and reports once
#[test]
fn failed_creation_only_notifies() {
    let mut sink: Vec<Notification> = Vec::new();
    struct NoHost;
    impl WizardHost for NoHost {
        fn refresh_list(&mut self) {
            panic!("must not refresh on failure");
        }
        fn close_wizard(&mut self) {
            panic!("must not close on failure");
        }
    }
    let err = ApiError::Status {
        status: 401,
        detail: Some("token expired".into()),
    };
    assert!(!gateway::settle(Err(err), &mut NoHost, &mut sink));
    assert_eq!(sink.len(), 1);
    assert!(!sink[0].description.contains("token expired"));
}

// 3) Driving the wizard through keys creates exactly one user even if Enter is pressed twice
#[test]
fn wizard_via_keys_submits_once_and_closes() {
    let api = MockApi::new();
    let mut app = app_with(api.clone(), ConsoleConfig::default());

    press(&mut app, KeyCode::Char('n'));
    assert!(app.wizard.is_some());
    fill_general_details(&mut app);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.wizard.as_ref().unwrap().controller.index(), 1);

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    settle(&mut app);

    let creates = api.calls().iter().filter(|c| *c == "create_user").count();
    assert_eq!(creates, 1);
    assert!(app.wizard.is_none());
    assert!(api.calls().iter().any(|c| c.starts_with("list_users")));
    assert_eq!(app.users.resources.len(), 1);
    let latest = app.notifications.latest().unwrap();
    assert_eq!(latest.level, AlertLevel::Success);
}

// 4) Going back from the summary keeps what was typed
#[test]
fn wizard_previous_step_keeps_values() {
    let mut app = app_with(MockApi::new(), ConsoleConfig::default());
    press(&mut app, KeyCode::Char('n'));
    fill_general_details(&mut app);
    press(&mut app, KeyCode::Enter);
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));

    let session = app.wizard.as_ref().unwrap();
    assert_eq!(session.controller.index(), 0);
    match &session.content {
        iam_console::wizard::steps::StepContent::GeneralDetails(form) => {
            assert_eq!(form.user_name, "bob");
            assert_eq!(form.email, "bob@x.com");
        }
        other => panic!("unexpected {other:?}"),
    }
    press(&mut app, KeyCode::Esc);
    assert!(app.wizard.is_none());
}

// 5) Failed application delete keeps the confirmation open
#[test]
fn application_delete_failure_keeps_confirmation() {
    let mut api = MockApi::new();
    api.delete_app_result = Err(ApiError::Status {
        status: 500,
        detail: None,
    });
    let config = ConsoleConfig {
        allowed_scopes: "app_update app_delete".into(),
        application_update_scopes: vec!["app_update".into()],
        application_delete_scopes: vec!["app_delete".into()],
        ..ConsoleConfig::default()
    };
    let mut app = app_with(api.clone(), config);
    app.apply_response(Response::Application(Ok(application("Pickup"))));
    assert!(app.settings.as_ref().unwrap().danger_zone().is_some());

    press(&mut app, KeyCode::Char('d'));
    type_text(&mut app, "Pickup");
    press(&mut app, KeyCode::Enter);
    settle(&mut app);

    assert!(api.calls().contains(&"delete_application app-1".to_string()));
    let panel = app.settings.as_ref().unwrap();
    assert!(panel.confirm.is_some());
    let n = app.notifications.latest().unwrap();
    assert_eq!(n.title, "Something went wrong");
    assert_eq!(n.description, "Application deletion failed.");
}

// 6) Protected applications never show the danger zone
#[test]
fn forbidden_application_has_no_danger_zone() {
    let config = ConsoleConfig {
        allowed_scopes: "u d".into(),
        application_update_scopes: vec!["u".into()],
        application_delete_scopes: vec!["d".into()],
        ..ConsoleConfig::default()
    };
    let mut app = app_with(MockApi::new(), config);
    app.apply_response(Response::Application(Ok(application("Console"))));
    assert!(app.settings.as_ref().unwrap().danger_zone().is_none());
    press(&mut app, KeyCode::Char('d'));
    assert!(app.settings.as_ref().unwrap().confirm.is_none());
}

// 7) Application edit sends an update and reloads on success
#[test]
fn application_update_reloads() {
    let api = MockApi::new();
    let mut app = app_with(api.clone(), ConsoleConfig::default());
    app.apply_response(Response::Application(Ok(application("Pickup"))));
    press(&mut app, KeyCode::Char('e'));
    type_text(&mut app, "2");
    press(&mut app, KeyCode::Enter);
    settle(&mut app);

    let calls = api.calls();
    assert!(calls.contains(&"update_application Pickup2".to_string()));
    assert!(calls.contains(&"get_application app-1".to_string()));
    assert!(app.settings.as_ref().unwrap().editor.is_none());
    assert_eq!(app.notifications.latest().unwrap().title, "Update successful");
}

// 8) IdP delete clears the pending target even on failure and refreshes the list
#[test]
fn idp_delete_failure_still_clears_and_refreshes() {
    let mut api = MockApi::new();
    api.delete_idp_result = Err(ApiError::Transport("reset".into()));
    let mut app = app_with(api.clone(), ConsoleConfig::default());
    app.request_identity_providers();
    settle(&mut app);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.active_tab, ActiveTab::IdentityProviders);
    assert_eq!(app.idps.visible().len(), 1);

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.idps.pending.as_ref().unwrap().name, "Google");
    type_text(&mut app, "Google");
    press(&mut app, KeyCode::Enter);
    settle(&mut app);

    assert!(app.idps.pending.is_none());
    assert!(app.idps.confirm.is_none());
    let lists = api
        .calls()
        .iter()
        .filter(|c| *c == "list_identity_providers")
        .count();
    assert_eq!(lists, 2);
    assert_eq!(
        app.notifications.latest().unwrap().title,
        "Identity Provider Delete Error"
    );
}

// 9) IdP search placeholder clears on Enter
#[test]
fn idp_search_placeholder_clears_query() {
    let mut app = app_with(MockApi::new(), ConsoleConfig::default());
    app.request_identity_providers();
    settle(&mut app);
    app.active_tab = ActiveTab::IdentityProviders;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "zzz");
    press(&mut app, KeyCode::Enter);
    assert!(matches!(
        app.idps.placeholder(),
        Some(iam_console::idp::Placeholder::NoSearchResults(_))
    ));
    press(&mut app, KeyCode::Enter);
    assert!(app.idps.placeholder().is_none());
    assert!(app.search_query.is_empty());
}

// 10) Rendering every tab and overlay into a test backend does not panic
#[test]
fn render_all_screens() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut app = app_with(MockApi::new(), ConsoleConfig::default());
    app.refresh_all();
    settle(&mut app);
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

    for _ in 0..3 {
        terminal.draw(|f| iam_console::ui::render(f, &mut app)).unwrap();
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Char('n'));
    terminal.draw(|f| iam_console::ui::render(f, &mut app)).unwrap();
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('?'));
    terminal.draw(|f| iam_console::ui::render(f, &mut app)).unwrap();
    press(&mut app, KeyCode::Esc);
    app.notify(Notification::success("Saved", "All good"));
    app.apply_response(Response::Application(Ok(application("Pickup"))));
    terminal.draw(|f| iam_console::ui::render(f, &mut app)).unwrap();

    // Tiny terminals must not panic either.
    let mut small = Terminal::new(TestBackend::new(20, 6)).unwrap();
    small.draw(|f| iam_console::ui::render(f, &mut app)).unwrap();
}

// 11) Quit is reported to the loop
#[test]
fn q_quits_from_lists() {
    let mut app = app_with(MockApi::new(), ConsoleConfig::default());
    assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
}

// 12) A create that lands after its wizard was closed leaves the next wizard alone
#[test]
fn late_user_created_does_not_close_a_newer_wizard() {
    let api = MockApi::new();
    let mut app = app_with(api.clone(), ConsoleConfig::default());

    press(&mut app, KeyCode::Char('n'));
    fill_general_details(&mut app);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Esc);
    assert!(app.wizard.is_none());

    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Down);
    type_text(&mut app, "carol");
    let second = app.wizard.as_ref().unwrap().id;
    settle(&mut app);

    let session = app.wizard.as_ref().expect("newer wizard must stay open");
    assert_eq!(session.id, second);
    assert!(!session.controller.in_flight());
    match &session.content {
        iam_console::wizard::steps::StepContent::GeneralDetails(form) => {
            assert_eq!(form.user_name, "carol")
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(api.calls().iter().any(|c| c.starts_with("list_users")));
    assert_eq!(
        app.notifications.latest().unwrap().title,
        "User added successfully"
    );
}

// 13) A delete outcome for another application still notifies but keeps the open panel
#[test]
fn late_application_delete_keeps_other_panel_open() {
    let api = MockApi::new();
    let mut app = app_with(api.clone(), ConsoleConfig::default());
    let mut other = application("Billing");
    other.id = "app-2".into();
    app.apply_response(Response::Application(Ok(other)));

    app.apply_response(Response::ApplicationDeleted {
        id: "app-1".into(),
        result: Ok(()),
    });
    settle(&mut app);

    assert_eq!(app.settings.as_ref().unwrap().id(), "app-2");
    assert_eq!(app.notifications.latest().unwrap().title, "Deletion successful");
    assert!(api.calls().contains(&"list_applications".to_string()));
}

// 14) Closing an IdP dialog mid-delete does not let a second delete start, nor lose it
#[test]
fn idp_delete_outcome_only_clears_its_own_target() {
    let mut api = MockApi::new();
    api.idps = vec![idp("1", "Google"), idp("3", "GitHub"), idp("2", "LOCAL")];
    let mut app = app_with(api.clone(), ConsoleConfig::default());
    app.request_identity_providers();
    settle(&mut app);
    app.active_tab = ActiveTab::IdentityProviders;

    press(&mut app, KeyCode::Char('d'));
    type_text(&mut app, "Google");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.idps.deleting.as_deref(), Some("1"));

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('d'));
    type_text(&mut app, "GitHub");
    press(&mut app, KeyCode::Enter);
    settle(&mut app);

    let deletes: Vec<_> = api
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("delete_identity_provider"))
        .collect();
    assert_eq!(deletes, ["delete_identity_provider 1"]);
    assert_eq!(app.idps.pending.as_ref().unwrap().id, "3");
    assert!(app.idps.confirm.is_some());
    assert!(app.idps.deleting.is_none());

    press(&mut app, KeyCode::Enter);
    settle(&mut app);
    assert!(api.calls().contains(&"delete_identity_provider 3".to_string()));
    assert!(app.idps.pending.is_none());
}
