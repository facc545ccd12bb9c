//! Application state types and entry glue.
//!
//! Defines the console's state, the theme, and the methods that turn user
//! intent into worker requests and worker responses back into state. The
//! event loop itself lives in [`update`] (re-exported as `run`).
//!
pub mod config;
pub mod keymap;
pub mod update;

use std::time::Instant;

use ratatui::style::Color;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::api::models::{ApplicationList, UserList};
use crate::api::worker::{Request, Response, Worker};
use crate::application::SettingsPanel;
use crate::gateway::{self, WizardHost};
use crate::idp::IdpListState;
use crate::notify::{Notification, NotificationCenter, Notifier};
use crate::search::{filter_applications, filter_users};
use crate::wizard::WizardController;
use crate::wizard::steps::{StepContent, USER_WIZARD_STEPS, step_content};
use config::ConsoleConfig;
use keymap::Keymap;

pub const THEME_FILE: &str = "theme.conf";

/// Top-level active tab in the UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Users,
    Applications,
    IdentityProviders,
}

impl ActiveTab {
    pub fn next(self) -> Self {
        match self {
            ActiveTab::Users => ActiveTab::Applications,
            ActiveTab::Applications => ActiveTab::IdentityProviders,
            ActiveTab::IdentityProviders => ActiveTab::Users,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Users => "Users",
            ActiveTab::Applications => "Applications",
            ActiveTab::IdentityProviders => "Identity Providers",
        }
    }
}

/// Current input mode for list keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "success" => theme.success = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        theme
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# iam-console theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                other => format!("{other}"),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Load `path` if present, else write the default theme there and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config::config_file_read_path(THEME_FILE) {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            warn!(%path, error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Overlays that take every key until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Help { scroll: u16 },
    Info { message: String },
}

/// The open add-user wizard plus the content of its current step.
#[derive(Clone, Debug)]
pub struct WizardSession {
    /// Distinguishes this session from ones opened before or after it.
    pub id: u64,
    pub controller: WizardController,
    pub content: StepContent,
}

impl WizardSession {
    pub fn new(id: u64, domains: &[String]) -> Self {
        let controller = WizardController::new(&USER_WIZARD_STEPS);
        let content = step_content(controller.steps(), 0, controller.state(), domains)
            .unwrap_or(StepContent::Summary(None));
        Self {
            id,
            controller,
            content,
        }
    }

    /// Rebuild the step content after the controller moved.
    pub fn sync_content(&mut self, domains: &[String]) {
        if let Some(content) = step_content(
            self.controller.steps(),
            self.controller.index(),
            self.controller.state(),
            domains,
        ) {
            self.content = content;
        }
    }
}

/// Server-side paging of one list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Paging {
    pub offset: usize,
    pub limit: usize,
}

impl Paging {
    pub fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    pub fn next(&mut self, total: usize) -> bool {
        if self.offset + self.limit >= total {
            return false;
        }
        self.offset += self.limit;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.limit);
        true
    }

    /// 1-based page number and page count for display.
    pub fn page_of(&self, total: usize) -> (usize, usize) {
        (self.offset / self.limit + 1, total.div_ceil(self.limit).max(1))
    }
}

/// Refresh-and-close side of a user creation, borrowing only what it touches
/// so the notification queue can be borrowed alongside.
struct UsersTabHost<'a> {
    worker: &'a mut Worker,
    wizard: &'a mut Option<WizardSession>,
    /// Session that submitted the user; only that one is closed.
    session: u64,
    paging: Paging,
}

impl WizardHost for UsersTabHost<'_> {
    fn refresh_list(&mut self) {
        self.worker.send(Request::ListUsers {
            offset: self.paging.offset,
            limit: self.paging.limit,
        });
    }

    fn close_wizard(&mut self) {
        if self.wizard.as_ref().is_some_and(|w| w.id == self.session) {
            *self.wizard = None;
        }
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub config: ConsoleConfig,
    /// OS account running the console, shown in the header.
    pub operator: String,
    pub active_tab: ActiveTab,
    pub users: UserList,
    pub users_paging: Paging,
    pub selected_user_index: usize,
    pub applications: ApplicationList,
    pub applications_paging: Paging,
    pub selected_app_index: usize,
    pub idps: IdpListState,
    pub idps_paging: Paging,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub wizard: Option<WizardSession>,
    next_session: u64,
    pub settings: Option<SettingsPanel>,
    /// An update or delete for the open settings panel is outstanding.
    pub settings_busy: bool,
    /// Last route handed to outer navigation.
    pub route: Option<String>,
    pub notifications: NotificationCenter,
    pub worker: Worker,
}

impl AppState {
    pub fn new(config: ConsoleConfig, worker: Worker) -> Self {
        let limit = config.list_item_limit;
        let operator = users::get_current_username()
            .map(|u| u.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            started_at: Instant::now(),
            operator,
            active_tab: ActiveTab::Users,
            users: UserList::default(),
            users_paging: Paging::new(limit),
            selected_user_index: 0,
            applications: ApplicationList::default(),
            applications_paging: Paging::new(limit),
            selected_app_index: 0,
            idps: IdpListState::new(config.do_not_delete_identity_providers.clone()),
            idps_paging: Paging::new(limit),
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme: Theme::default(),
            keymap: Keymap::default(),
            modal: None,
            wizard: None,
            next_session: 0,
            settings: None,
            settings_busy: false,
            route: None,
            notifications: NotificationCenter::default(),
            worker,
            config,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn request_users(&mut self) {
        self.worker.send(Request::ListUsers {
            offset: self.users_paging.offset,
            limit: self.users_paging.limit,
        });
    }

    pub fn request_applications(&mut self) {
        self.worker.send(Request::ListApplications {
            offset: self.applications_paging.offset,
            limit: self.applications_paging.limit,
        });
    }

    pub fn request_identity_providers(&mut self) {
        self.worker.send(Request::ListIdentityProviders {
            offset: self.idps_paging.offset,
            limit: self.idps_paging.limit,
        });
    }

    pub fn refresh_current(&mut self) {
        match self.active_tab {
            ActiveTab::Users => self.request_users(),
            ActiveTab::Applications => self.request_applications(),
            ActiveTab::IdentityProviders => self.request_identity_providers(),
        }
    }

    pub fn refresh_all(&mut self) {
        self.request_users();
        self.request_applications();
        self.request_identity_providers();
    }

    pub fn switch_tab(&mut self) {
        self.active_tab = self.active_tab.next();
        self.search_query.clear();
        self.idps.clear_search();
        self.input_mode = InputMode::Normal;
        debug!(tab = ?self.active_tab, "switched tab");
    }

    /// Indices into `users.resources` that pass the search.
    pub fn visible_users(&self) -> Vec<usize> {
        filter_users(&self.users.resources, &self.search_query)
    }

    pub fn visible_applications(&self) -> Vec<usize> {
        filter_applications(&self.applications.applications, &self.search_query)
    }

    /// Feed the search box into whichever tab is showing.
    pub fn apply_search(&mut self) {
        match self.active_tab {
            ActiveTab::Users => self.selected_user_index = 0,
            ActiveTab::Applications => self.selected_app_index = 0,
            ActiveTab::IdentityProviders => self.idps.set_search(&self.search_query),
        }
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.apply_search();
    }

    pub fn open_wizard(&mut self) {
        if self.wizard.is_some() {
            return;
        }
        self.next_session += 1;
        info!(session = self.next_session, "opening add-user wizard");
        self.wizard = Some(WizardSession::new(
            self.next_session,
            &self.config.user_store_domains,
        ));
    }

    pub fn close_wizard(&mut self) {
        if self.wizard.take().is_some() {
            info!("add-user wizard closed");
        }
    }

    /// Hand the wizard's summary to the worker, once.
    pub fn submit_wizard(&mut self) {
        let Some(session) = self.wizard.as_mut() else {
            return;
        };
        let Some(summary) = session.controller.begin_submission() else {
            return;
        };
        match gateway::prepare_user_payload(&summary) {
            Ok(payload) => {
                info!(user = %payload.user_name, "creating user");
                self.worker.send(Request::CreateUser {
                    session: session.id,
                    payload,
                });
            }
            Err(e) => {
                warn!(error = %e, "wizard summary does not describe a user");
                session.controller.end_submission();
                self.notifications.notify(gateway::malformed_summary_notification());
            }
        }
    }

    pub fn open_application(&mut self, id: &str) {
        info!(app = %id, "loading application settings");
        self.worker.send(Request::GetApplication(id.to_string()));
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
        self.settings_busy = false;
    }

    pub fn show_route(&mut self, route: String) {
        info!(%route, "navigate");
        self.modal = Some(ModalState::Info {
            message: format!("Navigate to {route}"),
        });
        self.input_mode = InputMode::Modal;
        self.route = Some(route);
    }

    fn load_failed(&mut self, what: &str, err: &ApiError) {
        warn!(what, error = %err, "load failed");
        self.notifications
            .notify(Notification::error(format!("Couldn't load {what}"), err.to_string()));
    }

    /// Apply a finished request to the state.
    pub fn apply_response(&mut self, response: Response) {
        match response {
            Response::Users(Ok(list)) => {
                debug!(total = list.total_results, "users loaded");
                self.users = list;
                let n = self.visible_users().len();
                self.selected_user_index = self.selected_user_index.min(n.saturating_sub(1));
            }
            Response::Users(Err(e)) => self.load_failed("users", &e),
            Response::UserCreated { session, result } => {
                match self.wizard.as_mut().filter(|w| w.id == session) {
                    Some(open) => open.controller.end_submission(),
                    None => debug!(session, "user created for a wizard that is no longer open"),
                }
                let mut host = UsersTabHost {
                    worker: &mut self.worker,
                    wizard: &mut self.wizard,
                    session,
                    paging: self.users_paging,
                };
                gateway::settle(result, &mut host, &mut self.notifications);
            }
            Response::Applications(Ok(list)) => {
                debug!(total = list.total_results, "applications loaded");
                self.applications = list;
                let n = self.visible_applications().len();
                self.selected_app_index = self.selected_app_index.min(n.saturating_sub(1));
            }
            Response::Applications(Err(e)) => self.load_failed("applications", &e),
            Response::Application(Ok(app)) => {
                self.settings = Some(SettingsPanel::new(app, &self.config));
                self.settings_busy = false;
            }
            Response::Application(Err(e)) => self.load_failed("the application", &e),
            Response::ApplicationUpdated { id, result } => {
                let Some(panel) = self.settings.as_mut().filter(|p| p.id() == id) else {
                    debug!(app = %id, "update outcome for a panel that is no longer open");
                    if gateway::report(gateway::Operation::UpdateApplication, &result, &mut self.notifications) {
                        self.request_applications();
                    }
                    return;
                };
                self.settings_busy = false;
                if panel.resolve_update(result, &mut self.notifications) {
                    self.open_application(&id);
                    self.request_applications();
                }
            }
            Response::ApplicationDeleted { id, result } => {
                let Some(panel) = self.settings.as_mut().filter(|p| p.id() == id) else {
                    debug!(app = %id, "delete outcome for a panel that is no longer open");
                    if gateway::report(gateway::Operation::DeleteApplication, &result, &mut self.notifications) {
                        self.request_applications();
                    }
                    return;
                };
                self.settings_busy = false;
                if panel.resolve_delete(result, &mut self.notifications) {
                    self.close_settings();
                    self.request_applications();
                }
            }
            Response::IdentityProviders(Ok(list)) => {
                debug!(total = list.total_results, "identity providers loaded");
                self.idps.set_list(list);
            }
            Response::IdentityProviders(Err(e)) => self.load_failed("identity providers", &e),
            Response::IdentityProviderDeleted { id, result } => {
                self.idps.resolve_delete(&id, result, &mut self.notifications);
                self.request_identity_providers();
            }
        }
    }

    /// Drain every response the worker has finished.
    pub fn drain_responses(&mut self) {
        while let Some(response) = self.worker.try_recv() {
            self.apply_response(response);
        }
        self.notifications.prune(Instant::now());
    }
}

impl Notifier for AppState {
    fn notify(&mut self, notification: Notification) {
        self.notifications.notify(notification);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
