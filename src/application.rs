//! General settings of a single application: the edit form and the danger zone.
use tracing::debug;

use crate::api::ApiError;
use crate::api::models::{AdvancedConfigurationsUpdate, Application, ApplicationUpdate, Certificate};
use crate::app::config::ConsoleConfig;
use crate::confirm::Confirmation;
use crate::gateway::{Operation, report};
use crate::notify::Notifier;
use crate::scope::has_required_scopes;

/// Copy shown for the delete action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DangerZone {
    pub header: &'static str,
    pub action_title: &'static str,
    pub title: &'static str,
    pub subheader: &'static str,
}

const DELETE_APPLICATION_ZONE: DangerZone = DangerZone {
    header: "Danger Zone",
    action_title: "Delete",
    title: "Delete application",
    subheader: "Once you delete an application, there is no going back. Please be certain.",
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AppField {
    Name,
    Description,
    ImageUrl,
    AccessUrl,
    Discoverable,
}

impl AppField {
    pub const ALL: [AppField; 5] = [
        AppField::Name,
        AppField::Description,
        AppField::ImageUrl,
        AppField::AccessUrl,
        AppField::Discoverable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AppField::Name => "Name",
            AppField::Description => "Description",
            AppField::ImageUrl => "Image URL",
            AppField::AccessUrl => "Access URL",
            AppField::Discoverable => "Discoverable",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApplicationForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub access_url: String,
    pub discoverable: bool,
    pub certificate: Option<Certificate>,
    pub focus: usize,
    pub errors: Vec<(AppField, String)>,
}

impl ApplicationForm {
    pub fn from_application(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            description: app.description.clone().unwrap_or_default(),
            image_url: app.image_url.clone().unwrap_or_default(),
            access_url: app.access_url.clone().unwrap_or_default(),
            discoverable: app.advanced_configurations.discoverable_by_end_users,
            certificate: app.advanced_configurations.certificate.clone(),
            focus: 0,
            errors: Vec::new(),
        }
    }

    pub fn focused(&self) -> AppField {
        AppField::ALL[self.focus % AppField::ALL.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % AppField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + AppField::ALL.len() - 1) % AppField::ALL.len();
    }

    pub fn value(&self, field: AppField) -> String {
        match field {
            AppField::Name => self.name.clone(),
            AppField::Description => self.description.clone(),
            AppField::ImageUrl => self.image_url.clone(),
            AppField::AccessUrl => self.access_url.clone(),
            AppField::Discoverable => if self.discoverable { "[x]" } else { "[ ]" }.to_string(),
        }
    }

    fn text_mut(&mut self, field: AppField) -> Option<&mut String> {
        match field {
            AppField::Name => Some(&mut self.name),
            AppField::Description => Some(&mut self.description),
            AppField::ImageUrl => Some(&mut self.image_url),
            AppField::AccessUrl => Some(&mut self.access_url),
            AppField::Discoverable => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.focused();
        match self.text_mut(field) {
            Some(text) => text.push(c),
            None if c == ' ' => self.discoverable = !self.discoverable,
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    pub fn error_for(&self, field: AppField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn validate(&mut self, id: &str) -> Option<ApplicationUpdate> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push((AppField::Name, "Application name is required".to_string()));
        }
        for (field, url) in [
            (AppField::ImageUrl, &self.image_url),
            (AppField::AccessUrl, &self.access_url),
        ] {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.push((field, "Enter a valid http(s) URL".to_string()));
            }
        }
        self.errors = errors;
        if !self.errors.is_empty() {
            return None;
        }
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Some(ApplicationUpdate {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            image_url: optional(&self.image_url),
            access_url: optional(&self.access_url),
            advanced_configurations: AdvancedConfigurationsUpdate {
                discoverable_by_end_users: self.discoverable,
                certificate: self.certificate.clone(),
            },
        })
    }
}

/// General settings panel for the application being edited.
#[derive(Clone, Debug)]
pub struct SettingsPanel {
    pub application: Application,
    can_update: bool,
    can_delete: bool,
    delete_forbidden: bool,
    pub editor: Option<ApplicationForm>,
    pub confirm: Option<Confirmation>,
}

impl SettingsPanel {
    pub fn new(application: Application, config: &ConsoleConfig) -> Self {
        let allowed = config.allowed_scopes.as_str();
        let delete_forbidden = config
            .deleting_forbidden_applications
            .iter()
            .any(|n| *n == application.name);
        Self {
            can_update: has_required_scopes(&config.application_update_scopes, allowed),
            can_delete: has_required_scopes(&config.application_delete_scopes, allowed),
            delete_forbidden,
            application,
            editor: None,
            confirm: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.application.id
    }

    pub fn read_only(&self) -> bool {
        !self.can_update
    }

    /// Shown only to operators who may both update and delete, and never for
    /// applications the server relies on.
    pub fn danger_zone(&self) -> Option<&'static DangerZone> {
        if !self.can_update || self.delete_forbidden || !self.can_delete {
            return None;
        }
        Some(&DELETE_APPLICATION_ZONE)
    }

    /// Open the edit form. Refused for read-only operators.
    pub fn open_editor(&mut self) -> bool {
        if self.read_only() {
            return false;
        }
        self.editor = Some(ApplicationForm::from_application(&self.application));
        true
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validated update from the open editor, if any.
    pub fn submit_editor(&mut self) -> Option<ApplicationUpdate> {
        let id = self.application.id.clone();
        self.editor.as_mut()?.validate(&id)
    }

    /// Apply an update outcome. `true` means the caller should reload the application.
    pub fn resolve_update(&mut self, result: Result<(), ApiError>, notifier: &mut impl Notifier) -> bool {
        let ok = report(Operation::UpdateApplication, &result, notifier);
        if ok {
            self.editor = None;
        }
        ok
    }

    pub fn request_delete(&mut self) -> bool {
        if self.danger_zone().is_none() {
            debug!(app = %self.application.name, "delete not offered");
            return false;
        }
        self.confirm = Some(Confirmation::new(self.application.name.clone()));
        true
    }

    /// Id to delete once the typed name matches.
    pub fn confirm_delete(&self) -> Option<String> {
        self.confirm
            .as_ref()
            .filter(|c| c.is_confirmable())
            .map(|_| self.application.id.clone())
    }

    pub fn cancel_delete(&mut self) {
        self.confirm = None;
    }

    /// Apply a delete outcome. On failure the confirmation stays open for a retry.
    /// `true` means the caller should refresh the application list.
    pub fn resolve_delete(&mut self, result: Result<(), ApiError>, notifier: &mut impl Notifier) -> bool {
        let ok = report(Operation::DeleteApplication, &result, notifier);
        if ok {
            self.confirm = None;
        }
        ok
    }
}
