//! The "basic user details" form shown on the first wizard step.
use serde::Serialize;
use serde_json::Value;

use super::state::FieldValues;
use crate::scim::{ASK_PASSWORD_OPTION, CREATE_PASSWORD_OPTION, PRIMARY_DOMAIN};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UserField {
    Domain,
    UserName,
    FirstName,
    LastName,
    Email,
    PasswordOption,
    NewPassword,
    ConfirmPassword,
}

impl UserField {
    pub fn label(self) -> &'static str {
        match self {
            UserField::Domain => "User store",
            UserField::UserName => "Username",
            UserField::FirstName => "First name",
            UserField::LastName => "Last name",
            UserField::Email => "Email",
            UserField::PasswordOption => "Password",
            UserField::NewPassword => "New password",
            UserField::ConfirmPassword => "Confirm password",
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, UserField::Domain | UserField::PasswordOption)
    }

    pub fn is_secret(self) -> bool {
        matches!(self, UserField::NewPassword | UserField::ConfirmPassword)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PasswordOption {
    AskPassword,
    CreatePassword,
}

impl PasswordOption {
    pub fn as_str(self) -> &'static str {
        match self {
            PasswordOption::AskPassword => ASK_PASSWORD_OPTION,
            PasswordOption::CreatePassword => CREATE_PASSWORD_OPTION,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            PasswordOption::AskPassword => "Ask user to set their own password",
            PasswordOption::CreatePassword => "Set a password for the user",
        }
    }

    fn toggled(self) -> Self {
        match self {
            PasswordOption::AskPassword => PasswordOption::CreatePassword,
            PasswordOption::CreatePassword => PasswordOption::AskPassword,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: UserField,
    pub message: String,
}

/// Validated output of the form, serialised under the wire names the summary uses.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralDetails {
    pub domain: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl GeneralDetails {
    pub fn into_values(self) -> FieldValues {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => FieldValues::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserForm {
    pub domains: Vec<String>,
    pub domain_index: usize,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_option: PasswordOption,
    pub new_password: String,
    pub confirm_password: String,
    pub focus: usize,
    pub errors: Vec<FieldError>,
}

impl UserForm {
    pub fn new(domains: &[String]) -> Self {
        let domains = if domains.is_empty() {
            vec![PRIMARY_DOMAIN.to_string()]
        } else {
            domains.to_vec()
        };
        Self {
            domains,
            domain_index: 0,
            user_name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password_option: PasswordOption::AskPassword,
            new_password: String::new(),
            confirm_password: String::new(),
            focus: 0,
            errors: Vec::new(),
        }
    }

    /// Re-open the form with values recorded on an earlier pass.
    pub fn from_values(domains: &[String], values: &FieldValues) -> Self {
        let mut form = Self::new(domains);
        let text = |key: &str| {
            values
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        if let Some(idx) = form.domains.iter().position(|d| *d == text("domain")) {
            form.domain_index = idx;
        }
        form.user_name = text("userName");
        form.first_name = text("firstName");
        form.last_name = text("lastName");
        form.email = text("email");
        if text("passwordOption") == CREATE_PASSWORD_OPTION {
            form.password_option = PasswordOption::CreatePassword;
            form.new_password = text("newPassword");
            form.confirm_password = form.new_password.clone();
        }
        form
    }

    pub fn domain(&self) -> &str {
        self.domains
            .get(self.domain_index)
            .map(String::as_str)
            .unwrap_or(PRIMARY_DOMAIN)
    }

    /// Fields currently on screen; password inputs only when one is being set.
    pub fn visible_fields(&self) -> Vec<UserField> {
        let mut fields = vec![
            UserField::Domain,
            UserField::UserName,
            UserField::FirstName,
            UserField::LastName,
            UserField::Email,
            UserField::PasswordOption,
        ];
        if self.password_option == PasswordOption::CreatePassword {
            fields.push(UserField::NewPassword);
            fields.push(UserField::ConfirmPassword);
        }
        fields
    }

    pub fn focused_field(&self) -> UserField {
        let fields = self.visible_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let n = self.visible_fields().len();
        self.focus = (self.focus + 1) % n;
    }

    pub fn focus_prev(&mut self) {
        let n = self.visible_fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    /// Display value for a field; secrets are masked.
    pub fn display_value(&self, field: UserField) -> String {
        match field {
            UserField::Domain => self.domain().to_string(),
            UserField::UserName => self.user_name.clone(),
            UserField::FirstName => self.first_name.clone(),
            UserField::LastName => self.last_name.clone(),
            UserField::Email => self.email.clone(),
            UserField::PasswordOption => self.password_option.describe().to_string(),
            UserField::NewPassword => "*".repeat(self.new_password.chars().count()),
            UserField::ConfirmPassword => "*".repeat(self.confirm_password.chars().count()),
        }
    }

    pub fn error_for(&self, field: UserField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn text_mut(&mut self, field: UserField) -> Option<&mut String> {
        match field {
            UserField::UserName => Some(&mut self.user_name),
            UserField::FirstName => Some(&mut self.first_name),
            UserField::LastName => Some(&mut self.last_name),
            UserField::Email => Some(&mut self.email),
            UserField::NewPassword => Some(&mut self.new_password),
            UserField::ConfirmPassword => Some(&mut self.confirm_password),
            UserField::Domain | UserField::PasswordOption => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.focused_field();
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        } else if c == ' ' {
            self.cycle(true);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Step a choice field forward or back; no-op on text fields.
    pub fn cycle(&mut self, forward: bool) {
        match self.focused_field() {
            UserField::Domain => {
                let n = self.domains.len();
                self.domain_index = if forward {
                    (self.domain_index + 1) % n
                } else {
                    (self.domain_index + n - 1) % n
                };
            }
            UserField::PasswordOption => {
                self.password_option = self.password_option.toggled();
            }
            _ => {}
        }
    }

    /// Check every field, keeping the errors for display. `Some` when the step may complete.
    pub fn validate(&mut self) -> Option<GeneralDetails> {
        let mut errors: Vec<FieldError> = [
            (UserField::UserName, &self.user_name),
            (UserField::FirstName, &self.first_name),
            (UserField::LastName, &self.last_name),
            (UserField::Email, &self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| required(field, value))
        .collect();

        if self.user_name.contains('/') {
            errors.push(FieldError {
                field: UserField::UserName,
                message: "Username cannot contain '/'".to_string(),
            });
        }
        if !self.email.trim().is_empty() && !is_valid_email(self.email.trim()) {
            errors.push(FieldError {
                field: UserField::Email,
                message: "Enter a valid email address".to_string(),
            });
        }

        let new_password = match self.password_option {
            PasswordOption::AskPassword => None,
            PasswordOption::CreatePassword => {
                if self.new_password.chars().count() < MIN_PASSWORD_LEN {
                    errors.push(FieldError {
                        field: UserField::NewPassword,
                        message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                    });
                } else if self.new_password != self.confirm_password {
                    errors.push(FieldError {
                        field: UserField::ConfirmPassword,
                        message: "Passwords do not match".to_string(),
                    });
                }
                Some(self.new_password.clone())
            }
        };

        self.errors = errors;
        if !self.errors.is_empty() {
            return None;
        }
        Some(GeneralDetails {
            domain: self.domain().to_string(),
            user_name: self.user_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password_option: self.password_option.as_str().to_string(),
            new_password,
        })
    }
}

fn required(field: UserField, value: &str) -> Option<FieldError> {
    value.trim().is_empty().then(|| FieldError {
        field,
        message: format!("{} is required", field.label()),
    })
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
