//! SCIM user-creation payload and the policy that shapes it.
//!
//! The payload is consumed by a fixed server endpoint, so field names, the
//! placeholder password and the enterprise extension block must stay exactly
//! as they are here.
use serde::{Deserialize, Serialize};

use crate::wizard::state::Summary;

/// Domain value that means "the primary user store"; no prefix is added for it.
pub const PRIMARY_DOMAIN: &str = "primary";
/// Password option asking the user to set their own password out-of-band.
pub const ASK_PASSWORD_OPTION: &str = "askPw";
/// Password option carrying a password chosen by the administrator.
pub const CREATE_PASSWORD_OPTION: &str = "createPw";
/// Credential stored while the user is still to pick their own.
pub const PLACEHOLDER_PASSWORD: &str = "password";
pub const ENTERPRISE_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Email {
    pub primary: bool,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub family_name: String,
    pub given_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseExtension {
    /// The server expects the string `"true"`, not a boolean.
    pub ask_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub emails: Vec<Email>,
    pub name: PersonName,
    /// Absent when a direct password was chosen but none was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(
        rename = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enterprise: Option<EnterpriseExtension>,
    pub user_name: String,
}

/// Typed view over the wizard summary, keyed by the form's wire names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password_option: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl UserDetails {
    pub fn from_summary(summary: &Summary) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(summary.as_map().clone()))
    }

    /// `domain/userName` for secondary user stores, bare `userName` for the primary one.
    pub fn qualified_user_name(&self) -> String {
        if self.domain != PRIMARY_DOMAIN {
            format!("{}/{}", self.domain, self.user_name)
        } else {
            self.user_name.clone()
        }
    }

    /// True when the administrator supplied the password directly.
    pub fn sets_password_directly(&self) -> bool {
        matches!(self.password_option.as_deref(), Some(opt) if !opt.is_empty() && opt != ASK_PASSWORD_OPTION)
    }
}

pub fn build_user_payload(details: &UserDetails) -> UserPayload {
    let emails = vec![Email {
        primary: true,
        value: details.email.clone(),
    }];
    let name = PersonName {
        family_name: details.last_name.clone(),
        given_name: details.first_name.clone(),
    };
    let user_name = details.qualified_user_name();

    if details.sets_password_directly() {
        UserPayload {
            emails,
            name,
            password: details.new_password.clone(),
            enterprise: None,
            user_name,
        }
    } else {
        UserPayload {
            emails,
            name,
            password: Some(PLACEHOLDER_PASSWORD.to_string()),
            enterprise: Some(EnterpriseExtension {
                ask_password: "true".to_string(),
            }),
            user_name,
        }
    }
}
