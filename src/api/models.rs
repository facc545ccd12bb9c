//! Wire shapes returned by (or sent to) the identity server.
use serde::{Deserialize, Serialize};

/// SCIM `emails` entries come back either as bare strings or as typed objects.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmailEntry {
    Plain(String),
    Typed {
        value: String,
        #[serde(default)]
        primary: Option<bool>,
    },
}

impl EmailEntry {
    pub fn value(&self) -> &str {
        match self {
            EmailEntry::Plain(v) => v,
            EmailEntry::Typed { value, .. } => value,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub name: Option<ScimName>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
}

impl User {
    pub fn display_name(&self) -> String {
        let Some(name) = &self.name else {
            return String::new();
        };
        [name.given_name.as_deref(), name.family_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The primary email if flagged, otherwise the first one listed.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| matches!(e, EmailEntry::Typed { primary: Some(true), .. }))
            .or_else(|| self.emails.first())
            .map(EmailEntry::value)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserList {
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub start_index: usize,
    #[serde(default, rename = "Resources")]
    pub resources: Vec<User>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Certificate {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfigurations {
    #[serde(default)]
    pub discoverable_by_end_users: bool,
    #[serde(default)]
    pub certificate: Option<Certificate>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub access_url: Option<String>,
    #[serde(default)]
    pub advanced_configurations: AdvancedConfigurations,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub access_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationList {
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub applications: Vec<ApplicationSummary>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfigurationsUpdate {
    pub discoverable_by_end_users: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,
}

/// Body of `PATCH /applications/{id}`; `id` only addresses the resource.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_url: Option<String>,
    pub advanced_configurations: AdvancedConfigurationsUpdate,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderList {
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
}
