//! Client-side search over the rows already fetched for a tab.
//!
//! Queries are expected lowercased; an empty query matches everything.
use crate::api::models::{ApplicationSummary, IdentityProvider, User};

fn contains(field: &str, q: &str) -> bool {
    field.to_lowercase().contains(q)
}

pub fn matches_user(user: &User, q: &str) -> bool {
    q.is_empty()
        || contains(&user.user_name, q)
        || contains(&user.display_name(), q)
        || user.emails.iter().any(|e| contains(e.value(), q))
}

pub fn matches_application(app: &ApplicationSummary, q: &str) -> bool {
    q.is_empty()
        || contains(&app.name, q)
        || app.description.as_deref().is_some_and(|d| contains(d, q))
}

pub fn matches_identity_provider(idp: &IdentityProvider, q: &str) -> bool {
    q.is_empty()
        || contains(&idp.name, q)
        || idp.description.as_deref().is_some_and(|d| contains(d, q))
}

/// Indices of `users` matching `query` (any case).
pub fn filter_users(users: &[User], query: &str) -> Vec<usize> {
    let q = query.to_lowercase();
    users
        .iter()
        .enumerate()
        .filter(|(_, u)| matches_user(u, &q))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_applications(apps: &[ApplicationSummary], query: &str) -> Vec<usize> {
    let q = query.to_lowercase();
    apps.iter()
        .enumerate()
        .filter(|(_, a)| matches_application(a, &q))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{EmailEntry, ScimName};

    fn mk_user(user_name: &str, given: &str, email: &str) -> User {
        User {
            id: format!("id-{user_name}"),
            user_name: user_name.to_string(),
            name: Some(ScimName {
                given_name: Some(given.to_string()),
                family_name: Some("Tables".to_string()),
            }),
            emails: vec![EmailEntry::Plain(email.to_string())],
        }
    }

    #[test]
    fn search_users_filters_by_multiple_fields() {
        let users = vec![
            mk_user("PRIMARY/alice", "Alice", "alice@example.com"),
            mk_user("PRIMARY/bob", "Bobby", "rt@corp.example"),
        ];
        assert_eq!(filter_users(&users, "bOb"), [1]);
        assert_eq!(filter_users(&users, "corp.EXAMPLE"), [1]);
        assert_eq!(filter_users(&users, "tables"), [0, 1]);
        assert_eq!(filter_users(&users, ""), [0, 1]);
    }

    #[test]
    fn search_applications_uses_name_and_description() {
        let apps = vec![
            ApplicationSummary {
                id: "1".into(),
                name: "Pickup".into(),
                description: Some("Cab booking".into()),
                access_url: None,
            },
            ApplicationSummary {
                id: "2".into(),
                name: "Console".into(),
                description: None,
                access_url: None,
            },
        ];
        assert_eq!(filter_applications(&apps, "cab"), [0]);
        assert_eq!(filter_applications(&apps, "CONS"), [1]);
        assert!(filter_applications(&apps, "zzz").is_empty());
    }

    #[test]
    fn identity_provider_match_is_case_insensitive() {
        let idp = IdentityProvider {
            id: "1".into(),
            name: "Google".into(),
            description: Some("Social login".into()),
            is_enabled: true,
            image: None,
        };
        assert!(matches_identity_provider(&idp, "goo"));
        assert!(matches_identity_provider(&idp, "social"));
        assert!(!matches_identity_provider(&idp, "github"));
    }
}
