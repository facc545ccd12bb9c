//! Scope checks gating read-only forms and destructive actions.

/// True when every required scope is granted. `allowed` is the space-separated
/// scope string of the operator's token; an empty requirement always passes.
pub fn has_required_scopes<S: AsRef<str>>(required: &[S], allowed: &str) -> bool {
    required
        .iter()
        .all(|scope| allowed.split_whitespace().any(|granted| granted == scope.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirement_passes() {
        assert!(has_required_scopes::<&str>(&[], ""));
    }

    #[test]
    fn every_scope_must_be_granted_as_a_whole_token() {
        let allowed = "internal_application_mgt_view internal_application_mgt_update";
        assert!(has_required_scopes(&["internal_application_mgt_update"], allowed));
        assert!(!has_required_scopes(
            &["internal_application_mgt_update", "internal_application_mgt_delete"],
            allowed
        ));
        assert!(!has_required_scopes(&["internal_application_mgt"], allowed));
    }
}
