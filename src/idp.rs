//! Identity provider list: visible rows, placeholders and the delete flow.
use tracing::debug;

use crate::api::ApiError;
use crate::api::models::{IdentityProvider, IdentityProviderList};
use crate::confirm::Confirmation;
use crate::gateway::{Operation, report};
use crate::notify::Notifier;
use crate::search::matches_identity_provider;

/// Resident IdP managed by the server itself; never listed.
pub const RESIDENT_IDP_NAME: &str = "LOCAL";

/// Shown instead of rows when nothing is visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placeholder {
    /// A search matched nothing; its action clears the query.
    NoSearchResults(String),
    /// There are no IdPs at all; its action starts creating one.
    EmptyList,
}

/// Routes handed to the outer navigation.
pub fn edit_route(id: &str) -> String {
    format!("identity-providers/{id}")
}

pub const NEW_IDP_ROUTE: &str = "identity-providers/new";

#[derive(Clone, Debug, Default)]
pub struct IdpListState {
    pub list: IdentityProviderList,
    pub search_query: String,
    pub selected: usize,
    /// The one IdP awaiting delete confirmation.
    pub pending: Option<IdentityProvider>,
    pub confirm: Option<Confirmation>,
    /// Id of the IdP whose delete request has been sent and not answered yet.
    /// Outlives a cancelled dialog so only one delete is ever outstanding.
    pub deleting: Option<String>,
    protected: Vec<String>,
}

impl IdpListState {
    pub fn new(protected: Vec<String>) -> Self {
        Self {
            protected,
            ..Self::default()
        }
    }

    pub fn set_list(&mut self, list: IdentityProviderList) {
        self.list = list;
        self.clamp_selection();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    /// Rows to list: everything except the resident IdP, narrowed by the search.
    pub fn visible(&self) -> Vec<&IdentityProvider> {
        let q = self.search_query.to_lowercase();
        self.list
            .identity_providers
            .iter()
            .filter(|idp| idp.name != RESIDENT_IDP_NAME)
            .filter(|idp| matches_identity_provider(idp, &q))
            .collect()
    }

    pub fn selected_idp(&self) -> Option<&IdentityProvider> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let n = self.visible().len();
        if n == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(n - 1);
    }

    fn clamp_selection(&mut self) {
        let n = self.visible().len();
        self.selected = self.selected.min(n.saturating_sub(1));
    }

    /// Edit and delete are withheld for IdPs the deployment protects.
    pub fn actions_hidden(&self, idp: &IdentityProvider) -> bool {
        self.protected.iter().any(|p| *p == idp.name)
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        if !self.visible().is_empty() {
            return None;
        }
        if !self.search_query.is_empty() {
            return Some(Placeholder::NoSearchResults(self.search_query.clone()));
        }
        if self.list.total_results == 0 {
            return Some(Placeholder::EmptyList);
        }
        None
    }

    /// Route for editing `id`, unless its actions are hidden.
    pub fn edit(&self, id: &str) -> Option<String> {
        let idp = self.list.identity_providers.iter().find(|i| i.id == id)?;
        if self.actions_hidden(idp) {
            return None;
        }
        Some(edit_route(id))
    }

    /// Mark `id` for deletion and open the confirmation.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        let Some(idp) = self.list.identity_providers.iter().find(|i| i.id == id) else {
            return false;
        };
        if self.actions_hidden(idp) {
            debug!(idp = %idp.name, "delete hidden for protected identity provider");
            return false;
        }
        self.confirm = Some(Confirmation::new(idp.name.clone()));
        self.pending = Some(idp.clone());
        true
    }

    /// Id to delete once the typed name matches the pending IdP.
    pub fn confirm_delete(&self) -> Option<String> {
        let confirm = self.confirm.as_ref()?;
        if self.deleting.is_some() || !confirm.is_confirmable() {
            return None;
        }
        self.pending.as_ref().map(|idp| idp.id.clone())
    }

    /// Close the dialog. A delete already sent stays outstanding.
    pub fn cancel_delete(&mut self) {
        self.confirm = None;
        self.pending = None;
    }

    /// Report the outcome for `id`, then clear the selection and dialog
    /// whatever happened, as long as they still point at `id`.
    /// The caller refreshes the list afterwards.
    pub fn resolve_delete(
        &mut self,
        id: &str,
        result: Result<(), ApiError>,
        notifier: &mut impl Notifier,
    ) -> bool {
        let ok = report(Operation::DeleteIdentityProvider, &result, notifier);
        if self.deleting.as_deref() == Some(id) {
            self.deleting = None;
        }
        if self.pending.as_ref().is_some_and(|idp| idp.id == id) {
            self.cancel_delete();
        } else {
            debug!(idp = %id, "delete outcome for a target no longer pending");
        }
        ok
    }
}
