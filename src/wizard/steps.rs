//! Declarative step list for the add-user wizard and the lookup that turns a
//! step index into something to render.
use super::form::UserForm;
use super::state::{Summary, WizardState};

/// Closed set of steps. Declaration order is display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    GeneralDetails,
    Summary,
}

impl StepId {
    /// Tag under which the step's values are recorded.
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::GeneralDetails => "GeneralDetails",
            StepId::Summary => "summary",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepIcon {
    General,
    Summary,
}

impl StepIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            StepIcon::General => "👤",
            StepIcon::Summary => "✔",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: StepId,
    pub title: &'static str,
    pub icon: StepIcon,
}

pub const USER_WIZARD_STEPS: [StepDescriptor; 2] = [
    StepDescriptor {
        id: StepId::GeneralDetails,
        title: "Basic user details",
        icon: StepIcon::General,
    },
    StepDescriptor {
        id: StepId::Summary,
        title: "Summary",
        icon: StepIcon::Summary,
    },
];

/// What the active step renders.
#[derive(Clone, Debug)]
pub enum StepContent {
    GeneralDetails(UserForm),
    Summary(Option<Summary>),
}

/// Build the content for step `index` of `steps`, seeded from what the wizard
/// already holds.
///
/// Returns `None` for an index outside the step list.
pub fn step_content(
    steps: &[StepDescriptor],
    index: usize,
    state: &WizardState,
    domains: &[String],
) -> Option<StepContent> {
    let descriptor = steps.get(index)?;
    Some(match descriptor.id {
        StepId::GeneralDetails => {
            let form = match state.get(StepId::GeneralDetails) {
                Some(initial) => UserForm::from_values(domains, initial),
                None => UserForm::new(domains),
            };
            StepContent::GeneralDetails(form)
        }
        StepId::Summary => StepContent::Summary(state.compute_summary()),
    })
}
