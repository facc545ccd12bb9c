//! Per-step form values and the summary derived from them.
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::steps::StepId;

pub type FieldValues = Map<String, Value>;

/// Values recorded by each step, at most one entry per step.
///
/// Iteration follows [`StepId`] order, which is the order steps are shown in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardState {
    steps: BTreeMap<StepId, FieldValues>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, step: StepId) -> Option<&FieldValues> {
        self.steps.get(&step)
    }

    /// Deep-merge `values` into the entry for `step`; sibling entries are untouched.
    pub fn record_step_values(&mut self, step: StepId, values: FieldValues) {
        let entry = self.steps.entry(step).or_default();
        merge_objects(entry, values);
    }

    /// Shallow union of every step's values; later steps win on key collisions.
    pub fn compute_summary(&self) -> Option<Summary> {
        if self.steps.is_empty() {
            return None;
        }
        let mut merged = FieldValues::new();
        for values in self.steps.values() {
            for (k, v) in values {
                merged.insert(k.clone(), v.clone());
            }
        }
        Some(Summary(merged))
    }
}

/// Flattened view over all recorded step values. Never stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary(FieldValues);

impl Summary {
    pub fn as_map(&self) -> &FieldValues {
        &self.0
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

fn merge_objects(target: &mut FieldValues, source: FieldValues) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Objects merge key-wise, arrays index-wise, anything else replaces.
fn merge_value(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => merge_objects(t, s),
        (Value::Array(t), Value::Array(s)) => {
            for (i, item) in s.into_iter().enumerate() {
                match t.get_mut(i) {
                    Some(existing) => merge_value(existing, item),
                    None => t.push(item),
                }
            }
        }
        (t, s) => *t = s,
    }
}
