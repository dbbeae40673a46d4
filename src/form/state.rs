use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{FieldKey, FieldValues};
use super::rules::{RuleTable, ValidationContext};
use super::submission::SubmitState;
use super::validation::{FieldOutcome, FormValidation};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FieldState {
    pub value: String,
    pub touched: bool,
    pub valid: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn empty() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    fn apply(&mut self, outcome: FieldOutcome) {
        self.valid = outcome.valid;
        self.error = outcome.message;
    }

    fn clear_error(&mut self) {
        self.valid = true;
        self.error = None;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Form-level banner shown above the fields.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormState {
    pub fields: BTreeMap<FieldKey, FieldState>,
    pub is_submitting: bool,
    pub last_error: Option<String>,
    pub submit_state: SubmitState,
    pub notice: Option<Notice>,
    /// Bumped for every success notice so a late reset cannot hide a newer one.
    pub notice_generation: u64,
}

impl FormState {
    /// One empty field per rule, nothing touched.
    pub fn new(rules: &RuleTable) -> Self {
        Self {
            fields: rules
                .keys()
                .map(|key| (key.clone(), FieldState::empty()))
                .collect(),
            is_submitting: false,
            last_error: None,
            submit_state: SubmitState::Idle,
            notice: None,
            notice_generation: 0,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|field| field.value.as_str())
    }

    pub fn values(&self) -> FieldValues {
        self.fields
            .iter()
            .map(|(key, field)| (key.clone(), field.value.clone()))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|field| field.valid)
    }

    pub fn first_error(&self) -> Option<&FieldKey> {
        self.fields
            .iter()
            .find_map(|(key, field)| (!field.valid).then_some(key))
    }

    /// Stores a typed value. A previously shown error is cleared until the
    /// field is checked again. Names without a field are ignored, as in
    /// [`populate`](Self::populate).
    pub fn input(&mut self, name: &str, value: impl Into<String>) {
        let Some(field) = self.fields.get_mut(name) else {
            return;
        };
        field.value = value.into();
        if !field.valid {
            field.clear_error();
        }
    }

    pub fn blur(&mut self, name: &str, rules: &RuleTable, context: &ValidationContext) {
        let Some(field) = self.fields.get_mut(name) else {
            return;
        };
        field.touched = true;
        let outcome = rules.validate_field_on(name, &field.value, context);
        field.apply(outcome);
    }

    /// Copies values into matching fields, leaving unknown keys out.
    pub fn populate(&mut self, values: &FieldValues) {
        for (key, value) in values {
            if let Some(field) = self.fields.get_mut(key.as_str()) {
                field.value = value.clone();
            }
        }
    }

    pub(super) fn apply_validation(&mut self, validation: &FormValidation) {
        for (key, field) in &mut self.fields {
            field.touched = true;
            match validation.errors.get(key.as_str()) {
                Some(message) => field.apply(FieldOutcome::fail(message)),
                None => field.clear_error(),
            }
        }
    }

    /// Empties every field back to its mount state.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            *field = FieldState::empty();
        }
    }
}
