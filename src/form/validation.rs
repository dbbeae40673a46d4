use std::collections::BTreeMap;

use tracing::debug;

use super::model::{FieldKey, FieldValues};
use super::rules::{FieldRule, RuleTable, ValidationContext};

/// Result of checking one field. `message` is present iff the field is invalid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldOutcome {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldOutcome {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormValidation {
    pub valid: bool,
    pub errors: BTreeMap<FieldKey, String>,
}

impl FormValidation {
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }
}

impl RuleTable {
    pub fn validate_field(&self, name: &str, value: &str) -> FieldOutcome {
        self.validate_field_on(name, value, &ValidationContext::local())
    }

    pub fn validate_field_on(
        &self,
        name: &str,
        value: &str,
        context: &ValidationContext,
    ) -> FieldOutcome {
        let Some(rule) = self.get(name) else {
            return FieldOutcome::pass();
        };
        let outcome = apply_rule(rule, value, context);
        if !outcome.valid {
            debug!(field = name, "field failed validation");
        }
        outcome
    }

    pub fn validate_form(&self, values: &FieldValues) -> FormValidation {
        self.validate_form_on(values, &ValidationContext::local())
    }

    /// Checks every rule-bearing field present in `values`; fields without a
    /// value entry are not checked.
    pub fn validate_form_on(
        &self,
        values: &FieldValues,
        context: &ValidationContext,
    ) -> FormValidation {
        let errors = values
            .iter()
            .filter_map(|(key, value)| {
                self.validate_field_on(key.as_str(), value, context)
                    .message
                    .map(|message| (key.clone(), message))
            })
            .collect::<BTreeMap<_, _>>();
        FormValidation {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn apply_rule(rule: &FieldRule, value: &str, context: &ValidationContext) -> FieldOutcome {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return if rule.required {
            FieldOutcome::fail(&rule.message)
        } else {
            FieldOutcome::pass()
        };
    }

    let length = value.chars().count();
    let failed = rule.min_length.is_some_and(|min| length < min)
        || rule.max_length.is_some_and(|max| length > max)
        || rule
            .pattern
            .as_ref()
            .is_some_and(|pattern| !pattern.is_match(trimmed))
        || rule
            .check
            .as_ref()
            .is_some_and(|check| !check.passes(trimmed, context));

    if failed {
        FieldOutcome::fail(&rule.message)
    } else {
        FieldOutcome::pass()
    }
}
