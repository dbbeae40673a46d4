use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;

use super::model::FieldKey;
use crate::config::{BookingConfig, ConfigError};
use crate::schedule;

/// Inputs a check may depend on besides the field value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn on(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn local() -> Self {
        Self::on(schedule::local_today())
    }
}

pub type CustomCheckFn = Arc<dyn Fn(&str, &ValidationContext) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum FieldCheck {
    /// Value must be a `YYYY-MM-DD` date no earlier than `today`.
    DateNotBeforeToday,
    Custom(CustomCheckFn),
}

impl FieldCheck {
    pub fn custom(check: impl Fn(&str, &ValidationContext) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(check))
    }

    pub fn passes(&self, value: &str, context: &ValidationContext) -> bool {
        match self {
            Self::DateNotBeforeToday => {
                schedule::parse_date(value).is_some_and(|date| date >= context.today)
            }
            Self::Custom(check) => check(value, context),
        }
    }
}

impl Debug for FieldCheck {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateNotBeforeToday => f.write_str("DateNotBeforeToday"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub message: String,
    pub check: Option<FieldCheck>,
}

impl FieldRule {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            message: message.into(),
            check: None,
        }
    }

    pub fn required(mut self, value: bool) -> Self {
        self.required = value;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.min_length = Some(value);
        self
    }

    pub fn max_length(mut self, value: usize) -> Self {
        self.max_length = Some(value);
        self
    }

    pub fn pattern(mut self, value: Regex) -> Self {
        self.pattern = Some(value);
        self
    }

    pub fn check(mut self, value: FieldCheck) -> Self {
        self.check = Some(value);
        self
    }
}

/// The set of rules a form is validated against, one per field name.
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    rules: BTreeMap<FieldKey, FieldRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The booking form rules shipped in the embedded configuration.
    pub fn booking() -> Result<Self, ConfigError> {
        Self::from_config(&BookingConfig::embedded()?)
    }

    pub fn from_config(config: &BookingConfig) -> Result<Self, ConfigError> {
        config
            .rules
            .iter()
            .map(|(name, spec)| {
                spec.compile(name)
                    .map(|rule| (FieldKey::owned(name.clone()), rule))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(|rules| Self { rules })
    }

    pub fn rule(mut self, key: impl Into<FieldKey>, rule: FieldRule) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<FieldKey>, rule: FieldRule) {
        self.rules.insert(key.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.rules.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
