//! Booking form configuration: the canonical rule table and submission
//! defaults, embedded from `config/booking.toml`.

use std::collections::BTreeMap;

use regex::Regex;
use rust_embed::RustEmbed;
use serde::Deserialize;
use thiserror::Error;

use crate::form::{FieldCheck, FieldRule};

pub const BOOKING_CONFIG_FILE: &str = "booking.toml";
pub const DEFAULT_STORAGE_KEY: &str = "prestigeFormData";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("embedded configuration file `{0}` is missing")]
    MissingAsset(&'static str),
    #[error("configuration is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid pattern for field `{field}`: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CheckSpec {
    DateNotBeforeToday,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default)]
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub message: String,
    pub check: Option<CheckSpec>,
}

impl RuleSpec {
    pub(crate) fn compile(&self, field: &str) -> Result<FieldRule, ConfigError> {
        let mut rule = FieldRule::new(self.message.clone()).required(self.required);
        if let Some(min) = self.min_length {
            rule = rule.min_length(min);
        }
        if let Some(max) = self.max_length {
            rule = rule.max_length(max);
        }
        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                field: field.to_string(),
                source,
            })?;
            rule = rule.pattern(regex);
        }
        if let Some(CheckSpec::DateNotBeforeToday) = self.check {
            rule = rule.check(FieldCheck::DateNotBeforeToday);
        }
        Ok(rule)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    pub source: String,
    pub success_display_ms: u64,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSpec>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl BookingConfig {
    pub fn embedded() -> Result<Self, ConfigError> {
        let file = EmbeddedConfig::get(BOOKING_CONFIG_FILE)
            .ok_or(ConfigError::MissingAsset(BOOKING_CONFIG_FILE))?;
        Self::from_toml_str(std::str::from_utf8(file.data.as_ref())?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

#[derive(RustEmbed)]
#[folder = "config/"]
struct EmbeddedConfig;
