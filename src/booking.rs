//! The contact-page booking form.

use crate::config::{BookingConfig, ConfigError};
use crate::form::{FormController, FormModel, FormOptions, RuleTable};

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub car: String,
    pub service: String,
    pub date: Option<String>,
    pub message: Option<String>,
}

pub type BookingController = FormController<BookingForm>;

/// Builds a controller with the embedded booking rules and options.
pub fn booking_controller() -> Result<BookingController, ConfigError> {
    let config = BookingConfig::embedded()?;
    Ok(FormController::new(
        RuleTable::from_config(&config)?,
        FormOptions::from_config(&config),
    ))
}
