pub mod booking;
pub mod config;
pub mod form;
pub mod phone;
pub mod prelude;
pub mod schedule;

pub use booking::{BookingController, BookingForm, booking_controller};
pub use config::{BookingConfig, ConfigError};
