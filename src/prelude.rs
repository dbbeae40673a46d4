pub use crate::booking::{BookingController, BookingForm, booking_controller};
pub use crate::form::{
    FieldKey, FieldLens, FieldRule, FieldValues, FormController, FormModel, FormOptions,
    FormState, RuleTable, SubmitOutcome, SubmitState, Submitter, ValidationContext,
};
pub use crate::phone::format_phone;
