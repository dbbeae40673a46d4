mod controller;
mod draft;
mod model;
mod rules;
mod state;
mod submission;
mod submitter;
mod validation;


pub use booking_form_derive::FormModel;
pub use controller::{
    DEFAULT_SOURCE, FormController, FormError, FormOptions, FormResult, NoticeReset,
    PHONE_FIELD, SubmitOutcome, SubmitReport,
};
pub use draft::{DraftError, FormDraftStore, InMemoryDraftStore};
pub use model::{FieldKey, FieldLens, FieldText, FieldValues, FormModel, field_values};
pub use rules::{CustomCheckFn, FieldCheck, FieldRule, RuleTable, ValidationContext};
pub use state::{FieldState, FormState, Notice, NoticeKind};
pub use submission::{
    FAILURE_MESSAGE, INVALID_FORM_MESSAGE, Reduction, SUCCESS_MESSAGE, SubmitCommand,
    SubmitEvent, SubmitState, reduce_submission,
};
pub use submitter::{
    BoxedSubmitFuture, DEFAULT_SUCCESS_RATE, SimulatedSubmitter, SubmissionPayload, SubmitError, Submitter,
};
pub use validation::{FieldOutcome, FormValidation};
