use std::marker::PhantomData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::NaiveDate;
use futures_timer::Delay;
use thiserror::Error;
use tracing::{info, warn};

use super::draft::{DraftError, FormDraftStore};
use super::model::{FieldKey, FieldLens, FieldText, FormModel};
use super::rules::{RuleTable, ValidationContext};
use super::state::{FieldState, FormState};
use super::submission::{
    Reduction, SubmitCommand, SubmitEvent, SubmitState, reduce_submission,
};
use super::submitter::{SubmissionPayload, SubmitError, Submitter};
use super::validation::FormValidation;
use crate::config::{BookingConfig, DEFAULT_STORAGE_KEY};
use crate::phone;

pub const PHONE_FIELD: &str = "phone";
pub const DEFAULT_SOURCE: &str = "prestige_car_detailing_website";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub storage_key: String,
    pub source: String,
    pub success_display: Duration,
    pub persist_drafts: bool,
    pub format_phone_input: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            success_display: Duration::from_millis(5_000),
            persist_drafts: true,
            format_phone_input: true,
        }
    }
}

impl FormOptions {
    pub fn from_config(config: &BookingConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            source: config.source.clone(),
            success_display: Duration::from_millis(config.success_display_ms),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error(transparent)]
    Draft(#[from] DraftError),
}

pub type FormResult<T> = Result<T, FormError>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Succeeded,
    Failed(SubmitError),
    /// A submission was already in flight; this request did nothing.
    AlreadySubmitting,
}

/// A success notice waiting to be hidden. Hand it to
/// [`FormController::finish_notice`] to return the form to `Idle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoticeReset {
    pub generation: u64,
    pub after: Duration,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitReport {
    pub outcome: SubmitOutcome,
    pub visited: Vec<SubmitState>,
    /// Set when the submission succeeded and its notice must be hidden later.
    pub notice_reset: Option<NoticeReset>,
}

impl SubmitReport {
    fn without_reset(outcome: SubmitOutcome, visited: Vec<SubmitState>) -> Self {
        Self {
            outcome,
            visited,
            notice_reset: None,
        }
    }
}

/// Owns one form's state and binds input, blur and submit events to it.
#[derive(Clone)]
pub struct FormController<T>
where
    T: FormModel,
{
    options: FormOptions,
    rules: Arc<RuleTable>,
    state: Arc<RwLock<FormState>>,
    drafts: Option<Arc<dyn FormDraftStore>>,
    today: Option<NaiveDate>,
    _model: PhantomData<fn() -> T>,
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn new(rules: RuleTable, options: FormOptions) -> Self {
        let state = FormState::new(&rules);
        Self {
            options,
            rules: Arc::new(rules),
            state: Arc::new(RwLock::new(state)),
            drafts: None,
            today: None,
            _model: PhantomData,
        }
    }

    pub fn with_draft_store(mut self, store: impl FormDraftStore) -> Self {
        self.drafts = Some(Arc::new(store));
        self
    }

    /// Validates dates against `today` instead of the local calendar.
    pub fn pinned_to(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    fn context(&self) -> ValidationContext {
        self.today
            .map(ValidationContext::on)
            .unwrap_or_else(ValidationContext::local)
    }

    /// Stores raw input for `name` and returns the value as displayed.
    pub fn input(&self, name: &str, raw: &str) -> FormResult<String> {
        let cursor = raw.chars().count();
        self.input_with_cursor(name, raw, cursor)
            .map(|(value, _)| value)
    }

    /// Like [`input`](Self::input), also mapping the caret position through
    /// any display formatting.
    pub fn input_with_cursor(
        &self,
        name: &str,
        raw: &str,
        cursor: usize,
    ) -> FormResult<(String, usize)> {
        let (value, cursor) = if self.options.format_phone_input && name == PHONE_FIELD {
            phone::format_phone_with_cursor(raw, cursor)
        } else {
            (raw.to_string(), cursor)
        };

        {
            let mut state = write_lock(&self.state, "applying field input")?;
            state.input(name, value.clone());
        }
        self.save_draft()?;
        Ok((value, cursor))
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let _ = self.input(lens.key().as_str(), &value.to_text())?;
        Ok(())
    }

    /// Marks `name` touched and validates it. Returns whether it passed.
    pub fn blur(&self, name: &str) -> FormResult<bool> {
        let context = self.context();
        let mut state = write_lock(&self.state, "validating blurred field")?;
        state.blur(name, &self.rules, &context);
        Ok(state.field(name).is_none_or(|field| field.valid))
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.blur(lens.key().as_str())
    }

    /// Validates every field and surfaces the errors without submitting.
    pub fn validate_form(&self) -> FormResult<FormValidation> {
        let context = self.context();
        let mut state = write_lock(&self.state, "validating form")?;
        let validation = self.rules.validate_form_on(&state.values(), &context);
        state.apply_validation(&validation);
        Ok(validation)
    }

    pub async fn submit<S>(&self, submitter: &S) -> FormResult<SubmitReport>
    where
        S: Submitter + ?Sized,
    {
        let context = self.context();
        let started = {
            let mut state = write_lock(&self.state, "starting submit")?;
            if matches!(
                state.submit_state,
                SubmitState::Submitting | SubmitState::Validating
            ) {
                info!("submit ignored; a submission is already in flight");
                return Ok(SubmitReport::without_reset(
                    SubmitOutcome::AlreadySubmitting,
                    Vec::new(),
                ));
            }
            self.reduce(&mut state, SubmitEvent::Submit, &context)
        };

        let Some(values) = started.commands.into_iter().find_map(|command| match command {
            SubmitCommand::Dispatch(values) => Some(values),
            _ => None,
        }) else {
            return Ok(SubmitReport::without_reset(
                SubmitOutcome::Invalid,
                started.visited,
            ));
        };

        let payload = SubmissionPayload::new(values, self.options.source.clone());
        let result = submitter.submit(&payload).await;
        match &result {
            Ok(()) => info!(source = %payload.source, "booking request submitted"),
            Err(error) => warn!(%error, "booking request failed"),
        }

        let settled = {
            let mut state = write_lock(&self.state, "settling submit")?;
            self.reduce(&mut state, SubmitEvent::Settled(result.clone()), &context)
        };
        let mut notice_reset = None;
        for command in settled.commands {
            match command {
                SubmitCommand::ClearDraft => {
                    // The booking already went out, so a draft error is only logged.
                    if let Err(error) = self.clear_draft() {
                        warn!(%error, key = %self.options.storage_key, "failed to clear draft");
                    }
                }
                SubmitCommand::ScheduleNoticeReset { generation } => {
                    notice_reset = Some(NoticeReset {
                        generation,
                        after: self.options.success_display,
                    });
                }
                SubmitCommand::Dispatch(_) => {}
            }
        }

        let mut visited = started.visited;
        visited.extend(settled.visited);
        let outcome = match result {
            Ok(()) => SubmitOutcome::Succeeded,
            Err(error) => SubmitOutcome::Failed(error),
        };
        Ok(SubmitReport {
            outcome,
            visited,
            notice_reset,
        })
    }

    /// Submits and, on success, keeps the notice up for the display time
    /// before returning the form to `Idle`.
    pub async fn submit_and_settle<S>(&self, submitter: &S) -> FormResult<SubmitReport>
    where
        S: Submitter + ?Sized,
    {
        let mut report = self.submit(submitter).await?;
        if let Some(reset) = report.notice_reset {
            if self.finish_notice(reset).await? {
                report.visited.push(SubmitState::Idle);
            }
        }
        Ok(report)
    }

    /// Waits out `reset.after`, then hides the notice it was issued for.
    /// Returns `false` when a newer notice has replaced it in the meantime.
    pub async fn finish_notice(&self, reset: NoticeReset) -> FormResult<bool> {
        if !reset.after.is_zero() {
            Delay::new(reset.after).await;
        }
        self.expire_notice(reset.generation)
    }

    /// Hides the current success notice and returns to `Idle`.
    pub fn dismiss_notice(&self) -> FormResult<()> {
        let generation = read_lock(&self.state, "reading notice generation")?.notice_generation;
        self.expire_notice(generation).map(|_| ())
    }

    /// Keeps the current success notice up for the display time, then hides it.
    pub async fn dismiss_notice_after_display(&self) -> FormResult<bool> {
        let generation = read_lock(&self.state, "reading notice generation")?.notice_generation;
        self.finish_notice(NoticeReset {
            generation,
            after: self.options.success_display,
        })
        .await
    }

    fn expire_notice(&self, generation: u64) -> FormResult<bool> {
        let context = self.context();
        let mut state = write_lock(&self.state, "dismissing notice")?;
        let reduction = self.reduce(&mut state, SubmitEvent::NoticeElapsed(generation), &context);
        Ok(!reduction.visited.is_empty())
    }

    fn reduce(
        &self,
        state: &mut FormState,
        event: SubmitEvent,
        context: &ValidationContext,
    ) -> Reduction {
        let reduction = reduce_submission(state.clone(), event, &self.rules, context);
        state.clone_from(&reduction.state);
        reduction
    }

    pub fn save_draft(&self) -> FormResult<()> {
        let Some(store) = self.draft_store() else {
            return Ok(());
        };
        let values = read_lock(&self.state, "reading values for draft")?.values();
        store.save(&self.options.storage_key, &values)?;
        Ok(())
    }

    /// Repopulates the form from a saved draft. A corrupt draft is logged and
    /// skipped.
    pub fn load_draft(&self) -> FormResult<bool> {
        let Some(store) = self.draft_store() else {
            return Ok(false);
        };
        let draft = match store.load(&self.options.storage_key) {
            Ok(Some(values)) => values,
            Ok(None) => return Ok(false),
            Err(error) => {
                warn!(%error, key = %self.options.storage_key, "ignoring saved draft");
                return Ok(false);
            }
        };
        let mut state = write_lock(&self.state, "loading draft into form")?;
        state.populate(&draft);
        Ok(true)
    }

    pub fn clear_draft(&self) -> FormResult<()> {
        if let Some(store) = self.draft_store() {
            store.clear(&self.options.storage_key)?;
        }
        Ok(())
    }

    fn draft_store(&self) -> Option<&Arc<dyn FormDraftStore>> {
        self.drafts
            .as_ref()
            .filter(|_| self.options.persist_drafts)
    }

    pub fn snapshot(&self) -> FormResult<FormState> {
        Ok(read_lock(&self.state, "creating form snapshot")?.clone())
    }

    pub fn model(&self) -> FormResult<T> {
        let state = read_lock(&self.state, "reading form model")?;
        Ok(T::from_values(&state.values()))
    }

    pub fn field(&self, name: &str) -> FormResult<Option<FieldState>> {
        Ok(read_lock(&self.state, "reading field state")?
            .field(name)
            .cloned())
    }

    /// The error to render next to `name`; hidden until the field is touched.
    pub fn field_error_for_display(&self, name: &str) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        Ok(state
            .field(name)
            .filter(|field| field.touched)
            .and_then(|field| field.error.clone()))
    }

    /// The field a UI should focus after a failed submit.
    pub fn first_error(&self) -> FormResult<Option<FieldKey>> {
        Ok(read_lock(&self.state, "reading first error key")?
            .first_error()
            .cloned())
    }
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
