use serde::Serialize;
use tracing::debug;

use super::model::FieldValues;
use super::rules::{RuleTable, ValidationContext};
use super::state::{FormState, Notice};
use super::submitter::SubmitError;

pub const INVALID_FORM_MESSAGE: &str = "Please correct the errors below and try again.";
pub const SUCCESS_MESSAGE: &str = "Thank you for your inquiry! We will contact you within 24 hours to confirm your detailing session.";
pub const FAILURE_MESSAGE: &str =
    "An error occurred while submitting your request. Please try again or call us directly.";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum SubmitState {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitEvent {
    Submit,
    Settled(Result<(), SubmitError>),
    /// The display time for the success notice numbered `generation` ran out.
    NoticeElapsed(u64),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitCommand {
    /// Hand these values to the submission endpoint.
    Dispatch(FieldValues),
    ClearDraft,
    /// Fire `NoticeElapsed(generation)` once the success notice has been shown
    /// long enough.
    ScheduleNoticeReset { generation: u64 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reduction {
    pub state: FormState,
    /// Every state entered while handling the event, in order.
    pub visited: Vec<SubmitState>,
    pub commands: Vec<SubmitCommand>,
}

impl Reduction {
    fn unchanged(state: FormState) -> Self {
        Self {
            state,
            visited: Vec::new(),
            commands: Vec::new(),
        }
    }
}

pub fn reduce_submission(
    state: FormState,
    event: SubmitEvent,
    rules: &RuleTable,
    context: &ValidationContext,
) -> Reduction {
    match (state.submit_state, event) {
        (SubmitState::Idle | SubmitState::Succeeded, SubmitEvent::Submit) => {
            validate_and_dispatch(state, rules, context)
        }
        (SubmitState::Submitting, SubmitEvent::Settled(Ok(()))) => succeed(state),
        (SubmitState::Submitting, SubmitEvent::Settled(Err(error))) => fail(state, &error),
        (SubmitState::Succeeded, SubmitEvent::NoticeElapsed(generation))
            if generation == state.notice_generation =>
        {
            let mut state = state;
            state.notice = None;
            enter(&mut state, SubmitState::Idle);
            Reduction {
                state,
                visited: vec![SubmitState::Idle],
                commands: Vec::new(),
            }
        }
        (current, event) => {
            debug!(state = ?current, event = ?event, "submit event ignored");
            Reduction::unchanged(state)
        }
    }
}

fn validate_and_dispatch(
    mut state: FormState,
    rules: &RuleTable,
    context: &ValidationContext,
) -> Reduction {
    let mut visited = Vec::with_capacity(3);
    state.notice = None;
    enter(&mut state, SubmitState::Validating);
    visited.push(SubmitState::Validating);

    let values = state.values();
    let validation = rules.validate_form_on(&values, context);
    state.apply_validation(&validation);

    if !validation.valid {
        state.last_error = Some(INVALID_FORM_MESSAGE.to_string());
        state.notice = Some(Notice::error(INVALID_FORM_MESSAGE));
        enter(&mut state, SubmitState::Invalid);
        enter(&mut state, SubmitState::Idle);
        visited.extend([SubmitState::Invalid, SubmitState::Idle]);
        return Reduction {
            state,
            visited,
            commands: Vec::new(),
        };
    }

    state.last_error = None;
    state.is_submitting = true;
    enter(&mut state, SubmitState::Submitting);
    visited.push(SubmitState::Submitting);
    Reduction {
        state,
        visited,
        commands: vec![SubmitCommand::Dispatch(values)],
    }
}

fn succeed(mut state: FormState) -> Reduction {
    state.is_submitting = false;
    state.last_error = None;
    state.reset();
    state.notice = Some(Notice::success(SUCCESS_MESSAGE));
    state.notice_generation = state.notice_generation.wrapping_add(1);
    enter(&mut state, SubmitState::Succeeded);
    let generation = state.notice_generation;
    Reduction {
        state,
        visited: vec![SubmitState::Succeeded],
        commands: vec![
            SubmitCommand::ClearDraft,
            SubmitCommand::ScheduleNoticeReset { generation },
        ],
    }
}

fn fail(mut state: FormState, error: &SubmitError) -> Reduction {
    state.is_submitting = false;
    state.last_error = Some(error.to_string());
    state.notice = Some(Notice::error(FAILURE_MESSAGE));
    enter(&mut state, SubmitState::Failed);
    enter(&mut state, SubmitState::Idle);
    Reduction {
        state,
        visited: vec![SubmitState::Failed, SubmitState::Idle],
        commands: Vec::new(),
    }
}

fn enter(state: &mut FormState, next: SubmitState) {
    debug!(from = ?state.submit_state, to = ?next, "submit state transition");
    state.submit_state = next;
}
