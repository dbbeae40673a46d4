use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_timer::Delay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use super::model::FieldValues;

pub const DEFAULT_SUCCESS_RATE: f64 = 0.9;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Field values plus the metadata attached when a booking request is sent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub values: FieldValues,
    pub submitted_at: DateTime<Utc>,
    pub source: String,
}

impl SubmissionPayload {
    pub fn new(values: FieldValues, source: impl Into<String>) -> Self {
        Self {
            values,
            submitted_at: Utc::now(),
            source: source.into(),
        }
    }
}

pub type BoxedSubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>>;

pub trait Submitter: Send + Sync {
    fn submit<'a>(&'a self, payload: &'a SubmissionPayload) -> BoxedSubmitFuture<'a>;
}

impl<F> Submitter for F
where
    F: for<'a> Fn(&'a SubmissionPayload) -> BoxedSubmitFuture<'a> + Send + Sync,
{
    fn submit<'a>(&'a self, payload: &'a SubmissionPayload) -> BoxedSubmitFuture<'a> {
        (self)(payload)
    }
}

/// Stand-in endpoint that waits a fixed latency and then succeeds with a
/// fixed probability.
pub struct SimulatedSubmitter {
    latency: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedSubmitter {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(2_000),
            success_rate: DEFAULT_SUCCESS_RATE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..Self::new()
        }
    }

    pub fn latency(mut self, value: Duration) -> Self {
        self.latency = value;
        self
    }

    /// Clamped to `[0, 1]`. NaN falls back to [`DEFAULT_SUCCESS_RATE`].
    pub fn success_rate(mut self, value: f64) -> Self {
        self.success_rate = if value.is_nan() {
            DEFAULT_SUCCESS_RATE
        } else {
            value.clamp(0.0, 1.0)
        };
        self
    }

    fn roll(&self) -> bool {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_bool(self.success_rate)
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit<'a>(&'a self, _payload: &'a SubmissionPayload) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                Delay::new(self.latency).await;
            }
            if self.roll() {
                Ok(())
            } else {
                Err(SubmitError::Network("simulated network error".to_string()))
            }
        })
    }
}
