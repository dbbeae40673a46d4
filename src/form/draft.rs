use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::model::FieldValues;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("stored draft is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode draft: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Key-value persistence for raw field values between visits.
pub trait FormDraftStore: Send + Sync + 'static {
    fn save(&self, key: &str, values: &FieldValues) -> Result<(), DraftError>;
    fn load(&self, key: &str) -> Result<Option<FieldValues>, DraftError>;
    fn clear(&self, key: &str) -> Result<(), DraftError>;
}

/// Keeps each draft as JSON text, the way browser local storage does.
#[derive(Clone, Default)]
pub struct InMemoryDraftStore {
    state: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        let state = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, text: impl Into<String>) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.insert(key.to_string(), text.into());
    }
}

impl FormDraftStore for InMemoryDraftStore {
    fn save(&self, key: &str, values: &FieldValues) -> Result<(), DraftError> {
        let text = serde_json::to_string(values).map_err(DraftError::Encode)?;
        self.put_raw(key, text);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<FieldValues>, DraftError> {
        self.raw(key)
            .map(|text| serde_json::from_str(&text).map_err(DraftError::Corrupt))
            .transpose()
    }

    fn clear(&self, key: &str) -> Result<(), DraftError> {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.remove(key);
        Ok(())
    }
}
