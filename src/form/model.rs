use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn owned(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for FieldKey {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self::owned(value)
    }
}

/// Raw field values keyed by field name, as submitted by the form.
pub type FieldValues = BTreeMap<FieldKey, String>;

/// Conversion between a typed model field and the raw text a form input holds.
pub trait FieldText {
    fn to_text(&self) -> String;
    fn from_text(text: Option<&str>) -> Self;
}

impl FieldText for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: Option<&str>) -> Self {
        text.unwrap_or_default().to_string()
    }
}

impl FieldText for Option<String> {
    fn to_text(&self) -> String {
        self.clone().unwrap_or_default()
    }

    fn from_text(text: Option<&str>) -> Self {
        text.filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: FieldText + Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> Vec<FieldKey>;
    fn to_values(&self) -> FieldValues;
    fn from_values(values: &FieldValues) -> Self;
}

/// Builds a value map from `(name, value)` pairs.
pub fn field_values<I, K, V>(pairs: I) -> FieldValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<FieldKey>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_owned_keys_compare_by_content() {
        assert_eq!(FieldKey::new("phone"), FieldKey::owned("phone"));
        let values = field_values([("phone", "0300-1234567")]);
        assert_eq!(values.get("phone").map(String::as_str), Some("0300-1234567"));
    }

    #[test]
    fn optional_text_treats_blank_as_absent() {
        assert_eq!(<Option<String>>::from_text(Some("  ")), None);
        assert_eq!(
            <Option<String>>::from_text(Some("a@b.co")),
            Some("a@b.co".to_string())
        );
        assert_eq!(None::<String>.to_text(), "");
    }
}
