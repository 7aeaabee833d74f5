use super::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name to field value, as the assessment form posts it.
///
/// Keys are unique; inserting a name twice keeps the later value, so a
/// form with duplicate names posts its last field's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload(BTreeMap<String, String>);

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmissionPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (name, value) in iter {
            payload.insert(name, value);
        }
        payload
    }
}

/// What the submission endpoint answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
    pub redirect: Option<String>,
    pub error: Option<String>,
}

impl SubmitResponse {
    /// Decodes a response body. `success` is read with loose truthiness
    /// (`1`, `"yes"` count as true) and an empty `redirect` counts as absent.
    /// A body whose top-level value is `null` has no fields to read and is
    /// rejected like malformed JSON.
    pub fn from_body(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Err(Error::Payload(
                "cannot read properties of null (reading 'success')".into(),
            ));
        }
        let redirect = value
            .get("redirect")
            .and_then(Value::as_str)
            .filter(|target| !target.is_empty())
            .map(ToOwned::to_owned);
        let error = value
            .get("error")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        Ok(Self {
            success: value.get("success").is_some_and(is_truthy),
            redirect,
            error,
        })
    }

    /// Where to navigate, if the submission was accepted.
    pub fn redirect_target(&self) -> Option<&str> {
        if self.success {
            self.redirect.as_deref()
        } else {
            None
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
