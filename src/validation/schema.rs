//! # Schema Evaluation
//!
//! Runs an ordered set of field rules against a request payload. Each field
//! short-circuits on its own first failure, but every field is evaluated, so
//! a single response reports all invalid fields at once.

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::rule::FieldRule;

/// Raw request payload: field name to JSON value
pub type Payload = Map<String, Value>;

/// Ordered set of field rules describing one endpoint's input
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(name: &'static str, rules: Vec<FieldRule>) -> Self {
        Self { name, rules }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Evaluate every rule against the payload
    ///
    /// Keys the schema does not declare are ignored and do not appear in the
    /// normalized output.
    pub fn evaluate(&self, payload: &Payload) -> SchemaResult {
        let mut errors = FieldErrors::new();
        let mut values = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            match rule.evaluate(payload.get(rule.field())) {
                Ok(Some(value)) => values.push((rule.field(), value)),
                Ok(None) => {}
                Err(message) => errors.insert(rule.field(), message),
            }
        }

        if errors.is_empty() {
            SchemaResult {
                errors,
                normalized: Some(NormalizedPayload { values }),
            }
        } else {
            SchemaResult {
                errors,
                normalized: None,
            }
        }
    }
}

/// Field error messages in schema declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-field error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record a message for `field`, replacing any earlier one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Field names in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Field values after trimming and normalization
///
/// Optional fields that were skipped are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    values: Vec<(&'static str, String)>,
}

impl NormalizedPayload {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Back to a payload, e.g. to re-submit it
    pub fn to_payload(&self) -> Payload {
        self.values
            .iter()
            .map(|(f, v)| (f.to_string(), Value::String(v.clone())))
            .collect()
    }

    /// Deserialize the normalized values into a typed request
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.to_payload()))
    }
}

/// Outcome of evaluating a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResult {
    errors: FieldErrors,
    normalized: Option<NormalizedPayload>,
}

impl SchemaResult {
    /// True iff no field reported an error
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Normalized values, present only on success
    pub fn normalized(&self) -> Option<&NormalizedPayload> {
        self.normalized.as_ref()
    }

    pub fn into_result(self) -> Result<NormalizedPayload, FieldErrors> {
        match self.normalized {
            Some(normalized) if self.errors.is_empty() => Ok(normalized),
            _ => Err(self.errors),
        }
    }
}
