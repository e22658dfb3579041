use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ISO 8583 message: a mapping from field identifier to value.
///
/// Identifiers are `"N"` (1..=128), `"127.N"` or `"127.25.N"` (1..=64), and
/// `"120.N"` for the DE 120 composite. Field `"0"` holds the MTI. Values are
/// text; `content_type = b` fields carry uppercase hex text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iso8583Message {
    fields: HashMap<String, String>,
}

impl Iso8583Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    pub fn set_field(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(id.into(), value.into());
    }

    /// Get a field value.
    pub fn get_field(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    /// Check if a field exists.
    pub fn has_field(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Remove a field, returning its value.
    pub fn remove_field(&mut self, id: &str) -> Option<String> {
        self.fields.remove(id)
    }

    /// The MTI, field `"0"`.
    pub fn mti(&self) -> Option<&str> {
        self.get_field("0")
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields.iter()
    }

    /// All field identifiers in numeric order (`"2"` before `"11"`,
    /// `"127.2"` before `"127.25"`).
    pub fn field_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.fields.keys().cloned().collect();
        ids.sort_by_key(|id| sort_key(id));
        ids
    }

    /// Direct sub-field numbers under a prefix, sorted. For `prefix = "127."`
    /// this yields the `k` of every `"127.k"` key but not of `"127.25.k"`
    /// keys; for the top level pass `prefix = ""`.
    pub fn sub_field_numbers(&self, prefix: &str) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .fields
            .keys()
            .filter_map(|id| id.strip_prefix(prefix))
            .filter_map(|rest| rest.parse::<u32>().ok())
            .collect();
        numbers.sort_unstable();
        numbers
    }
}

impl From<HashMap<String, String>> for Iso8583Message {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl From<Iso8583Message> for HashMap<String, String> {
    fn from(message: Iso8583Message) -> Self {
        message.fields
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Iso8583Message {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut message = Self::new();
        for (id, value) in pairs {
            message.set_field(id, value);
        }
        message
    }
}

fn sort_key(id: &str) -> Vec<u64> {
    id.split('.')
        .map(|part| part.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}
