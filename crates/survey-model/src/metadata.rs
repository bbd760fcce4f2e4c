//! Label and value-domain lookups built from survey metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Variable name to display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLabelMap {
    labels: BTreeMap<String, String>,
}

impl VariableLabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(variable.into(), label.into());
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.labels.get(variable).map(String::as_str)
    }

    /// Label for a variable, or the variable name itself when unlabeled.
    pub fn label_or_name<'a>(&'a self, variable: &'a str) -> &'a str {
        self.get(variable).unwrap_or(variable)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Answer codes of one question mapped to their labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDomain {
    codes: BTreeMap<i64, String>,
}

impl ValueDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a code. Returns the label already stored for it, if any, leaving
    /// the existing entry untouched.
    pub fn insert(&mut self, code: i64, label: impl Into<String>) -> Option<&str> {
        use std::collections::btree_map::Entry;
        match self.codes.entry(code) {
            Entry::Occupied(existing) => Some(existing.into_mut().as_str()),
            Entry::Vacant(slot) => {
                slot.insert(label.into());
                None
            }
        }
    }

    pub fn label(&self, code: i64) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    /// Looks up the label for raw cell text such as `"3"` or `"03"`.
    pub fn label_for_text(&self, raw: &str) -> Option<&str> {
        raw.trim().parse::<i64>().ok().and_then(|code| self.label(code))
    }

    /// Codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.codes.keys().copied()
    }

    /// Ascending codes whose label is not rejected by `excluded`.
    pub fn analysis_codes(&self, excluded: impl Fn(&str) -> bool) -> Vec<i64> {
        self.codes
            .iter()
            .filter(|(_, label)| !excluded(label))
            .map(|(code, _)| *code)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Variable name to its value domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMap {
    domains: BTreeMap<String, ValueDomain>,
}

impl DomainMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&ValueDomain> {
        self.domains.get(variable)
    }

    /// Domain for a variable, created empty on first use.
    pub fn domain_mut(&mut self, variable: &str) -> &mut ValueDomain {
        self.domains.entry(variable.to_string()).or_default()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Domains in variable name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueDomain)> {
        self.domains.iter().map(|(k, v)| (k.as_str(), v))
    }
}
