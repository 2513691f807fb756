use std::collections::BTreeMap;

use serde::Serialize;

pub(crate) const FORM_KEY: &str = "_FORM";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_error(&mut self, key: &str, message: impl Into<String>) {
        self.errors
            .entry(key.to_string())
            .or_default()
            .push(message.into());
    }

    pub(crate) fn add_form_error(&mut self, message: impl Into<String>) {
        self.add_error(FORM_KEY, message);
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn errors(&self, key: &str) -> &[String] {
        self.errors.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn has_error(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }
}
