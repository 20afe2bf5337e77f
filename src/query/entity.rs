//! Table and view references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table or view, optionally aliased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

impl Entity {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {}", self.reference, alias),
            None => self.reference.clone(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
