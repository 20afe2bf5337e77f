//! JSON query documents.
//!
//! A document wraps a serialized [`Query`] so that queries can be stored in
//! files and rendered by the `spork` binary:
//!
//! ```json
//! {
//!   "query": {
//!     "selection": { "columns": [ { "node": { "raw": "id" } } ] },
//!     "dataset": { "entity": { "reference": "users" } }
//!   }
//! }
//! ```

use crate::error::{SporkError, SporkResult};
use crate::expression::Expression;
use crate::query::Query;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDocument {
    pub query: Query,
}

impl QueryDocument {
    pub fn new(query: Query) -> Self {
        Self { query }
    }

    pub fn from_json(text: &str) -> SporkResult<Self> {
        serde_json::from_str(text).map_err(|e| SporkError::Document(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> SporkResult<Self> {
        let path = path.as_ref();
        debug!("Loading query document from {}", path.display());

        let text = std::fs::read_to_string(path)
            .map_err(|e| SporkError::Document(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> SporkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SporkError::Document(e.to_string()))
    }

    pub fn render(&self) -> SporkResult<String> {
        self.query.render()
    }
}

/// Render a single JSON-serialized expression
pub fn render_expression_json(text: &str) -> SporkResult<String> {
    let expr: Expression =
        serde_json::from_str(text).map_err(|e| SporkError::Document(e.to_string()))?;
    Ok(expr.render())
}
