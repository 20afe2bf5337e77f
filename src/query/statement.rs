//! Full query assembly.

use crate::error::{SporkError, SporkResult};
use crate::expression::Expression;
use crate::query::dataset::Dataset;
use crate::query::selection::Selection;
use log::debug;
use serde::{Deserialize, Serialize};

/// A select query. Clauses are rendered one per line in the order
/// select, from/joins, where, group by, having, order by, qualify.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection: Option<Selection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset: Option<Dataset>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    where_clause: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_by: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    having: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualify: Option<Expression>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn from(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn where_(mut self, condition: Expression) -> Self {
        self.where_clause = Some(condition);
        self
    }

    pub fn group_by<I, E>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.group_by = expressions.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, condition: Expression) -> Self {
        self.having = Some(condition);
        self
    }

    /// Each expression's own direction and NULL placement are rendered after it
    pub fn order_by<I, E>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.order_by = expressions.into_iter().map(Into::into).collect();
        self
    }

    pub fn qualify(mut self, condition: Expression) -> Self {
        self.qualify = Some(condition);
        self
    }

    pub fn render(&self) -> SporkResult<String> {
        let selection = self
            .selection
            .as_ref()
            .filter(|s| !s.is_empty())
            .ok_or(SporkError::MissingSelection)?;
        let dataset = self.dataset.as_ref().ok_or(SporkError::MissingDataset)?;

        debug!(
            "Rendering query: {} columns, {} joins",
            selection.columns().len(),
            dataset.joins().len()
        );

        let mut lines = vec![selection.render(), dataset.render()?];

        if let Some(condition) = &self.where_clause {
            lines.push(format!("where {}", condition.render()));
        }

        if !self.group_by.is_empty() {
            lines.push(format!(
                "group by {}",
                join_rendered(&self.group_by, Expression::render)
            ));
        }

        if let Some(condition) = &self.having {
            lines.push(format!("having {}", condition.render()));
        }

        if !self.order_by.is_empty() {
            lines.push(format!(
                "order by {}",
                join_rendered(&self.order_by, Expression::render_ordered)
            ));
        }

        if let Some(condition) = &self.qualify {
            lines.push(format!("qualify {}", condition.render()));
        }

        Ok(lines.join("\n"))
    }
}

fn join_rendered(expressions: &[Expression], render: fn(&Expression) -> String) -> String {
    expressions
        .iter()
        .map(render)
        .collect::<Vec<_>>()
        .join(", ")
}
