//! The select list of a query.

use crate::expression::Expression;
use serde::{Deserialize, Serialize};
use std::ops;

/// Ordered list of selected expressions. Plain strings are column names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    columns: Vec<Expression>,
}

impl Selection {
    pub fn new<I, E>(columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one column
    pub fn column(mut self, column: impl Into<Expression>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns(&self) -> &[Expression] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn render(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(Expression::render)
            .collect::<Vec<_>>()
            .join(",\n");
        format!("select\n{}", columns)
    }
}

impl ops::Add for Selection {
    type Output = Selection;

    fn add(mut self, rhs: Selection) -> Selection {
        self.columns.extend(rhs.columns);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{col, lit};

    #[test]
    fn test_selection_rendering() {
        let selection = Selection::new([col("Thing").alias("Thang"), col("JustTheName")]);
        assert_eq!(selection.render(), "select\nThing as Thang,\nJustTheName");
    }

    #[test]
    fn test_strings_are_columns() {
        let selection = Selection::new(["a", "b"]).column(lit(1).alias("one"));
        assert_eq!(selection.render(), "select\na,\nb,\n1 as one");
    }

    #[test]
    fn test_concatenation() {
        let first = Selection::new(["a"]);
        let second = Selection::new([col("b").cast("integer")]);
        let combined = first + second;
        assert_eq!(combined.columns().len(), 2);
        assert_eq!(combined.render(), "select\na,\nb::integer");
        assert!(Selection::default().is_empty());
    }
}
