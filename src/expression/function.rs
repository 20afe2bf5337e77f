//! Function call nodes and analytic function helpers.

use crate::expression::expr::Expression;
use crate::expression::window::Window;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functions that can be called in an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionLabel {
    RowNumber,
    Max,
    Min,
    Avg,
    Rank,
    DenseRank,
    FirstValue,
    LastValue,
    Lead,
    Lag,
}

impl FunctionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionLabel::RowNumber => "row_number",
            FunctionLabel::Max => "max",
            FunctionLabel::Min => "min",
            FunctionLabel::Avg => "avg",
            FunctionLabel::Rank => "rank",
            FunctionLabel::DenseRank => "dense_rank",
            FunctionLabel::FirstValue => "first_value",
            FunctionLabel::LastValue => "last_value",
            FunctionLabel::Lead => "lead",
            FunctionLabel::Lag => "lag",
        }
    }
}

impl fmt::Display for FunctionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function invocation, e.g. `lag(ts, 1) over (partition by id order by ts)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    label: FunctionLabel,
    #[serde(default)]
    args: Vec<Option<Expression>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window: Option<Window>,
}

impl FunctionCall {
    pub fn new(label: FunctionLabel) -> Self {
        Self {
            label,
            args: Vec::new(),
            window: None,
        }
    }

    pub fn label(&self) -> FunctionLabel {
        self.label
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<Expression>) -> Self {
        self.args.push(Some(arg.into()));
        self
    }

    /// Append an argument slot that may be empty. Empty slots are not rendered.
    pub fn optional_arg(mut self, arg: Option<Expression>) -> Self {
        self.args.push(arg);
        self
    }

    /// Attach or replace the window clause
    pub fn over(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    /// Convert into an aliased expression
    pub fn alias(self, name: impl Into<String>) -> Expression {
        Expression::function(self).alias(name)
    }

    pub fn render(&self) -> String {
        let args = self
            .args
            .iter()
            .flatten()
            .map(Expression::render_unaliased)
            .collect::<Vec<_>>()
            .join(", ");

        let mut s = format!("{}({})", self.label, args);
        if let Some(window) = &self.window {
            s.push_str(" over ");
            s.push_str(&window.render());
        }
        s
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn row_number() -> FunctionCall {
    FunctionCall::new(FunctionLabel::RowNumber)
}

pub fn rank() -> FunctionCall {
    FunctionCall::new(FunctionLabel::Rank)
}

pub fn dense_rank() -> FunctionCall {
    FunctionCall::new(FunctionLabel::DenseRank)
}

pub fn max(expr: impl Into<Expression>) -> FunctionCall {
    FunctionCall::new(FunctionLabel::Max).arg(expr)
}

pub fn min(expr: impl Into<Expression>) -> FunctionCall {
    FunctionCall::new(FunctionLabel::Min).arg(expr)
}

pub fn avg(expr: impl Into<Expression>) -> FunctionCall {
    FunctionCall::new(FunctionLabel::Avg).arg(expr)
}

pub fn first_value(expr: impl Into<Expression>) -> FunctionCall {
    FunctionCall::new(FunctionLabel::FirstValue).arg(expr)
}

pub fn last_value(expr: impl Into<Expression>) -> FunctionCall {
    FunctionCall::new(FunctionLabel::LastValue).arg(expr)
}

/// `lead(column[, rows[, default]])`
pub fn lead(
    column: impl Into<Expression>,
    rows: Option<i64>,
    default: Option<Expression>,
) -> FunctionCall {
    offset_function(FunctionLabel::Lead, column.into(), rows, default)
}

/// `lag(column[, rows[, default]])`
pub fn lag(
    column: impl Into<Expression>,
    rows: Option<i64>,
    default: Option<Expression>,
) -> FunctionCall {
    offset_function(FunctionLabel::Lag, column.into(), rows, default)
}

fn offset_function(
    label: FunctionLabel,
    column: Expression,
    rows: Option<i64>,
    default: Option<Expression>,
) -> FunctionCall {
    FunctionCall::new(label)
        .arg(column)
        .optional_arg(rows.map(Expression::literal))
        .optional_arg(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::window::{current_row, unbounded_preceding};

    #[test]
    fn test_no_arguments() {
        assert_eq!(row_number().render(), "row_number()");
        assert_eq!(dense_rank().to_string(), "dense_rank()");
    }

    #[test]
    fn test_arguments() {
        assert_eq!(max("price").render(), "max(price)");
        assert_eq!(
            avg(Expression::raw("a") + Expression::raw("b")).render(),
            "avg((a + b))"
        );
        assert_eq!(lag("ts", Some(2), None).render(), "lag(ts, 2)");
        assert_eq!(
            lead("ts", Some(1), Some(Expression::literal("n/a"))).render(),
            "lead(ts, 1, 'n/a')"
        );
    }

    #[test]
    fn test_empty_slots_are_skipped() {
        let call = FunctionCall::new(FunctionLabel::Lag)
            .optional_arg(None)
            .arg("ts")
            .optional_arg(None)
            .arg(Expression::literal(0));
        assert_eq!(call.render(), "lag(ts, 0)");

        let none_at_all = FunctionCall::new(FunctionLabel::Rank).optional_arg(None);
        assert_eq!(none_at_all.render(), "rank()");
    }

    #[test]
    fn test_argument_aliases_are_not_rendered() {
        assert_eq!(max(Expression::raw("p").alias("x")).render(), "max(p)");
        assert_eq!(
            Expression::from(max(Expression::raw("p").alias("x"))).alias("m").render(),
            "max(p) as m"
        );
        let wrapped = Expression::wrap(Expression::raw("ts").cast("date").alias("d"));
        assert_eq!(first_value(wrapped).render(), "first_value(ts::date)");
    }

    #[test]
    fn test_over_window() {
        let window = Window::new()
            .partition_by("AircraftID")
            .order_by("UpdatedUTC", None)
            .rows_between(unbounded_preceding(), current_row() - 1)
            .unwrap();
        let call = lag("ValidTo", Some(1), None).over(window);
        assert_eq!(
            call.render(),
            "lag(ValidTo, 1) over (partition by AircraftID order by UpdatedUTC rows between unbounded preceding and current row -1)"
        );
    }

    #[test]
    fn test_over_replaces_window() {
        let call = rank()
            .over(Window::new().partition_by("a"))
            .over(Window::new().partition_by("b"));
        assert!(call.render().contains("partition by b"));
        assert!(!call.render().contains("partition by a"));
    }

    #[test]
    fn test_alias_comes_last() {
        let window = Window::new().order_by("ts", None).desc();
        let expr = row_number().over(window).alias("rn");
        assert_eq!(
            expr.render(),
            "row_number() over (order by ts desc rows between unbounded preceding and current row) as rn"
        );
    }

    #[test]
    fn test_as_operand() {
        let filter = Expression::from(row_number().over(Window::new().partition_by("id"))).eq(1);
        assert_eq!(
            filter.render(),
            "(row_number() over (partition by id rows between unbounded preceding and current row) = 1)"
        );
    }
}
