//! Window specifications for analytic functions.
//!
//! A window is made of an optional `partition by`, an optional `order by` and
//! a `rows between` frame. Frames are validated when they are set, so a
//! rendered window is always well formed.

use crate::error::{SporkError, SporkResult};
use crate::expression::expr::Expression;
use crate::expression::literal::Literal;
use crate::expression::operator::OrderDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops;

/// Anchor of a frame bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
}

/// One edge of a window frame: an anchor plus a signed row offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowBound {
    kind: BoundKind,
    #[serde(default)]
    offset: i64,
}

impl RowBound {
    pub fn new(kind: BoundKind) -> Self {
        Self { kind, offset: 0 }
    }

    pub fn kind(&self) -> BoundKind {
        self.kind
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Shift by a dynamically typed amount. Only integers are accepted.
    pub fn try_add(self, delta: &Literal) -> SporkResult<Self> {
        match delta {
            Literal::Integer(n) => Ok(self + *n),
            other => Err(SporkError::InvalidOffsetType {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// Shift back by a dynamically typed amount. Only integers are accepted.
    pub fn try_sub(self, delta: &Literal) -> SporkResult<Self> {
        match delta {
            Literal::Integer(n) => Ok(self - *n),
            other => Err(SporkError::InvalidOffsetType {
                type_name: other.type_name().to_string(),
            }),
        }
    }

    /// Unbounded anchors ignore the offset
    pub fn render(&self) -> String {
        match self.kind {
            BoundKind::UnboundedPreceding => "unbounded preceding".to_string(),
            BoundKind::UnboundedFollowing => "unbounded following".to_string(),
            BoundKind::CurrentRow if self.offset == 0 => "current row".to_string(),
            BoundKind::CurrentRow => format!("current row {:+}", self.offset),
        }
    }
}

/// Shift the offset forward. Offsets saturate at the `i64` limits instead of
/// overflowing.
impl ops::Add<i64> for RowBound {
    type Output = RowBound;

    fn add(self, rows: i64) -> RowBound {
        RowBound {
            kind: self.kind,
            offset: self.offset.saturating_add(rows),
        }
    }
}

/// Shift the offset back. Offsets saturate at the `i64` limits instead of
/// overflowing.
impl ops::Sub<i64> for RowBound {
    type Output = RowBound;

    fn sub(self, rows: i64) -> RowBound {
        RowBound {
            kind: self.kind,
            offset: self.offset.saturating_sub(rows),
        }
    }
}

impl fmt::Display for RowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn unbounded_preceding() -> RowBound {
    RowBound::new(BoundKind::UnboundedPreceding)
}

pub fn unbounded_following() -> RowBound {
    RowBound::new(BoundKind::UnboundedFollowing)
}

pub fn current_row() -> RowBound {
    RowBound::new(BoundKind::CurrentRow)
}

/// `rows between <lower> and <upper>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FrameBounds")]
pub struct Frame {
    lower: RowBound,
    upper: RowBound,
}

impl Frame {
    /// Build a frame, checking that the lower bound cannot come after the upper one
    pub fn new(lower: RowBound, upper: RowBound) -> SporkResult<Self> {
        let valid = lower.kind == BoundKind::UnboundedPreceding
            || upper.kind == BoundKind::UnboundedFollowing
            || (lower.kind == BoundKind::CurrentRow && upper.kind == BoundKind::CurrentRow);

        if !valid {
            return Err(SporkError::InvalidFrameBounds {
                lower: lower.render(),
                upper: upper.render(),
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> RowBound {
        self.lower
    }

    pub fn upper(&self) -> RowBound {
        self.upper
    }

    pub fn render(&self) -> String {
        format!("rows between {} and {}", self.lower, self.upper)
    }
}

#[derive(Deserialize)]
struct FrameBounds {
    lower: RowBound,
    upper: RowBound,
}

impl TryFrom<FrameBounds> for Frame {
    type Error = SporkError;

    fn try_from(bounds: FrameBounds) -> SporkResult<Self> {
        Frame::new(bounds.lower, bounds.upper)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            lower: unbounded_preceding(),
            upper: current_row(),
        }
    }
}

/// Window specification attached to a function call with `over`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Window {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partition_by: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_by: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ordering: Option<OrderDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frame: Option<Frame>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by(mut self, expr: impl Into<Expression>) -> Self {
        self.partition_by = Some(expr.into());
        self
    }

    pub fn order_by(
        mut self,
        expr: impl Into<Expression>,
        ordering: Option<OrderDirection>,
    ) -> Self {
        self.order_by = Some(expr.into());
        self.ordering = ordering;
        self
    }

    pub fn asc(mut self) -> Self {
        self.ordering = Some(OrderDirection::Asc);
        self
    }

    pub fn desc(mut self) -> Self {
        self.ordering = Some(OrderDirection::Desc);
        self
    }

    /// Set the frame. Fails with `InvalidFrameBounds` if the bounds are out of order.
    pub fn rows_between(mut self, lower: RowBound, upper: RowBound) -> SporkResult<Self> {
        self.frame = Some(Frame::new(lower, upper)?);
        Ok(self)
    }

    /// Effective frame, falling back to `unbounded preceding .. current row`
    pub fn frame(&self) -> Frame {
        self.frame.unwrap_or_default()
    }

    /// A window with no partition, no ordering and no explicit frame renders
    /// as `()`. Otherwise the effective frame is always included.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();

        if let Some(partition) = &self.partition_by {
            parts.push(format!("partition by {}", partition.render_unaliased()));
        }

        if let Some(order) = &self.order_by {
            let mut clause = format!("order by {}", order.render_unaliased());
            // The window's own direction overrides the expression's
            if let Some(ordering) = self.ordering.or(order.ordering()) {
                clause.push(' ');
                clause.push_str(ordering.as_str());
            }
            if let Some(nulls) = order.nulls_placement() {
                clause.push(' ');
                clause.push_str(nulls.as_str());
            }
            parts.push(clause);
        }

        if !parts.is_empty() || self.frame.is_some() {
            parts.push(self.frame().render());
        }

        format!("({})", parts.join(" "))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_rendering() {
        assert_eq!(unbounded_preceding().render(), "unbounded preceding");
        assert_eq!(unbounded_following().render(), "unbounded following");
        assert_eq!(current_row().render(), "current row");
        assert_eq!((current_row() - 1).render(), "current row -1");
        assert_eq!((current_row() + 3).render(), "current row +3");
        assert_eq!((current_row() + 2 - 2).render(), "current row");

        // Offsets on unbounded anchors are kept but not rendered
        let shifted = unbounded_preceding() - 5;
        assert_eq!(shifted.offset(), -5);
        assert_eq!(shifted.render(), "unbounded preceding");
    }

    #[test]
    fn test_bound_arithmetic_returns_new_bound() {
        let base = current_row();
        let shifted = base - 2;
        assert_eq!(base.offset(), 0);
        assert_eq!(shifted.offset(), -2);
        assert_eq!(shifted.kind(), BoundKind::CurrentRow);
    }

    #[test]
    fn test_offsets_saturate() {
        assert_eq!((current_row() + i64::MAX + 1).offset(), i64::MAX);
        assert_eq!((current_row() - i64::MAX - 5).offset(), i64::MIN);
    }

    #[test]
    fn test_dynamic_offsets() {
        let bound = current_row().try_sub(&Literal::Integer(1)).unwrap();
        assert_eq!(bound.render(), "current row -1");
        let bound = bound.try_add(&Literal::Integer(4)).unwrap();
        assert_eq!(bound.offset(), 3);

        assert_eq!(
            current_row().try_add(&Literal::Float(1.5)),
            Err(SporkError::InvalidOffsetType {
                type_name: "float".to_string()
            })
        );
        assert!(matches!(
            current_row().try_sub(&Literal::Text("1".to_string())),
            Err(SporkError::InvalidOffsetType { .. })
        ));
    }

    #[test]
    fn test_frame_validation() {
        let err = Window::new()
            .rows_between(current_row(), unbounded_preceding())
            .unwrap_err();
        assert_eq!(
            err,
            SporkError::InvalidFrameBounds {
                lower: "current row".to_string(),
                upper: "unbounded preceding".to_string(),
            }
        );

        assert!(Frame::new(current_row() - 1, current_row()).is_ok());
        assert!(Frame::new(current_row(), unbounded_following()).is_ok());
        assert!(Frame::new(unbounded_preceding(), unbounded_following()).is_ok());
        assert!(Frame::new(unbounded_following(), current_row()).is_err());
    }

    #[test]
    fn test_explicit_frame() {
        let window = Window::new()
            .rows_between(unbounded_preceding(), current_row() - 1)
            .unwrap();
        assert_eq!(
            window.render(),
            "(rows between unbounded preceding and current row -1)"
        );
    }

    #[test]
    fn test_bare_window() {
        assert_eq!(Window::new().render(), "()");
        assert_eq!(Window::new().frame(), Frame::default());
    }

    #[test]
    fn test_default_frame_with_clauses() {
        let window = Window::new().partition_by("id");
        assert_eq!(
            window.render(),
            "(partition by id rows between unbounded preceding and current row)"
        );

        let window = Window::new()
            .partition_by("id")
            .order_by(Expression::raw("ts").cast("date"), Some(OrderDirection::Asc));
        assert_eq!(
            window.to_string(),
            "(partition by id order by ts::date asc rows between unbounded preceding and current row)"
        );
    }

    #[test]
    fn test_ordering_shortcuts() {
        let window = Window::new().order_by("ts", None).desc();
        assert!(window.render().starts_with("(order by ts desc rows"));
        let window = window.asc();
        assert!(window.render().starts_with("(order by ts asc rows"));
    }

    #[test]
    fn test_expression_ordering_in_window() {
        let window = Window::new().order_by(Expression::raw("ts").desc().nulls_last(), None);
        assert_eq!(
            window.render(),
            "(order by ts desc nulls last rows between unbounded preceding and current row)"
        );

        let window = Window::new().order_by(
            Expression::raw("ts").desc().nulls_first(),
            Some(OrderDirection::Asc),
        );
        assert!(window.render().starts_with("(order by ts asc nulls first rows"));
    }

    #[test]
    fn test_window_clause_aliases_are_not_rendered() {
        let window = Window::new()
            .partition_by(Expression::raw("id").alias("i"))
            .order_by(Expression::wrap(Expression::raw("ts").alias("t")), None);
        assert_eq!(
            window.render(),
            "(partition by id order by ts rows between unbounded preceding and current row)"
        );
    }

    #[test]
    fn test_window_json() {
        let window: Window = serde_json::from_str(
            r#"{
                "partition_by": {"node": {"raw": "id"}},
                "frame": {
                    "lower": {"kind": "current_row", "offset": -2},
                    "upper": {"kind": "unbounded_following"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            window.render(),
            "(partition by id rows between current row -2 and unbounded following)"
        );

        let invalid = serde_json::from_str::<Window>(
            r#"{"frame": {"lower": {"kind": "current_row"}, "upper": {"kind": "unbounded_preceding"}}}"#,
        );
        assert!(invalid.is_err());
    }
}
