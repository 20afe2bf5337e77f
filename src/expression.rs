//! Expression tree construction and rendering.
//!
//! This module provides:
//! - Expression AST nodes (identifiers, literals, operators, function calls)
//! - Typed literal values with SQL quoting
//! - Window specifications with validated frames
//! - Operator and keyword tables used during rendering

pub mod expr;
pub mod function;
pub mod literal;
pub mod operator;
pub mod window;

pub use expr::{Expression, IntoOperand, Node};
pub use function::{
    avg, dense_rank, first_value, lag, last_value, lead, max, min, rank, row_number,
    FunctionCall, FunctionLabel,
};
pub use literal::{IntoLiteral, Literal};
pub use operator::{BinaryOperator, NullCheck, NullsPlacement, OrderDirection, UnaryOperator};
pub use window::{
    current_row, unbounded_following, unbounded_preceding, BoundKind, Frame, RowBound, Window,
};

/// Create a column reference. The name is rendered verbatim.
pub fn col(name: impl Into<String>) -> Expression {
    Expression::raw(name)
}

/// Create a literal expression.
pub fn lit(value: impl IntoLiteral) -> Expression {
    Expression::literal(value)
}
