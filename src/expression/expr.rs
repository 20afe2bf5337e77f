//! Expression AST definitions and rendering.

use crate::error::{SporkError, SporkResult};
use crate::expression::function::FunctionCall;
use crate::expression::literal::{IntoLiteral, Literal};
use crate::expression::operator::{
    BinaryOperator, NullCheck, NullsPlacement, OrderDirection, UnaryOperator,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops;

/// Body of an expression tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Identifier or raw SQL text, rendered verbatim
    Raw(String),

    /// Typed constant
    Literal(Literal),

    /// Another expression wrapped as-is
    Nested(Box<Expression>),

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// Function call with optional window
    Function(Box<FunctionCall>),
}

/// Expression tree node.
///
/// Combinators (`and`, `eq`, `add`, ...) consume their operands and return a
/// new parent node. Modifiers (`cast`, `alias`, `is_null`, `desc`, ...) return
/// the same node with one field changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ordering: Option<OrderDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nulls: Option<NullsPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    null_check: Option<NullCheck>,
    #[serde(default, skip_serializing_if = "is_false")]
    negated: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Expression {
    fn from_node(node: Node) -> Self {
        Self {
            node,
            cast: None,
            alias: None,
            ordering: None,
            nulls: None,
            null_check: None,
            negated: false,
        }
    }

    /// Create an expression rendered verbatim (column name, raw SQL)
    pub fn raw(text: impl Into<String>) -> Self {
        Self::from_node(Node::Raw(text.into()))
    }

    /// Create a literal expression
    pub fn literal(value: impl IntoLiteral) -> Self {
        Self::from_node(Node::Literal(value.into_literal()))
    }

    /// Wrap an existing expression without copying it
    pub fn wrap(inner: Expression) -> Self {
        Self::from_node(Node::Nested(Box::new(inner)))
    }

    /// Create a function call expression
    pub fn function(call: FunctionCall) -> Self {
        Self::from_node(Node::Function(Box::new(call)))
    }

    /// Create a binary operation expression. Operand aliases are dropped.
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Self::from_node(Node::Binary {
            left: Box::new(left.without_alias()),
            op,
            right: Box::new(right.without_alias()),
        })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn cast_type(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn ordering(&self) -> Option<OrderDirection> {
        self.ordering
    }

    pub fn nulls_placement(&self) -> Option<NullsPlacement> {
        self.nulls
    }

    pub fn null_check(&self) -> Option<NullCheck> {
        self.null_check
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    fn without_alias(mut self) -> Self {
        self.strip_alias();
        self
    }

    /// Clear the alias of this node and of any wrapped nodes beneath it
    fn strip_alias(&mut self) {
        self.alias = None;
        if let Node::Nested(inner) = &mut self.node {
            inner.strip_alias();
        }
    }

    fn clear_child_aliases(&mut self) {
        match &mut self.node {
            Node::Binary { left, right, .. } => {
                left.strip_alias();
                right.strip_alias();
            }
            Node::Nested(inner) => inner.strip_alias(),
            Node::Raw(_) | Node::Literal(_) | Node::Function(_) => {}
        }
    }

    fn is_incomplete(&self) -> bool {
        matches!(&self.node, Node::Raw(text) if text.trim().is_empty())
    }

    // Combinators

    pub fn and(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::And, other.into_operand())
    }

    pub fn or(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Or, other.into_operand())
    }

    pub fn eq(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Eq, other.into_operand())
    }

    pub fn neq(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Neq, other.into_operand())
    }

    pub fn lt(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Lt, other.into_operand())
    }

    pub fn le(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Le, other.into_operand())
    }

    pub fn gt(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Gt, other.into_operand())
    }

    pub fn ge(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Ge, other.into_operand())
    }

    pub fn add(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Add, other.into_operand())
    }

    pub fn sub(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Sub, other.into_operand())
    }

    pub fn mul(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Mul, other.into_operand())
    }

    pub fn div(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Div, other.into_operand())
    }

    pub fn modulo(self, other: impl IntoOperand) -> Expression {
        Self::binary(self, BinaryOperator::Mod, other.into_operand())
    }

    /// `self between lower and upper`; the bounds are rendered into a single
    /// right-hand side.
    pub fn between(self, lower: impl IntoOperand, upper: impl IntoOperand) -> Expression {
        let lower = lower.into_operand().without_alias();
        let upper = upper.into_operand().without_alias();
        let range = Expression::raw(format!("{} and {}", lower.render(), upper.render()));
        Self::binary(self, BinaryOperator::Between, range)
    }

    /// Toggle negation. Negating twice restores the original rendering.
    pub fn not(mut self) -> Expression {
        self.negated = !self.negated;
        self.clear_child_aliases();
        self
    }

    /// Like [`Expression::not`], but rejects nodes with nothing to negate.
    pub fn negate(self) -> SporkResult<Expression> {
        if self.is_incomplete() {
            return Err(SporkError::IncompleteNegation);
        }
        Ok(self.not())
    }

    // Modifiers

    pub fn cast(mut self, to: impl Into<String>) -> Self {
        self.cast = Some(to.into());
        self
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    pub fn is_null(mut self) -> Self {
        self.null_check = Some(NullCheck::IsNull);
        self
    }

    pub fn is_not_null(mut self) -> Self {
        self.null_check = Some(NullCheck::IsNotNull);
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

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsPlacement::NullsFirst);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsPlacement::NullsLast);
        self
    }

    /// Render the expression as SQL text.
    ///
    /// Modifiers are applied in a fixed order: negation, cast, alias, null check.
    pub fn render(&self) -> String {
        self.render_with_alias(true)
    }

    /// Render without `as <alias>` at any wrapping level. Used for function
    /// arguments and window clauses, where an alias is not valid SQL.
    pub(crate) fn render_unaliased(&self) -> String {
        self.render_with_alias(false)
    }

    fn render_with_alias(&self, with_alias: bool) -> String {
        let mut s = match &self.node {
            Node::Raw(text) => text.clone(),
            Node::Literal(lit) => lit.to_string(),
            Node::Nested(inner) => inner.render_with_alias(with_alias),
            Node::Binary { left, op, right } => {
                format!("({} {} {})", left.render(), op, right.render())
            }
            Node::Function(call) => call.render(),
        };

        if self.negated {
            s = format!("{} {}", UnaryOperator::Not, s);
        }
        if let Some(cast) = &self.cast {
            s.push_str("::");
            s.push_str(cast);
        }
        if let Some(alias) = self.alias.as_ref().filter(|_| with_alias) {
            s.push_str(" as ");
            s.push_str(alias);
        }
        if let Some(check) = self.null_check {
            s.push(' ');
            s.push_str(check.as_str());
        }
        s
    }

    /// Render for an ORDER BY position, appending direction and NULL placement.
    pub fn render_ordered(&self) -> String {
        let mut s = self.render();
        if let Some(direction) = self.ordering {
            s.push(' ');
            s.push_str(direction.as_str());
        }
        if let Some(nulls) = self.nulls {
            s.push(' ');
            s.push_str(nulls.as_str());
        }
        s
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// Strings in column position are identifiers.

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::raw(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Expression::raw(text)
    }
}

impl From<Literal> for Expression {
    fn from(lit: Literal) -> Self {
        Expression::literal(lit)
    }
}

impl From<FunctionCall> for Expression {
    fn from(call: FunctionCall) -> Self {
        Expression::function(call)
    }
}

/// Conversion of a right-hand operand. Plain Rust values become literals,
/// so `col("name").eq("x")` compares against `'x'`.
pub trait IntoOperand {
    fn into_operand(self) -> Expression;
}

impl IntoOperand for Expression {
    fn into_operand(self) -> Expression {
        self
    }
}

impl IntoOperand for FunctionCall {
    fn into_operand(self) -> Expression {
        Expression::function(self)
    }
}

impl<T: IntoLiteral> IntoOperand for Option<T> {
    fn into_operand(self) -> Expression {
        Expression::literal(self)
    }
}

macro_rules! literal_operand {
    ($($t:ty),*) => {
        $(
            impl IntoOperand for $t {
                fn into_operand(self) -> Expression {
                    Expression::literal(self)
                }
            }
        )*
    };
}

literal_operand!(Literal, &str, String, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64);

macro_rules! binary_trait {
    ($trait:ident, $method:ident, $inherent:ident) => {
        impl<T: IntoOperand> ops::$trait<T> for Expression {
            type Output = Expression;

            fn $method(self, rhs: T) -> Expression {
                Expression::$inherent(self, rhs)
            }
        }
    };
}

binary_trait!(BitAnd, bitand, and);
binary_trait!(BitOr, bitor, or);
binary_trait!(Add, add, add);
binary_trait!(Sub, sub, sub);
binary_trait!(Mul, mul, mul);
binary_trait!(Div, div, div);
binary_trait!(Rem, rem, modulo);

impl ops::Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        Expression::not(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(text: &str) -> Expression {
        Expression::raw(text)
    }

    #[test]
    fn test_init() {
        assert_eq!(e("FromString").render(), "FromString");
        assert_eq!(Expression::wrap(e("FromExpression")).render(), "FromExpression");
        assert_eq!(
            Expression::wrap(e("x").cast("int")).alias("y").render(),
            "x::int as y"
        );
    }

    #[test]
    fn test_negate() {
        assert_eq!((!e("True")).render(), "not True");

        let outer_not = !(e("AlsoTrue") & e("FurthermoreTrue"));
        assert_eq!(outer_not.render(), "not (AlsoTrue and FurthermoreTrue)");

        let inner_not = e("AlsoTrue") & !e("FurthermoreTrue");
        assert_eq!(inner_not.render(), "(AlsoTrue and not FurthermoreTrue)");
    }

    #[test]
    fn test_double_negation_toggles() {
        let twice = !!(e("A") & e("B"));
        assert_eq!(twice.render(), "(A and B)");
        assert!(!twice.is_negated());

        let nested = !Expression::wrap(!e("A"));
        assert_eq!(nested.render(), "not not A");
    }

    #[test]
    fn test_checked_negate() {
        assert_eq!(e("flag").negate().unwrap().render(), "not flag");
        assert!(matches!(
            e("  ").negate(),
            Err(SporkError::IncompleteNegation)
        ));
    }

    #[test]
    fn test_negation_clears_child_aliases() {
        let negated = !Expression::wrap(e("x").alias("inner"));
        assert_eq!(negated.render(), "not x");
    }

    #[test]
    fn test_eq_neq() {
        assert_eq!(e("lhs").eq(e("rhs")).render(), "(lhs = rhs)");
        assert_eq!(e("rhs").eq(e("lhs")).render(), "(rhs = lhs)");
        assert_eq!(e("lhs").neq(e("rhs")).render(), "(lhs <> rhs)");
        assert_eq!(e("rhs").neq(e("lhs")).render(), "(rhs <> lhs)");
    }

    #[test]
    fn test_binary_ops() {
        let lhs = e("lhs");
        let rhs = e("rhs");

        // Logical
        assert_eq!((lhs.clone() & rhs.clone()).render(), "(lhs and rhs)");
        assert_eq!((lhs.clone() | rhs.clone()).render(), "(lhs or rhs)");

        // Comparison
        assert_eq!(lhs.clone().lt(rhs.clone()).render(), "(lhs < rhs)");
        assert_eq!(lhs.clone().le(rhs.clone()).render(), "(lhs <= rhs)");
        assert_eq!(lhs.clone().gt(rhs.clone()).render(), "(lhs > rhs)");
        assert_eq!(lhs.clone().ge(rhs.clone()).render(), "(lhs >= rhs)");

        // Arithmetic
        assert_eq!((lhs.clone() + rhs.clone()).render(), "(lhs + rhs)");
        assert_eq!((lhs.clone() - rhs.clone()).render(), "(lhs - rhs)");
        assert_eq!((lhs.clone() * rhs.clone()).render(), "(lhs * rhs)");
        assert_eq!((lhs.clone() / rhs.clone()).render(), "(lhs / rhs)");
        assert_eq!((lhs % rhs).render(), "(lhs % rhs)");
    }

    #[test]
    fn test_operands_become_literals() {
        assert_eq!(e("name").eq("O'Brien").render(), "(name = 'O''Brien')");
        assert_eq!(e("age").ge(18).render(), "(age >= 18)");
        assert_eq!(e("score").mul(0.5).render(), "(score * 0.5)");
        assert_eq!(e("active").eq(true).render(), "(active = TRUE)");
        assert_eq!(e("deleted_at").eq(None::<i32>).render(), "(deleted_at = NULL)");
    }

    #[test]
    fn test_between() {
        let range = e("price").between(10, 20);
        assert_eq!(range.render(), "(price between 10 and 20)");

        let dates = e("ts").between(e("start").alias("s"), e("stop"));
        assert_eq!(dates.render(), "(ts between start and stop)");
    }

    #[test]
    fn test_alias() {
        assert_eq!(
            e("BaseExpression").alias("Aliased").render(),
            "BaseExpression as Aliased"
        );

        let outer = (e("A") & e("B")).alias("OuterAlias");
        assert_eq!(outer.render(), "(A and B) as OuterAlias");

        let nested = e("X").alias("InnerAlias") & e("Y");
        assert_eq!(nested.render(), "(X and Y)");
    }

    #[test]
    fn test_alias_does_not_leak() {
        let combined = e("A").alias("x").and(e("B").alias("y"));
        let rendered = combined.render();
        assert!(!rendered.contains("as x"));
        assert!(!rendered.contains("as y"));
        assert_eq!(combined.alias("both").render(), "(A and B) as both");
    }

    #[test]
    fn test_alias_does_not_leak_through_wrapping() {
        let wrapped = Expression::wrap(Expression::wrap(e("A").alias("x")));
        let combined = wrapped.and(e("B").alias("y"));
        assert_eq!(combined.render(), "(A and B)");

        let between = e("ts").between(Expression::wrap(e("lo").alias("l")), e("hi"));
        assert_eq!(between.render(), "(ts between lo and hi)");

        let negated = !Expression::wrap(Expression::wrap(e("A").alias("x")));
        assert_eq!(negated.render(), "not A");
    }

    #[test]
    fn test_render_unaliased() {
        let expr = Expression::wrap(e("a").cast("int").alias("inner")).alias("outer");
        assert_eq!(expr.render(), "a::int as inner as outer");
        assert_eq!(expr.render_unaliased(), "a::int");
    }

    #[test]
    fn test_cast() {
        assert_eq!(
            e("BaseExpression").cast("decimal").render(),
            "BaseExpression::decimal"
        );
        assert_eq!((e("A") & e("B")).cast("text").render(), "(A and B)::text");
        assert_eq!((e("X").cast("int") & e("Y")).render(), "(X::int and Y)");
    }

    #[test]
    fn test_null_check() {
        assert_eq!(e("Nullables").is_null().render(), "Nullables is null");
        assert_eq!(e("Nullables").is_not_null().render(), "Nullables is not null");
    }

    #[test]
    fn test_modifier_order() {
        let all = e("A").eq(e("B")).cast("bool").alias("flag").is_not_null();
        assert_eq!(all.render(), "(A = B)::bool as flag is not null");

        let negated = (!e("A").eq(e("B"))).cast("bool").alias("flag").is_null();
        assert_eq!(negated.render(), "not (A = B)::bool as flag is null");
    }

    #[test]
    fn test_render_is_repeatable() {
        let expr = (e("a") + 1).gt(e("b")).alias("c");
        assert_eq!(expr.render(), expr.render());
        assert_eq!(expr.to_string(), "((a + 1) > b) as c");
    }

    #[test]
    fn test_render_ordered() {
        assert_eq!(e("ts").render_ordered(), "ts");
        assert_eq!(e("ts").desc().render_ordered(), "ts desc");
        assert_eq!(e("ts").asc().nulls_last().render_ordered(), "ts asc nulls last");
        assert_eq!(e("ts").nulls_first().render(), "ts");
    }

    #[test]
    fn test_literal_node_modifiers() {
        assert_eq!(Expression::literal(1000).cast("timestamp").render(), "1000::timestamp");
        assert_eq!(Expression::literal("x").alias("y").render(), "'x' as y");
    }

    #[test]
    fn test_json_shape() {
        let expr = e("a").eq(1).alias("flag");
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["alias"], "flag");
        assert_eq!(json["node"]["binary"]["op"], "eq");
        assert_eq!(json["node"]["binary"]["right"]["node"]["literal"], 1);

        let back: Expression = serde_json::from_value(json).unwrap();
        assert_eq!(back.render(), "(a = 1) as flag");
    }
}
