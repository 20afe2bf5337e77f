//! Joins and join kinds.

use crate::error::{SporkError, SporkResult};
use crate::expression::Expression;
use crate::query::entity::Entity;
use crate::query::statement::Query;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a dataset is included in a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    From,
    #[default]
    Inner,
    Left,
    Right,
    FullOuter,
    LeftAnti,
    RightAnti,
}

impl JoinKind {
    const ALL: [JoinKind; 7] = [
        JoinKind::From,
        JoinKind::Inner,
        JoinKind::Left,
        JoinKind::Right,
        JoinKind::FullOuter,
        JoinKind::LeftAnti,
        JoinKind::RightAnti,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::From => "from",
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::FullOuter => "full outer",
            JoinKind::LeftAnti => "left anti",
            JoinKind::RightAnti => "right anti",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = SporkError;

    /// Case-insensitive; spaces and underscores are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SporkError::InvalidJoinKind {
                name: s.to_string(),
            })
    }
}

/// Right-hand side of a join
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinTarget {
    Entity(Entity),
    Expression(Expression),
    Subquery {
        query: Box<Query>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
}

impl JoinTarget {
    pub fn subquery(query: Query, alias: impl Into<String>) -> Self {
        JoinTarget::Subquery {
            query: Box::new(query),
            alias: Some(alias.into()),
        }
    }

    pub fn render(&self) -> SporkResult<String> {
        match self {
            JoinTarget::Entity(entity) => Ok(entity.render()),
            JoinTarget::Expression(expr) => Ok(expr.render()),
            JoinTarget::Subquery { query, alias } => {
                let inner = query.render()?;
                Ok(match alias {
                    Some(alias) => format!("({}) {}", inner, alias),
                    None => format!("({})", inner),
                })
            }
        }
    }
}

impl From<Entity> for JoinTarget {
    fn from(entity: Entity) -> Self {
        JoinTarget::Entity(entity)
    }
}

impl From<Expression> for JoinTarget {
    fn from(expr: Expression) -> Self {
        JoinTarget::Expression(expr)
    }
}

impl From<Query> for JoinTarget {
    fn from(query: Query) -> Self {
        JoinTarget::Subquery {
            query: Box::new(query),
            alias: None,
        }
    }
}

/// `<kind> join <target> on <condition>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Join {
    target: JoinTarget,
    on: Expression,
    #[serde(default)]
    kind: JoinKind,
}

impl Join {
    /// Create an inner join
    pub fn new(target: impl Into<JoinTarget>, on: Expression) -> Self {
        Self {
            target: target.into(),
            on,
            kind: JoinKind::Inner,
        }
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the join kind from its name, e.g. `"left anti"` or `"FULL_OUTER"`
    pub fn how(self, name: &str) -> SporkResult<Self> {
        Ok(self.kind(name.parse()?))
    }

    pub fn join_kind(&self) -> JoinKind {
        self.kind
    }

    pub fn render(&self) -> SporkResult<String> {
        Ok(format!(
            "{} join {} on {}",
            self.kind,
            self.target.render()?,
            self.on.render()
        ))
    }
}
