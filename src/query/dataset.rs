//! The from clause: a leading entity plus its joins.

use crate::error::SporkResult;
use crate::query::entity::Entity;
use crate::query::join::Join;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    entity: Entity,
    #[serde(default)]
    joins: Vec<Join>,
}

impl Dataset {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            joins: Vec::new(),
        }
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Each join goes on its own line after `from <entity>`
    pub fn render(&self) -> SporkResult<String> {
        let mut s = format!("from {}", self.entity.render());
        for join in &self.joins {
            s.push('\n');
            s.push_str(&join.render()?);
        }
        Ok(s)
    }
}
