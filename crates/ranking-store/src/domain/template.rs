//! Template Entity
//!
//! A named grid that rankings are created from.

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, Entity};
use super::grid::GridBase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub grid: GridBase,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>, grid: GridBase) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grid,
        }
    }

    /// Ids must be non-empty and unique per kind
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::InvalidInput("template id is empty".to_string()));
        }
        check_unique("tier", self.grid.tiers.iter().map(|t| t.id.as_str()))?;
        check_unique("column", self.grid.columns.iter().map(|c| c.id.as_str()))?;
        check_unique("card", self.grid.cards.iter().map(|c| c.id.as_str()))?;
        Ok(())
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), DomainError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(DomainError::InvalidInput(format!("{} id is empty", kind)));
        }
        if !seen.insert(id) {
            return Err(DomainError::InvalidInput(format!("duplicate {} id {}", kind, id)));
        }
    }
    Ok(())
}

impl Entity for Template {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
