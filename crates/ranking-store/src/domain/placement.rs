//! Placement Entity

use serde::{Deserialize, Serialize};

use super::entity::DomainError;

/// A card's cell and order within one ranking. No tier means the unranked
/// pool; a column without a tier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub card_id: String,
    pub tier_id: Option<String>,
    pub column_id: Option<String>,
    pub order_index: i32,
}

impl Placement {
    pub fn unranked(card_id: impl Into<String>, order_index: i32) -> Self {
        Self {
            card_id: card_id.into(),
            tier_id: None,
            column_id: None,
            order_index,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.card_id.is_empty() {
            return Err(DomainError::InvalidInput("placement without card id".to_string()));
        }
        if self.tier_id.is_none() && self.column_id.is_some() {
            return Err(DomainError::InvalidInput(format!(
                "card {} has a column but no tier",
                self.card_id
            )));
        }
        if self.order_index < 0 {
            return Err(DomainError::InvalidInput(format!(
                "card {} has negative order {}",
                self.card_id, self.order_index
            )));
        }
        Ok(())
    }
}
