//! Store Commands
//!
//! The operations the board (and the surrounding app) calls. Errors are
//! flattened to strings at this boundary.

use serde::{Deserialize, Serialize};

use crate::domain::{BaseSource, DomainError, EffectiveBase, Placement, Ranking, ShareTokens, Template};
use crate::repository::{
    DbState, RankingOverlayOperations, RankingPlacementOperations, RankingRepository,
    RankingSharingOperations, Repository, TemplateRepository,
};

/// Application state shared across commands
pub struct StoreState {
    pub db_state: DbState,
    pub templates: TemplateRepository,
    pub rankings: RankingRepository,
}

impl StoreState {
    pub fn new(db_state: DbState) -> Self {
        Self {
            templates: TemplateRepository::new(db_state.conn.clone()),
            rankings: RankingRepository::new(db_state.conn.clone()),
            db_state,
        }
    }
}

/// Summary returned after creating a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRanking {
    pub ranking_id: String,
    pub tokens: ShareTokens,
    pub card_count: usize,
}

impl From<&Ranking> for CreatedRanking {
    fn from(ranking: &Ranking) -> Self {
        Self {
            ranking_id: ranking.id.clone(),
            tokens: ranking.tokens.clone(),
            card_count: ranking.snapshot.cards.len(),
        }
    }
}

/// Save (insert or replace) a template
pub async fn save_template(state: &StoreState, template: Template) -> Result<Template, String> {
    state.templates.save(&template).await.map_err(|e| e.to_string())
}

/// Delete a template; rankings made from it fall back to their snapshot
pub async fn delete_template(state: &StoreState, template_id: String) -> Result<(), String> {
    state.templates.delete(&template_id).await.map_err(|e| e.to_string())
}

/// Create a ranking of a template for `owner`
pub async fn create_ranking(
    state: &StoreState,
    template_id: String,
    owner: String,
) -> Result<CreatedRanking, String> {
    let template = state
        .templates
        .find_by_id(&template_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| DomainError::NotFound(format!("template {}", template_id)).to_string())?;

    let ranking = state
        .rankings
        .create_from_template(&template, &owner)
        .await
        .map_err(|e| e.to_string())?;
    Ok(CreatedRanking::from(&ranking))
}

/// Base grid, placements and overlay of a ranking. The live template is
/// used while it exists, otherwise the creation snapshot.
pub async fn get_effective_base(state: &StoreState, ranking_id: String) -> Result<EffectiveBase, String> {
    let ranking = state
        .rankings
        .find_by_id(&ranking_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| DomainError::NotFound(format!("ranking {}", ranking_id)).to_string())?;

    let live = state
        .templates
        .find_by_id(&ranking.template_id)
        .await
        .map_err(|e| e.to_string())?;
    let (base, source) = match live {
        Some(template) => (template.grid, BaseSource::Live),
        None => {
            log::debug!("[RANKING] Template {} gone, serving snapshot", ranking.template_id);
            (ranking.snapshot, BaseSource::Snapshot)
        }
    };

    let placements = state
        .rankings
        .list_placements(&ranking_id)
        .await
        .map_err(|e| e.to_string())?;

    Ok(EffectiveBase {
        base,
        placements,
        overlay: ranking.overlay,
        source,
    })
}

/// Replace every placement of a ranking
pub async fn replace_placements(
    state: &StoreState,
    ranking_id: String,
    placements: Vec<Placement>,
) -> Result<(), String> {
    state
        .rankings
        .replace_placements(&ranking_id, &placements)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Replace the overlay document of a ranking
pub async fn replace_overlay(
    state: &StoreState,
    ranking_id: String,
    overlay: serde_json::Value,
) -> Result<(), String> {
    state
        .rankings
        .replace_overlay(&ranking_id, &overlay)
        .await
        .map_err(|e| e.to_string())
}

pub async fn clear_overlay(state: &StoreState, ranking_id: String) -> Result<(), String> {
    state.rankings.clear_overlay(&ranking_id).await.map_err(|e| e.to_string())
}

pub async fn regenerate_share_tokens(state: &StoreState, ranking_id: String) -> Result<ShareTokens, String> {
    state
        .rankings
        .regenerate_share_tokens(&ranking_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn add_co_owner(state: &StoreState, ranking_id: String, user_id: String) -> Result<bool, String> {
    state
        .rankings
        .add_co_owner(&ranking_id, &user_id)
        .await
        .map_err(|e| e.to_string())
}
