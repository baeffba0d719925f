//! Ranking Commands
//!
//! The three calls the board needs from the Persistence Service. Both writes
//! replace the whole stored value; the last write wins.

use serde::Serialize;

use super::{invoke, js_error};
use crate::autosave::PendingWrite;
use crate::models::{EffectiveBase, Placement};
use crate::overlay::DisplaySettings;

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankingArgs<'a> {
    ranking_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplacePlacementsArgs<'a> {
    ranking_id: &'a str,
    placements: &'a [Placement],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceOverlayArgs<'a> {
    ranking_id: &'a str,
    overlay: &'a DisplaySettings,
}

// ========================
// Commands
// ========================

pub async fn get_effective_base(ranking_id: &str) -> Result<EffectiveBase, String> {
    let js_args = serde_wasm_bindgen::to_value(&RankingArgs { ranking_id }).map_err(|e| e.to_string())?;
    let result = invoke("get_effective_base", js_args).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

pub async fn replace_placements(ranking_id: &str, placements: &[Placement]) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&ReplacePlacementsArgs { ranking_id, placements })
        .map_err(|e| e.to_string())?;
    invoke("replace_placements", js_args).await.map_err(js_error)?;
    Ok(())
}

pub async fn replace_overlay(ranking_id: &str, overlay: &DisplaySettings) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&ReplaceOverlayArgs { ranking_id, overlay })
        .map_err(|e| e.to_string())?;
    invoke("replace_overlay", js_args).await.map_err(js_error)?;
    Ok(())
}

/// Send one coalesced autosave write. The overlay goes first so that cards it
/// adds exist before placements reference them.
pub async fn send_pending_write(ranking_id: &str, write: &PendingWrite) -> Result<(), String> {
    if let Some(overlay) = &write.overlay {
        replace_overlay(ranking_id, overlay).await?;
    }
    if let Some(placements) = &write.placements {
        replace_placements(ranking_id, placements).await?;
    }
    Ok(())
}
