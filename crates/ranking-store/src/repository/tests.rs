//! Repository Integration Tests
//!
//! Tests for the template and ranking repositories with in-memory SQLite.

#[cfg(test)]
mod tests {
    use crate::commands::{self, StoreState};
    use crate::domain::{BaseSource, Card, Column, GridBase, Placement, ShareAccess, Template, Tier};
    use crate::repository::{
        init_db, RankingOverlayOperations, RankingPlacementOperations, RankingSharingOperations,
        Repository,
    };
    use serde_json::json;
    use std::path::PathBuf;

    async fn setup_test_db() -> StoreState {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        StoreState::new(db_state)
    }

    fn tier(id: &str, order: i32) -> Tier {
        Tier {
            id: id.to_string(),
            name: id.to_string(),
            color: "#f00".to_string(),
            order_index: order,
        }
    }

    fn card(id: &str, order: i32) -> Card {
        Card {
            id: id.to_string(),
            title: id.to_uppercase(),
            image_url: None,
            description: None,
            order_index: order,
        }
    }

    fn sample_template() -> Template {
        Template::new(
            "tpl",
            "Fruits",
            GridBase {
                tiers: vec![tier("S", 0), tier("A", 1)],
                columns: vec![Column {
                    id: "col1".to_string(),
                    name: Some("Taste".to_string()),
                    color: None,
                    order_index: 0,
                }],
                cards: vec![card("banana", 1), card("apple", 0), card("cherry", 2)],
            },
        )
    }

    async fn setup_ranking() -> (StoreState, String) {
        let state = setup_test_db().await;
        commands::save_template(&state, sample_template()).await.unwrap();
        let created = commands::create_ranking(&state, "tpl".to_string(), "alice".to_string())
            .await
            .unwrap();
        (state, created.ranking_id)
    }

    #[tokio::test]
    async fn test_save_and_find_template() {
        let state = setup_test_db().await;
        state.templates.save(&sample_template()).await.expect("Save failed");

        let found = state.templates.find_by_id(&"tpl".to_string()).await.unwrap().unwrap();
        assert_eq!(found.name, "Fruits");
        let ids: Vec<_> = found.grid.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["apple", "banana", "cherry"]);

        // Saving again replaces children
        let mut smaller = sample_template();
        smaller.grid.tiers.truncate(1);
        state.templates.save(&smaller).await.unwrap();
        let found = state.templates.find_by_id(&"tpl".to_string()).await.unwrap().unwrap();
        assert_eq!(found.grid.tiers.len(), 1);
        assert_eq!(state.templates.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_template_rejects_duplicate_ids() {
        let state = setup_test_db().await;
        let mut template = sample_template();
        template.grid.cards.push(card("apple", 9));
        assert!(state.templates.save(&template).await.is_err());
        assert!(state.templates.create(&sample_template()).await.is_ok());
        assert!(state.templates.create(&sample_template()).await.is_err());
    }

    #[tokio::test]
    async fn test_create_ranking_seeds_unranked_pool() {
        let (state, ranking_id) = setup_ranking().await;

        let placements = state.rankings.list_placements(&ranking_id).await.unwrap();
        assert_eq!(
            placements,
            vec![
                Placement::unranked("apple", 0),
                Placement::unranked("banana", 1),
                Placement::unranked("cherry", 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_ranking_for_missing_template() {
        let state = setup_test_db().await;
        let result = commands::create_ranking(&state, "nope".to_string(), "alice".to_string()).await;
        assert!(result.unwrap_err().contains("Not found"));
    }

    #[tokio::test]
    async fn test_effective_base_prefers_live_template() {
        let (state, ranking_id) = setup_ranking().await;

        let mut edited = sample_template();
        edited.grid.tiers.push(tier("B", 2));
        commands::save_template(&state, edited).await.unwrap();

        let base = commands::get_effective_base(&state, ranking_id.clone()).await.unwrap();
        assert_eq!(base.source, BaseSource::Live);
        assert_eq!(base.base.tiers.len(), 3);
        assert_eq!(base.placements.len(), 3);
        assert_eq!(base.overlay, None);

        commands::delete_template(&state, "tpl".to_string()).await.unwrap();
        let base = commands::get_effective_base(&state, ranking_id).await.unwrap();
        assert_eq!(base.source, BaseSource::Snapshot);
        assert_eq!(base.base.tiers.len(), 2);
    }

    #[tokio::test]
    async fn test_replace_placements_is_full_replace() {
        let (state, ranking_id) = setup_ranking().await;

        let ranked = Placement {
            card_id: "apple".to_string(),
            tier_id: Some("S".to_string()),
            column_id: Some("col1".to_string()),
            order_index: 0,
        };
        let stored = state
            .rankings
            .replace_placements(&ranking_id, &[ranked.clone(), Placement::unranked("banana", 0)])
            .await
            .unwrap();
        assert_eq!(stored, 2);

        let placements = state.rankings.list_placements(&ranking_id).await.unwrap();
        assert_eq!(placements, vec![Placement::unranked("banana", 0), ranked]);
    }

    #[tokio::test]
    async fn test_replace_placements_last_duplicate_wins() {
        let (state, ranking_id) = setup_ranking().await;
        let first = Placement::unranked("apple", 0);
        let second = Placement {
            card_id: "apple".to_string(),
            tier_id: Some("A".to_string()),
            column_id: None,
            order_index: 0,
        };
        let stored = state
            .rankings
            .replace_placements(&ranking_id, &[first, second.clone()])
            .await
            .unwrap();
        assert_eq!(stored, 1);
        assert_eq!(state.rankings.list_placements(&ranking_id).await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_replace_placements_validates() {
        let (state, ranking_id) = setup_ranking().await;
        let invalid = Placement {
            card_id: "apple".to_string(),
            tier_id: None,
            column_id: Some("col1".to_string()),
            order_index: 0,
        };
        assert!(state.rankings.replace_placements(&ranking_id, &[invalid]).await.is_err());
        // Nothing was touched
        assert_eq!(state.rankings.list_placements(&ranking_id).await.unwrap().len(), 3);

        let missing = state
            .rankings
            .replace_placements("ghost", &[Placement::unranked("apple", 0)])
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_overlay_replace_and_clear() {
        let (state, ranking_id) = setup_ranking().await;
        let overlay = json!({ "hiddenTierIds": ["A"], "additionalTiers": [{ "id": "local_tier_1_a", "name": "X", "color": "#0f0" }] });

        commands::replace_overlay(&state, ranking_id.clone(), overlay.clone()).await.unwrap();
        assert_eq!(state.rankings.get_overlay(&ranking_id).await.unwrap(), Some(overlay.clone()));
        let base = commands::get_effective_base(&state, ranking_id.clone()).await.unwrap();
        assert_eq!(base.overlay, Some(overlay));

        assert!(commands::replace_overlay(&state, ranking_id.clone(), json!([1, 2])).await.is_err());

        commands::clear_overlay(&state, ranking_id.clone()).await.unwrap();
        assert_eq!(state.rankings.get_overlay(&ranking_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_regenerate_tokens_drops_co_owners_keeps_overlay() {
        let (state, ranking_id) = setup_ranking().await;
        let before = state.rankings.find_by_id(&ranking_id).await.unwrap().unwrap();

        assert!(commands::add_co_owner(&state, ranking_id.clone(), "bob".to_string()).await.unwrap());
        assert!(!commands::add_co_owner(&state, ranking_id.clone(), "bob".to_string()).await.unwrap());
        assert!(!commands::add_co_owner(&state, ranking_id.clone(), "alice".to_string()).await.unwrap());
        commands::replace_overlay(&state, ranking_id.clone(), json!({ "tierOrder": ["A", "S"] }))
            .await
            .unwrap();

        let tokens = commands::regenerate_share_tokens(&state, ranking_id.clone()).await.unwrap();
        assert_ne!(tokens, before.tokens);
        assert!(state.rankings.list_co_owners(&ranking_id).await.unwrap().is_empty());
        assert!(state.rankings.get_overlay(&ranking_id).await.unwrap().is_some());

        assert_eq!(
            state.rankings.find_by_token(&tokens.edit_token).await.unwrap(),
            Some((ranking_id.clone(), ShareAccess::Edit))
        );
        assert_eq!(
            state.rankings.find_by_token(&tokens.view_token).await.unwrap(),
            Some((ranking_id, ShareAccess::View))
        );
        assert_eq!(state.rankings.find_by_token(&before.tokens.view_token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_ranking_cascades() {
        let (state, ranking_id) = setup_ranking().await;
        state.rankings.delete(&ranking_id).await.unwrap();
        assert!(state.rankings.find_by_id(&ranking_id).await.unwrap().is_none());
        assert!(state.rankings.list_placements(&ranking_id).await.is_err());
        assert!(state.rankings.list().await.unwrap().is_empty());
    }
}
