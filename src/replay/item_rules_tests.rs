//! Item Lifecycle Rule Tests
//!
//! Covers the tracked-item predicate and every transaction rule, including
//! the upgrade map, undo symmetry, the support quest payout, and the
//! champion exception table. The catalog here deliberately omits the
//! upgrade and support items to prove the config alone tracks them.

use crate::catalog::{ItemCatalog, ItemEntry};
use crate::replay::events::{Event, ItemId};
use crate::replay::item_rules::ItemRules;
use crate::replay::state::{Lane, ParticipantMeta, ParticipantState};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn entry(id: ItemId, tier: u8, rank: &[&str]) -> ItemEntry {
    ItemEntry {
        id,
        name: format!("Item {}", id),
        tier,
        rank: rank.iter().map(|r| r.to_string()).collect(),
        builds_from: Vec::new(),
        builds_into: Vec::new(),
        icon: None,
    }
}

fn make_rules() -> ItemRules {
    let catalog = ItemCatalog::from_entries([
        entry(3031, 3, &["LEGENDARY"]),
        entry(6672, 4, &["MYTHIC"]),
        entry(3047, 2, &["BOOTS"]),
        entry(1001, 1, &["BOOTS"]), // basic boots, untracked
        entry(1055, 1, &["STARTER"]),
        entry(1036, 1, &["BASIC"]),
    ]);
    ItemRules::with_defaults(catalog)
}

fn state_for(champion_name: &str, final_items: Vec<ItemId>) -> ParticipantState {
    ParticipantState::new(ParticipantMeta {
        participant_id: 1,
        puuid: None,
        champion_id: 1,
        champion_name: champion_name.to_string(),
        team_id: 100,
        lane: Lane::Invalid,
        tier: None,
        origin: None,
        perks: None,
        final_items,
    })
}

fn purchase(item_id: ItemId) -> Event {
    Event::ItemPurchased {
        participant_id: 1,
        item_id,
    }
}

fn sale(item_id: ItemId) -> Event {
    Event::ItemSold {
        participant_id: 1,
        item_id,
    }
}

fn destroyed(item_id: ItemId) -> Event {
    Event::ItemDestroyed {
        participant_id: 1,
        item_id,
    }
}

fn undo(before_id: ItemId, after_id: ItemId) -> Event {
    Event::ItemUndo {
        participant_id: 1,
        before_id,
        after_id,
    }
}

// =============================================================================
// TRACKED PREDICATE
// =============================================================================

#[test]
fn test_tracked_predicate_classes() {
    let rules = make_rules();

    assert!(rules.is_tracked(3031), "tier 3 completed item");
    assert!(rules.is_tracked(6672), "tier 4 completed item");
    assert!(rules.is_tracked(3047), "tier 2 boots");
    assert!(rules.is_tracked(1055), "starter item");
    assert!(!rules.is_tracked(1001), "tier 1 boots are not tracked");
    assert!(!rules.is_tracked(1036), "plain component");
    assert!(!rules.is_tracked(9999), "unknown id");
}

#[test]
fn test_upgrade_map_members_tracked_without_catalog_entries() {
    let rules = make_rules();

    // Precursors and successors are tracked purely via the config.
    assert!(rules.is_tracked(3003));
    assert!(rules.is_tracked(3040));
    assert!(rules.is_tracked(3004));
    assert!(rules.is_tracked(3042));
    assert!(rules.is_tracked(3119));
    assert!(rules.is_tracked(3121));
    // Support payouts likewise.
    assert!(rules.is_tracked(3869));
    assert!(rules.is_tracked(3877));
}

// =============================================================================
// PURCHASE AND SALE
// =============================================================================

#[test]
fn test_purchase_adds_once() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    assert!(rules.apply(&mut state, &purchase(3031)));
    assert!(state.items.contains(&3031));
    // Re-purchasing a held item is a no-op.
    assert!(!rules.apply(&mut state, &purchase(3031)));
    assert_eq!(state.items.len(), 1);
}

#[test]
fn test_untracked_purchase_ignored() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    assert!(!rules.apply(&mut state, &purchase(1036)));
    assert!(state.items.is_empty());
}

#[test]
fn test_sale_removes_held_and_ignores_absent() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3031));
    assert!(rules.apply(&mut state, &sale(3031)));
    assert!(state.items.is_empty());
    assert!(!rules.apply(&mut state, &sale(3031)));
}

// =============================================================================
// UNDO
// =============================================================================

#[test]
fn test_undo_reverses_purchase() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3031));
    assert!(rules.apply(&mut state, &undo(3031, 0)));
    assert!(state.items.is_empty());
}

#[test]
fn test_undo_restores_sold_item() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3047));
    rules.apply(&mut state, &sale(3047));
    assert!(rules.apply(&mut state, &undo(0, 3047)));
    assert!(state.items.contains(&3047));
}

#[test]
fn test_undo_after_side_toggles_membership() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3031));
    // After side already held: the toggle removes it.
    assert!(rules.apply(&mut state, &undo(0, 3031)));
    assert!(state.items.is_empty());
}

#[test]
fn test_undo_of_nothing_is_a_no_op() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    assert!(!rules.apply(&mut state, &undo(0, 0)));
    assert!(!rules.apply(&mut state, &undo(1036, 1036)));
    assert!(state.items.is_empty());
}

// =============================================================================
// DESTROY, UPGRADE, SUPPORT QUEST
// =============================================================================

#[test]
fn test_destroy_removes_held_item() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3031));
    assert!(rules.apply(&mut state, &destroyed(3031)));
    assert!(state.items.is_empty());
}

#[test]
fn test_destroy_of_precursor_swaps_in_successor() {
    let rules = make_rules();
    let mut state = state_for("Ashe", vec![]);

    rules.apply(&mut state, &purchase(3003));
    assert!(rules.apply(&mut state, &destroyed(3003)));
    assert!(!state.items.contains(&3003));
    assert!(state.items.contains(&3040));
}

#[test]
fn test_support_quest_payout_gated_by_final_build() {
    let rules = make_rules();

    // Final build says the quest paid out Bloodsong.
    let mut state = state_for("Sona", vec![3877, 3031]);
    assert!(rules.apply(&mut state, &destroyed(3867)));
    assert!(state.items.contains(&3877));
    assert!(!state.items.contains(&3869));

    // No completion in the final build means no payout.
    let mut bare = state_for("Sona", vec![3031]);
    assert!(!rules.apply(&mut bare, &destroyed(3867)));
    assert!(bare.items.is_empty());
}

#[test]
fn test_viego_keeps_items_on_destroy() {
    let rules = make_rules();
    let mut state = state_for("Viego", vec![]);

    rules.apply(&mut state, &purchase(3031));
    assert!(!rules.apply(&mut state, &destroyed(3031)));
    assert!(state.items.contains(&3031));
}

#[test]
fn test_viego_still_receives_upgrade_successor() {
    let rules = make_rules();
    let mut state = state_for("Viego", vec![]);

    rules.apply(&mut state, &purchase(3004));
    assert!(rules.apply(&mut state, &destroyed(3004)));
    // Precursor survives the destroy, successor still lands.
    assert!(state.items.contains(&3004));
    assert!(state.items.contains(&3042));
}

#[test]
fn test_exception_table_lookup() {
    let rules = make_rules();

    let viego = rules.exception_for("Viego").unwrap();
    assert!(viego.keeps_items_on_destroy);
    assert!(viego.skip_item_validation);
    assert!(rules.exception_for("Ashe").is_none());
}

#[test]
fn test_default_config_tables() {
    let rules = make_rules();
    let config = rules.config();

    assert_eq!(config.upgrade_map.get(&3003), Some(&3040));
    assert_eq!(config.upgrade_map.len(), 3);
    assert_eq!(config.support_trigger, 3867);
    assert_eq!(config.support_completions.len(), 5);
    assert!(config.support_completions.contains(&3877));
}
