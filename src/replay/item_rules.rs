//! Item Lifecycle Rules
//!
//! Decides how a single item transaction mutates a participant's tracked
//! item set. All the special cases live here: precursor-to-successor
//! upgrades, purchase undo, the support quest payout, and per-champion
//! exceptions. The accumulator stays a plain fold.
//!
//! Set mutations are idempotent. Adding a held item or removing an absent
//! one is a no-op, never an error.

use crate::catalog::ItemCatalog;
use crate::replay::events::{Event, ItemId};
use crate::replay::state::ParticipantState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Per-champion deviations from normal item lifecycle behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionException {
    /// ITEM_DESTROYED does not remove items for this champion.
    #[serde(default)]
    pub keeps_items_on_destroy: bool,
    /// The validator skips item-set comparison for this champion.
    #[serde(default)]
    pub skip_item_validation: bool,
}

/// Static item-rule configuration, loaded once per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRulesConfig {
    /// Precursor id to successor id for items that transform on a
    /// DESTROYED event instead of a purchase.
    #[serde(default)]
    pub upgrade_map: HashMap<ItemId, ItemId>,
    /// Quest item whose destruction pays out a finished support item.
    #[serde(default)]
    pub support_trigger: ItemId,
    /// Finished support items the quest can pay out.
    #[serde(default)]
    pub support_completions: BTreeSet<ItemId>,
    /// Champion name to exception rules. Additions are data, not code.
    #[serde(default)]
    pub exceptions: HashMap<String, ChampionException>,
}

impl Default for ItemRulesConfig {
    fn default() -> Self {
        let mut upgrade_map = HashMap::new();
        upgrade_map.insert(3003, 3040); // Archangel's Staff -> Seraph's Embrace
        upgrade_map.insert(3004, 3042); // Manamune -> Muramana
        upgrade_map.insert(3119, 3121); // Winter's Approach -> Fimbulwinter

        // Celestial Opposition, Dream Maker, Zaz'Zak's Realmspike,
        // Solstice Sleigh, Bloodsong.
        let support_completions = [3869, 3870, 3871, 3876, 3877].into_iter().collect();

        let mut exceptions = HashMap::new();
        // Possession keeps the inventory through death and swaps kits
        // mid-fight, which breaks both destroy semantics and end-state
        // item comparison.
        exceptions.insert(
            "Viego".to_string(),
            ChampionException {
                keeps_items_on_destroy: true,
                skip_item_validation: true,
            },
        );

        Self {
            upgrade_map,
            support_trigger: 3867, // Bounty of Worlds
            support_completions,
            exceptions,
        }
    }
}

/// Item lifecycle resolver: tracked-item predicate plus transaction rules.
#[derive(Debug, Clone)]
pub struct ItemRules {
    catalog: ItemCatalog,
    config: ItemRulesConfig,
}

impl ItemRules {
    pub fn new(catalog: ItemCatalog, config: ItemRulesConfig) -> Self {
        Self { catalog, config }
    }

    pub fn with_defaults(catalog: ItemCatalog) -> Self {
        Self::new(catalog, ItemRulesConfig::default())
    }

    pub fn config(&self) -> &ItemRulesConfig {
        &self.config
    }

    pub fn exception_for(&self, champion_name: &str) -> Option<&ChampionException> {
        self.config.exceptions.get(champion_name)
    }

    /// Whether an item is significant enough to follow through the
    /// lifecycle: upgrade-map members, completed items at tier 3 and up,
    /// tier-2 boots, starter items, and the support payouts.
    pub fn is_tracked(&self, item_id: ItemId) -> bool {
        if self.config.upgrade_map.contains_key(&item_id) {
            return true;
        }
        if self.config.upgrade_map.values().any(|&s| s == item_id) {
            return true;
        }
        if self.config.support_completions.contains(&item_id) {
            return true;
        }
        if let Some(tier) = self.catalog.tier(item_id) {
            if tier >= 3 {
                return true;
            }
            if tier == 2 && self.catalog.is_boots(item_id) {
                return true;
            }
        }
        self.catalog.is_starter(item_id)
    }

    /// Apply one event to `state`'s tracked item set. Returns true when the
    /// set actually changed, which is what flags a frame as must-keep.
    /// Non-item events return false untouched.
    pub fn apply(&self, state: &mut ParticipantState, event: &Event) -> bool {
        match event {
            Event::ItemPurchased { item_id, .. } => self.add_if_tracked(state, *item_id),

            Event::ItemSold { item_id, .. } => self.remove_if_tracked(state, *item_id),

            Event::ItemUndo {
                before_id,
                after_id,
                ..
            } => {
                // Undoing a purchase removes the before side. The after side
                // toggles: restores a sold item, or retracts one granted by
                // the undone step.
                let mut changed = state.items.remove(before_id);
                if self.is_tracked(*after_id) && !state.items.contains(after_id) {
                    state.items.insert(*after_id);
                    changed = true;
                } else {
                    changed |= state.items.remove(after_id);
                }
                changed
            }

            Event::ItemDestroyed {
                item_id,
                ..
            } => {
                let keeps = self
                    .exception_for(&state.meta.champion_name)
                    .map(|e| e.keeps_items_on_destroy)
                    .unwrap_or(false);
                let mut changed = false;
                if !keeps {
                    changed = state.items.remove(item_id);
                }
                // Transforming items reappear as their successor.
                if let Some(&successor) = self.config.upgrade_map.get(item_id) {
                    changed |= state.items.insert(successor);
                }
                // The quest payout is known only from the final build.
                if *item_id == self.config.support_trigger {
                    for &completion in &self.config.support_completions {
                        if state.meta.final_items.contains(&completion) {
                            changed |= state.items.insert(completion);
                        }
                    }
                }
                changed
            }

            _ => false,
        }
    }

    fn add_if_tracked(&self, state: &mut ParticipantState, item_id: ItemId) -> bool {
        if self.is_tracked(item_id) {
            state.items.insert(item_id)
        } else {
            false
        }
    }

    fn remove_if_tracked(&self, state: &mut ParticipantState, item_id: ItemId) -> bool {
        if self.is_tracked(item_id) {
            state.items.remove(&item_id)
        } else {
            false
        }
    }
}
