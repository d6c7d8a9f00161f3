//! ============================================================================
//! Filter Engine
//! ============================================================================
//! Pure, stateless filtering over a sequence of items. Identifier filters
//! (weapon / collection / tier) match exactly and case-sensitively; the
//! free-text filter is a trimmed, case-folded substring match on the item
//! name. All four predicates are ANDed; matching is boolean, order is
//! preserved, no ranking.
//! ============================================================================

use crate::types::{FilterState, Item};

/// Return the subsequence of `items` matching `filters`, in original order.
pub fn apply_filters(items: &[Item], filters: &FilterState) -> Vec<Item> {
    let query = filters.search.trim().to_lowercase();

    items
        .iter()
        .filter(|item| matches(item, filters, &query))
        .cloned()
        .collect()
}

fn matches(item: &Item, filters: &FilterState, query: &str) -> bool {
    if !filters.weapon.is_empty() && item.weapon_id != filters.weapon {
        return false;
    }
    if !filters.collection.is_empty() && item.collection_id != filters.collection {
        return false;
    }
    if !filters.tier.is_empty() && item.tier_id != filters.tier {
        return false;
    }
    if !query.is_empty() && !item.name.to_lowercase().contains(query) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TierDisplay;

    fn item(id: u64, name: &str, weapon: &str, collection: &str, tier: &str) -> Item {
        Item {
            id,
            uuid: format!("uuid-{}", id),
            name: name.to_string(),
            image_url: String::new(),
            weapon_id: weapon.to_string(),
            collection_id: collection.to_string(),
            tier_id: tier.to_string(),
            tier: TierDisplay::Unresolved,
            levels: vec![],
            chromas: vec![],
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item(0, "Prime Vandal", "w1", "c1", "t1"),
            item(1, "Prime Classic", "w2", "c1", "t1"),
            item(2, "Reaver Vandal", "w1", "c2", "t2"),
        ]
    }

    #[test]
    fn empty_filters_return_everything_in_order() {
        let items = sample();
        assert_eq!(apply_filters(&items, &FilterState::default()), items);
    }

    #[test]
    fn predicates_are_anded() {
        let items = sample();
        let filters = FilterState {
            weapon: "w1".to_string(),
            search: "prime".to_string(),
            ..FilterState::default()
        };
        let result = apply_filters(&items, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 0);
    }

    #[test]
    fn sequential_filtering_equals_combined_filtering() {
        let items = sample();
        let weapon_only = FilterState {
            weapon: "w1".to_string(),
            ..FilterState::default()
        };
        let tier_only = FilterState {
            tier: "t2".to_string(),
            ..FilterState::default()
        };
        let combined = FilterState {
            weapon: "w1".to_string(),
            tier: "t2".to_string(),
            ..FilterState::default()
        };

        let sequential = apply_filters(&apply_filters(&items, &weapon_only), &tier_only);
        assert_eq!(sequential, apply_filters(&items, &combined));
    }

    #[test]
    fn search_is_trimmed_and_case_folded() {
        let items = sample();
        let filters = FilterState {
            search: "  REAVER ".to_string(),
            ..FilterState::default()
        };
        let result = apply_filters(&items, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Reaver Vandal");
    }

    #[test]
    fn identifier_match_is_case_sensitive() {
        let items = sample();
        let filters = FilterState {
            weapon: "W1".to_string(),
            ..FilterState::default()
        };
        assert!(apply_filters(&items, &filters).is_empty());
    }

    #[test]
    fn filtering_preserves_original_order() {
        let items = sample();
        let filters = FilterState {
            collection: "c1".to_string(),
            ..FilterState::default()
        };
        let ids: Vec<u64> = apply_filters(&items, &filters).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
