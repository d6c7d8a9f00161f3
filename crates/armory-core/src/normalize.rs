//! ============================================================================
//! Back-fill Normalizer
//! ============================================================================
//! Converts one raw catalog record into a normalized [`Item`], repairing
//! missing foreign-key-like fields from the reference index. Runs inline
//! during ingestion, never as a separate pass.
//!
//! Both repair rules are fill-if-missing: an already-present, non-empty value
//! is never overwritten, which makes normalization idempotent.
//! ============================================================================

use crate::client::{RawChroma, RawItem, RawLevel};
use crate::index::ReferenceIndex;
use crate::types::{ChromaVariant, Item, LevelVariant, TierDisplay};

/// Normalize one raw record, assigning it the synthetic `id` for this run.
pub fn normalize(raw: &RawItem, id: u64, index: &ReferenceIndex) -> Item {
    let uuid = raw.uuid.clone();

    // Rule 1: weapon back-fill from the reverse index.
    let mut weapon_id = raw.weapon.clone().unwrap_or_default();
    if weapon_id.is_empty() && !uuid.is_empty() {
        if let Some(mapped) = index.weapon_for_item(&uuid) {
            weapon_id = mapped.to_string();
        }
    }

    let tier_id = raw.tier_id.clone().unwrap_or_default();

    // Rule 2: tier display back-fill from the tier map.
    let inline_tier = raw.tier.as_ref().and_then(|t| {
        let name = t.name.clone().unwrap_or_default();
        if name.is_empty() {
            None
        } else {
            Some(TierDisplay::Resolved {
                name,
                image_url: t.image_url.clone().unwrap_or_default(),
            })
        }
    });
    let tier = match inline_tier {
        Some(resolved) => resolved,
        None => match (!tier_id.is_empty()).then(|| index.tier_meta(&tier_id)).flatten() {
            Some(meta) => TierDisplay::Resolved {
                name: meta.name.clone(),
                image_url: meta.image_url.clone(),
            },
            None => TierDisplay::Unresolved,
        },
    };

    Item {
        id,
        uuid,
        name: raw
            .name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        image_url: raw
            .image_url
            .clone()
            .or_else(|| raw.image.clone())
            .unwrap_or_default(),
        weapon_id,
        collection_id: raw.collection.clone().unwrap_or_default(),
        tier_id,
        tier,
        levels: raw.levels.iter().map(level_variant).collect(),
        chromas: raw.chromas.iter().map(chroma_variant).collect(),
    }
}

/// Re-apply the weapon back-fill to an already-materialized item. Used when
/// overlay refreshes surface items whose weapon was unresolved at ingestion
/// but is resolvable now.
pub fn backfill_weapon(item: &mut Item, index: &ReferenceIndex) {
    if item.weapon_id.is_empty() && !item.uuid.is_empty() {
        if let Some(mapped) = index.weapon_for_item(&item.uuid) {
            item.weapon_id = mapped.to_string();
        }
    }
}

fn level_variant(raw: &RawLevel) -> LevelVariant {
    LevelVariant {
        uuid: raw.uuid.clone(),
        name: raw.display_name.clone(),
        image: raw.display_icon.clone(),
        video: raw.streamed_video.clone(),
    }
}

fn chroma_variant(raw: &RawChroma) -> ChromaVariant {
    ChromaVariant {
        uuid: raw.uuid.clone(),
        name: raw.display_name.clone(),
        image: raw.display_icon.clone(),
        full_render: raw.full_render.clone(),
        swatch: raw.swatch.clone(),
        video: raw.streamed_video.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RawTier, WeaponRecord, WeaponSkinRef};
    use crate::index::TierMeta;

    fn index_with(reverse: &[(&str, &str)], tiers: &[(&str, &str, &str)]) -> ReferenceIndex {
        let mut index = ReferenceIndex::default();
        let weapons: Vec<WeaponRecord> = reverse
            .iter()
            .map(|(skin, weapon)| WeaponRecord {
                uuid: weapon.to_string(),
                display_name: None,
                category: None,
                skins: vec![WeaponSkinRef {
                    uuid: skin.to_string(),
                    display_name: None,
                }],
            })
            .collect();
        index.index_weapons(&weapons);
        for (id, name, image) in tiers {
            index.tiers.insert(
                id.to_string(),
                TierMeta {
                    name: name.to_string(),
                    image_url: image.to_string(),
                },
            );
        }
        index
    }

    fn raw(uuid: &str) -> RawItem {
        RawItem {
            uuid: uuid.to_string(),
            ..RawItem::default()
        }
    }

    #[test]
    fn fills_weapon_from_reverse_index_when_empty() {
        let index = index_with(&[("s1", "w1")], &[]);
        let mut record = raw("s1");
        record.weapon = Some(String::new());

        let item = normalize(&record, 0, &index);
        assert_eq!(item.weapon_id, "w1");
    }

    #[test]
    fn never_overwrites_present_weapon() {
        let index = index_with(&[("s1", "w1")], &[]);
        let mut record = raw("s1");
        record.weapon = Some("w-original".to_string());

        let item = normalize(&record, 0, &index);
        assert_eq!(item.weapon_id, "w-original");
    }

    #[test]
    fn fills_tier_from_index_when_inline_tier_missing() {
        let index = index_with(&[], &[("t1", "Premium", "https://img/t.png")]);
        let mut record = raw("s1");
        record.tier_id = Some("t1".to_string());

        let item = normalize(&record, 0, &index);
        assert_eq!(
            item.tier,
            TierDisplay::Resolved {
                name: "Premium".to_string(),
                image_url: "https://img/t.png".to_string(),
            }
        );
    }

    #[test]
    fn fills_tier_when_inline_tier_has_empty_name() {
        let index = index_with(&[], &[("t1", "Premium", "")]);
        let mut record = raw("s1");
        record.tier_id = Some("t1".to_string());
        record.tier = Some(RawTier {
            name: Some(String::new()),
            image_url: Some("stale.png".to_string()),
        });

        let item = normalize(&record, 0, &index);
        assert_eq!(item.tier.display_name(), "Premium");
    }

    #[test]
    fn keeps_inline_tier_when_present() {
        let index = index_with(&[], &[("t1", "FromIndex", "")]);
        let mut record = raw("s1");
        record.tier_id = Some("t1".to_string());
        record.tier = Some(RawTier {
            name: Some("Inline".to_string()),
            image_url: None,
        });

        let item = normalize(&record, 0, &index);
        assert_eq!(item.tier.display_name(), "Inline");
    }

    #[test]
    fn unresolvable_tier_stays_unresolved_without_error() {
        // Tier fetch failed (empty mapping) but the record carries a tier_id.
        let index = ReferenceIndex::default();
        let mut record = raw("s1");
        record.tier_id = Some("t1".to_string());

        let item = normalize(&record, 0, &index);
        assert_eq!(item.tier, TierDisplay::Unresolved);
        assert_eq!(item.tier_id, "t1");
    }

    #[test]
    fn image_url_falls_back_to_legacy_image_field() {
        let index = ReferenceIndex::default();
        let mut record = raw("s1");
        record.image = Some("legacy.png".to_string());

        let item = normalize(&record, 0, &index);
        assert_eq!(item.image_url, "legacy.png");

        record.image_url = Some("primary.png".to_string());
        let item = normalize(&record, 0, &index);
        assert_eq!(item.image_url, "primary.png");
    }

    #[test]
    fn normalization_is_idempotent_on_backfilled_fields() {
        let index = index_with(&[("s1", "w1")], &[("t1", "Premium", "i.png")]);
        let mut record = raw("s1");
        record.tier_id = Some("t1".to_string());

        let first = normalize(&record, 3, &index);

        // Simulate re-normalizing a record whose fields were already filled.
        record.weapon = Some(first.weapon_id.clone());
        record.tier = Some(RawTier {
            name: Some(first.tier.display_name().to_string()),
            image_url: Some("i.png".to_string()),
        });
        let second = normalize(&record, 3, &index);

        assert_eq!(first, second);
    }

    #[test]
    fn backfill_weapon_on_materialized_item_fills_only_when_empty() {
        let index = index_with(&[("s1", "w1")], &[]);
        let mut item = normalize(&raw("s1"), 0, &ReferenceIndex::default());
        assert!(item.weapon_id.is_empty());

        backfill_weapon(&mut item, &index);
        assert_eq!(item.weapon_id, "w1");

        item.weapon_id = "w-other".to_string();
        backfill_weapon(&mut item, &index);
        assert_eq!(item.weapon_id, "w-other");
    }
}
