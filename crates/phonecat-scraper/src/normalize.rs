//! Normalization from decoded model pages to [`phonecat_core::CatalogModel`].
//!
//! Capacity and model-id parsing is delegated to [`crate::parse`]; this module
//! handles grouping, de-duplication, and ordering. The output depends only on
//! the set of input variants, never on the order they arrived in.

use std::collections::{BTreeMap, HashMap};

use phonecat_core::{CatalogModel, ColorEntry, PartNumberEntry};

use crate::bootstrap::{ColorMetadata, ModelPage};
use crate::parse::{capacity_key, capacity_sort_key, compare_model_ids, display_name};

/// Rank given to colors missing from the page's `variantOrder`.
const UNRANKED_COLOR: usize = 999;

/// What two capacity spellings must share to count as the same capacity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CapacityIdentity {
    Gigabytes(u64),
    Unrecognized(String),
}

impl CapacityIdentity {
    fn of(raw: &str) -> Self {
        capacity_key(raw).map_or_else(|| Self::Unrecognized(raw.to_owned()), Self::Gigabytes)
    }
}

struct FamilyGroup<'a> {
    /// Metadata of the first slug (in sorted order) that listed this family.
    order_source: &'a ColorMetadata,
    colors: BTreeMap<String, ColorEntry>,
    /// One spelling per capacity: the lexicographically smallest seen.
    capacities: BTreeMap<CapacityIdentity, String>,
    part_numbers: Vec<PartNumberEntry>,
}

/// Builds the sorted catalog from every fetched model page.
///
/// `pages` maps model slug to the decoded page. A family listed by more than
/// one slug is merged into a single model.
#[must_use]
pub fn normalize_catalog(
    pages: &BTreeMap<String, ModelPage>,
    image_template: &str,
) -> Vec<CatalogModel> {
    let mut groups: BTreeMap<&str, FamilyGroup<'_>> = BTreeMap::new();

    for page in pages.values() {
        for variant in &page.variants {
            let group = groups
                .entry(variant.family_id.as_str())
                .or_insert_with(|| FamilyGroup {
                    order_source: &page.colors,
                    colors: BTreeMap::new(),
                    capacities: BTreeMap::new(),
                    part_numbers: Vec::new(),
                });

            group
                .colors
                .entry(variant.color.clone())
                .or_insert_with(|| color_entry(&variant.color, &page.colors, image_template));
            group
                .capacities
                .entry(CapacityIdentity::of(&variant.capacity))
                .and_modify(|kept| {
                    if variant.capacity < *kept {
                        kept.clone_from(&variant.capacity);
                    }
                })
                .or_insert_with(|| variant.capacity.clone());
            group.part_numbers.push(PartNumberEntry {
                color: variant.color.clone(),
                capacity: variant.capacity.clone(),
                part_number: variant.part_number.clone(),
                image_url: variant
                    .image
                    .as_deref()
                    .and_then(|key| resolve_image_url(key, image_template)),
            });
        }
    }

    let mut models: Vec<CatalogModel> = groups
        .into_iter()
        .map(|(family_id, group)| finish_model(family_id, group))
        .collect();
    models.sort_by(|a, b| compare_model_ids(&a.id, &b.id));
    models
}

fn finish_model(family_id: &str, group: FamilyGroup<'_>) -> CatalogModel {
    let ranks: HashMap<&str, usize> = group
        .order_source
        .variant_order
        .iter()
        .enumerate()
        .rev()
        .map(|(i, code)| (code.as_str(), i))
        .collect();
    let rank = |code: &str| ranks.get(code).copied().unwrap_or(UNRANKED_COLOR);

    let mut colors: Vec<ColorEntry> = group.colors.into_values().collect();
    colors.sort_by(|a, b| (rank(&a.code), &a.code).cmp(&(rank(&b.code), &b.code)));

    let mut part_numbers = group.part_numbers;
    for part in &mut part_numbers {
        if let Some(spelling) = group.capacities.get(&CapacityIdentity::of(&part.capacity)) {
            part.capacity.clone_from(spelling);
        }
    }

    let mut capacities: Vec<String> = group.capacities.into_values().collect();
    capacities.sort_by(|a, b| capacity_sort_key(a).cmp(&capacity_sort_key(b)));

    part_numbers.sort_by(|a, b| {
        rank(&a.color)
            .cmp(&rank(&b.color))
            .then_with(|| capacity_sort_key(&a.capacity).cmp(&capacity_sort_key(&b.capacity)))
            .then_with(|| a.part_number.cmp(&b.part_number))
            .then_with(|| a.color.cmp(&b.color))
            .then_with(|| a.image_url.cmp(&b.image_url))
    });
    part_numbers.dedup_by(|later, kept| {
        later.color == kept.color
            && later.capacity == kept.capacity
            && later.part_number == kept.part_number
    });

    CatalogModel {
        id: family_id.to_string(),
        name: display_name(family_id),
        colors,
        capacities,
        part_numbers,
    }
}

fn color_entry(code: &str, metadata: &ColorMetadata, image_template: &str) -> ColorEntry {
    match metadata.display.get(code) {
        Some(display) => ColorEntry {
            code: code.to_string(),
            name: display.name.clone(),
            image_url: display
                .image
                .as_deref()
                .and_then(|key| resolve_image_url(key, image_template)),
        },
        None => ColorEntry {
            code: code.to_string(),
            name: code.to_string(),
            image_url: None,
        },
    }
}

/// Resolves an image key to a URL.
///
/// Absolute `http(s)` URLs pass through, protocol-relative URLs get `https:`,
/// anything else is substituted into the template's `{key}` placeholder.
/// Blank keys resolve to `None`.
#[must_use]
pub fn resolve_image_url(key: &str, template: &str) -> Option<String> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    if key.starts_with("http://") || key.starts_with("https://") {
        return Some(key.to_string());
    }
    if let Some(rest) = key.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    Some(template.replace("{key}", key))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
