use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One phone model as presented to API consumers, e.g. "iPhone 16 Pro".
///
/// Built fresh for every catalog request from the storefront's bootstrap
/// state; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogModel {
    /// Raw storefront family id, e.g. `"iphone-16-pro"`.
    pub id: String,
    /// Human-readable name derived from `id`, e.g. `"iPhone 16 Pro"`.
    pub name: String,
    /// Finishes in the storefront's canonical display order.
    pub colors: Vec<ColorEntry>,
    /// Storage options, smallest first.
    pub capacities: Vec<String>,
    /// Orderable SKUs sorted by color order, then capacity.
    pub part_numbers: Vec<PartNumberEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub code: String,
    /// Localized display name, or the raw code when the page has no metadata for it.
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartNumberEntry {
    pub color: String,
    pub capacity: String,
    pub part_number: String,
    pub image_url: Option<String>,
}

/// A storefront region/language combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    /// Opaque locale id, e.g. `"en_GB"`.
    pub id: String,
    pub country: String,
    /// BCP 47 language tag when the source publishes one, e.g. `"en-GB"`.
    pub language: Option<String>,
    /// URL path segment of the locale's site, e.g. `"uk"` or `"ca/fr"`.
    pub path: String,
    /// Region heading the locale is listed under, e.g. `"europe"`.
    pub region: Option<String>,
    pub analytics_title: Option<String>,
}

/// Summary of a locale's storefront configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub locale: String,
    /// Whether the availability feature flag is present and `true`.
    pub store_enabled: bool,
    pub currency: Option<String>,
    /// Every boolean feature flag the document publishes.
    pub features: BTreeMap<String, bool>,
}
