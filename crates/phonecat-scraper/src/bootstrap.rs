//! Typed view of the storefront's `PRODUCT_SELECTION_BOOTSTRAP` object.
//!
//! ## Observed shape
//!
//! ```text
//! productSelectionData
//! ├── products: [{ familyType, dimensionColor, dimensionCapacity, partNumber, image? }]
//! └── displayValues
//!     └── dimensionColor
//!         ├── <color code>: { value: <display name>, image?: <key or URL> }
//!         └── variantOrder: [<color code>, ...]
//! ```
//!
//! `dimensionColor` mixes per-color entries with the `variantOrder` list, so it
//! is decoded as a raw map and split here. Entries that are not objects with a
//! string `value` are skipped; the page has been seen to carry unrelated
//! keys alongside the colors.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScraperError;

const VARIANT_ORDER_KEY: &str = "variantOrder";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BootstrapDocument {
    product_selection_data: ProductSelectionData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSelectionData {
    products: Vec<ProductVariant>,
    #[serde(default)]
    display_values: DisplayValues,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayValues {
    #[serde(default)]
    dimension_color: BTreeMap<String, Value>,
}

/// One orderable SKU from a model page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductVariant {
    /// Model family id, e.g. `"iphone-16-pro-max"`.
    #[serde(rename = "familyType")]
    pub family_id: String,
    #[serde(rename = "dimensionColor")]
    pub color: String,
    /// Raw capacity string, e.g. `"256gb"` or `"1tb"`.
    #[serde(rename = "dimensionCapacity")]
    pub capacity: String,
    #[serde(rename = "partNumber")]
    pub part_number: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDisplay {
    pub name: String,
    pub image: Option<String>,
}

/// Color metadata published by one model page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMetadata {
    pub display: BTreeMap<String, ColorDisplay>,
    /// Canonical display order of color codes.
    pub variant_order: Vec<String>,
}

/// Everything the normalizer needs from one model page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPage {
    pub variants: Vec<ProductVariant>,
    pub colors: ColorMetadata,
}

/// Decodes an extracted bootstrap value into a [`ModelPage`].
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] if the product list is missing or any
/// product lacks a required field, or if `variantOrder` is not a list of
/// strings.
pub fn decode_model_page(value: Value, slug: &str) -> Result<ModelPage, ScraperError> {
    let context = format!("bootstrap state of {slug}");
    let document: BootstrapDocument =
        serde_json::from_value(value).map_err(|e| ScraperError::parse(&context, e.to_string()))?;

    let data = document.product_selection_data;
    let colors = decode_colors(data.display_values.dimension_color, &context)?;

    Ok(ModelPage {
        variants: data.products,
        colors,
    })
}

fn decode_colors(
    mut raw: BTreeMap<String, Value>,
    context: &str,
) -> Result<ColorMetadata, ScraperError> {
    let variant_order = match raw.remove(VARIANT_ORDER_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(order) => serde_json::from_value::<Vec<String>>(order)
            .map_err(|e| ScraperError::parse(context, format!("{VARIANT_ORDER_KEY}: {e}")))?,
    };

    let mut display = BTreeMap::new();
    for (code, entry) in raw {
        let Some(name) = entry.get("value").and_then(Value::as_str) else {
            tracing::debug!(
                code = code.as_str(),
                "skipping color metadata entry without a display value"
            );
            continue;
        };
        let image = entry
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        display.insert(
            code,
            ColorDisplay {
                name: name.to_owned(),
                image,
            },
        );
    }

    Ok(ColorMetadata {
        display,
        variant_order,
    })
}
