//! Low-level string parsing for capacity values and model family ids.
//!
//! These helpers scan bytes by hand. See [`crate::normalize`] for how they
//! compose into catalog normalization.

use std::cmp::Ordering;

const MODEL_PREFIX: &str = "iphone-";
const PRODUCT_LINE: &str = "iPhone";

/// Parses a capacity string into a gigabyte-based sort key.
///
/// Matching rules (case-insensitive, surrounding whitespace ignored):
/// - `"256GB"` / `"256 gb"` → `256`
/// - `"1TB"` / `"2 tb"` → value × 1024
///
/// Returns `None` when the value has no numeric prefix or an unknown unit.
#[must_use]
pub(crate) fn capacity_key(raw: &str) -> Option<u64> {
    let lower = raw.trim().to_ascii_lowercase();
    let digits_end = lower
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(lower.len());
    if digits_end == 0 {
        return None;
    }
    let value: u64 = lower[..digits_end].parse().ok()?;
    match lower[digits_end..].trim_start() {
        "gb" => Some(value),
        "tb" => value.checked_mul(1024),
        _ => None,
    }
}

/// Sort key for a capacity: recognized values ascending, then unrecognized
/// values by their raw text.
#[must_use]
pub(crate) fn capacity_sort_key(raw: &str) -> (u64, &str) {
    (capacity_key(raw).unwrap_or(u64::MAX), raw)
}

/// Suffix tier of a model family, in catalog display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ModelTier {
    Base,
    Plus,
    Pro,
    ProMax,
}

impl ModelTier {
    fn label(self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::Plus => Some("Plus"),
            Self::Pro => Some("Pro"),
            Self::ProMax => Some("Pro Max"),
        }
    }
}

/// A family id such as `iphone-16-pro-max`, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelId<'a> {
    /// Generation token as written, e.g. `"16"` or `"16e"`.
    pub generation: &'a str,
    pub number: u32,
    /// Lower-case letters trailing the generation number (`"e"` in `16e`).
    pub variant: &'a str,
    pub tier: ModelTier,
}

/// Parses a family id of the form `iphone-<generation>[-pro][-max][-plus]`.
///
/// Returns `None` for a missing prefix, a generation that does not start with
/// digits, or any suffix token other than `pro`, `max`, and `plus`. `max` is
/// only meaningful next to `pro`.
#[must_use]
pub(crate) fn parse_model_id(id: &str) -> Option<ModelId<'_>> {
    let rest = id.strip_prefix(MODEL_PREFIX)?;
    let mut tokens = rest.split('-');
    let generation = tokens.next()?;

    let digits_end = generation
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(generation.len());
    if digits_end == 0 {
        return None;
    }
    let variant = &generation[digits_end..];
    if !variant.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    let number: u32 = generation[..digits_end].parse().ok()?;

    let (mut pro, mut max, mut plus) = (false, false, false);
    for token in tokens {
        match token {
            "pro" => pro = true,
            "max" => max = true,
            "plus" => plus = true,
            _ => return None,
        }
    }

    let tier = if pro && max {
        ModelTier::ProMax
    } else if pro {
        ModelTier::Pro
    } else if plus && !max {
        ModelTier::Plus
    } else if !max && !plus {
        ModelTier::Base
    } else {
        return None;
    };

    Some(ModelId {
        generation,
        number,
        variant,
        tier,
    })
}

/// Renders the display name for a family id, e.g. `"iPhone 16 Pro Max"`.
///
/// Ids that do not parse are returned verbatim.
#[must_use]
pub(crate) fn display_name(id: &str) -> String {
    match parse_model_id(id) {
        Some(parsed) => match parsed.tier.label() {
            Some(label) => format!("{PRODUCT_LINE} {} {label}", parsed.generation),
            None => format!("{PRODUCT_LINE} {}", parsed.generation),
        },
        None => id.to_string(),
    }
}

/// Total order over family ids: parsed ids by generation number, variant
/// letters, then tier; unparsed ids after all parsed ones, by id.
#[must_use]
pub(crate) fn compare_model_ids(a: &str, b: &str) -> Ordering {
    match (parse_model_id(a), parse_model_id(b)) {
        (Some(pa), Some(pb)) => pa
            .number
            .cmp(&pb.number)
            .then_with(|| pa.variant.cmp(pb.variant))
            .then_with(|| pa.tier.cmp(&pb.tier))
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
