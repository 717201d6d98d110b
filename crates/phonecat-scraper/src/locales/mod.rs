//! Region/locale directory parsing.
//!
//! The directory page comes in two shapes. Newer variants embed the whole
//! listing as a JSON document in a `locale-config` script tag; older ones
//! only render it as `section.category` markup. The inline document is
//! preferred when present.

mod html;
mod inline;

use phonecat_core::LocaleEntry;

use crate::error::ScraperError;

/// Locale ids listed in the directory that have no online store.
pub(crate) const EXCLUDED_LOCALES: &[&str] = &[
    "es_LA", "en_LAE", "en_AF", "fr_AF", "en_ME", "ar_ME", "en_GS", "en_WW",
];

/// The United States store lives at `/us` even though the directory links it
/// from the site root.
pub(crate) const US_LOCALE_ID: &str = "en_US";
pub(crate) const US_PATH: &str = "us";

/// Parses the locale directory page.
///
/// Entries are sorted by country name, then id.
///
/// # Errors
///
/// Returns [`ScraperError::Parse`] if the inline document is present but
/// malformed, or if the page has neither an inline document nor any
/// `section.category` markup.
pub fn parse_locale_directory(page: &str) -> Result<Vec<LocaleEntry>, ScraperError> {
    let mut entries = match inline::parse_inline(page) {
        Some(parsed) => parsed?,
        None => {
            tracing::debug!("no inline locale document, falling back to directory markup");
            html::parse_sections(page)?
        }
    };
    entries.sort_by(|a, b| a.country.cmp(&b.country).then_with(|| a.id.cmp(&b.id)));
    Ok(entries)
}

pub(crate) fn is_excluded(id: &str) -> bool {
    EXCLUDED_LOCALES.contains(&id)
}

#[cfg(test)]
#[path = "../locales_test.rs"]
mod tests;
