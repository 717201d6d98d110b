use std::collections::BTreeMap;
use std::sync::LazyLock;

use phonecat_core::LocaleEntry;
use scraper::{Html, Selector};
use serde::Deserialize;

use super::{is_excluded, US_LOCALE_ID, US_PATH};
use crate::error::ScraperError;

static LOCALE_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script#locale-config[type="application/json"]"#).expect("valid selector")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDocument {
    locale_config: BTreeMap<String, InlineLocale>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineLocale {
    country_name: String,
    language: Option<String>,
    url_path: String,
    #[serde(default)]
    region: Option<String>,
}

/// Returns `None` when the page carries no inline locale document.
pub(super) fn parse_inline(page: &str) -> Option<Result<Vec<LocaleEntry>, ScraperError>> {
    let document = Html::parse_document(page);
    let script = document.select(&LOCALE_SCRIPT).next()?;
    let body: String = script.text().collect();
    Some(decode(&body))
}

fn decode(body: &str) -> Result<Vec<LocaleEntry>, ScraperError> {
    let document: InlineDocument = serde_json::from_str(body)
        .map_err(|e| ScraperError::parse("inline locale document", e.to_string()))?;

    Ok(document
        .locale_config
        .into_iter()
        .filter(|(id, _)| !is_excluded(id))
        .map(|(id, locale)| {
            let path = if id == US_LOCALE_ID {
                US_PATH.to_owned()
            } else {
                locale.url_path.trim_matches('/').to_owned()
            };
            LocaleEntry {
                id,
                country: locale.country_name,
                language: locale.language.filter(|l| !l.is_empty()),
                path,
                region: locale.region.filter(|r| !r.is_empty()),
                analytics_title: None,
            }
        })
        .collect())
}
