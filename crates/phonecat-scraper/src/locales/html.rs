use std::sync::LazyLock;

use phonecat_core::LocaleEntry;
use scraper::{ElementRef, Html, Selector};

use super::{is_excluded, US_PATH};
use crate::error::ScraperError;

const US_ANALYTICS_TITLE: &str = "united states";

struct DirectorySelectors {
    section: Selector,
    item: Selector,
    anchor: Selector,
    name: Selector,
    language: Selector,
}

static SELECTORS: LazyLock<DirectorySelectors> = LazyLock::new(|| DirectorySelectors {
    section: Selector::parse("section.category").expect("valid selector"),
    item: Selector::parse("li").expect("valid selector"),
    anchor: Selector::parse("a").expect("valid selector"),
    name: Selector::parse(r#"span[property="schema:name"]"#).expect("valid selector"),
    language: Selector::parse(r#"meta[property="schema:inLanguage"]"#).expect("valid selector"),
});

pub(super) fn parse_sections(page: &str) -> Result<Vec<LocaleEntry>, ScraperError> {
    let document = Html::parse_document(page);
    let mut sections = document.select(&SELECTORS.section).peekable();
    if sections.peek().is_none() {
        return Err(ScraperError::parse(
            "locale directory",
            "page has neither an inline locale document nor category sections",
        ));
    }

    let mut entries = Vec::new();
    for section in sections {
        let region = section
            .value()
            .attr("data-analytics-section-engagement")
            .and_then(|v| v.rsplit(':').next())
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_owned);

        for item in section.select(&SELECTORS.item) {
            if let Some(entry) = parse_item(item, region.as_deref()) {
                entries.push(entry);
            }
        }
    }
    Ok(entries)
}

fn parse_item(item: ElementRef<'_>, region: Option<&str>) -> Option<LocaleEntry> {
    let anchor = item.select(&SELECTORS.anchor).next()?;

    let country = anchor
        .select(&SELECTORS.name)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_owned())
        .filter(|name| !name.is_empty());
    let Some(country) = country else {
        tracing::debug!("skipping directory item without a country name");
        return None;
    };

    let language = anchor
        .select(&SELECTORS.language)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned);

    let analytics_title = anchor
        .value()
        .attr("data-analytics-title")
        .map(str::to_owned);

    let mut path = anchor
        .value()
        .attr("href")
        .unwrap_or_default()
        .trim_matches('/')
        .to_owned();
    if analytics_title
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(US_ANALYTICS_TITLE))
    {
        path = US_PATH.to_owned();
    }

    let id = match &language {
        Some(tag) => tag.replace('-', "_"),
        None if !path.is_empty() => path.clone(),
        None => return None,
    };
    if is_excluded(&id) {
        tracing::debug!(id = id.as_str(), "skipping locale without an online store");
        return None;
    }

    Some(LocaleEntry {
        id,
        country,
        language,
        path,
        region: region.map(str::to_owned),
        analytics_title,
    })
}
