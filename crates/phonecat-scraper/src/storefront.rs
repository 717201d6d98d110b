//! Orchestration: fetch, extract, and normalize catalog pages; fetch, parse,
//! and filter the locale directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use phonecat_core::{AppConfig, CatalogModel, ConfigSummary, ExtractStrategy, LocaleEntry};

use crate::availability::{
    probe_availability, AvailabilityCache, AvailabilityProbe, AvailabilitySnapshot,
    LocaleConfigDocument,
};
use crate::bootstrap::{decode_model_page, ModelPage};
use crate::client::StorefrontClient;
use crate::error::ScraperError;
use crate::extract::extract_global;
use crate::locales::parse_locale_directory;
use crate::normalize::normalize_catalog;

/// Everything the scraper needs from configuration.
#[derive(Debug, Clone)]
pub struct StorefrontSettings {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub model_slugs: Vec<String>,
    pub bootstrap_global: String,
    pub extract_strategy: ExtractStrategy,
    pub image_url_template: String,
    pub locale_directory_path: String,
    pub availability_flag: String,
    pub availability_concurrency: usize,
}

impl StorefrontSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout_secs: config.request_timeout_secs,
            model_slugs: config.model_slugs.clone(),
            bootstrap_global: config.bootstrap_global.clone(),
            extract_strategy: config.extract_strategy,
            image_url_template: config.image_url_template.clone(),
            locale_directory_path: config.locale_directory_path.clone(),
            availability_flag: config.availability_flag.clone(),
            availability_concurrency: config.availability_concurrency,
        }
    }
}

/// Entry point for catalog, locale, and availability requests.
#[derive(Debug)]
pub struct Storefront {
    client: StorefrontClient,
    settings: StorefrontSettings,
    availability: Arc<AvailabilityCache>,
}

impl Storefront {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(
        settings: StorefrontSettings,
        availability: Arc<AvailabilityCache>,
    ) -> Result<Self, ScraperError> {
        let client = StorefrontClient::new(
            &settings.base_url,
            settings.request_timeout_secs,
            &settings.user_agent,
        )?;
        Ok(Self {
            client,
            settings,
            availability,
        })
    }

    #[must_use]
    pub fn availability(&self) -> &Arc<AvailabilityCache> {
        &self.availability
    }

    /// Builds the catalog for one locale from every configured model page.
    ///
    /// Pages that fail to fetch, extract, or decode are logged and left out.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidLocale`] if `locale` is not a path segment.
    /// - [`ScraperError::AggregateFetch`] if no page survived.
    pub async fn get_models(&self, locale: &str) -> Result<Vec<CatalogModel>, ScraperError> {
        let locale = validate_locale(locale)?;
        let report = self
            .client
            .fetch_model_pages(locale, &self.settings.model_slugs)
            .await;

        let mut failures: Vec<String> = report
            .failures
            .into_iter()
            .map(|f| format!("{}: {}", f.slug, f.error))
            .collect();

        let mut pages: BTreeMap<String, ModelPage> = BTreeMap::new();
        for (slug, body) in report.pages {
            match self.decode_page(&body, &slug) {
                Ok(page) => {
                    pages.insert(slug, page);
                }
                Err(e) => {
                    tracing::warn!(
                        locale,
                        slug = slug.as_str(),
                        kind = e.kind(),
                        error = %e,
                        "model page unusable, skipping"
                    );
                    failures.push(format!("{slug}: {e}"));
                }
            }
        }

        if pages.is_empty() {
            return Err(ScraperError::AggregateFetch {
                locale: locale.to_owned(),
                failures,
            });
        }

        let catalog = normalize_catalog(&pages, &self.settings.image_url_template);
        tracing::info!(
            locale,
            models = catalog.len(),
            skipped = failures.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    /// Returns the locale directory minus locales whose store is disabled.
    ///
    /// Populates the availability cache on first use, reusing the directory
    /// fetched here.
    ///
    /// # Errors
    ///
    /// Propagates directory fetch and parse errors.
    pub async fn get_locales(&self) -> Result<Vec<LocaleEntry>, ScraperError> {
        let directory = self.fetch_directory().await?;
        let snapshot = self
            .availability
            .get_or_refresh(|| async { Ok(self.probe(&directory).await) })
            .await?;

        let total = directory.len();
        let locales: Vec<LocaleEntry> = directory
            .into_iter()
            .filter(|entry| !snapshot.is_disabled(&entry.id))
            .collect();
        tracing::debug!(total, listed = locales.len(), "locale directory filtered");
        Ok(locales)
    }

    /// Fetches and summarizes one locale's configuration document.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidLocale`] if `locale` is not a path segment.
    /// - Transport and parse errors of the document fetch.
    pub async fn get_config(&self, locale: &str) -> Result<ConfigSummary, ScraperError> {
        let locale = validate_locale(locale)?;
        let document: LocaleConfigDocument = self.client.fetch_locale_config(locale).await?;
        Ok(document.summarize(locale, &self.settings.availability_flag))
    }

    /// Recomputes the availability cache from a freshly fetched directory.
    ///
    /// # Errors
    ///
    /// Propagates directory fetch and parse errors; the previous snapshot is
    /// kept in that case.
    pub async fn refresh_availability(&self) -> Result<Arc<AvailabilitySnapshot>, ScraperError> {
        self.availability
            .refresh(|| async {
                let directory = self.fetch_directory().await?;
                Ok(self.probe(&directory).await)
            })
            .await
    }

    async fn fetch_directory(&self) -> Result<Vec<LocaleEntry>, ScraperError> {
        let page = self
            .client
            .fetch_directory(&self.settings.locale_directory_path)
            .await?;
        parse_locale_directory(&page)
    }

    async fn probe(&self, directory: &[LocaleEntry]) -> AvailabilityProbe {
        probe_availability(
            &self.client,
            directory,
            &self.settings.availability_flag,
            self.settings.availability_concurrency,
        )
        .await
    }

    fn decode_page(&self, body: &str, slug: &str) -> Result<ModelPage, ScraperError> {
        let state = extract_global(
            body,
            &self.settings.bootstrap_global,
            self.settings.extract_strategy,
        )?;
        decode_model_page(state, slug)
    }
}

/// Accepts locale path segments such as `uk` or `ca/fr`, with surrounding
/// slashes trimmed.
fn validate_locale(locale: &str) -> Result<&str, ScraperError> {
    let trimmed = locale.trim().trim_matches('/');
    let valid = !trimmed.is_empty()
        && !trimmed.contains("//")
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'/'));
    if valid {
        Ok(trimmed)
    } else {
        Err(ScraperError::InvalidLocale {
            locale: locale.to_owned(),
        })
    }
}
