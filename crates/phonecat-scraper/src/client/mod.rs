//! HTTP client for storefront pages and per-locale configuration documents.

mod fetch_all;
mod urls;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ScraperError;

pub use fetch_all::{FetchReport, PageFailure};
pub use urls::store_origin;

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const JSON_ACCEPT: &str = "application/json,text/plain;q=0.9,*/*;q=0.8";

/// HTTP client for the vendor storefront.
///
/// Every request carries browser-like `Accept`, `Accept-Language` and
/// `Referer` headers; the storefront serves a stripped page without them.
/// Non-2xx responses are returned as [`ScraperError::UnexpectedStatus`].
/// There are no retries.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
    referer: String,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            referer: format!("{}/", store_origin(&base_url)),
            base_url,
        })
    }

    #[cfg(test)]
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the raw page for one model slug in a locale.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ScraperError::Http`] for network or TLS failures.
    pub async fn fetch_model_page(
        &self,
        locale_path: &str,
        slug: &str,
    ) -> Result<String, ScraperError> {
        let url = urls::model_page_url(&self.base_url, locale_path, slug);
        self.fetch_text(&url, PAGE_ACCEPT).await
    }

    /// Fetches the region/locale directory page.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_model_page`].
    pub async fn fetch_directory(&self, directory_path: &str) -> Result<String, ScraperError> {
        let url = urls::directory_url(&self.base_url, directory_path);
        self.fetch_text(&url, PAGE_ACCEPT).await
    }

    /// Fetches and decodes a locale's configuration document.
    ///
    /// # Errors
    ///
    /// Transport errors as for [`Self::fetch_model_page`], plus
    /// [`ScraperError::Parse`] if the body is not valid JSON for `T`.
    pub async fn fetch_locale_config<T: DeserializeOwned>(
        &self,
        locale_path: &str,
    ) -> Result<T, ScraperError> {
        let url = urls::locale_config_url(&self.base_url, locale_path);
        let body = self.fetch_text(&url, JSON_ACCEPT).await?;
        serde_json::from_str(&body)
            .map_err(|e| ScraperError::parse(format!("locale config from {url}"), e.to_string()))
    }

    async fn fetch_text(&self, url: &str, accept: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::REFERER, &self.referer)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
