//! Concurrent fetch of every model page for one locale.

use std::collections::BTreeMap;

use futures::future::join_all;

use super::StorefrontClient;

/// One model page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub slug: String,
    pub error: String,
}

/// Outcome of a concurrent page batch.
///
/// Pages are keyed by slug, so iteration order never depends on which
/// response arrived first.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub pages: BTreeMap<String, String>,
    pub failures: Vec<PageFailure>,
}

impl StorefrontClient {
    /// Fetches every slug's page for `locale_path` concurrently and waits for
    /// all of them.
    ///
    /// A failed page is logged and recorded in [`FetchReport::failures`]
    /// rather than aborting the batch. Deciding what an empty report means is
    /// left to the caller.
    pub async fn fetch_model_pages(&self, locale_path: &str, slugs: &[String]) -> FetchReport {
        let fetches = slugs.iter().map(|slug| async move {
            (slug, self.fetch_model_page(locale_path, slug).await)
        });

        let mut report = FetchReport::default();
        for (slug, result) in join_all(fetches).await {
            match result {
                Ok(body) => {
                    report.pages.insert(slug.clone(), body);
                }
                Err(e) => {
                    tracing::warn!(
                        locale = locale_path,
                        slug = slug.as_str(),
                        error = %e,
                        "model page fetch failed, skipping"
                    );
                    report.failures.push(PageFailure {
                        slug: slug.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report.failures.sort_by(|a, b| a.slug.cmp(&b.slug));
        report
    }
}
