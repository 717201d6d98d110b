//! Background-refreshed set of locales whose store is switched off.
//!
//! The cache holds one immutable [`AvailabilitySnapshot`] behind an `Arc`.
//! A refresh builds a complete new snapshot off to the side and swaps the
//! pointer under the write lock, so readers see either the old set or the
//! new one. Refreshes are serialized by a separate mutex; once a snapshot
//! exists, readers only ever take the read lock.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::FutureExt;
use futures::stream::{self, StreamExt};
use phonecat_core::{ConfigSummary, LocaleEntry};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::client::StorefrontClient;
use crate::error::ScraperError;

/// Source of "now" for stamping snapshots.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Result of probing every locale, before it is stamped and cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityProbe {
    pub disabled: BTreeSet<String>,
    pub locale_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    /// Ids of locales whose feature flag is off or could not be read.
    pub disabled: BTreeSet<String>,
    pub locale_count: usize,
    pub refreshed_at: DateTime<Utc>,
}

impl AvailabilitySnapshot {
    #[must_use]
    pub fn is_disabled(&self, locale_id: &str) -> bool {
        self.disabled.contains(locale_id)
    }
}

/// Point-in-time view of the cache for health reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityStatus {
    pub refreshed_at: Option<DateTime<Utc>>,
    pub age_secs: Option<i64>,
    pub disabled_count: usize,
    pub refreshing: bool,
}

pub struct AvailabilityCache {
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Option<Arc<AvailabilitySnapshot>>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for AvailabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityCache")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl AvailabilityCache {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The current snapshot, or `None` before the first successful refresh.
    /// Never waits on a running refresh.
    pub async fn current(&self) -> Option<Arc<AvailabilitySnapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Returns the current snapshot, populating the cache first if it has
    /// never been refreshed.
    ///
    /// A caller arriving while the first refresh is running waits for it and
    /// reuses its result instead of starting another one.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute` when this call had to run it.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        compute: F,
    ) -> Result<Arc<AvailabilitySnapshot>, ScraperError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AvailabilityProbe, ScraperError>>,
    {
        if let Some(snapshot) = self.current().await {
            return Ok(snapshot);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(snapshot) = self.current().await {
            return Ok(snapshot);
        }
        Ok(self.install(compute().await?).await)
    }

    /// Recomputes the snapshot and swaps it in.
    ///
    /// A caller that had to wait for a refresh already in flight gets that
    /// refresh's snapshot instead of running `compute` again, so a burst of
    /// calls costs one probe of every locale. On error the previous snapshot
    /// stays in place.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute`.
    pub async fn refresh<F, Fut>(
        &self,
        compute: F,
    ) -> Result<Arc<AvailabilitySnapshot>, ScraperError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AvailabilityProbe, ScraperError>>,
    {
        let seen = self.current().await;
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.current().await {
            let swapped_while_waiting = match &seen {
                Some(seen) => !Arc::ptr_eq(seen, &current),
                None => true,
            };
            if swapped_while_waiting {
                tracing::debug!("reusing snapshot from the refresh that just finished");
                return Ok(current);
            }
        }

        Ok(self.install(compute().await?).await)
    }

    pub async fn status(&self) -> AvailabilityStatus {
        let refreshing = self.refresh_lock.try_lock().is_err();
        let snapshot = self.current().await;
        let now = self.clock.now();
        AvailabilityStatus {
            refreshed_at: snapshot.as_ref().map(|s| s.refreshed_at),
            age_secs: snapshot
                .as_ref()
                .map(|s| (now - s.refreshed_at).num_seconds()),
            disabled_count: snapshot.as_ref().map_or(0, |s| s.disabled.len()),
            refreshing,
        }
    }

    async fn install(&self, probe: AvailabilityProbe) -> Arc<AvailabilitySnapshot> {
        let snapshot = Arc::new(AvailabilitySnapshot {
            disabled: probe.disabled,
            locale_count: probe.locale_count,
            refreshed_at: self.clock.now(),
        });
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));
        tracing::info!(
            locales = snapshot.locale_count,
            disabled = snapshot.disabled.len(),
            "availability snapshot refreshed"
        );
        snapshot
    }
}

/// Per-locale storefront configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleConfigDocument {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, Value>,
}

impl LocaleConfigDocument {
    /// Whether `flag` is present and `true`. Any other value counts as off.
    #[must_use]
    pub fn flag_enabled(&self, flag: &str) -> bool {
        self.features.get(flag).and_then(Value::as_bool) == Some(true)
    }

    #[must_use]
    pub fn summarize(self, locale: &str, flag: &str) -> ConfigSummary {
        let store_enabled = self.flag_enabled(flag);
        ConfigSummary {
            locale: locale.to_owned(),
            store_enabled,
            currency: self.currency.filter(|c| !c.is_empty()),
            features: self
                .features
                .into_iter()
                .filter_map(|(name, value)| value.as_bool().map(|b| (name, b)))
                .collect(),
        }
    }
}

/// Fetches every locale's configuration document, at most `concurrency` at a
/// time, and collects the ids whose `flag` is not on.
///
/// A locale whose document cannot be fetched or decoded is counted as
/// disabled.
pub async fn probe_availability(
    client: &StorefrontClient,
    locales: &[LocaleEntry],
    flag: &str,
    concurrency: usize,
) -> AvailabilityProbe {
    let probes: Vec<_> = locales
        .iter()
        .map(|locale| {
            async move {
                let enabled = match client
                    .fetch_locale_config::<LocaleConfigDocument>(&locale.path)
                    .await
                {
                    Ok(document) => document.flag_enabled(flag),
                    Err(e) => {
                        tracing::warn!(
                            locale = locale.id.as_str(),
                            error = %e,
                            "locale config unavailable, treating store as disabled"
                        );
                        false
                    }
                };
                (locale.id.as_str(), enabled)
            }
            .boxed()
        })
        .collect();
    let results: Vec<(&str, bool)> = stream::iter(probes)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    AvailabilityProbe {
        disabled: results
            .into_iter()
            .filter(|(_, enabled)| !enabled)
            .map(|(id, _)| id.to_owned())
            .collect(),
        locale_count: locales.len(),
    }
}

#[cfg(test)]
#[path = "availability_test.rs"]
mod tests;
