//! Integration tests for `Storefront`.
//!
//! Uses `wiremock` to stand up a local storefront for each test so no real
//! network traffic is made. Covers partial and total page failure on the
//! catalog path, availability filtering on the directory path, and the
//! per-locale config summary.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phonecat_core::ExtractStrategy;
use phonecat_scraper::{AvailabilityCache, ScraperError, Storefront, StorefrontSettings};

const DIRECTORY_PATH: &str = "/choose-country-region/";

fn settings(base_url: &str, slugs: &[&str]) -> StorefrontSettings {
    StorefrontSettings {
        base_url: base_url.to_owned(),
        user_agent: "phonecat-test/0.1".to_owned(),
        request_timeout_secs: 5,
        model_slugs: slugs.iter().map(|s| (*s).to_owned()).collect(),
        bootstrap_global: "PRODUCT_SELECTION_BOOTSTRAP".to_owned(),
        extract_strategy: ExtractStrategy::MarkerScan,
        image_url_template: "https://images.test/{key}".to_owned(),
        locale_directory_path: DIRECTORY_PATH.to_owned(),
        availability_flag: "buyFlowEnabled".to_owned(),
        availability_concurrency: 2,
    }
}

fn storefront(server: &MockServer, slugs: &[&str]) -> Storefront {
    Storefront::new(
        settings(&server.uri(), slugs),
        Arc::new(AvailabilityCache::default()),
    )
    .expect("failed to build test Storefront")
}

/// A model page whose inline script assigns the bootstrap global.
fn model_page(family: &str, parts: &[(&str, &str, &str)]) -> String {
    let products: Vec<String> = parts
        .iter()
        .map(|(color, capacity, part)| {
            format!(
                "{{familyType: '{family}', dimensionColor: '{color}', \
                 dimensionCapacity: '{capacity}', partNumber: '{part}'}}"
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head>
<script>window.dataLayer = [];</script>
<script>
window.PRODUCT_SELECTION_BOOTSTRAP = {{
    productSelectionData: {{
        products: [{}],
        displayValues: {{
            dimensionColor: {{
                black: {{value: 'Black', image: 'swatch-black'}},
                white: {{value: 'White'}},
                variantOrder: ['black', 'white']
            }}
        }}
    }}
}};
</script></head><body></body></html>"#,
        products.join(",\n")
    )
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

const DIRECTORY: &str = r#"<!DOCTYPE html><html><head>
<script type="application/json" id="locale-config">
{"localeConfig": {
    "en_GB": {"countryName": "United Kingdom", "language": "en-GB", "urlPath": "/uk/"},
    "de_DE": {"countryName": "Deutschland", "language": "de-DE", "urlPath": "/de/"},
    "fr_FR": {"countryName": "France", "language": "fr-FR", "urlPath": "/fr/"},
    "ja_JP": {"countryName": "Japan", "language": "ja-JP", "urlPath": "/jp/"}
}}
</script></head><body></body></html>"#;

async fn mount_config(server: &MockServer, locale: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{locale}/shop/config.json")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// get_models
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_models_builds_sorted_catalog() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/uk/shop/buy-iphone/iphone-16",
        200,
        model_page(
            "iphone-16",
            &[
                ("white", "256GB", "W256"),
                ("black", "1TB", "B1T"),
                ("black", "128GB", "B128"),
            ],
        ),
    )
    .await;

    let models = storefront(&server, &["iphone-16"])
        .get_models("uk")
        .await
        .expect("catalog");

    assert_eq!(models.len(), 1);
    let model = &models[0];
    assert_eq!(model.name, "iPhone 16");
    assert_eq!(model.capacities, vec!["128GB", "256GB", "1TB"]);
    assert_eq!(model.colors[0].name, "Black");
    assert_eq!(
        model.colors[0].image_url.as_deref(),
        Some("https://images.test/swatch-black")
    );
    let parts: Vec<&str> = model
        .part_numbers
        .iter()
        .map(|p| p.part_number.as_str())
        .collect();
    assert_eq!(parts, vec!["B128", "B1T", "W256"]);
}

#[tokio::test]
async fn get_models_skips_failed_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/us/shop/buy-iphone/iphone-16",
        200,
        model_page("iphone-16", &[("black", "128GB", "B128")]),
    )
    .await;
    mount_page(
        &server,
        "/us/shop/buy-iphone/iphone-16-pro",
        500,
        String::new(),
    )
    .await;

    let models = storefront(&server, &["iphone-16-pro", "iphone-16"])
        .get_models("us")
        .await
        .expect("partial failure should still yield a catalog");

    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["iphone-16"]);
}

#[tokio::test]
async fn get_models_skips_pages_without_bootstrap_state() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/us/shop/buy-iphone/iphone-16",
        200,
        model_page("iphone-16", &[("black", "128GB", "B128")]),
    )
    .await;
    mount_page(
        &server,
        "/us/shop/buy-iphone/iphone-16-pro",
        200,
        "<html><body>Down for maintenance</body></html>".to_owned(),
    )
    .await;

    let models = storefront(&server, &["iphone-16-pro", "iphone-16"])
        .get_models("us")
        .await
        .unwrap();
    assert_eq!(models.len(), 1);
}

#[tokio::test]
async fn get_models_all_pages_failing_is_aggregate_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/us/shop/buy-iphone/iphone-16", 503, String::new()).await;
    mount_page(
        &server,
        "/us/shop/buy-iphone/iphone-16-pro",
        200,
        "<html></html>".to_owned(),
    )
    .await;

    let err = storefront(&server, &["iphone-16-pro", "iphone-16"])
        .get_models("us")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "aggregate_fetch_error");
    match err {
        ScraperError::AggregateFetch { locale, failures } => {
            assert_eq!(locale, "us");
            assert_eq!(failures.len(), 2);
            assert!(failures.iter().any(|f| f.starts_with("iphone-16:")));
            assert!(failures.iter().any(|f| f.starts_with("iphone-16-pro:")));
        }
        other => panic!("expected AggregateFetch, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_models_rejects_invalid_locale_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = storefront(&server, &["iphone-16"])
        .get_models("../admin")
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidLocale { .. }));
}

// ---------------------------------------------------------------------------
// get_locales / availability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_locales_excludes_disabled_and_unreachable_locales() {
    let server = MockServer::start().await;
    mount_page(&server, DIRECTORY_PATH, 200, DIRECTORY.to_owned()).await;
    mount_config(&server, "uk", 200, json!({"features": {"buyFlowEnabled": true}})).await;
    mount_config(&server, "de", 200, json!({"features": {"buyFlowEnabled": false}})).await;
    mount_config(&server, "fr", 200, json!({"features": {}})).await;
    mount_config(&server, "jp", 500, json!({})).await;

    let storefront = storefront(&server, &["iphone-16"]);
    let locales = storefront.get_locales().await.expect("locales");

    let ids: Vec<&str> = locales.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["en_GB"]);

    let snapshot = storefront.availability().current().await.unwrap();
    assert_eq!(snapshot.locale_count, 4);
    assert!(snapshot.is_disabled("ja_JP"), "unreachable config must fail closed");
}

#[tokio::test]
async fn get_locales_reuses_cached_availability() {
    let server = MockServer::start().await;
    mount_page(&server, DIRECTORY_PATH, 200, DIRECTORY.to_owned()).await;
    for locale in ["uk", "de", "fr", "jp"] {
        Mock::given(method("GET"))
            .and(path(format!("/{locale}/shop/config.json")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"features": {"buyFlowEnabled": true}})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let storefront = storefront(&server, &["iphone-16"]);
    assert_eq!(storefront.get_locales().await.unwrap().len(), 4);
    assert_eq!(storefront.get_locales().await.unwrap().len(), 4);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIRECTORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTORY))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_config(&server, "uk", 200, json!({"features": {"buyFlowEnabled": true}})).await;
    mount_config(&server, "de", 200, json!({"features": {"buyFlowEnabled": true}})).await;
    mount_config(&server, "fr", 200, json!({"features": {"buyFlowEnabled": false}})).await;
    mount_config(&server, "jp", 200, json!({"features": {"buyFlowEnabled": true}})).await;

    let storefront = storefront(&server, &["iphone-16"]);
    let first = storefront.refresh_availability().await.unwrap();
    assert!(first.is_disabled("fr_FR"));

    // The directory mock is exhausted, so the next refresh sees a 404.
    let err = storefront.refresh_availability().await.unwrap_err();
    assert_eq!(err.kind(), "transport_error");

    let current = storefront.availability().current().await.unwrap();
    assert_eq!(current.refreshed_at, first.refreshed_at);
    assert!(current.is_disabled("fr_FR"));
}

// ---------------------------------------------------------------------------
// get_config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_config_summarizes_document() {
    let server = MockServer::start().await;
    mount_config(
        &server,
        "ca/fr",
        200,
        json!({
            "currency": "CAD",
            "features": {"buyFlowEnabled": true, "tradeIn": false, "promo": "spring"}
        }),
    )
    .await;

    let summary = storefront(&server, &["iphone-16"])
        .get_config("/ca/fr/")
        .await
        .unwrap();
    assert_eq!(summary.locale, "ca/fr");
    assert!(summary.store_enabled);
    assert_eq!(summary.currency.as_deref(), Some("CAD"));
    assert_eq!(summary.features.len(), 2);
}

#[tokio::test]
async fn get_config_propagates_upstream_status() {
    let server = MockServer::start().await;
    mount_config(&server, "zz", 404, json!({})).await;

    let err = storefront(&server, &["iphone-16"])
        .get_config("zz")
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 404, .. }));
}
