//! URL construction for storefront pages and documents.

/// Extracts the scheme+host origin from the configured base URL.
///
/// Given `"https://www.apple.com/store"`, returns `"https://www.apple.com"`.
/// Used as the `Referer` on every request.
#[must_use]
pub fn store_origin(base_url: &str) -> String {
    reqwest::Url::parse(base_url).map_or_else(
        |e| {
            tracing::warn!(
                base_url,
                error = %e,
                "could not parse base URL, falling back to string split for origin"
            );
            base_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Joins the base URL, an optional locale path segment, and a page path.
///
/// Slashes around `locale_path` and `page` are normalized so an empty locale
/// path addresses the base storefront.
pub(crate) fn join(base_url: &str, locale_path: &str, page: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let locale_path = locale_path.trim_matches('/');
    let page = page.trim_start_matches('/');
    if locale_path.is_empty() {
        format!("{base}/{page}")
    } else {
        format!("{base}/{locale_path}/{page}")
    }
}

/// `{base}/{locale}/shop/buy-iphone/{slug}`
pub(crate) fn model_page_url(base_url: &str, locale_path: &str, slug: &str) -> String {
    join(base_url, locale_path, &format!("shop/buy-iphone/{slug}"))
}

/// `{base}/{locale}/shop/config.json`
pub(crate) fn locale_config_url(base_url: &str, locale_path: &str) -> String {
    join(base_url, locale_path, "shop/config.json")
}

/// `{base}{directory_path}`, keeping the directory path's own trailing slash.
pub(crate) fn directory_url(base_url: &str, directory_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        directory_path.trim_start_matches('/')
    )
}
