pub mod availability;
pub mod bootstrap;
pub mod client;
pub mod error;
pub mod extract;
pub mod locales;
pub mod normalize;
pub mod parse;
pub mod storefront;

pub use availability::{
    AvailabilityCache, AvailabilitySnapshot, AvailabilityStatus, Clock, SystemClock,
};
pub use client::{FetchReport, StorefrontClient};
pub use error::ScraperError;
pub use extract::{extract_global, ExtractionError};
pub use locales::parse_locale_directory;
pub use normalize::normalize_catalog;
pub use storefront::{Storefront, StorefrontSettings};
