use thiserror::Error;

use crate::extract::ExtractionError;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("parse error in {context}: {reason}")]
    Parse { context: String, reason: String },

    #[error("every model page failed for locale {locale}: {}", failures.join("; "))]
    AggregateFetch {
        locale: String,
        failures: Vec<String>,
    },

    #[error("invalid locale \"{locale}\"")]
    InvalidLocale { locale: String },
}

impl ScraperError {
    /// Stable machine-readable error kind, used as the API error code.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. } => "transport_error",
            ScraperError::Extraction(_) => "extraction_error",
            ScraperError::Parse { .. } => "parse_error",
            ScraperError::AggregateFetch { .. } => "aggregate_fetch_error",
            ScraperError::InvalidLocale { .. } => "invalid_locale",
        }
    }

    pub(crate) fn parse(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ScraperError::Parse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
