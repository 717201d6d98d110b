//! Script-state extraction: locate the bootstrap assignment a storefront page
//! inlines and evaluate it into a [`serde_json::Value`].

pub mod literal;

use phonecat_core::ExtractStrategy;
use regex::RegexBuilder;
use serde_json::Value;

const SCRIPT_CLOSE: &str = "</script>";

/// Compiled-size cap for the per-global capture pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("assignment to {marker} not found in page")]
    MarkerNotFound { marker: String },

    #[error("no </script> after assignment to {marker}")]
    UnterminatedBlock { marker: String },

    #[error("evaluating {name} failed: {reason}")]
    EvalFailure { name: String, reason: String },
}

/// Returns the value a page's inline script assigns to the global `name`.
///
/// # Errors
///
/// - [`ExtractionError::MarkerNotFound`] if the page never assigns `name`.
/// - [`ExtractionError::UnterminatedBlock`] if the script holding the
///   assignment is never closed.
/// - [`ExtractionError::EvalFailure`] if the fragment cannot be evaluated or
///   does not bind `name`.
pub fn extract_global(
    page: &str,
    name: &str,
    strategy: ExtractStrategy,
) -> Result<Value, ExtractionError> {
    match strategy {
        ExtractStrategy::MarkerScan => marker_scan(page, name),
        ExtractStrategy::PatternCapture => pattern_capture(page, name),
    }
}

fn marker_scan(page: &str, name: &str) -> Result<Value, ExtractionError> {
    let start = find_assignment(page, name).ok_or_else(|| ExtractionError::MarkerNotFound {
        marker: name.to_owned(),
    })?;

    let fragment_len =
        page[start..]
            .find(SCRIPT_CLOSE)
            .ok_or_else(|| ExtractionError::UnterminatedBlock {
                marker: name.to_owned(),
            })?;

    evaluate_binding(&page[start..start + fragment_len], name)
}

fn pattern_capture(page: &str, name: &str) -> Result<Value, ExtractionError> {
    let pattern = format!(r"(?s)(?:^|[^\w$]){}\s*=\s*(\{{.*?\}})\s*;", regex::escape(name));
    let re = RegexBuilder::new(&pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| ExtractionError::EvalFailure {
            name: name.to_owned(),
            reason: format!("invalid capture pattern: {e}"),
        })?;

    let literal = re
        .captures(page)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ExtractionError::MarkerNotFound {
            marker: name.to_owned(),
        })?;

    tracing::debug!(name, len = literal.len(), "captured bootstrap literal");
    let script = format!("{name} = {};", literal.as_str());
    evaluate_binding(&script, name)
}

/// Byte offset of the first `name` that is a whole identifier followed by a
/// single `=`.
fn find_assignment(page: &str, name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    page.match_indices(name).map(|(i, _)| i).find(|&i| {
        let preceded_by_ident = page[..i]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if preceded_by_ident {
            return false;
        }
        let after = page[i + name.len()..].trim_start();
        after.starts_with('=') && !after.starts_with("==") && !after.starts_with("=>")
    })
}

fn evaluate_binding(fragment: &str, name: &str) -> Result<Value, ExtractionError> {
    let binding = name.rsplit('.').next().unwrap_or(name);
    let mut evaluation = literal::evaluate(fragment);

    if let Some(value) = evaluation.bindings.remove(binding) {
        if let Some(err) = &evaluation.error {
            tracing::debug!(name, error = %err, "ignoring script after bootstrap assignment");
        }
        return Ok(value);
    }

    let reason = evaluation.error.map_or_else(
        || "script produced no binding".to_string(),
        |err| err.to_string(),
    );
    Err(ExtractionError::EvalFailure {
        name: name.to_owned(),
        reason,
    })
}
