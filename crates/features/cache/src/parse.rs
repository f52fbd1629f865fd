use crate::error::CacheError;
use candor_domain::AnalysisRecord;

/// Parses the AI service's raw JSON text into a validated [`AnalysisRecord`].
///
/// Surrounding whitespace and a Markdown code fence (```` ```json ... ``` ````)
/// are tolerated, since models tend to wrap JSON output in them.
///
/// # Errors
/// Returns [`CacheError::MalformedResponse`] carrying the unmodified `raw` text
/// if it is not JSON or violates the analysis schema.
pub fn parse_analysis(raw: &str) -> Result<AnalysisRecord, CacheError> {
    serde_json::from_str(strip_fence(raw)).map_err(|e| {
        tracing::debug!(error = %e, bytes = raw.len(), "Rejected analysis response");
        CacheError::MalformedResponse {
            message: e.to_string().into(),
            raw: raw.to_owned(),
            context: None,
        }
    })
}

fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}
