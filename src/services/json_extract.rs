use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Diagnostics attached to extraction failures are capped at this many
/// characters of raw model output.
const EXCERPT_MAX_CHARS: usize = 500;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("CODE_FENCE_RE is a valid regex pattern")
});

pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_MAX_CHARS).collect()
}

/// Locates and parses a JSON object embedded in free-form model output.
///
/// Models intermittently wrap valid JSON in prose or code fences despite
/// explicit instructions not to, so this strips one fenced block if
/// present, then scans from the first `{` to the last `}` and parses that
/// substring.
pub fn extract_json_object(raw: &str) -> AppResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyModelOutput);
    }

    let defenced = match CODE_FENCE_RE.captures(trimmed) {
        Some(captures) => {
            log::info!("Stripped code fences from model output");
            captures.get(1).map(|m| m.as_str()).unwrap_or(trimmed)
        }
        None => trimmed,
    };

    let start = defenced.find('{');
    let end = defenced.rfind('}');
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => {
            return Err(AppError::NoJsonFound {
                excerpt: excerpt(defenced),
            })
        }
    };

    let candidate = &defenced[start..=end];
    serde_json::from_str(candidate).map_err(|e| AppError::InvalidJson {
        detail: e.to_string(),
        excerpt: excerpt(candidate),
    })
}
