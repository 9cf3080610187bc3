//! # Text Processing Utilities
//!
//! Secret redaction for anything that may end up in logs, and width-aware
//! truncation for table cells.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthChar;

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)(?:bearer\s+|basic\s+)?([^\s,]+)",
        r"(?i)(bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)([A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        r"()(sk-[A-Za-z0-9\-_]{6,})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
///
/// Key names and header names are preserved so the redacted text stays
/// useful for debugging.
///
/// # Example
/// ```rust
/// use mcpdash_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("MCPDASH_API_KEY=abc123"), "MCPDASH_API_KEY=[REDACTED]");
/// assert_eq!(redact_sensitive("Authorization: Bearer abc.def"), "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}[REDACTED]")
            })
            .into_owned();
    }
    redacted
}

/// Truncate `text` to at most `max_width` terminal columns, replacing the
/// tail with `…` when it does not fit.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for character in text.chars() {
        let width = character.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(character);
    }
    out.push('…');
    out
}
