//! Text and date helpers shared by the domain and the HTTP layer.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Turn a title into a URL-safe slug.
///
/// Characters outside `[a-z0-9_\s-]` are dropped; runs of whitespace,
/// underscores and hyphens become one hyphen. The result never starts or
/// ends with a hyphen.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(value: &str) -> bool {
    !value.is_empty() && EMAIL_RE.is_match(value)
}

/// Strip script blocks, then any remaining markup, then surrounding whitespace.
pub fn sanitize_input(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let without_scripts = SCRIPT_RE.replace_all(value, "");
    TAG_RE.replace_all(&without_scripts, "").trim().to_string()
}

/// Format a date string (RFC 3339 or `YYYY-MM-DD`) in UTC.
///
/// Anything unparseable renders as `"Invalid Date"`.
pub fn format_date(value: &str, format: Option<&str>) -> String {
    match parse_date(value.trim()) {
        Some(date) => format_timestamp(date, format),
        None => "Invalid Date".to_string(),
    }
}

/// `"YYYY-MM-DD"` renders `2024-01-05`; anything else renders `Jan 5, 2024`.
pub fn format_timestamp(date: DateTime<Utc>, format: Option<&str>) -> String {
    match format {
        Some("YYYY-MM-DD") => date.format("%Y-%m-%d").to_string(),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Minutes needed to read `text`, rounded up.
pub fn calculate_reading_time(text: &str, words_per_minute: u32) -> u32 {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    let rate = words_per_minute.max(1) as usize;
    words.div_ceil(rate) as u32
}
