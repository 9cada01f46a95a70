//! Per-field coercion helpers: URL, date, and markdown-to-plain-text.
//!
//! These are the leaves of the pipeline. They recover locally from bad
//! input — a failed coercion logs a warning and yields a sentinel or an
//! absence marker, never an error to the caller.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use tracing::warn;
use url::Url;

use sitefeed_shared::FALLBACK_LINK;

// ---------------------------------------------------------------------------
// URL coercion
// ---------------------------------------------------------------------------

/// Strictly parse `raw` as an absolute URL.
///
/// Any failure (absent input included) logs a warning keyed by the event name
/// and yields the fallback literal `"#"`. Valid input comes back in the
/// normalized form produced by the parser.
pub fn coerce_url(raw: Option<&str>, event: &str) -> String {
    match raw {
        Some(s) => match Url::parse(s) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(event, url = s, error = %e, "invalid event link, using fallback");
                FALLBACK_LINK.to_string()
            }
        },
        None => {
            warn!(event, "missing event link, using fallback");
            FALLBACK_LINK.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Date coercion
// ---------------------------------------------------------------------------

/// Coerce a raw date value into a canonical RFC 3339 UTC string.
///
/// - Absent input (or a blank string, which the source delivers for cleared
///   cells) takes `default` when one was supplied, evaluated by the caller at
///   call time; otherwise `None`, silently.
/// - Present but unparseable input logs a warning keyed by event name and
///   field, then yields `None`.
///
/// The canonical form uses millisecond precision and a `Z` suffix, so all
/// produced strings have the same length and compare correctly as text.
pub fn coerce_date(
    raw: Option<&str>,
    field: &str,
    event: &str,
    default: Option<DateTime<Utc>>,
) -> Option<String> {
    let raw = raw.filter(|s| !s.trim().is_empty());

    match raw {
        None => default.map(canonical),
        Some(s) => match parse_timestamp(s) {
            Some(ts) => Some(canonical(ts)),
            None => {
                warn!(event, field, value = s, "unparseable date, dropping field");
                None
            }
        },
    }
}

/// Render a timestamp in the canonical published form.
pub fn canonical(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Try the timestamp formats the source is known to deliver.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt.and_utc());
    }

    None
}

// ---------------------------------------------------------------------------
// Markdown → plain text
// ---------------------------------------------------------------------------

/// Strip markdown formatting down to plain text. Total function.
///
/// Passes run in sequence, each a `&str -> String` transform, and the result
/// collapses to single-spaced text.
pub fn plain_text(markdown: &str) -> String {
    let mut result = markdown.to_string();

    result = strip_code_fences(&result);
    result = strip_images(&result);
    result = strip_links(&result);
    result = strip_block_markers(&result);
    result = strip_emphasis(&result);

    collapse_whitespace(&result)
}

/// Drop code fence lines, keeping the code itself.
fn strip_code_fences(md: &str) -> String {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^```[^\n]*$").expect("valid regex"));
    FENCE_RE.replace_all(md, "").to_string()
}

/// Images carry no text: `![alt](src)` → alt text.
fn strip_images(md: &str) -> String {
    static IMG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
    IMG_RE.replace_all(md, "$1").to_string()
}

/// `[text](url)` → text.
fn strip_links(md: &str) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid regex"));
    LINK_RE.replace_all(md, "$1").to_string()
}

/// Headings, blockquotes, and list markers at line starts.
fn strip_block_markers(md: &str) -> String {
    static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^\s*(?:#{1,6}\s+|>\s?|[-*+]\s+|\d+\.\s+)").expect("valid regex")
    });
    BLOCK_RE.replace_all(md, "").to_string()
}

/// Emphasis and inline-code markers.
fn strip_emphasis(md: &str) -> String {
    static EMPH_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\*{1,3}|_{2,3}|`)").expect("valid regex"));
    EMPH_RE.replace_all(md, "").to_string()
}

/// Collapse all whitespace runs to single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // --- coerce_url ---

    #[test]
    fn coerce_url_accepts_absolute_urls() {
        let url = coerce_url(Some("https://example.com/events/rustconf"), "RustConf");
        assert_eq!(url, "https://example.com/events/rustconf");
    }

    #[test]
    fn coerce_url_falls_back_on_garbage() {
        assert_eq!(coerce_url(Some("not a url"), "RustConf"), FALLBACK_LINK);
        assert_eq!(coerce_url(Some("/relative/path"), "RustConf"), FALLBACK_LINK);
        assert_eq!(coerce_url(None, "RustConf"), FALLBACK_LINK);
    }

    // --- coerce_date ---

    #[test]
    fn coerce_date_canonicalizes_known_formats() {
        let rfc = coerce_date(Some("2024-03-01T10:30:00+02:00"), "start date", "E", None);
        assert_eq!(rfc.as_deref(), Some("2024-03-01T08:30:00.000Z"));

        let date_only = coerce_date(Some("2024-03-01"), "start date", "E", None);
        assert_eq!(date_only.as_deref(), Some("2024-03-01T00:00:00.000Z"));

        let date_time = coerce_date(Some("2024-03-01 18:45"), "start date", "E", None);
        assert_eq!(date_time.as_deref(), Some("2024-03-01T18:45:00.000Z"));
    }

    #[test]
    fn coerce_date_unparseable_yields_none() {
        assert_eq!(coerce_date(Some("next tuesday"), "end date", "E", None), None);
        // A supplied default does not rescue unparseable input.
        let default = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            coerce_date(Some("garbage"), "end date", "E", Some(default)),
            None
        );
    }

    #[test]
    fn coerce_date_absent_takes_default() {
        let default = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            coerce_date(None, "end date", "E", Some(default)).as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
        // Blank cells behave like absent ones.
        assert_eq!(
            coerce_date(Some("  "), "end date", "E", Some(default)).as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
        assert_eq!(coerce_date(None, "end date", "E", None), None);
    }

    #[test]
    fn canonical_strings_sort_lexicographically() {
        let a = canonical(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let b = canonical(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(a < b);
        assert_eq!(a.len(), b.len());
    }

    // --- plain_text ---

    #[test]
    fn plain_text_strips_markdown() {
        let md = "# Heading\n\nSome **bold** and _plain_ text with a [link](https://x.io).\n\n- item one\n- item two";
        assert_eq!(
            plain_text(md),
            "Heading Some bold and _plain_ text with a link. item one item two"
        );
    }

    #[test]
    fn plain_text_keeps_image_alt_text() {
        assert_eq!(plain_text("![venue map](map.png) Doors at 9."), "venue map Doors at 9.");
    }

    #[test]
    fn plain_text_is_total() {
        assert_eq!(plain_text(""), "");
        assert_eq!(plain_text("just words"), "just words");
    }
}
