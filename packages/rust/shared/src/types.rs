//! Core domain types for the sitefeed content pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Fallback value substituted when URL coercion fails. Distinct from absence.
pub const FALLBACK_LINK: &str = "#";

// ---------------------------------------------------------------------------
// LoadId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one content-load run (time-sortable).
///
/// Used only to correlate log lines from a single load; never published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(pub Uuid);

impl LoadId {
    /// Generate a new time-sortable load identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for LoadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// One row as delivered by the tabular API: a stable record id plus an
/// open-ended field map. Read-only input to the pipeline.
///
/// The typed accessors are the ingestion boundary: downstream code works on
/// `Option`s, never on untyped lookups. A field that is present but empty is
/// distinct from an absent field — accessors preserve that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    /// Opaque stable record identifier, unique within one fetch cycle.
    pub id: String,
    /// Field name → untyped value, as delivered.
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
}

impl RawRow {
    /// Look up a field as text. `None` when the field is absent or null;
    /// `Some("")` when present but empty.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Look up a field as an ordered list of strings. A lone string value is
    /// treated as a one-element list. `None` when absent or null.
    pub fn text_list(&self, name: &str) -> Option<Vec<String>> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(vec![s.clone()]),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Some(other) => Some(vec![other.to_string()]),
        }
    }

    /// Raw access for callers that need the untyped value.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A normalized event, created by the event normalizer.
///
/// Immutable once constructed, except for `image_url` which enrichment
/// assigns later. Optionals serialize as explicit `null` so the published
/// shape always carries every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque stable identifier from the source row.
    pub id: String,
    /// Display name; also the key used in operator-facing warnings.
    pub event_name: String,
    /// Marketing copy as authored (markdown), verbatim.
    pub marketing_text: Option<String>,
    /// Plain-text rendering of `marketing_text`, or `None` when there is no
    /// marketing text (never the empty string).
    pub description: Option<String>,
    /// Validated absolute URL, or the fallback literal `"#"`.
    pub event_link: String,
    /// Free-text topics, zero or more, order as delivered.
    pub topic: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub website_category: Option<String>,
    pub mode: Option<String>,
    pub status: Option<String>,
    pub regions: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Canonical RFC 3339 UTC timestamp, or `None` when unparseable.
    pub start_date: Option<String>,
    /// Canonical RFC 3339 UTC timestamp; defaults to "now" when the raw
    /// value was missing entirely, `None` when present but unparseable.
    pub end_date: Option<String>,
    /// Assigned by image enrichment; absent until that step runs.
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// A normalized course, one per raw row. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Source row id.
    pub index: String,
    pub category: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Lower-cased tags, or absent.
    pub languages: Option<Vec<String>>,
    pub level: Option<Vec<String>>,
    pub content_type: Option<Vec<String>>,
    /// Lower-cased single tag, or absent.
    pub content_language: Option<String>,
    /// Web tags, possibly empty but always present.
    pub tags: Vec<String>,
    /// `tags` plus the index-only tags, order preserved, duplicates allowed.
    pub full_tags: Vec<String>,
    /// Raw URL string, or the fallback literal `"#"`.
    pub link: String,
}

// ---------------------------------------------------------------------------
// ContentSnapshot
// ---------------------------------------------------------------------------

/// The published content snapshot: enriched, chronologically ordered events
/// plus the derived facet sets.
///
/// Built once per process on the first content request; later requests get
/// the same instance unchanged. Facet vectors are deduplicated with an
/// arbitrary-but-stable order — consumers may rely on membership only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    pub events: Vec<Event>,
    pub topics: Vec<String>,
    pub types: Vec<String>,
    pub regions: Vec<String>,
    pub countries: Vec<String>,
    pub cities: Vec<String>,
    pub modes: Vec<String>,
    pub website_category: Vec<String>,
}
