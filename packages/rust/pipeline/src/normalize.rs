//! Event normalizer: one raw row in, one typed [`Event`] out.
//!
//! Never fails. A field that cannot be coerced degrades to its sentinel or
//! absence marker with a warning keyed by the event name, so one bad cell
//! never drops a row here — that is the validity filter's call.

use chrono::Utc;

use sitefeed_shared::{Event, RawRow};

use crate::coerce::{coerce_date, coerce_url, plain_text};

// Field names in the events table.
const F_EVENT_NAME: &str = "Event Name";
const F_MARKETING_TEXT: &str = "Marketing text";
const F_EVENT_LINK: &str = "Event Link";
const F_TOPIC: &str = "Topic";
const F_TYPE: &str = "Type";
const F_WEBSITE_CATEGORY: &str = "Website Category";
const F_MODE: &str = "Mode";
const F_STATUS: &str = "Status";
const F_REGIONS: &str = "Regions";
const F_COUNTRY: &str = "Country";
const F_CITY: &str = "City";
const F_START_DATE: &str = "Start date";
const F_END_DATE: &str = "End date";

/// Map one raw events-table row into an [`Event`].
///
/// Link and date fields go through coercion; everything else is copied
/// verbatim — no trimming, no case changes. `description` is the plain-text
/// rendering of the marketing text, present only when the marketing text is
/// non-empty. A missing end date (as opposed to an unparseable one) defaults
/// to the moment of normalization.
pub fn normalize_event(row: &RawRow) -> Event {
    let event_name = row.text(F_EVENT_NAME).unwrap_or_default();

    let marketing_text = row.text(F_MARKETING_TEXT);
    let description = marketing_text
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(plain_text);

    let event_link = coerce_url(row.text(F_EVENT_LINK).as_deref(), &event_name);

    let start_date = coerce_date(
        row.text(F_START_DATE).as_deref(),
        "start date",
        &event_name,
        None,
    );
    let end_date = coerce_date(
        row.text(F_END_DATE).as_deref(),
        "end date",
        &event_name,
        Some(Utc::now()),
    );

    Event {
        id: row.id.clone(),
        event_name,
        marketing_text,
        description,
        event_link,
        topic: row.text_list(F_TOPIC),
        event_type: row.text(F_TYPE),
        website_category: row.text(F_WEBSITE_CATEGORY),
        mode: row.text(F_MODE),
        status: row.text(F_STATUS),
        regions: row.text(F_REGIONS),
        country: row.text(F_COUNTRY),
        city: row.text(F_CITY),
        start_date,
        end_date,
        image_url: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use serde_json::{Value, json};
    use sitefeed_shared::FALLBACK_LINK;

    fn make_row(fields: Value) -> RawRow {
        RawRow {
            id: "rec001".into(),
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn normalizes_a_full_row() {
        let row = make_row(json!({
            "Event Name": "RustConf",
            "Marketing text": "Join us for **three days** of Rust.",
            "Event Link": "https://rustconf.example.com/2024",
            "Topic": ["Rust", "Systems"],
            "Type": "Conference",
            "Website Category": "Community",
            "Mode": "In person",
            "Status": "Confirmed",
            "Regions": "EMEA",
            "Country": "Germany",
            "City": "Berlin",
            "Start date": "2024-03-01",
            "End date": "2024-03-03",
        }));

        let event = normalize_event(&row);

        assert_eq!(event.id, "rec001");
        assert_eq!(event.event_name, "RustConf");
        assert_eq!(
            event.description.as_deref(),
            Some("Join us for three days of Rust.")
        );
        assert_eq!(event.event_link, "https://rustconf.example.com/2024");
        assert_eq!(event.topic.as_deref(), Some(&["Rust".to_string(), "Systems".to_string()][..]));
        assert_eq!(event.event_type.as_deref(), Some("Conference"));
        assert_eq!(event.start_date.as_deref(), Some("2024-03-01T00:00:00.000Z"));
        assert_eq!(event.end_date.as_deref(), Some("2024-03-03T00:00:00.000Z"));
        assert_eq!(event.image_url, None);
    }

    #[test]
    fn bad_link_degrades_to_fallback() {
        let row = make_row(json!({
            "Event Name": "Meetup",
            "Event Link": "see website",
            "Start date": "2024-05-01",
            "End date": "2024-05-01",
        }));

        let event = normalize_event(&row);
        assert_eq!(event.event_link, FALLBACK_LINK);
        // The rest of the row is unaffected.
        assert_eq!(event.start_date.as_deref(), Some("2024-05-01T00:00:00.000Z"));
    }

    #[test]
    fn missing_marketing_text_means_no_description() {
        let empty = make_row(json!({ "Event Name": "A", "Marketing text": "" }));
        let absent = make_row(json!({ "Event Name": "B" }));

        assert_eq!(normalize_event(&empty).description, None);
        assert_eq!(normalize_event(&absent).description, None);
        // Present-but-empty marketing text is still carried verbatim.
        assert_eq!(normalize_event(&empty).marketing_text.as_deref(), Some(""));
        assert_eq!(normalize_event(&absent).marketing_text, None);
    }

    #[test]
    fn missing_end_date_defaults_to_now() {
        let row = make_row(json!({
            "Event Name": "Open ended",
            "Start date": "2024-06-01",
        }));

        let before = Utc::now();
        let event = normalize_event(&row);
        let after = Utc::now();

        let end: DateTime<Utc> = event
            .end_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .expect("defaulted end date parses");
        assert!(end >= before - Duration::seconds(1) && end <= after + Duration::seconds(1));
    }

    #[test]
    fn unparseable_dates_become_absence_markers() {
        let row = make_row(json!({
            "Event Name": "Fuzzy",
            "Start date": "sometime in spring",
            "End date": "eventually",
        }));

        let event = normalize_event(&row);
        assert_eq!(event.start_date, None);
        // Unparseable is distinct from missing: no "now" default applies.
        assert_eq!(event.end_date, None);
    }

    #[test]
    fn optional_facets_stay_absent() {
        let row = make_row(json!({ "Event Name": "Sparse" }));
        let event = normalize_event(&row);

        assert_eq!(event.topic, None);
        assert_eq!(event.event_type, None);
        assert_eq!(event.website_category, None);
        assert_eq!(event.mode, None);
        assert_eq!(event.regions, None);
        assert_eq!(event.country, None);
        assert_eq!(event.city, None);
    }
}
