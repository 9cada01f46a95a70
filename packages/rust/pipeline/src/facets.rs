//! Facet aggregator: derive the deduplicated categorical sets from the
//! admitted event set in one pass.

use std::collections::BTreeSet;

use tracing::warn;

use sitefeed_shared::Event;

/// The derived facet sets. Deduplicating, with an arbitrary-but-stable
/// (sorted) order on output — consumers may rely on membership only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSets {
    pub topics: BTreeSet<String>,
    pub types: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub modes: BTreeSet<String>,
    pub website_categories: BTreeSet<String>,
}

/// Scan the admitted events once and collect every facet value.
///
/// Each element of `topic` joins the topics set individually. A missing
/// `type` is expected-but-absent and logged by event name; the other facets
/// are silently optional.
pub fn aggregate(events: &[Event]) -> FacetSets {
    let mut facets = FacetSets::default();

    for event in events {
        if let Some(topics) = &event.topic {
            facets.topics.extend(topics.iter().cloned());
        }

        match &event.event_type {
            Some(t) => {
                facets.types.insert(t.clone());
            }
            None => warn!(event = %event.event_name, "event has no type"),
        }

        if let Some(category) = &event.website_category {
            facets.website_categories.insert(category.clone());
        }
        if let Some(mode) = &event.mode {
            facets.modes.insert(mode.clone());
        }
        if let Some(regions) = &event.regions {
            facets.regions.insert(regions.clone());
        }
        if let Some(country) = &event.country {
            facets.countries.insert(country.clone());
        }
        if let Some(city) = &event.city {
            facets.cities.insert(city.clone());
        }
    }

    facets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sitefeed_shared::FALLBACK_LINK;

    fn make_event(name: &str) -> Event {
        Event {
            id: name.to_lowercase(),
            event_name: name.into(),
            marketing_text: None,
            description: None,
            event_link: FALLBACK_LINK.into(),
            topic: None,
            event_type: None,
            website_category: None,
            mode: None,
            status: None,
            regions: None,
            country: None,
            city: None,
            start_date: Some("2024-07-01T00:00:00.000Z".into()),
            end_date: Some("2024-07-02T00:00:00.000Z".into()),
            image_url: None,
        }
    }

    #[test]
    fn collects_topic_elements_individually() {
        let mut a = make_event("A");
        a.topic = Some(vec!["Rust".into(), "Systems".into()]);
        let mut b = make_event("B");
        b.topic = Some(vec!["Rust".into()]);

        let facets = aggregate(&[a, b]);
        assert_eq!(
            facets.topics.iter().cloned().collect::<Vec<_>>(),
            vec!["Rust".to_string(), "Systems".to_string()]
        );
    }

    #[test]
    fn deduplicates_every_set() {
        let mut a = make_event("A");
        a.event_type = Some("Conference".into());
        a.country = Some("Germany".into());
        a.city = Some("Berlin".into());
        let mut b = make_event("B");
        b.event_type = Some("Conference".into());
        b.country = Some("Germany".into());
        b.city = Some("Munich".into());

        let facets = aggregate(&[a, b]);
        assert_eq!(facets.types.len(), 1);
        assert_eq!(facets.countries.len(), 1);
        assert_eq!(facets.cities.len(), 2);
    }

    #[test]
    fn absent_optional_facets_add_nothing() {
        let facets = aggregate(&[make_event("Sparse")]);
        assert!(facets.topics.is_empty());
        assert!(facets.types.is_empty());
        assert!(facets.regions.is_empty());
        assert!(facets.countries.is_empty());
        assert!(facets.cities.is_empty());
        assert!(facets.modes.is_empty());
        assert!(facets.website_categories.is_empty());
    }

    #[test]
    fn gathers_each_facet_kind() {
        let mut event = make_event("Full");
        event.event_type = Some("Workshop".into());
        event.website_category = Some("Learning".into());
        event.mode = Some("Online".into());
        event.regions = Some("EMEA".into());
        event.country = Some("France".into());
        event.city = Some("Paris".into());

        let facets = aggregate(&[event]);
        assert!(facets.types.contains("Workshop"));
        assert!(facets.website_categories.contains("Learning"));
        assert!(facets.modes.contains("Online"));
        assert!(facets.regions.contains("EMEA"));
        assert!(facets.countries.contains("France"));
        assert!(facets.cities.contains("Paris"));
    }
}
