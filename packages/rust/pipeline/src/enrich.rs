//! Temporal sort and cyclic image enrichment.
//!
//! The sequencing here is deliberate and order-sensitive:
//! sort descending → assign images by descending index → reverse to
//! ascending. The newest event always draws `pool[0]`, and the published
//! order is chronological oldest-first. Do not collapse the two phases.

use tracing::debug;

use sitefeed_shared::{Event, Result, SitefeedError};

/// Sort the admitted events and assign the rotating image pool.
///
/// With `n` events and a pool of size `k`, the event at descending position
/// `i` (newest first) gets `pool[i % k]`; the returned sequence is ascending
/// by start date. An empty pool is a fatal precondition — no cyclic index can
/// be computed — and aborts event publication.
pub fn sort_and_assign_images(mut events: Vec<Event>, pool: &[String]) -> Result<Vec<Event>> {
    if pool.is_empty() {
        return Err(SitefeedError::Enrichment(
            "enrichment image pool is empty".into(),
        ));
    }

    // Canonical RFC 3339 strings all share one length, so text order is
    // chronological order. Assumed, not verified.
    events.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    for (i, event) in events.iter_mut().enumerate() {
        event.image_url = Some(pool[i % pool.len()].clone());
    }

    events.reverse();

    debug!(events = events.len(), pool = pool.len(), "image enrichment complete");
    Ok(events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sitefeed_shared::FALLBACK_LINK;

    fn make_event(name: &str, start: &str) -> Event {
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
            start_date: Some(start.into()),
            end_date: Some(start.into()),
            image_url: None,
        }
    }

    fn pool(refs: &[&str]) -> Vec<String> {
        refs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn newest_event_draws_pool_start_published_order_ascending() {
        // The worked example: descending order is [B, A]; B gets img0,
        // A gets img1; after reversal the published order is [A, B].
        let a = make_event("A", "2024-01-01T00:00:00.000Z");
        let b = make_event("B", "2024-03-01T00:00:00.000Z");

        let published =
            sort_and_assign_images(vec![a, b], &pool(&["img0", "img1"])).unwrap();

        assert_eq!(published[0].event_name, "A");
        assert_eq!(published[0].image_url.as_deref(), Some("img1"));
        assert_eq!(published[1].event_name, "B");
        assert_eq!(published[1].image_url.as_deref(), Some("img0"));
    }

    #[test]
    fn pool_wraps_cyclically() {
        let events: Vec<Event> = (1..=5)
            .map(|d| make_event(&format!("E{d}"), &format!("2024-01-0{d}T00:00:00.000Z")))
            .collect();

        let published = sort_and_assign_images(events, &pool(&["x", "y"])).unwrap();

        // Published ascending: the i-th (oldest-first) of n gets pool[(n-1-i) % k].
        let n = published.len();
        let expected = ["x", "y"];
        for (i, event) in published.iter().enumerate() {
            assert_eq!(
                event.image_url.as_deref(),
                Some(expected[(n - 1 - i) % 2]),
                "event at published index {i}"
            );
        }
    }

    #[test]
    fn single_image_pool_assigns_everywhere() {
        let events = vec![
            make_event("A", "2024-01-01T00:00:00.000Z"),
            make_event("B", "2024-02-01T00:00:00.000Z"),
        ];

        let published = sort_and_assign_images(events, &pool(&["only"])).unwrap();
        assert!(published.iter().all(|e| e.image_url.as_deref() == Some("only")));
    }

    #[test]
    fn empty_pool_is_fatal() {
        let events = vec![make_event("A", "2024-01-01T00:00:00.000Z")];
        let err = sort_and_assign_images(events, &[]).unwrap_err();
        assert!(matches!(err, SitefeedError::Enrichment(_)));
    }

    #[test]
    fn empty_event_set_is_fine() {
        let published = sort_and_assign_images(vec![], &pool(&["img"])).unwrap();
        assert!(published.is_empty());
    }
}
