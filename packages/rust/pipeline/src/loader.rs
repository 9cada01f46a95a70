//! Content loader: orchestrates the pipeline and owns the process-lifetime
//! snapshot cache.
//!
//! The loader talks to the outside world only through [`RowSource`] and the
//! injected image pool. The first `content()` call runs the full
//! fetch → normalize → filter → aggregate → enrich pass and memoizes the
//! snapshot; every later call in the process gets the same instance back
//! without touching the source. Known staleness trade-off, not a bug.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use sitefeed_shared::{ContentSnapshot, Course, Event, LoadId, RawRow, Result};

use crate::{courses, enrich, facets, filter, normalize};

/// Collaborator interface for the tabular source. Pagination is the
/// implementor's concern — one logical call returns the whole table.
/// Transport failure surfaces as an error and aborts the load.
#[allow(async_fn_in_trait)]
pub trait RowSource {
    async fn fetch_event_rows(&self) -> Result<Vec<RawRow>>;
    async fn fetch_course_rows(&self) -> Result<Vec<RawRow>>;
}

/// Owns the collaborators and the memoized content snapshot.
pub struct ContentLoader<S> {
    source: S,
    image_pool: Vec<String>,
    snapshot: OnceCell<Arc<ContentSnapshot>>,
}

impl<S: RowSource> ContentLoader<S> {
    /// Create a loader over a row source and an ordered enrichment image
    /// pool. Pool emptiness is checked at enrichment time, not here.
    pub fn new(source: S, image_pool: Vec<String>) -> Self {
        Self {
            source,
            image_pool,
            snapshot: OnceCell::new(),
        }
    }

    /// Get-or-compute the published content snapshot.
    ///
    /// Single-flight: concurrent first callers share one pipeline run. A
    /// failed run leaves the cache unpopulated so a later call can retry.
    #[instrument(skip(self))]
    pub async fn content(&self) -> Result<Arc<ContentSnapshot>> {
        let snapshot = self
            .snapshot
            .get_or_try_init(|| self.build_snapshot())
            .await?;
        Ok(Arc::clone(snapshot))
    }

    async fn build_snapshot(&self) -> Result<Arc<ContentSnapshot>> {
        let load_id = LoadId::new();
        let start = Instant::now();
        info!(%load_id, "starting content load");

        let rows = self.source.fetch_event_rows().await?;
        let fetched = rows.len();

        let events: Vec<Event> = rows.iter().map(normalize::normalize_event).collect();
        let admitted = filter::admitted(events, Utc::now());
        let facet_sets = facets::aggregate(&admitted);
        let events = enrich::sort_and_assign_images(admitted, &self.image_pool)?;

        info!(
            %load_id,
            fetched,
            published = events.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "content load complete"
        );

        Ok(Arc::new(ContentSnapshot {
            events,
            topics: facet_sets.topics.into_iter().collect(),
            types: facet_sets.types.into_iter().collect(),
            regions: facet_sets.regions.into_iter().collect(),
            countries: facet_sets.countries.into_iter().collect(),
            cities: facet_sets.cities.into_iter().collect(),
            modes: facet_sets.modes.into_iter().collect(),
            website_category: facet_sets.website_categories.into_iter().collect(),
        }))
    }

    /// Load and order the course set. Never cached, no facet derivation.
    ///
    /// A row missing its required tag field fails the whole operation — no
    /// silent partial publication.
    #[instrument(skip(self))]
    pub async fn load_courses(&self) -> Result<Vec<Course>> {
        let rows = self.source.fetch_course_rows().await?;

        let normalized = rows
            .iter()
            .map(courses::normalize_course)
            .collect::<Result<Vec<Course>>>()?;

        let ordered = courses::order_courses(normalized);
        info!(count = ordered.len(), "course load complete");
        Ok(ordered)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
