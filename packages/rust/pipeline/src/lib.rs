//! The sitefeed content pipeline: normalization, validation, and enrichment.
//!
//! Raw tabular rows come in through a [`RowSource`], flow through the event
//! normalizer and validity filter, feed the facet aggregator and the image
//! enrichment pass, and come out as a process-lifetime cached
//! [`ContentSnapshot`](sitefeed_shared::ContentSnapshot). Courses take their
//! own, stricter path: normalize (hard failure on missing tags) and partition.
//!
//! Everything in this crate is synchronous and deterministic given its
//! inputs; the only suspension points are the fetch calls on the collaborator
//! trait.

pub mod coerce;
pub mod courses;
pub mod enrich;
pub mod facets;
pub mod filter;
pub mod loader;
pub mod normalize;

pub use courses::{normalize_course, order_courses};
pub use enrich::sort_and_assign_images;
pub use facets::{FacetSets, aggregate};
pub use filter::{MAX_EVENT_AGE_DAYS, admit, admitted};
pub use loader::{ContentLoader, RowSource};
pub use normalize::normalize_event;
