//! External collaborators for the sitefeed pipeline: the tabular API client
//! and the enrichment image listing.
//!
//! The pipeline never talks to the network or the filesystem itself — it
//! consumes a [`RowSource`](sitefeed_pipeline::RowSource) and an injected
//! image pool. This crate provides the production implementations of both.

pub mod client;
pub mod images;

pub use client::TableClient;
pub use images::list_enrichment_images;
