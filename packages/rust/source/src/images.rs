//! Enrichment image pool listing.
//!
//! The pipeline takes the pool as an injected ordered list of opaque
//! reference strings; this module produces that list from a directory scan.
//! Emptiness is a pipeline-level precondition checked at enrichment time,
//! not here — an empty directory is a valid (if soon-to-be-fatal) listing.

use std::path::Path;

use tracing::debug;

use sitefeed_shared::{Result, SitefeedError};

/// File extensions admitted into the pool (case-insensitive).
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "svg"];

/// List the enrichment images in `dir` whose file name starts with `prefix`,
/// name-sorted for a deterministic rotation order.
pub fn list_enrichment_images(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SitefeedError::io(dir, e))?;

    let mut names: Vec<String> = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| SitefeedError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(prefix) {
            continue;
        }

        let admitted = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        if admitted {
            names.push(name.to_string());
        }
    }

    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "listed enrichment images");

    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
