//! Static artifact emission for the published content.
//!
//! Two JSON artifacts leave the pipeline: `courses.json` (the static course
//! listing) and `content.json` (the published snapshot for downstream
//! consumption). Writes are atomic — content goes to a temp file first, then
//! renames into place — and each write reports a checksum for the manifest
//! of whatever publishes these files further.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use sitefeed_shared::{ContentSnapshot, Course, Result, SitefeedError};

/// File name of the course artifact.
pub const COURSES_ARTIFACT: &str = "courses.json";

/// File name of the content snapshot artifact.
pub const SNAPSHOT_ARTIFACT: &str = "content.json";

/// Metadata for one written artifact file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write the ordered course sequence as `courses.json` under `out_dir`.
pub fn write_courses_json(out_dir: &Path, courses: &[Course]) -> Result<ArtifactMeta> {
    let meta = write_artifact(out_dir, COURSES_ARTIFACT, courses)?;
    info!(count = courses.len(), file = %meta.filename, "course artifact written");
    Ok(meta)
}

/// Write the content snapshot as `content.json` under `out_dir`.
pub fn write_snapshot_json(out_dir: &Path, snapshot: &ContentSnapshot) -> Result<ArtifactMeta> {
    let meta = write_artifact(out_dir, SNAPSHOT_ARTIFACT, snapshot)?;
    info!(events = snapshot.events.len(), file = %meta.filename, "snapshot artifact written");
    Ok(meta)
}

/// Serialize `data` pretty-printed and write it atomically.
fn write_artifact<T: serde::Serialize + ?Sized>(
    out_dir: &Path,
    filename: &str,
    data: &T,
) -> Result<ArtifactMeta> {
    std::fs::create_dir_all(out_dir).map_err(|e| SitefeedError::io(out_dir, e))?;

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| SitefeedError::Serialize(format!("{filename}: {e}")))?;

    let target = out_dir.join(filename);
    let temp = out_dir.join(format!(".{filename}.tmp"));

    // Write to temp file first, then atomic rename.
    std::fs::write(&temp, &json).map_err(|e| SitefeedError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| SitefeedError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    debug!(file = %filename, size = json.len(), "wrote artifact");

    Ok(ArtifactMeta {
        filename: filename.to_string(),
        sha256: hash,
        size_bytes: json.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
