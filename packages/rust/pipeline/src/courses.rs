//! Course pipeline: normalize course rows and order them for publication.
//!
//! Courses come from a stricter upstream schema than events: a missing
//! required tag field is a hard failure that aborts the whole course load,
//! not a per-record skip.

use sitefeed_shared::{Course, FALLBACK_LINK, RawRow, Result, SitefeedError};

// Field names in the courses table.
const F_CATEGORY: &str = "Category";
const F_TITLE: &str = "Title";
const F_BODY: &str = "Body";
const F_LANGUAGES: &str = "Languages";
const F_LEVEL: &str = "Level";
const F_CONTENT_TYPE: &str = "Content type";
const F_CONTENT_LANGUAGE: &str = "Content language";
const F_WEB_TAG: &str = "Web tag";
const F_INDEX_TAG: &str = "Index tag";
const F_LINK: &str = "Link";

/// The category value that sorts ahead of all others.
const COURSE_CATEGORY: &str = "Course";

/// Map one raw courses-table row into a [`Course`].
///
/// Tag-like fields are lower-cased. `full_tags` is the web tags followed by
/// the index-only tags (the latter defaulting to empty when absent,
/// duplicates permitted). The web-tag field itself is required.
pub fn normalize_course(row: &RawRow) -> Result<Course> {
    let tags = row.text_list(F_WEB_TAG).ok_or_else(|| {
        SitefeedError::validation(format!(
            "course {}: missing required field {F_WEB_TAG:?}",
            row.id
        ))
    })?;

    let index_tags = row.text_list(F_INDEX_TAG).unwrap_or_default();
    let full_tags: Vec<String> = tags.iter().cloned().chain(index_tags).collect();

    Ok(Course {
        index: row.id.clone(),
        category: row.text(F_CATEGORY),
        title: row.text(F_TITLE),
        body: row.text(F_BODY),
        languages: row.text_list(F_LANGUAGES).map(lower_all),
        level: row.text_list(F_LEVEL).map(lower_all),
        content_type: row.text_list(F_CONTENT_TYPE).map(lower_all),
        content_language: row.text(F_CONTENT_LANGUAGE).map(|s| s.to_lowercase()),
        tags,
        full_tags,
        link: row.text(F_LINK).unwrap_or_else(|| FALLBACK_LINK.into()),
    })
}

/// Stable partition: every `category == "Course"` entry precedes every other
/// entry, relative input order preserved within each partition.
///
/// Rows arrive in delivery order and get no other sort — the upstream
/// ordering pass is an identity and stays one.
pub fn order_courses(courses: Vec<Course>) -> Vec<Course> {
    let (course_entries, rest): (Vec<Course>, Vec<Course>) = courses
        .into_iter()
        .partition(|c| c.category.as_deref() == Some(COURSE_CATEGORY));

    course_entries.into_iter().chain(rest).collect()
}

fn lower_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
