//! Validity filter: decides which normalized events are publishable.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use sitefeed_shared::Event;

/// Events whose end date is older than this many days are aged out.
/// A deliberate approximation of six months, not calendar-accurate.
pub const MAX_EVENT_AGE_DAYS: i64 = 180;

/// Admission rule for one event, short-circuiting on the first failing check:
///
/// 1. no usable start date → reject, logged by event name
/// 2. no usable end date → reject, logged by event name
/// 3. end date strictly before `now − 180 days` → reject silently; aging out
///    is routine lifecycle, not an anomaly
pub fn admit(event: &Event, now: DateTime<Utc>) -> bool {
    if event.start_date.is_none() {
        warn!(event = %event.event_name, "no usable start date, dropping event");
        return false;
    }

    let Some(end) = event
        .end_date
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    else {
        warn!(event = %event.event_name, "no usable end date, dropping event");
        return false;
    };

    end.with_timezone(&Utc) >= now - Duration::days(MAX_EVENT_AGE_DAYS)
}

/// Filter a normalized batch down to the admitted set, order preserved.
pub fn admitted(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
    events.into_iter().filter(|e| admit(e, now)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
