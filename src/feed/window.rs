// Date-range selection applied before clustering.
//
// A reading session covers one window of the timeline (usually a day).
// Bounds are exclusive on both ends, and promoted posts are dropped unless
// the caller asks for them.

use chrono::{DateTime, NaiveDate, Utc};

use crate::feed::post::Post;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// A window with no bounds; everything passes.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The calendar day `day` in UTC. The start is moved back one second so
    /// the exclusive bound still admits midnight.
    pub fn day(day: NaiveDate) -> Self {
        let start = day.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
        let end = day.succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|t| t.and_utc());
        Self {
            start: start.map(|s| s - chrono::Duration::seconds(1)),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at > s) && self.end.map_or(true, |e| at < e)
    }
}

/// Select the posts a session should cluster.
pub fn select<'a>(posts: &'a [Post], window: &DateWindow, include_promoted: bool) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| include_promoted || !p.is_promoted)
        .filter(|p| window.contains(p.created_at))
        .collect()
}
