use chrono::{DateTime, Timelike, Utc};
use tracing::debug;

use crate::services::{ChangeCategory, ChangeTracker};

/// Upstream changes that make a row's content stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeTrigger {
    LibraryUpdated,
    MoviePlayback,
    TvPlayback,
    FavoriteUpdate,
    GuideNeedsLoad,
}

impl ChangeTrigger {
    /// Timestamped category this trigger compares against, if any.
    pub fn category(&self) -> Option<ChangeCategory> {
        match self {
            ChangeTrigger::LibraryUpdated => Some(ChangeCategory::LibraryUpdated),
            ChangeTrigger::MoviePlayback => Some(ChangeCategory::MoviePlayback),
            ChangeTrigger::TvPlayback => Some(ChangeCategory::TvPlayback),
            ChangeTrigger::FavoriteUpdate => Some(ChangeCategory::FavoriteUpdate),
            ChangeTrigger::GuideNeedsLoad => None,
        }
    }
}

/// Start of the half-hour guide slot containing `now`.
pub fn guide_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let minute = if now.minute() >= 30 { 30 } else { 0 };
    now.with_minute(minute)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// True when any trigger reports a change the row has not seen yet.
///
/// A row that was never retrieved has nothing to refresh, so timestamp
/// triggers only fire once `last_full_retrieve` is set.
pub async fn needs_re_retrieve(
    triggers: &[ChangeTrigger],
    tracker: &dyn ChangeTracker,
    last_full_retrieve: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let mut needed = false;
    for trigger in triggers {
        let fired = match trigger.category() {
            Some(category) => match (tracker.last_change(category).await, last_full_retrieve) {
                (Some(changed), Some(retrieved)) => changed > retrieved,
                _ => false,
            },
            None => tracker.guide_needs_load(guide_window_start(now)).await,
        };
        if fired {
            debug!("Trigger {:?} fired", trigger);
        }
        needed |= fired;
    }
    needed
}
