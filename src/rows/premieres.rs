use chrono::{DateTime, Months, Utc};
use tracing::debug;

use crate::models::BaseItem;

/// Earliest creation date that still counts as a new premiere.
pub fn premiere_cutoff(now: DateTime<Utc>, window_months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(window_months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn is_candidate(item: &BaseItem, cutoff: DateTime<Utc>) -> bool {
    item.is_first_episode()
        && item.date_created.is_none_or(|created| created > cutoff)
        && !item.is_disliked()
}

/// Picks the season premieres worth surfacing from `items`.
///
/// A first episode is dropped when its series already has a different
/// episode queued in `next_up`, and at most one premiere per series is kept,
/// preferring the lowest season number.
pub fn reconcile_premieres(
    items: &[BaseItem],
    next_up: &[BaseItem],
    cutoff: DateTime<Utc>,
) -> Vec<BaseItem> {
    let mut kept: Vec<BaseItem> = Vec::new();

    for item in items {
        if !is_candidate(item, cutoff) {
            continue;
        }

        let queued = item.series_id.as_ref().and_then(|series| {
            next_up
                .iter()
                .find(|up| up.series_id.as_ref() == Some(series))
        });
        if let Some(up) = queued.filter(|up| up.id != item.id) {
            debug!(
                "Skipping premiere of {} because {} is next up",
                item.series_name.as_deref().unwrap_or(&item.name),
                up.name
            );
            continue;
        }

        let existing = item
            .series_id
            .as_ref()
            .and_then(|series| {
                kept.iter()
                    .position(|k| k.series_id.as_ref() == Some(series))
            });

        match existing {
            None => {
                debug!(
                    "Adding new episode 1 to premieres {}",
                    item.series_name.as_deref().unwrap_or(&item.name)
                );
                kept.push(item.clone());
            }
            Some(index) => {
                let replace = matches!(
                    (kept[index].parent_index_number, item.parent_index_number),
                    (Some(kept_season), Some(season)) if kept_season > season
                );
                if replace {
                    debug!(
                        "Replacing with earlier season for {}",
                        item.series_name.as_deref().unwrap_or(&item.name)
                    );
                    kept[index] = item.clone();
                }
            }
        }
    }

    kept
}
