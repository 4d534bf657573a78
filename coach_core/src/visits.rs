//! Daily visit and streak tracking.
//!
//! Called once per launch. Any number of launches on the same calendar day
//! count as a single visit; only the check-in timestamp moves.

use crate::store::{self, KeyValueStore, VISITS_KEY};
use crate::{CalendarZone, Result, VisitStats};
use chrono::{DateTime, Utc};

pub struct VisitTracker<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    zone: CalendarZone,
}

impl<'a, S: KeyValueStore + ?Sized> VisitTracker<'a, S> {
    pub fn new(store: &'a mut S, zone: CalendarZone) -> Self {
        Self { store, zone }
    }

    /// Current stats without recording anything
    pub fn stats(&self) -> Result<VisitStats> {
        store::load_or_default(&*self.store, VISITS_KEY)
    }

    /// Record a launch at `now` and return the updated stats
    ///
    /// - same calendar day as the last visit: streak and total unchanged
    /// - the day after the last visit: streak grows by one
    /// - anything else (first visit, a gap, a clock that went backwards):
    ///   streak restarts at 1
    ///
    /// The check-in timestamp is updated on every call.
    pub fn record_visit(&mut self, now: DateTime<Utc>) -> Result<VisitStats> {
        let mut stats = self.stats()?;
        let today = self.zone.date_of(now);

        if stats.last_visit_date != Some(today) {
            let yesterday = today.pred_opt();
            if stats.last_visit_date.is_some() && stats.last_visit_date == yesterday {
                stats.streak += 1;
            } else {
                if let Some(last) = stats.last_visit_date {
                    tracing::info!("Streak reset: last visit {}, today {}", last, today);
                }
                stats.streak = 1;
            }
            stats.total_visits += 1;
            stats.last_visit_date = Some(today);
        }

        stats.last_visit_timestamp = Some(now);

        store::save(&mut *self.store, VISITS_KEY, &stats)?;
        tracing::debug!(
            "Recorded visit on {}: streak {}, total {}",
            today,
            stats.streak,
            stats.total_visits
        );
        Ok(stats)
    }
}
