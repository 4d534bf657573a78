//! Body-weight history.
//!
//! The ledger holds at most one entry per calendar date, sorted by date.
//! Logging a second weight for a date replaces the first.

use crate::store::{self, KeyValueStore, WEIGHT_HISTORY_KEY};
use crate::{CalendarZone, Error, Result, WeightLogEntry};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

/// Number of entries shown in the trend chart unless configured otherwise
pub const DEFAULT_TREND_WINDOW: usize = 10;

/// Where the user stands relative to their first logged weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightTrend {
    pub current: f64,
    pub start: f64,
    /// `current - start`; negative means weight was lost
    pub change: f64,
}

impl WeightTrend {
    pub fn is_loss(&self) -> bool {
        self.change < 0.0
    }
}

pub struct WeightLedger<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> WeightLedger<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// The full ledger, oldest first
    pub fn entries(&self) -> Result<Vec<WeightLogEntry>> {
        let stored: Vec<WeightLogEntry> =
            store::load_or_default(&*self.store, WEIGHT_HISTORY_KEY)?;
        Ok(normalize(stored))
    }

    /// Log `weight` for `date`, replacing any entry already on that date
    pub fn add_entry(&mut self, weight: f64, date: NaiveDate) -> Result<Vec<WeightLogEntry>> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "weight must be a positive number, got {}",
                weight
            )));
        }

        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|entry| entry.date != date);
        if entries.len() != before {
            tracing::info!("Replacing existing weight entry for {}", date);
        }

        entries.push(WeightLogEntry { date, weight });
        entries.sort_by_key(|entry| entry.date);

        store::save(&mut *self.store, WEIGHT_HISTORY_KEY, &entries)?;
        tracing::debug!("Logged {} kg for {} ({} entries)", weight, date, entries.len());
        Ok(entries)
    }

    /// Log `weight` for the calendar date of `now`
    pub fn add_entry_today(
        &mut self,
        weight: f64,
        now: DateTime<Utc>,
        zone: CalendarZone,
    ) -> Result<Vec<WeightLogEntry>> {
        self.add_entry(weight, zone.date_of(now))
    }

    /// The most recent `n` entries, oldest first
    pub fn window(&self, n: usize) -> Result<Vec<WeightLogEntry>> {
        let entries = self.entries()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }

    pub fn trend(&self) -> Result<Option<WeightTrend>> {
        Ok(trend_of(&self.entries()?))
    }
}

/// Trend across a ledger; `None` when it is empty
pub fn trend_of(entries: &[WeightLogEntry]) -> Option<WeightTrend> {
    let first = entries.first()?;
    let last = entries.last()?;
    Some(WeightTrend {
        current: last.weight,
        start: first.weight,
        change: last.weight - first.weight,
    })
}

/// Restore the ledger invariant on data that may have been edited by hand:
/// sort by date and keep the last entry seen for each date.
fn normalize(mut entries: Vec<WeightLogEntry>) -> Vec<WeightLogEntry> {
    let sorted = entries.windows(2).all(|pair| pair[0].date < pair[1].date);
    if sorted {
        return entries;
    }

    tracing::warn!("Stored weight history was out of order or duplicated; normalizing");
    // Stable sort keeps insertion order within a date, so the last one wins.
    entries.sort_by_key(|entry| entry.date);
    let mut normalized: Vec<WeightLogEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match normalized.last_mut() {
            Some(previous) if previous.date == entry.date => *previous = entry,
            _ => normalized.push(entry),
        }
    }
    normalized
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    weight: f64,
}

/// Write the ledger as `date,weight` CSV, replacing `path`
///
/// Returns the number of rows written.
pub fn export_csv(entries: &[WeightLogEntry], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    for entry in entries {
        writer.serialize(CsvRow {
            date: entry.date.to_string(),
            weight: entry.weight,
        })?;
    }
    writer.flush()?;

    tracing::info!("Exported {} weight entries to {:?}", entries.len(), path);
    Ok(entries.len())
}
