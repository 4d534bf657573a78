//! Access to the generated plan and the profile it came from.
//!
//! Plan generation itself happens elsewhere; this module only defines the
//! [`PlanGenerator`] seam, stores what it returns, and picks days out of it.

use crate::store::{self, KeyValueStore, PLAN_KEY, PROFILE_KEY};
use crate::{DietDay, Error, FitnessPlan, Result, UserProfile, WorkoutDay};
use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;

/// Number of days a generated plan is expected to cover
pub const DAYS_IN_PLAN: usize = 7;

pub const DAY_NAMES: [&str; DAYS_IN_PLAN] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Produces a plan for a profile
pub trait PlanGenerator {
    fn generate(&self, profile: &UserProfile) -> Result<FitnessPlan>;
}

/// A plan that was generated out of band and saved as JSON
pub struct ImportedPlan {
    path: PathBuf,
}

impl ImportedPlan {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlanGenerator for ImportedPlan {
    fn generate(&self, _profile: &UserProfile) -> Result<FitnessPlan> {
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Generation(format!("cannot read {:?}: {}", self.path, e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Generation(format!("{:?} is not a plan: {}", self.path, e)))
    }
}

/// Generate a plan for `profile` and persist both
///
/// On failure nothing is written and the single generation error is
/// returned; there is no retry.
pub fn adopt_plan<S, G>(store: &mut S, generator: &G, profile: &UserProfile) -> Result<FitnessPlan>
where
    S: KeyValueStore + ?Sized,
    G: PlanGenerator + ?Sized,
{
    let plan = match generator.generate(profile) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("Plan generation failed: {}", e);
            return Err(match e {
                Error::Generation(msg) => Error::Generation(msg),
                other => Error::Generation(other.to_string()),
            });
        }
    };

    if plan.workout_plan.len() != DAYS_IN_PLAN || plan.diet_plan.len() != DAYS_IN_PLAN {
        tracing::warn!(
            "Generated plan covers {} workout / {} diet days; days will wrap",
            plan.workout_plan.len(),
            plan.diet_plan.len()
        );
    }

    store::save(store, PLAN_KEY, &plan)?;
    store::save(store, PROFILE_KEY, profile)?;
    tracing::info!("Adopted new plan ({} tips)", plan.tips.len());
    Ok(plan)
}

pub fn load_plan<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<FitnessPlan>> {
    store::load_optional(store, PLAN_KEY)
}

pub fn load_profile<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<UserProfile>> {
    store::load_optional(store, PROFILE_KEY)
}

/// Start over: forget the plan and profile
///
/// Weight history and visit statistics belong to the user rather than to
/// a plan, so they are kept.
pub fn reset<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    store.remove(PLAN_KEY)?;
    store.remove(PROFILE_KEY)?;
    tracing::info!("Cleared plan and profile");
    Ok(())
}

/// Monday = 0 ... Sunday = 6
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Wrap-around day selection
///
/// Plans are indexed by weekday, but a generator may return fewer than
/// seven days. Any index is taken modulo the number of days available, so
/// a short plan repeats rather than running out. Only an empty list yields
/// `None`.
fn wrapped<T>(days: &[T], index: usize) -> Option<&T> {
    if days.is_empty() {
        return None;
    }
    days.get(index % days.len())
}

impl FitnessPlan {
    pub fn workout_day(&self, index: usize) -> Option<&WorkoutDay> {
        wrapped(&self.workout_plan, index)
    }

    pub fn diet_day(&self, index: usize) -> Option<&DietDay> {
        wrapped(&self.diet_plan, index)
    }
}
