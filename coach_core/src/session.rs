//! Guided workout session state machine.
//!
//! A session walks through a day's exercises as a two-phase cycle per
//! exercise: perform the set (`Active`), then rest (`Resting`). The rest
//! after the last exercise is the final rest; advancing out of it completes
//! the session.
//!
//! ```text
//! Active(0) -> Resting(0) -> Active(1) -> ... -> Active(n-1) -> Resting(n) -> Completed
//! ```
//!
//! Time is accumulated by [`SessionController::tick`], which the owner calls
//! once per second (see [`crate::guided`]). Nothing here is persisted.

use crate::{Error, Exercise, Result, WorkoutDay};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    Resting,
    Completed,
}

/// Shown on the "Workout Complete" screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub label: String,
    pub exercise_count: usize,
    pub active_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct SessionController {
    id: Uuid,
    label: String,
    exercises: Vec<Exercise>,
    exercise_index: usize,
    phase: Phase,
    active_seconds: u64,
    rest_seconds: u64,
    paused: bool,
}

impl SessionController {
    /// Start a session over `exercises`
    ///
    /// Fails with [`Error::InvalidInput`] if there is nothing to perform.
    pub fn start(exercises: Vec<Exercise>) -> Result<Self> {
        Self::start_labelled("Workout", exercises)
    }

    /// Start a session for a plan day, labelled with the day's name
    ///
    /// Rest days have no guided session.
    pub fn for_day(day: &WorkoutDay) -> Result<Self> {
        if day.rest_day {
            return Err(Error::InvalidInput(format!(
                "{} is a rest day; there is no workout to run",
                day.day_name
            )));
        }
        Self::start_labelled(&day.day_name, day.scheduled_exercises().to_vec())
    }

    fn start_labelled(label: &str, exercises: Vec<Exercise>) -> Result<Self> {
        if exercises.is_empty() {
            return Err(Error::InvalidInput(
                "cannot start a session without exercises".into(),
            ));
        }

        let session = Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            exercises,
            exercise_index: 0,
            phase: Phase::Active,
            active_seconds: 0,
            rest_seconds: 0,
            paused: false,
        };

        tracing::info!(
            session = %session.id,
            "Started '{}' with {} exercises",
            session.label,
            session.exercises.len()
        );
        Ok(session)
    }

    /// One second has elapsed
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        match self.phase {
            Phase::Active => self.active_seconds += 1,
            Phase::Resting => self.rest_seconds += 1,
            Phase::Completed => {}
        }
    }

    /// The user finished the current set or rest
    pub fn advance(&mut self) {
        let last = self.exercises.len();
        match self.phase {
            Phase::Active => {
                self.phase = Phase::Resting;
                self.rest_seconds = 0;
                if self.exercise_index + 1 == last {
                    self.exercise_index = last;
                }
            }
            Phase::Resting => {
                self.rest_seconds = 0;
                if self.exercise_index == last {
                    self.phase = Phase::Completed;
                    tracing::info!(
                        session = %self.id,
                        "Completed '{}' after {}s active",
                        self.label,
                        self.active_seconds
                    );
                } else {
                    self.exercise_index += 1;
                    self.phase = Phase::Active;
                }
            }
            Phase::Completed => {}
        }
        tracing::debug!(
            session = %self.id,
            "Advanced to {:?} at exercise {}",
            self.phase,
            self.exercise_index
        );
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        tracing::debug!(session = %self.id, paused = self.paused, "Toggled pause");
    }

    /// End the session early; nothing is recorded
    pub fn abort(self) {
        tracing::info!(
            session = %self.id,
            "Aborted '{}' in {:?} at exercise {}",
            self.label,
            self.phase,
            self.exercise_index
        );
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn active_seconds(&self) -> u64 {
        self.active_seconds
    }

    pub fn rest_seconds(&self) -> u64 {
        self.rest_seconds
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// The exercise being performed, only while `Active`
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            Phase::Active => self.exercises.get(self.exercise_index),
            _ => None,
        }
    }

    /// While resting, the exercise the next advance starts; `None` on the final rest
    pub fn upcoming_exercise(&self) -> Option<&Exercise> {
        match self.phase {
            Phase::Resting => self.exercises.get(self.exercise_index + 1),
            _ => None,
        }
    }

    /// The timer a display should show: rest time while resting, otherwise active time
    pub fn displayed_seconds(&self) -> u64 {
        match self.phase {
            Phase::Resting => self.rest_seconds,
            _ => self.active_seconds,
        }
    }

    /// "Exercise 2 of 5" while active
    pub fn position_label(&self) -> Option<String> {
        self.current_exercise().map(|_| {
            format!(
                "Exercise {} of {}",
                self.exercise_index + 1,
                self.exercises.len()
            )
        })
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.is_completed().then(|| SessionSummary {
            label: self.label.clone(),
            exercise_count: self.exercises.len(),
            active_seconds: self.active_seconds,
        })
    }
}
