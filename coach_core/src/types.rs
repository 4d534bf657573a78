//! Core domain types for the Fitcoach system.
//!
//! This module defines the fundamental types used throughout the system:
//! - The user profile sent to the plan generator
//! - The generated plan (workout days, exercises, diet days, meals)
//! - Visit statistics and weight log entries kept across launches
//! - The calendar zone used to turn instants into calendar dates

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Profile
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Goal {
    #[serde(rename = "Lose Weight")]
    LoseWeight,
    #[serde(rename = "Build Muscle")]
    BuildMuscle,
    #[serde(rename = "Maintain Fitness")]
    Maintain,
    #[serde(rename = "Improve Endurance")]
    ImproveEndurance,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    #[serde(rename = "Lightly Active")]
    Light,
    #[serde(rename = "Moderately Active")]
    Moderate,
    #[serde(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Extra Active")]
    ExtraActive,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Equipment {
    #[serde(rename = "No Equipment")]
    None,
    Dumbbells,
    #[serde(rename = "Home Gym")]
    HomeGym,
    #[serde(rename = "Commercial Gym")]
    FullGym,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DietPreference {
    #[serde(rename = "None")]
    NoRestriction,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    #[serde(rename = "Gluten Free")]
    GlutenFree,
}

/// Everything the plan generator needs to know about the user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,
    /// Centimetres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub gender: Gender,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub equipment: Equipment,
    pub diet_preference: DietPreference,
    #[serde(default)]
    pub allergies: String,
}

// ============================================================================
// Generated Plan
// ============================================================================

/// A single prescribed exercise. Sets and reps are free text ("3", "8-12").
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps: String,
    #[serde(default)]
    pub notes: String,
}

/// One day of the workout plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub day_name: String,
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub rest_day: bool,
}

impl WorkoutDay {
    /// Exercises to perform; a rest day has none regardless of what the
    /// generator put in the list.
    pub fn scheduled_exercises(&self) -> &[Exercise] {
        if self.rest_day {
            &[]
        } else {
            &self.exercises
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snack: Meal,
}

impl Meals {
    /// Meals in serving order, labelled
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Meal)> {
        [
            ("Breakfast", &self.breakfast),
            ("Lunch", &self.lunch),
            ("Dinner", &self.dinner),
            ("Snack", &self.snack),
        ]
        .into_iter()
    }
}

/// One day of the diet plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietDay {
    pub day_name: String,
    pub meals: Meals,
    pub total_calories: f64,
}

/// The generator's output: a week of training and eating
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FitnessPlan {
    pub summary: String,
    pub workout_plan: Vec<WorkoutDay>,
    pub diet_plan: Vec<DietDay>,
    #[serde(default)]
    pub tips: Vec<String>,
}

// ============================================================================
// Progress Tracking
// ============================================================================

/// Engagement statistics, updated once per launch
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    #[serde(default, alias = "lastVisit")]
    pub last_visit_date: Option<NaiveDate>,
    #[serde(default, alias = "lastVisitTime")]
    pub last_visit_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub total_visits: u32,
}

/// A single body-weight measurement (kilograms) for a calendar date
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightLogEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

// ============================================================================
// Calendar
// ============================================================================

/// Which clock decides where one calendar day ends and the next begins
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarZone {
    #[default]
    Utc,
    Local,
}

impl CalendarZone {
    /// Calendar date of an instant in this zone
    pub fn date_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            CalendarZone::Utc => instant.date_naive(),
            CalendarZone::Local => instant.with_timezone(&Local).date_naive(),
        }
    }
}
