#![forbid(unsafe_code)]

//! Session and progress engine for the Fitcoach system.
//!
//! This crate provides:
//! - Domain types (profile, plan, visit stats, weight entries)
//! - Guided workout session state machine and its timer
//! - Visit/streak tracking
//! - Weight history ledger
//! - Persistence (key-value store, plan access)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod session;
pub mod ticker;
pub mod guided;
pub mod visits;
pub mod weight;
pub mod plan;
pub mod format;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use session::{Phase, SessionController, SessionSummary};
pub use ticker::{IntervalTicker, ManualTicker, Ticker};
pub use guided::GuidedSession;
pub use visits::VisitTracker;
pub use weight::{WeightLedger, WeightTrend};
pub use plan::{adopt_plan, load_plan, load_profile, ImportedPlan, PlanGenerator};
pub use format::format_clock;
