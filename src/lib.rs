//! liftwise - Personal strength-training analytics
//!
//! Reads a GymUp workout log and answers the questions a lifter asks:
//! where is my 1RM heading, am I stuck, what should I load next time.

pub mod analytics;
pub mod config;
pub mod db;
pub mod session;

pub use analytics::{Analytics, Confidence, Trend};
pub use config::AnalysisConfig;
pub use db::Database;
pub use session::{SessionRecord, SetRecord};
