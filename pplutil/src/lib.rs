//! Small utilities shared by every crate in the pplme workspace: logging setup, a hierarchical
//! timer with progress reporting, and number formatting.

pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::prettyprint_usize;

pub mod logger;
mod time;
mod utils;

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
