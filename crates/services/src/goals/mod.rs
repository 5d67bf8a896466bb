mod stats;
mod tracker;

pub use stats::{GoalFilter, GoalStats};
pub use tracker::GoalTracker;
