pub mod action_log;
pub mod chart;

pub use action_log::ActionLogger;
pub use chart::{ChartArtifact, ChartRenderer, TextChart};
