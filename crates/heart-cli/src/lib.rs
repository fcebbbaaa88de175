//! CLI library components for HeartAlert.

pub mod assess;
pub mod logging;
