//! Wizard core
//!
//! - [`dependency`] - which groups are currently eligible
//! - [`steps`] - eligible groups bucketed into ordered steps
//! - [`state`] - the selection map and its free-text bookkeeping
//! - [`selection`] - the mutation rules (exclusivity, toggles, side effects)
//! - [`validation`] - the gate checked before leaving a step

pub mod dependency;
pub mod selection;
pub mod state;
pub mod steps;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use dependency::{ancestors, is_eligible, lineage, valid_groups};
pub use selection::{SelectOutcome, SelectionMachine};
pub use state::SelectionState;
pub use steps::StepPlan;
pub use validation::validate_step;
