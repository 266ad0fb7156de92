//! Events in the sky: rising and setting, conjunctions, seasons and lunar phases

pub mod conjunctions;
pub mod phases;
pub mod riseset;
pub mod seasons;

pub use conjunctions::{
    find_mutual_conjunctions, scan_conjunctions, Conjunction, ConjunctionSample, PassDirection,
};
pub use phases::{phase_instant, phases_between, LunarPhase, PhaseEvent};
pub use riseset::{
    rise_transit_set, RiseTransitSet, SampleGrid, VisibilityState, STANDARD_ALTITUDE,
};
pub use seasons::{season_instant, seasons, Season};
