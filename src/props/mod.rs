//! Mechanic placement policy
//!
//! Decides where springs, portals, hazards, wind zones, and gravity wells go
//! relative to the doodle path, and which of them a level is allowed to use
//! at all (the unlock schedule).

pub mod connector;
pub mod placer;
pub mod populator;
pub mod unlocks;

pub use connector::{ConnectionResult, connect_strokes};
pub use placer::{
    PropPlacementResult, blocks_doodles, find_spring_positions, place_hazards,
    place_props_for_trajectory, strip_unused_props,
};
pub use populator::{PopulateOptions, StrokeOverlay, populate_stroke_with_coins, populate_strokes};
pub use unlocks::{PropKind, PropVariant, available_props, is_unlocked, newly_unlocked_prop};
