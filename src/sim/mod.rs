//! Headless physics simulation
//!
//! The simulator replays a throw (launch angle, power, recorded inputs)
//! against a level at a fixed 60 fps timestep and reports what happened.
//! `mechanics` holds the per-throw runtime state of each prop, `simulate`
//! the frame loop, and `search` the hill-climbing input optimizer used to
//! validate that a generated level is beatable.

pub mod mechanics;
pub mod search;
pub mod simulate;

pub use mechanics::{
    ActiveHazard, ActivePortal, ActiveSpring, ActiveWindZone, ActiveWell, FrictionStrip,
    PortalSide,
};
pub use search::{SearchOutcome, find_optimal_inputs};
pub use simulate::{PhysicsSimulator, SimulationConfig, SimulationResult};
