//! Flickgen - procedural level generation for a projectile-throw arcade game
//!
//! Core modules:
//! - `random`: Deterministic seeded RNG (mulberry32) with derivable child streams
//! - `glyph`: Stroke-path glyph database, the read-only layout-template input
//! - `classifier`: Shape metrics and archetype classification
//! - `archetype`: Layout archetypes and their coordinate-transform table
//! - `transform`: Glyph-to-canvas stroke transformer
//! - `level`: The generated level artifact and all placement records
//! - `props`: Mechanic placement policy (springs, portals, wind, wells, hazards)
//! - `sim`: Headless physics simulator and hill-climbing input search
//! - `generator`: Orchestration - glyph selection, placement, validation, retries

pub mod archetype;
pub mod classifier;
pub mod generator;
pub mod glyph;
pub mod level;
pub mod props;
pub mod random;
pub mod sim;
pub mod transform;

pub use generator::{BatchResult, GenerationResult, LevelGenerator};
pub use glyph::{CharacterData, GlyphDatabase, StrokePoint};
pub use level::ArcadeLevel;
pub use random::SeededRandom;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 fps headless throw simulation)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Hard frame budget per simulated throw (30 seconds)
    pub const MAX_FRAMES: u32 = 60 * 30;

    /// Doodle placement bounds on the game canvas
    pub const CANVAS_X_MIN: f32 = 50.0;
    pub const CANVAS_X_MAX: f32 = 400.0;
    pub const CANVAS_Y_MIN: f32 = 30.0;
    pub const CANVAS_Y_MAX: f32 = 190.0;
    /// Minimum distance between consecutive doodles
    pub const MIN_DOODLE_SPACING: f32 = 25.0;

    /// World geometry (Y grows downward)
    pub const LAUNCH_PAD_X: f32 = 10.0;
    pub const GROUND_Y: f32 = 220.0;
    pub const CEILING_Y: f32 = 10.0;
    pub const CLIFF_EDGE: f32 = 420.0;

    /// Gravity per frame before air-control multipliers
    pub const BASE_GRAV: f32 = 0.15;
    /// Circular pickup radius for doodle collection
    pub const DOODLE_RADIUS: f32 = 20.0;

    /// Flight model: forward boost per tap, capped
    pub const TAP_VELOCITY_BOOST: f32 = 0.8;
    pub const FLOAT_MAX_VELOCITY: f32 = 4.5;
    /// Gravity multipliers: no input / floating taps / rapid flapping
    pub const HEAVY_GRAVITY_MULT: f32 = 1.2;
    pub const FLOAT_GRAVITY_MULT: f32 = 0.15;
    pub const RAPID_FLAP_GRAVITY: f32 = 0.03;
    /// Tap counting window (ms)
    pub const TAP_WINDOW_MS: f32 = 250.0;
    /// Taps per second that count as a rapid flap
    pub const RAPID_FLAP_TAPS_PER_SEC: f32 = 7.0;
    /// Held frames before a press becomes a brake
    pub const BRAKE_HOLD_FRAMES: u32 = 10;
    pub const BRAKE_FACTOR: f32 = 0.97;

    /// Horizontal damp applied on touchdown
    pub const LANDING_DAMP: f32 = 0.55;
    /// Per-frame slide friction, idle vs held-brake
    pub const SLIDE_FRICTION_IDLE: f32 = 0.96;
    pub const SLIDE_FRICTION_BRAKE: f32 = 0.92;
    /// Slide speed below which the throw counts as stopped
    pub const STOP_SPEED: f32 = 0.1;

    /// Glyph source coordinates are normalized to 0-1000
    pub const GLYPH_SPACE: f32 = 1000.0;

    pub const LEVELS_PER_WORLD: u32 = 10;
}

/// World index (1-based) for a level id
#[inline]
pub fn world_for_level(level: u32) -> u32 {
    level.div_ceil(consts::LEVELS_PER_WORLD).max(1)
}
