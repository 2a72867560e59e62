//! The generated level artifact and all placement records
//!
//! Everything here is plain serializable data. Runtime state (cooldowns,
//! breakage, portal usage) lives in [`crate::sim::mechanics`]; a level is
//! never mutated by simulation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoodleSize {
    Small,
    Medium,
    Large,
}

/// Launch direction of a spring's impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpringDirection {
    Up,
    UpLeft,
    UpRight,
    Down,
}

impl SpringDirection {
    /// Unit impulse direction (Y grows downward)
    pub fn vector(self) -> (f32, f32) {
        const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            SpringDirection::Up => (0.0, -1.0),
            SpringDirection::UpLeft => (-DIAG, -DIAG),
            SpringDirection::UpRight => (DIAG, -DIAG),
            SpringDirection::Down => (0.0, 1.0),
        }
    }
}

/// On/off duty cycle for timed props, all values in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleTiming {
    pub on_duration: f32,
    pub off_duration: f32,
    #[serde(default)]
    pub offset: f32,
}

impl CycleTiming {
    /// Whether the prop is in its active window at simulation time `t` (ms)
    pub fn active_at(&self, t: f32) -> bool {
        let cycle = self.on_duration + self.off_duration;
        if cycle <= 0.0 {
            return true;
        }
        (t + self.offset).rem_euclid(cycle) < self.on_duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Periodic motion applied to a placement's anchor position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MotionPattern {
    Static,
    /// Oscillate along one axis, `range` units either side of the anchor
    Linear { axis: Axis, range: f32, speed: f32 },
    /// Orbit the anchor
    Circular { radius: f32, speed: f32 },
}

impl MotionPattern {
    /// Offset from the anchor at time `t` (seconds)
    pub fn offset_at(&self, t: f32) -> (f32, f32) {
        match *self {
            MotionPattern::Static => (0.0, 0.0),
            MotionPattern::Linear { axis, range, speed } => {
                let d = (t * speed).sin() * range;
                match axis {
                    Axis::X => (d, 0.0),
                    Axis::Y => (0.0, d),
                }
            }
            MotionPattern::Circular { radius, speed } => {
                let phase = t * speed;
                (phase.cos() * radius, phase.sin() * radius)
            }
        }
    }
}

/// A collectible, with its position in the ordered sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoodlePlacement {
    pub x: f32,
    pub y: f32,
    pub size: DoodleSize,
    pub sprite: String,
    /// Position in the collection order, 1-based in generated levels
    pub sequence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionPattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringPlacement {
    pub x: f32,
    pub y: f32,
    pub direction: SpringDirection,
    pub strength: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<CycleTiming>,
    /// A breakable spring fires once and is gone for the rest of the throw
    #[serde(default)]
    pub breakable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

/// Direction the projectile leaves a portal exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortalExitDirection {
    Straight,
    Up45,
    Down45,
}

impl PortalExitDirection {
    /// Unit exit direction for a projectile traveling rightward
    pub fn vector(self) -> (f32, f32) {
        const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            PortalExitDirection::Straight => (1.0, 0.0),
            PortalExitDirection::Up45 => (DIAG, -DIAG),
            PortalExitDirection::Down45 => (DIAG, DIAG),
        }
    }
}

/// A point on the canvas, used for portal endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalEndpoint {
    pub x: f32,
    pub y: f32,
}

/// One entry/exit pair. Pairs are independent; a throw may use each pair
/// at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalPair {
    pub entry: PortalEndpoint,
    pub exit: PortalEndpoint,
    pub exit_direction: PortalExitDirection,
    /// Exit speed as a fraction of entry speed
    pub exit_speed: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<CycleTiming>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardPlacement {
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    pub sprite: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

/// Circular region applying a constant directional force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindZonePlacement {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Direction of the push, radians, 0 = rightward, positive = downward
    pub angle: f32,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityWellKind {
    Attract,
    Repel,
}

/// Radial force field with inverse-linear falloff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravityWellPlacement {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub strength: f32,
    pub kind: GravityWellKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrictionKind {
    Ice,
    Sticky,
}

/// Ground strip that scales slide friction while the projectile slides
/// over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrictionZonePlacement {
    pub x: f32,
    pub width: f32,
    pub kind: FrictionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAction {
    Press,
    Release,
}

/// One recorded input of a ghost replay, timestamp in ms from launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostInput {
    pub timestamp: f32,
    pub action: InputAction,
}

/// A complete generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcadeLevel {
    pub id: u32,
    /// X the projectile must stop at or beyond to land in the zone
    pub landing_target: f32,
    pub doodles: Vec<DoodlePlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub springs: Vec<SpringPlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub portals: Vec<PortalPair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<HazardPlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wind_zones: Vec<WindZonePlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gravity_wells: Vec<GravityWellPlacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friction_zones: Vec<FrictionZonePlacement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> ArcadeLevel {
        ArcadeLevel {
            id: 7,
            landing_target: 410.0,
            doodles: vec![DoodlePlacement {
                x: 120.0,
                y: 100.0,
                size: DoodleSize::Medium,
                sprite: "star".to_string(),
                sequence: 0,
                scale: None,
                motion: Some(MotionPattern::Linear {
                    axis: Axis::Y,
                    range: 15.0,
                    speed: 2.0,
                }),
            }],
            springs: vec![SpringPlacement {
                x: 200.0,
                y: 180.0,
                direction: SpringDirection::UpRight,
                strength: 1.2,
                timing: Some(CycleTiming {
                    on_duration: 1000.0,
                    off_duration: 500.0,
                    offset: 0.0,
                }),
                breakable: true,
                scale: None,
            }],
            portals: vec![PortalPair {
                entry: PortalEndpoint { x: 380.0, y: 100.0 },
                exit: PortalEndpoint { x: 70.0, y: 120.0 },
                exit_direction: PortalExitDirection::Straight,
                exit_speed: 0.8,
                timing: None,
            }],
            hazards: vec![],
            wind_zones: vec![WindZonePlacement {
                x: 250.0,
                y: 100.0,
                radius: 40.0,
                angle: 0.0,
                strength: 0.05,
            }],
            gravity_wells: vec![],
            friction_zones: vec![FrictionZonePlacement {
                x: 300.0,
                width: 60.0,
                kind: FrictionKind::Ice,
                strength: None,
            }],
        }
    }

    #[test]
    fn test_level_json_round_trip() {
        let level = sample_level();
        let json = serde_json::to_string_pretty(&level).unwrap();
        let back: ArcadeLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
        // Empty prop lists are omitted from the wire form
        assert!(!json.contains("hazards"));
        assert!(!json.contains("gravityWells"));
    }

    #[test]
    fn test_cycle_timing_windows() {
        let timing = CycleTiming {
            on_duration: 1000.0,
            off_duration: 500.0,
            offset: 0.0,
        };
        assert!(timing.active_at(0.0));
        assert!(timing.active_at(999.0));
        assert!(!timing.active_at(1000.0));
        assert!(!timing.active_at(1499.0));
        assert!(timing.active_at(1500.0));

        let offset = CycleTiming {
            on_duration: 1000.0,
            off_duration: 500.0,
            offset: 1200.0,
        };
        assert!(!offset.active_at(0.0));
        assert!(offset.active_at(300.0));
    }

    #[test]
    fn test_spring_direction_vectors() {
        let (x, y) = SpringDirection::Up.vector();
        assert_eq!((x, y), (0.0, -1.0));
        let (x, y) = SpringDirection::UpRight.vector();
        assert!(x > 0.0 && y < 0.0);
        assert!((x * x + y * y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_motion_pattern_offsets() {
        assert_eq!(MotionPattern::Static.offset_at(3.7), (0.0, 0.0));

        let linear = MotionPattern::Linear {
            axis: Axis::X,
            range: 20.0,
            speed: 1.0,
        };
        let (dx, dy) = linear.offset_at(std::f32::consts::FRAC_PI_2);
        assert!((dx - 20.0).abs() < 1e-4);
        assert_eq!(dy, 0.0);

        let circular = MotionPattern::Circular {
            radius: 10.0,
            speed: 1.0,
        };
        let (dx, dy) = circular.offset_at(0.0);
        assert!((dx - 10.0).abs() < 1e-4);
        assert!(dy.abs() < 1e-4);
    }
}
