//! Per-throw runtime state for level props
//!
//! Placements are immutable level data; each simulated throw builds these
//! runtime mirrors fresh, so cooldowns, breakage, and usage flags never leak
//! between throws or back into the level.

use glam::Vec2;

use crate::level::{
    CycleTiming, FrictionKind, FrictionZonePlacement, GravityWellKind, GravityWellPlacement,
    HazardPlacement, MotionPattern, PortalPair, SpringPlacement, WindZonePlacement,
};

const SPRING_RADIUS: f32 = 18.0;
const SPRING_FORCE: f32 = 10.0;
/// Hitbox is slightly wider than the collision circle so the sprite reads
/// as solid
const SPRING_HITBOX_MULT: f32 = 1.1;
const PORTAL_RADIUS: f32 = 18.0;
const HAZARD_RADIUS: f32 = 15.0;

fn timing_active(timing: Option<&CycleTiming>, time_ms: f32) -> bool {
    timing.map_or(true, |t| t.active_at(time_ms))
}

/// One spring, with its single-use and breakable bookkeeping
#[derive(Debug, Clone)]
pub struct ActiveSpring {
    pub pos: Vec2,
    pub radius: f32,
    pub force: f32,
    direction: Vec2,
    timing: Option<CycleTiming>,
    breakable: bool,
    pub used_this_throw: bool,
    pub broken: bool,
}

impl ActiveSpring {
    pub fn from_placement(p: &SpringPlacement) -> Self {
        let scale = p.scale.unwrap_or(1.0);
        let (dx, dy) = p.direction.vector();
        Self {
            pos: Vec2::new(p.x, p.y),
            radius: SPRING_RADIUS * scale,
            force: SPRING_FORCE * p.strength,
            direction: Vec2::new(dx, dy),
            timing: p.timing,
            breakable: p.breakable,
            used_this_throw: false,
            broken: false,
        }
    }

    pub fn is_active(&self, time_ms: f32) -> bool {
        !self.used_this_throw && !self.broken && timing_active(self.timing.as_ref(), time_ms)
    }

    pub fn collides(&self, pos: Vec2, time_ms: f32) -> bool {
        self.is_active(time_ms) && pos.distance(self.pos) < self.radius * SPRING_HITBOX_MULT
    }

    /// Fire the spring into the velocity and consume it for this throw
    pub fn apply_impulse(&mut self, velocity: &mut Vec2) {
        *velocity += self.direction * self.force;
        self.used_this_throw = true;
        if self.breakable {
            self.broken = true;
        }
    }
}

/// Which endpoint of a pair the projectile entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalSide {
    Entry,
    Exit,
}

/// One portal pair. Each pair fires at most once per throw, independently
/// of any other pair in the level.
#[derive(Debug, Clone)]
pub struct ActivePortal {
    entry: Vec2,
    exit: Vec2,
    radius: f32,
    exit_direction: Vec2,
    exit_speed: f32,
    timing: Option<CycleTiming>,
    pub used_this_throw: bool,
}

impl ActivePortal {
    pub fn from_pair(pair: &PortalPair) -> Self {
        let (dx, dy) = pair.exit_direction.vector();
        Self {
            entry: Vec2::new(pair.entry.x, pair.entry.y),
            exit: Vec2::new(pair.exit.x, pair.exit.y),
            radius: PORTAL_RADIUS,
            exit_direction: Vec2::new(dx, dy),
            exit_speed: pair.exit_speed,
            timing: pair.timing,
            used_this_throw: false,
        }
    }

    pub fn entry_side(&self, pos: Vec2, time_ms: f32) -> Option<PortalSide> {
        if self.used_this_throw || !timing_active(self.timing.as_ref(), time_ms) {
            return None;
        }
        if pos.distance(self.entry) < self.radius {
            Some(PortalSide::Entry)
        } else if pos.distance(self.exit) < self.radius {
            Some(PortalSide::Exit)
        } else {
            None
        }
    }

    /// Move the projectile to the opposite endpoint. Exit speed is the entry
    /// speed scaled by the pair's factor; the exit direction comes from the
    /// pair, mirrored horizontally when the projectile was moving left.
    pub fn teleport(&mut self, side: PortalSide, pos: &mut Vec2, velocity: &mut Vec2) {
        *pos = match side {
            PortalSide::Entry => self.exit,
            PortalSide::Exit => self.entry,
        };

        let speed = velocity.length() * self.exit_speed;
        let sign = if velocity.x < 0.0 { -1.0 } else { 1.0 };
        *velocity = Vec2::new(self.exit_direction.x * sign, self.exit_direction.y) * speed;

        self.used_this_throw = true;
    }
}

/// One hazard, with its motion phase
#[derive(Debug, Clone)]
pub struct ActiveHazard {
    base: Vec2,
    pub current: Vec2,
    pub radius: f32,
    motion: MotionPattern,
    phase: f32,
}

impl ActiveHazard {
    pub fn from_placement(p: &HazardPlacement) -> Self {
        let scale = p.scale.unwrap_or(1.0);
        Self {
            base: Vec2::new(p.x, p.y),
            current: Vec2::new(p.x, p.y),
            radius: p.radius.unwrap_or(HAZARD_RADIUS) * scale,
            motion: p.motion.unwrap_or(MotionPattern::Static),
            phase: 0.0,
        }
    }

    /// Advance the motion phase and recompute the position
    pub fn update(&mut self, delta_ms: f32) {
        let speed = match self.motion {
            MotionPattern::Static => return,
            MotionPattern::Linear { speed, .. } | MotionPattern::Circular { speed, .. } => speed,
        };
        self.phase = (self.phase + (delta_ms / 1000.0) * (speed / 60.0)).rem_euclid(1.0);

        let angle = self.phase * std::f32::consts::TAU;
        match self.motion {
            MotionPattern::Static => {}
            MotionPattern::Linear { axis, range, .. } => {
                let offset = angle.sin() * range;
                self.current = match axis {
                    crate::level::Axis::X => self.base + Vec2::new(offset, 0.0),
                    crate::level::Axis::Y => self.base + Vec2::new(0.0, offset),
                };
            }
            MotionPattern::Circular { radius, .. } => {
                self.current = self.base + Vec2::new(angle.cos(), angle.sin()) * radius;
            }
        }
    }

    pub fn hits(&self, pos: Vec2) -> bool {
        pos.distance(self.current) < self.radius
    }
}

/// Circular constant-force region
#[derive(Debug, Clone)]
pub struct ActiveWindZone {
    center: Vec2,
    radius_sq: f32,
    force: Vec2,
}

impl ActiveWindZone {
    pub fn from_placement(p: &WindZonePlacement) -> Self {
        Self {
            center: Vec2::new(p.x, p.y),
            radius_sq: p.radius * p.radius,
            force: Vec2::new(p.angle.cos(), p.angle.sin()) * p.strength,
        }
    }

    pub fn force_at(&self, pos: Vec2) -> Option<Vec2> {
        (pos.distance_squared(self.center) <= self.radius_sq).then_some(self.force)
    }
}

/// Radial force field, inverse-linear falloff from center to rim
#[derive(Debug, Clone)]
pub struct ActiveWell {
    center: Vec2,
    radius: f32,
    strength: f32,
    sign: f32,
}

impl ActiveWell {
    pub fn from_placement(p: &GravityWellPlacement) -> Self {
        Self {
            center: Vec2::new(p.x, p.y),
            radius: p.radius,
            strength: p.strength,
            sign: match p.kind {
                GravityWellKind::Attract => 1.0,
                GravityWellKind::Repel => -1.0,
            },
        }
    }

    pub fn force_at(&self, pos: Vec2) -> Option<Vec2> {
        let offset = self.center - pos;
        let distance = offset.length();
        if distance == 0.0 || distance >= self.radius {
            return None;
        }
        let falloff = 1.0 - distance / self.radius;
        Some(offset / distance * self.strength * falloff * self.sign)
    }
}

/// Ground strip that scales slide friction
#[derive(Debug, Clone)]
pub struct FrictionStrip {
    x: f32,
    width: f32,
    multiplier: f32,
}

impl FrictionStrip {
    pub fn from_placement(p: &FrictionZonePlacement) -> Self {
        let default = match p.kind {
            FrictionKind::Ice => 0.2,
            FrictionKind::Sticky => 3.0,
        };
        Self {
            x: p.x,
            width: p.width,
            multiplier: p.strength.unwrap_or(default),
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        (x - self.x).abs() <= self.width / 2.0
    }
}

/// Slide friction at `x`, with any covering strip's multiplier applied to
/// the grip (velocity lost per frame) rather than the friction factor
pub fn slide_friction(base: f32, x: f32, strips: &[FrictionStrip]) -> f32 {
    let Some(strip) = strips.iter().find(|s| s.contains(x)) else {
        return base;
    };
    let grip = 1.0 - base;
    (1.0 - grip * strip.multiplier).clamp(0.5, 0.999)
}
