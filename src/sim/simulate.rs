//! Fixed-timestep throw simulation
//!
//! One throw: launch from the pad, fly under tap-controlled gravity, bounce
//! through props, land, slide, stop or fall off the cliff edge. The loop is
//! fully deterministic given the level and the input recording.

use glam::Vec2;

use crate::consts::{
    BASE_GRAV, BRAKE_FACTOR, BRAKE_HOLD_FRAMES, CEILING_Y, CLIFF_EDGE, DOODLE_RADIUS, FLOAT_GRAVITY_MULT,
    FLOAT_MAX_VELOCITY, FRAME_MS, GROUND_Y, HEAVY_GRAVITY_MULT, LANDING_DAMP, LAUNCH_PAD_X,
    MAX_FRAMES, RAPID_FLAP_GRAVITY, RAPID_FLAP_TAPS_PER_SEC, SLIDE_FRICTION_BRAKE,
    SLIDE_FRICTION_IDLE, STOP_SPEED, TAP_VELOCITY_BOOST, TAP_WINDOW_MS,
};
use crate::glyph::StrokePoint;
use crate::level::{ArcadeLevel, GhostInput, InputAction};
use crate::sim::mechanics::{
    ActiveHazard, ActivePortal, ActiveSpring, ActiveWell, ActiveWindZone, FrictionStrip,
    slide_friction,
};

/// One candidate throw: launch parameters plus the input recording
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// Launch angle in degrees above horizontal
    pub launch_angle: f32,
    pub launch_power: f32,
    /// Press/release events sorted by timestamp (ms from launch)
    pub inputs: Vec<GhostInput>,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub success: bool,
    pub trajectory: Vec<StrokePoint>,
    pub final_x: f32,
    pub final_y: f32,
    /// Sequence numbers in collection order
    pub doodles_collected: Vec<u32>,
    pub doodles_in_order: bool,
    /// Indices into the level's spring list
    pub springs_hit: Vec<usize>,
    /// Indices into the level's portal list
    pub portals_used: Vec<usize>,
    pub landed_in_zone: bool,
    pub fell_off: bool,
    pub hit_hazard: bool,
    /// Seconds simulated
    pub air_time: f32,
}

impl SimulationResult {
    /// Fitness of this throw for the input search. Higher is better;
    /// success dominates every partial outcome.
    pub fn score(&self, level: &ArcadeLevel) -> f64 {
        let mut score = self.doodles_collected.len() as f64 * 10.0;
        if self.doodles_in_order {
            score += 20.0;
        }
        if self.landed_in_zone {
            score += 50.0;
        }
        if self.fell_off {
            score -= 100.0;
        }
        if self.hit_hazard {
            score -= 100.0;
        }
        if !self.fell_off {
            let distance = (self.final_x - level.landing_target).abs() as f64;
            score += (20.0 - distance / 5.0).max(0.0);
        }
        score
    }
}

/// True when every element is exactly one above its predecessor
pub(crate) fn sequence_in_order(collected: &[u32]) -> bool {
    collected.windows(2).all(|w| w[1] == w[0] + 1)
}

/// Landing-zone contract: final position at or past the target, short of
/// the cliff edge, and the slide never carried over the edge
pub(crate) fn landed_in_zone(final_x: f32, landing_target: f32, fell_off: bool) -> bool {
    !fell_off && final_x >= landing_target && final_x < CLIFF_EDGE
}

/// Headless physics validator
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsSimulator;

impl PhysicsSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Run one throw against a level
    pub fn simulate(&self, level: &ArcadeLevel, config: &SimulationConfig) -> SimulationResult {
        let mut pos = Vec2::new(LAUNCH_PAD_X, GROUND_Y);
        let angle = config.launch_angle.to_radians();
        let mut vel = Vec2::new(
            angle.cos() * config.launch_power,
            -angle.sin() * config.launch_power,
        );

        let mut trajectory = vec![StrokePoint::new(pos.x, pos.y)];
        let mut doodles_collected = Vec::new();
        let mut springs_hit = Vec::new();
        let mut portals_used = Vec::new();
        let mut flying = true;
        let mut fell_off = false;
        let mut hit_hazard = false;

        let mut springs: Vec<ActiveSpring> =
            level.springs.iter().map(ActiveSpring::from_placement).collect();
        let mut portals: Vec<ActivePortal> =
            level.portals.iter().map(ActivePortal::from_pair).collect();
        let mut hazards: Vec<ActiveHazard> =
            level.hazards.iter().map(ActiveHazard::from_placement).collect();
        let wind: Vec<ActiveWindZone> =
            level.wind_zones.iter().map(ActiveWindZone::from_placement).collect();
        let wells: Vec<ActiveWell> =
            level.gravity_wells.iter().map(ActiveWell::from_placement).collect();
        let strips: Vec<FrictionStrip> =
            level.friction_zones.iter().map(FrictionStrip::from_placement).collect();
        let mut collected = vec![false; level.doodles.len()];

        let mut input_index = 0;
        let mut pressed = false;
        let mut hold_frames: u32 = 0;
        let mut recent_taps: Vec<f32> = Vec::new();

        let mut frame: u32 = 0;
        while frame < MAX_FRAMES {
            let now_ms = frame as f32 * FRAME_MS;

            while input_index < config.inputs.len()
                && config.inputs[input_index].timestamp <= now_ms
            {
                let input = config.inputs[input_index];
                let was_pressed = pressed;
                pressed = input.action == InputAction::Press;

                if pressed && !was_pressed && flying {
                    recent_taps.push(now_ms);
                    if vel.x < FLOAT_MAX_VELOCITY {
                        vel.x = (vel.x + TAP_VELOCITY_BOOST).min(FLOAT_MAX_VELOCITY);
                    }
                }
                if !pressed {
                    hold_frames = 0;
                }
                input_index += 1;
            }
            if pressed {
                hold_frames += 1;
            }

            // Taps fall out of the frequency history after four windows
            while recent_taps
                .first()
                .is_some_and(|&t| now_ms - t > TAP_WINDOW_MS * 4.0)
            {
                recent_taps.remove(0);
            }

            if flying {
                vel.y += BASE_GRAV * gravity_multiplier(&recent_taps, now_ms);

                for zone in &wind {
                    if let Some(force) = zone.force_at(pos) {
                        vel += force;
                    }
                }
                for well in &wells {
                    if let Some(force) = well.force_at(pos) {
                        vel += force;
                    }
                }

                if pressed && hold_frames > BRAKE_HOLD_FRAMES {
                    vel *= BRAKE_FACTOR;
                }

                pos += vel;

                for (i, doodle) in level.doodles.iter().enumerate() {
                    if !collected[i]
                        && pos.distance(Vec2::new(doodle.x, doodle.y)) < DOODLE_RADIUS
                    {
                        collected[i] = true;
                        doodles_collected.push(doodle.sequence);
                    }
                }

                for (i, spring) in springs.iter_mut().enumerate() {
                    if spring.collides(pos, now_ms) {
                        spring.apply_impulse(&mut vel);
                        springs_hit.push(i);
                    }
                }

                for (i, portal) in portals.iter_mut().enumerate() {
                    if let Some(side) = portal.entry_side(pos, now_ms) {
                        portal.teleport(side, &mut pos, &mut vel);
                        portals_used.push(i);
                    }
                }

                for hazard in &mut hazards {
                    hazard.update(FRAME_MS);
                }
                if hazards.iter().any(|h| h.hits(pos)) {
                    hit_hazard = true;
                    break;
                }

                if pos.y >= GROUND_Y {
                    pos.y = GROUND_Y;
                    flying = false;
                    vel.x *= LANDING_DAMP;
                    vel.y = 0.0;
                }
                if pos.y < CEILING_Y {
                    pos.y = CEILING_Y;
                    vel.y = vel.y.max(0.0);
                }
                if pos.x < 0.0 {
                    pos.x = 0.0;
                }

                trajectory.push(StrokePoint::new(pos.x.round(), pos.y.round()));
            } else {
                let base = if pressed && hold_frames > 5 {
                    SLIDE_FRICTION_BRAKE
                } else {
                    SLIDE_FRICTION_IDLE
                };
                vel.x *= slide_friction(base, pos.x, &strips);
                pos.x += vel.x;

                if pos.x >= CLIFF_EDGE {
                    fell_off = true;
                    break;
                }
                if vel.x.abs() < STOP_SPEED {
                    break;
                }
                trajectory.push(StrokePoint::new(pos.x.round(), pos.y.round()));
            }

            frame += 1;
        }

        let all_collected = doodles_collected.len() == level.doodles.len();
        let landed = landed_in_zone(pos.x, level.landing_target, fell_off);
        let doodles_in_order = sequence_in_order(&doodles_collected);

        SimulationResult {
            success: all_collected && landed && !hit_hazard,
            trajectory,
            final_x: pos.x,
            final_y: pos.y,
            doodles_collected,
            doodles_in_order,
            springs_hit,
            portals_used,
            landed_in_zone: landed,
            fell_off,
            hit_hazard,
            air_time: frame as f32 * FRAME_MS / 1000.0,
        }
    }
}

/// Tap-frequency flight model: no taps means heavy gravity, recent taps
/// float, seven or more taps per second nearly cancel gravity
fn gravity_multiplier(recent_taps: &[f32], now_ms: f32) -> f32 {
    let in_window = recent_taps
        .iter()
        .filter(|&&t| now_ms - t < TAP_WINDOW_MS)
        .count();
    if in_window == 0 {
        return HEAVY_GRAVITY_MULT;
    }
    if recent_taps.len() >= 2 {
        let span_sec = (recent_taps[recent_taps.len() - 1] - recent_taps[0]) / 1000.0;
        if span_sec > 0.1 {
            let taps_per_sec = (recent_taps.len() - 1) as f32 / span_sec;
            if taps_per_sec >= RAPID_FLAP_TAPS_PER_SEC {
                return RAPID_FLAP_GRAVITY;
            }
        }
    }
    FLOAT_GRAVITY_MULT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{DoodlePlacement, DoodleSize, HazardPlacement};

    fn bare_level(landing_target: f32) -> ArcadeLevel {
        ArcadeLevel {
            id: 1,
            landing_target,
            doodles: vec![],
            springs: vec![],
            portals: vec![],
            hazards: vec![],
            wind_zones: vec![],
            gravity_wells: vec![],
            friction_zones: vec![],
        }
    }

    fn throw(angle: f32, power: f32) -> SimulationConfig {
        SimulationConfig {
            launch_angle: angle,
            launch_power: power,
            inputs: vec![],
        }
    }

    #[test]
    fn test_ballistic_throw_lands_in_easy_zone() {
        let sim = PhysicsSimulator::new();
        let result = sim.simulate(&bare_level(200.0), &throw(45.0, 7.0));
        assert!(result.landed_in_zone, "final_x = {}", result.final_x);
        assert!(!result.fell_off);
        assert!(result.success);
        assert_eq!(result.final_y, GROUND_Y);
        assert!(result.trajectory.len() > 10);
    }

    #[test]
    fn test_hard_flat_throw_falls_off_cliff() {
        let sim = PhysicsSimulator::new();
        let result = sim.simulate(&bare_level(410.0), &throw(30.0, 10.0));
        assert!(result.fell_off);
        assert!(!result.success);
        assert!(result.final_x >= CLIFF_EDGE);
    }

    #[test]
    fn test_doodle_on_path_is_collected() {
        let mut level = bare_level(200.0);
        level.doodles.push(DoodlePlacement {
            x: 20.0,
            y: 210.0,
            size: DoodleSize::Medium,
            sprite: "star".to_string(),
            sequence: 1,
            scale: None,
            motion: None,
        });
        let sim = PhysicsSimulator::new();
        let result = sim.simulate(&level, &throw(45.0, 7.0));
        assert_eq!(result.doodles_collected, vec![1]);
        assert!(result.doodles_in_order);
        assert!(result.success);
    }

    #[test]
    fn test_hazard_contact_fails_the_throw() {
        let mut level = bare_level(200.0);
        level.hazards.push(HazardPlacement {
            x: 30.0,
            y: 210.0,
            radius: Some(40.0),
            sprite: "spike".to_string(),
            motion: None,
            scale: None,
        });
        let sim = PhysicsSimulator::new();
        let result = sim.simulate(&level, &throw(45.0, 7.0));
        assert!(result.hit_hazard);
        assert!(!result.success);
    }

    #[test]
    fn test_tapping_extends_flight() {
        let sim = PhysicsSimulator::new();
        let level = bare_level(410.0);
        let ballistic = sim.simulate(&level, &throw(45.0, 7.0));

        // Rapid tap burst keeps the projectile airborne and moving
        let mut inputs = Vec::new();
        for i in 0..20 {
            let t = 200.0 + i as f32 * 120.0;
            inputs.push(GhostInput {
                timestamp: t,
                action: InputAction::Press,
            });
            inputs.push(GhostInput {
                timestamp: t + 40.0,
                action: InputAction::Release,
            });
        }
        let tapped = sim.simulate(
            &level,
            &SimulationConfig {
                launch_angle: 45.0,
                launch_power: 7.0,
                inputs,
            },
        );
        assert!(
            tapped.final_x > ballistic.final_x,
            "tapped {} <= ballistic {}",
            tapped.final_x,
            ballistic.final_x
        );
    }

    #[test]
    fn test_landing_zone_check_is_positional() {
        // Only final x and the fell-off flag decide the zone check
        assert!(landed_in_zone(410.0, 410.0, false));
        assert!(landed_in_zone(419.9, 410.0, false));
        assert!(!landed_in_zone(409.9, 410.0, false));
        assert!(!landed_in_zone(CLIFF_EDGE, 410.0, false));
        assert!(!landed_in_zone(415.0, 410.0, true));
    }

    #[test]
    fn test_sequence_order_checker() {
        assert!(sequence_in_order(&[]));
        assert!(sequence_in_order(&[3]));
        assert!(sequence_in_order(&[0, 1, 2]));
        assert!(!sequence_in_order(&[0, 2, 1]));
        assert!(!sequence_in_order(&[1, 3]));
    }

    #[test]
    fn test_score_orders_outcomes() {
        let level = bare_level(410.0);
        let sim = PhysicsSimulator::new();
        let short = sim.simulate(&level, &throw(45.0, 5.0));
        let fell = sim.simulate(&level, &throw(30.0, 10.0));
        assert!(short.score(&level) > fell.score(&level));
        assert!(fell.score(&level) <= -80.0);
    }
}
