//! Trajectory-driven prop placement
//!
//! Springs go under upward transitions in the doodle sequence, portals bridge
//! the gaps the throw cannot cross, hazards fill the dead space between
//! doodles. Placement is pure given the doodle positions and the rng.

use crate::archetype::{Archetype, UnusedPropStrategy};
use crate::glyph::StrokePoint;
use crate::level::{
    ArcadeLevel, CycleTiming, HazardPlacement, PortalEndpoint, PortalExitDirection, PortalPair,
    SpringDirection, SpringPlacement,
};
use crate::props::unlocks::{PropKind, PropVariant, is_unlocked};
use crate::random::SeededRandom;

/// Default hazard hit radius when a placement does not override it
pub const HAZARD_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, Default)]
pub struct PropPlacementResult {
    pub springs: Vec<SpringPlacement>,
    pub portals: Vec<PortalPair>,
}

/// Place the props an archetype's doodle path demands.
///
/// Climber and zigzag paths get a spring under every upward jump of more
/// than 30 units (and at least one spring overall). Perimeter paths get a
/// right-to-left wrap portal, split paths a portal bridging the clusters.
pub fn place_props_for_trajectory(
    positions: &[StrokePoint],
    archetype: Archetype,
    level_id: u32,
    rng: &mut SeededRandom,
) -> PropPlacementResult {
    let requirements = archetype.required_props();
    let mut result = PropPlacementResult::default();

    if requirements.springs {
        for pair in positions.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if prev.y - curr.y > 30.0 {
                result.springs.push(SpringPlacement {
                    x: curr.x - rng.next_int(10, 30) as f32,
                    y: (curr.y + rng.next_int(40, 60) as f32).min(190.0),
                    direction: if curr.x > prev.x {
                        SpringDirection::UpRight
                    } else {
                        SpringDirection::UpLeft
                    },
                    strength: 1.0 + rng.next_float(0.0, 0.5) as f32,
                    timing: None,
                    breakable: false,
                    scale: None,
                });
            }
        }

        if result.springs.is_empty() && !positions.is_empty() {
            let midpoint = positions[positions.len() / 2];
            result.springs.push(SpringPlacement {
                x: midpoint.x,
                y: (midpoint.y + 50.0).min(190.0),
                direction: SpringDirection::Up,
                strength: 1.2,
                timing: None,
                breakable: false,
                scale: None,
            });
        }
    }

    if requirements.portals {
        match archetype {
            Archetype::Perimeter => {
                // Wrap from the right edge back to the left
                result.portals.push(PortalPair {
                    entry: PortalEndpoint {
                        x: 380.0,
                        y: rng.next_int(60, 150) as f32,
                    },
                    exit: PortalEndpoint {
                        x: 70.0,
                        y: rng.next_int(60, 150) as f32,
                    },
                    exit_direction: PortalExitDirection::Straight,
                    exit_speed: 0.8,
                    timing: None,
                });
            }
            Archetype::Split => {
                let left: Vec<StrokePoint> =
                    positions.iter().copied().filter(|p| p.x < 200.0).collect();
                let right: Vec<StrokePoint> =
                    positions.iter().copied().filter(|p| p.x > 250.0).collect();
                if let (Some(last_left), Some(first_right)) = (left.last(), right.first()) {
                    result.portals.push(PortalPair {
                        entry: PortalEndpoint {
                            x: last_left.x + 30.0,
                            y: last_left.y,
                        },
                        exit: PortalEndpoint {
                            x: first_right.x - 30.0,
                            y: first_right.y,
                        },
                        exit_direction: PortalExitDirection::Straight,
                        exit_speed: 0.7,
                        timing: None,
                    });
                }
            }
            _ => {}
        }
    }

    decorate_variants(&mut result, level_id, rng);
    result
}

/// Later worlds dress base props up as their timed/breakable variants
fn decorate_variants(result: &mut PropPlacementResult, level_id: u32, rng: &mut SeededRandom) {
    if PropVariant::TimedSprings.unlocked_at_level(level_id) {
        for spring in &mut result.springs {
            if rng.next() < 0.3 {
                spring.timing = Some(CycleTiming {
                    on_duration: 1500.0,
                    off_duration: 1000.0,
                    offset: rng.next_float(0.0, 1000.0) as f32,
                });
            }
        }
    }
    if PropVariant::BreakableSprings.unlocked_at_level(level_id) {
        for spring in &mut result.springs {
            if spring.timing.is_none() && rng.next() < 0.25 {
                spring.breakable = true;
            }
        }
    }
    if PropVariant::TimedPortals.unlocked_at_level(level_id) {
        for portal in &mut result.portals {
            if rng.next() < 0.3 {
                portal.timing = Some(CycleTiming {
                    on_duration: 2000.0,
                    off_duration: 1000.0,
                    offset: rng.next_float(0.0, 1500.0) as f32,
                });
            }
        }
    }
}

/// Helper springs for every upward transition above 25 units, regardless
/// of archetype. Used when a level fails validation and needs a nudge.
pub fn find_spring_positions(positions: &[StrokePoint]) -> Vec<SpringPlacement> {
    let mut springs = Vec::new();
    for pair in positions.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let dy = prev.y - curr.y;
        if dy <= 25.0 {
            continue;
        }

        let dx = curr.x - prev.x;
        let direction = if dx > 20.0 {
            SpringDirection::UpRight
        } else if dx < -20.0 {
            SpringDirection::UpLeft
        } else {
            SpringDirection::Up
        };

        springs.push(SpringPlacement {
            x: ((prev.x + curr.x) / 2.0).round(),
            y: (prev.y.max(curr.y) + 30.0).min(200.0).round(),
            direction,
            // Stronger for bigger jumps
            strength: 0.8 + (dy / 100.0) * 0.7,
            timing: None,
            breakable: false,
            scale: None,
        });
    }
    springs
}

/// 1-2 hazards in the gaps between consecutive doodles, never close enough
/// to block the path
pub fn place_hazards(
    positions: &[StrokePoint],
    level_id: u32,
    rng: &mut SeededRandom,
) -> Vec<HazardPlacement> {
    if !is_unlocked(PropKind::Hazard, level_id) || positions.len() < 2 {
        return Vec::new();
    }

    let want = rng.next_int(1, 2) as usize;
    let mut hazards = Vec::new();

    for _ in 0..20 {
        if hazards.len() >= want {
            break;
        }
        let i = rng.next_int(0, positions.len() as i32 - 2) as usize;
        let (a, b) = (positions[i], positions[i + 1]);
        let x = (a.x + b.x) / 2.0;
        let y = ((a.y + b.y) / 2.0 + rng.next_float(-40.0, 40.0) as f32).clamp(40.0, 190.0);

        if blocks_doodles(x, y, HAZARD_RADIUS, positions) {
            continue;
        }
        if hazards
            .iter()
            .any(|h: &HazardPlacement| ((h.x - x).powi(2) + (h.y - y).powi(2)).sqrt() < 60.0)
        {
            continue;
        }

        hazards.push(HazardPlacement {
            x: x.round(),
            y: y.round(),
            radius: None,
            sprite: "spike".to_string(),
            motion: None,
            scale: None,
        });
    }

    hazards
}

/// A prop this close to a doodle would make the pickup unplayable
pub fn blocks_doodles(x: f32, y: f32, radius: f32, positions: &[StrokePoint]) -> bool {
    positions.iter().any(|d| {
        let dist = ((x - d.x).powi(2) + (y - d.y).powi(2)).sqrt();
        dist < radius + 25.0
    })
}

/// Remove props the validated solution never touched, if the archetype's
/// strategy says so. Returns the names of the removed props.
pub fn strip_unused_props(
    level: &mut ArcadeLevel,
    archetype: Archetype,
    springs_hit: &[usize],
    portals_used: &[usize],
) -> Vec<String> {
    let mut removed = Vec::new();
    if archetype.unused_prop_strategy() != UnusedPropStrategy::Remove {
        return removed;
    }

    for i in (0..level.springs.len()).rev() {
        if !springs_hit.contains(&i) {
            level.springs.remove(i);
            removed.push(format!("spring-{i}"));
        }
    }
    for i in (0..level.portals.len()).rev() {
        if !portals_used.contains(&i) {
            level.portals.remove(i);
            removed.push(format!("portal-{i}"));
        }
    }
    removed
}
