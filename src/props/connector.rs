//! Stroke-to-stroke connection props
//!
//! Consecutive populated strokes rarely touch. Each gap between one stroke's
//! end and the next stroke's start is classified by its geometry and the
//! level's unlocked props, then bridged with a spring, portal, wind zone, or
//! gravity well.

use crate::glyph::StrokePoint;
use crate::level::{
    GravityWellKind, GravityWellPlacement, PortalEndpoint, PortalExitDirection, PortalPair,
    SpringDirection, SpringPlacement, WindZonePlacement,
};
use crate::props::populator::StrokeOverlay;
use crate::props::unlocks::{PropKind, is_unlocked};

#[derive(Debug, Clone, Default)]
pub struct ConnectionResult {
    pub springs: Vec<SpringPlacement>,
    pub portals: Vec<PortalPair>,
    pub wind_zones: Vec<WindZonePlacement>,
    pub gravity_wells: Vec<GravityWellPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapKind {
    Spring,
    Portal,
    Wind,
    Gravity,
    None,
}

/// Pick the bridging prop for one gap
fn classify_gap(from: StrokePoint, to: StrokePoint, level: u32) -> GapKind {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = from.distance(to);

    let going_up = dy < -30.0;
    let going_down = dy > 30.0;
    let large_gap = dist > 150.0;
    let horizontal_gap = dx.abs() > 100.0 && dy.abs() < 50.0;

    if large_gap && is_unlocked(PropKind::Portal, level) {
        return GapKind::Portal;
    }
    if going_up {
        return GapKind::Spring;
    }
    if horizontal_gap && is_unlocked(PropKind::Wind, level) {
        return GapKind::Wind;
    }
    if going_down && is_unlocked(PropKind::Gravity, level) {
        return GapKind::Gravity;
    }
    if dist > 50.0 {
        return GapKind::Spring;
    }
    GapKind::None
}

fn bridge_spring(from: StrokePoint, to: StrokePoint) -> SpringPlacement {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let direction = if dx > 30.0 {
        SpringDirection::UpRight
    } else if dx < -30.0 {
        SpringDirection::UpLeft
    } else {
        SpringDirection::Up
    };
    SpringPlacement {
        x: from.x + dx * 0.3,
        y: (from.y + 30.0).min(180.0),
        direction,
        strength: 0.5 + (dy.abs() / 100.0).min(1.5),
        timing: None,
        breakable: false,
        scale: Some(1.0),
    }
}

fn bridge_portal(from: StrokePoint, to: StrokePoint) -> PortalPair {
    PortalPair {
        entry: PortalEndpoint {
            x: from.x + 20.0,
            y: from.y,
        },
        exit: PortalEndpoint {
            x: to.x - 20.0,
            y: to.y,
        },
        exit_direction: PortalExitDirection::Straight,
        exit_speed: 0.5,
        timing: None,
    }
}

fn bridge_wind(from: StrokePoint, to: StrokePoint) -> WindZonePlacement {
    let dx = to.x - from.x;
    WindZonePlacement {
        x: from.x + dx / 2.0,
        y: (from.y + to.y) / 2.0,
        radius: dx.abs() / 2.0,
        angle: if dx > 0.0 { 0.0 } else { std::f32::consts::PI },
        strength: 0.5,
    }
}

fn bridge_gravity(to: StrokePoint) -> GravityWellPlacement {
    GravityWellPlacement {
        x: to.x,
        y: to.y - 30.0,
        radius: 60.0,
        strength: 0.4,
        kind: GravityWellKind::Attract,
    }
}

/// Bridge every gap between consecutive populated strokes
pub fn connect_strokes(strokes: &[StrokeOverlay], level: u32) -> ConnectionResult {
    let mut result = ConnectionResult::default();

    let populated: Vec<&StrokeOverlay> = strokes.iter().filter(|s| s.populated).collect();
    if populated.len() < 2 {
        return result;
    }

    for pair in populated.windows(2) {
        let (Some(&from), Some(&to)) = (pair[0].points.last(), pair[1].points.first()) else {
            continue;
        };

        match classify_gap(from, to, level) {
            GapKind::Spring => result.springs.push(bridge_spring(from, to)),
            GapKind::Portal => result.portals.push(bridge_portal(from, to)),
            GapKind::Wind => result.wind_zones.push(bridge_wind(from, to)),
            GapKind::Gravity => result.gravity_wells.push(bridge_gravity(to)),
            GapKind::None => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(points: Vec<(f32, f32)>) -> StrokeOverlay {
        StrokeOverlay {
            widths: vec![1.0; points.len()],
            points: points
                .into_iter()
                .map(|(x, y)| StrokePoint::new(x, y))
                .collect(),
            populated: true,
            doodle_ids: vec![],
        }
    }

    #[test]
    fn test_large_gap_uses_portal_when_unlocked() {
        let strokes = vec![
            populated(vec![(50.0, 100.0), (100.0, 100.0)]),
            populated(vec![(300.0, 100.0), (380.0, 100.0)]),
        ];
        // Portal locked before world 3: falls through to wind check, which
        // is also locked, so a spring bridges it
        let early = connect_strokes(&strokes, 5);
        assert_eq!(early.portals.len(), 0);
        assert_eq!(early.springs.len(), 1);

        let late = connect_strokes(&strokes, 25);
        assert_eq!(late.portals.len(), 1);
        assert_eq!(late.portals[0].entry.x, 120.0);
        assert_eq!(late.portals[0].exit.x, 280.0);
    }

    #[test]
    fn test_upward_gap_uses_spring() {
        let strokes = vec![
            populated(vec![(50.0, 180.0), (100.0, 170.0)]),
            populated(vec![(140.0, 80.0), (200.0, 80.0)]),
        ];
        let result = connect_strokes(&strokes, 5);
        assert_eq!(result.springs.len(), 1);
        assert_eq!(result.springs[0].direction, SpringDirection::UpRight);
        assert!(result.springs[0].strength > 0.5);
    }

    #[test]
    fn test_horizontal_gap_uses_wind_when_unlocked() {
        let strokes = vec![
            populated(vec![(50.0, 100.0), (80.0, 100.0)]),
            populated(vec![(210.0, 110.0), (260.0, 110.0)]),
        ];
        // Gap of 130: not large enough for a portal, horizontal, unlocked
        // wind takes it at world 5
        let result = connect_strokes(&strokes, 45);
        assert_eq!(result.wind_zones.len(), 1);
        assert_eq!(result.wind_zones[0].angle, 0.0);
        assert_eq!(result.portals.len(), 0);
    }

    #[test]
    fn test_downward_gap_uses_gravity_when_unlocked() {
        let strokes = vec![
            populated(vec![(50.0, 60.0), (100.0, 60.0)]),
            populated(vec![(140.0, 170.0), (200.0, 170.0)]),
        ];
        let result = connect_strokes(&strokes, 65);
        assert_eq!(result.gravity_wells.len(), 1);
        assert_eq!(result.gravity_wells[0].kind, GravityWellKind::Attract);
        assert_eq!(result.gravity_wells[0].y, 140.0);
    }

    #[test]
    fn test_tiny_gap_needs_nothing() {
        let strokes = vec![
            populated(vec![(50.0, 100.0), (100.0, 100.0)]),
            populated(vec![(130.0, 110.0), (200.0, 110.0)]),
        ];
        let result = connect_strokes(&strokes, 5);
        assert!(result.springs.is_empty());
        assert!(result.portals.is_empty());
    }

    #[test]
    fn test_unpopulated_strokes_skipped() {
        let mut a = populated(vec![(50.0, 100.0), (100.0, 100.0)]);
        a.populated = false;
        let b = populated(vec![(300.0, 100.0), (380.0, 100.0)]);
        let result = connect_strokes(&[a, b], 25);
        assert!(result.portals.is_empty());
        assert!(result.springs.is_empty());
    }
}
