//! Glyph-to-canvas stroke transformer
//!
//! Turns a glyph's raw point cloud into N ordered doodle positions on the
//! game canvas: rotate/flip, normalize, sort by X, sample down to N, map
//! through the archetype's transform record, clamp, and enforce minimum
//! spacing between consecutive positions.

use glam::Vec2;

use crate::archetype::{Archetype, ArchetypeTransform, transform_for};
use crate::consts::{
    CANVAS_X_MAX, CANVAS_X_MIN, CANVAS_Y_MAX, CANVAS_Y_MIN, MIN_DOODLE_SPACING,
};
use crate::glyph::{CharacterData, StrokePoint};

/// Quarter-turn rotation applied before normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// (cos, sin) of the rotation angle, exact
    fn cos_sin(self) -> (f32, f32) {
        match self {
            Rotation::R0 => (1.0, 0.0),
            Rotation::R90 => (0.0, 1.0),
            Rotation::R180 => (-1.0, 0.0),
            Rotation::R270 => (0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub archetype: Option<Archetype>,
}

/// Applies a [`TransformOptions`] to glyph geometry
#[derive(Debug, Clone)]
pub struct StrokeTransformer {
    options: TransformOptions,
}

impl StrokeTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    /// Produce `count` ordered canvas positions for doodle placement.
    /// Empty glyphs and zero counts yield an empty vector.
    pub fn doodle_positions(&self, glyph: &CharacterData, count: usize) -> Vec<StrokePoint> {
        let raw: Vec<Vec2> = glyph.all_points().map(StrokePoint::to_vec2).collect();
        if raw.is_empty() || count == 0 {
            return Vec::new();
        }

        let rotated = self.rotate_and_flip(&raw);
        let mut normalized = normalize_unit_box(&rotated);
        normalized.sort_by(|a, b| a.x.total_cmp(&b.x));

        let sampled = sample_even_indices(&normalized, count);

        let archetype = self.options.archetype.unwrap_or(Archetype::General);
        let transform = transform_for(archetype);

        let mut positions: Vec<Vec2> = sampled
            .iter()
            .enumerate()
            .map(|(i, &p)| map_point(p, i, &transform))
            .map(clamp_to_canvas)
            .collect();

        enforce_min_spacing(&mut positions);

        positions
            .into_iter()
            .map(|p| StrokePoint::new(p.x.round(), p.y.round()))
            .collect()
    }

    fn rotate_and_flip(&self, points: &[Vec2]) -> Vec<Vec2> {
        let (min, max) = bounds(points);
        let center = (min + max) * 0.5;
        let (cos, sin) = self.options.rotation.cos_sin();

        points
            .iter()
            .map(|&p| {
                let d = p - center;
                let mut rotated = Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y) + center;
                if self.options.flip_horizontal {
                    rotated.x = 2.0 * center.x - rotated.x;
                }
                rotated
            })
            .collect()
    }
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    let mut min = points[0];
    let mut max = points[0];
    for &p in points {
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Normalize a point cloud into [0,1]x[0,1]; a degenerate axis collapses
/// to 0.5
fn normalize_unit_box(points: &[Vec2]) -> Vec<Vec2> {
    let (min, max) = bounds(points);
    let size = max - min;
    points
        .iter()
        .map(|&p| {
            let nx = if size.x > 0.0 { (p.x - min.x) / size.x } else { 0.5 };
            let ny = if size.y > 0.0 { (p.y - min.y) / size.y } else { 0.5 };
            Vec2::new(nx, ny)
        })
        .collect()
}

/// Nearest-index sampling of `count` points at even index intervals
fn sample_even_indices(points: &[Vec2], count: usize) -> Vec<Vec2> {
    if count == 1 {
        return vec![points[0]];
    }
    let last = (points.len() - 1) as f32;
    (0..count)
        .map(|i| {
            let idx = (i as f32 * last / (count - 1) as f32).round() as usize;
            points[idx.min(points.len() - 1)]
        })
        .collect()
}

/// Map one normalized point through the archetype transform record
fn map_point(p: Vec2, index: usize, t: &ArchetypeTransform) -> Vec2 {
    let mut n = p;

    if t.push_to_edges {
        // Magnify the offset from center by 1.5 minus the L1 distance
        let dx = n.x - 0.5;
        let dy = n.y - 0.5;
        let factor = 1.5 - (dx.abs() + dy.abs());
        n.x = (0.5 + dx * factor).clamp(0.0, 1.0);
        n.y = (0.5 + dy * factor).clamp(0.0, 1.0);
    }

    let x = if let Some((left, right)) = t.bifurcate_x {
        let cluster = if index % 2 == 0 { left } else { right };
        cluster.lerp(n.x)
    } else {
        t.x_range.lerp(n.x)
    };

    let y = if let Some((band_a, band_b)) = t.alternate_bands {
        let band = if index % 2 == 0 { band_a } else { band_b };
        band.lerp(n.y)
    } else if t.invert_y {
        t.y_range.max - n.y * (t.y_range.max - t.y_range.min)
    } else {
        t.y_range.lerp(n.y)
    };

    Vec2::new(x, y)
}

fn clamp_to_canvas(p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(CANVAS_X_MIN, CANVAS_X_MAX),
        p.y.clamp(CANVAS_Y_MIN, CANVAS_Y_MAX),
    )
}

/// Walk consecutive pairs and push the later point outward along the pair
/// direction (+X when coincident) until spacing holds, re-clamping to the
/// canvas. If the clamp undoes the push, retry with the components mirrored.
pub(crate) fn enforce_min_spacing(positions: &mut [Vec2]) {
    for i in 1..positions.len() {
        let prev = positions[i - 1];
        let cur = positions[i];
        if prev.distance(cur) >= MIN_DOODLE_SPACING {
            continue;
        }

        let delta = cur - prev;
        let dir = if delta.length() > 1e-3 {
            delta.normalize()
        } else {
            Vec2::X
        };

        let candidates = [
            dir,
            Vec2::new(dir.x, -dir.y),
            Vec2::new(-dir.x, dir.y),
            -dir,
        ];

        let mut best = clamp_to_canvas(prev + dir * MIN_DOODLE_SPACING);
        for cand in candidates {
            let pushed = clamp_to_canvas(prev + cand * MIN_DOODLE_SPACING);
            if prev.distance(pushed) >= prev.distance(best) {
                best = pushed;
            }
            if prev.distance(pushed) >= MIN_DOODLE_SPACING - 0.5 {
                best = pushed;
                break;
            }
        }
        positions[i] = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphStroke;
    use proptest::prelude::*;

    fn glyph_of(points: Vec<(f32, f32)>) -> CharacterData {
        CharacterData {
            character: "t".to_string(),
            stroke_count: 1,
            strokes: vec![GlyphStroke {
                points: points
                    .into_iter()
                    .map(|(x, y)| StrokePoint::new(x, y))
                    .collect(),
            }],
        }
    }

    fn diagonal_glyph(n: usize) -> CharacterData {
        glyph_of(
            (0..n)
                .map(|i| (i as f32 * 1000.0 / (n - 1) as f32, i as f32 * 1000.0 / (n - 1) as f32))
                .collect(),
        )
    }

    fn transformer(archetype: Archetype) -> StrokeTransformer {
        StrokeTransformer::new(TransformOptions {
            archetype: Some(archetype),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_glyph_empty_output() {
        let g = glyph_of(vec![]);
        assert!(transformer(Archetype::General).doodle_positions(&g, 5).is_empty());
        let g2 = diagonal_glyph(10);
        assert!(transformer(Archetype::General).doodle_positions(&g2, 0).is_empty());
    }

    #[test]
    fn test_single_point_request() {
        let g = diagonal_glyph(10);
        let positions = transformer(Archetype::General).doodle_positions(&g, 1);
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn test_runner_band() {
        let g = diagonal_glyph(12);
        let positions = transformer(Archetype::Runner).doodle_positions(&g, 8);
        assert_eq!(positions.len(), 8);
        for p in &positions {
            assert!((90.0..=150.0).contains(&p.y), "y {} outside runner band", p.y);
        }
    }

    #[test]
    fn test_climber_inverts_y() {
        let g = diagonal_glyph(12);
        let positions = transformer(Archetype::Climber).doodle_positions(&g, 6);
        // First points low on screen (large y), later points high (small y)
        assert!(positions[0].y > 150.0);
        assert!(positions.last().unwrap().y < 80.0);
        for p in &positions {
            assert!((120.0..=280.0).contains(&p.x));
        }
    }

    #[test]
    fn test_zigzag_alternates_bands() {
        let g = diagonal_glyph(16);
        let positions = transformer(Archetype::Zigzag).doodle_positions(&g, 8);
        for (i, p) in positions.iter().enumerate() {
            if i % 2 == 0 {
                assert!(p.y <= 100.0, "even index {} y {} not in high band", i, p.y);
            } else {
                assert!(p.y >= 130.0, "odd index {} y {} not in low band", i, p.y);
            }
        }
    }

    #[test]
    fn test_split_avoids_middle() {
        let g = diagonal_glyph(16);
        let positions = transformer(Archetype::Split).doodle_positions(&g, 8);
        for p in &positions {
            let in_left = (60.0..=150.0).contains(&p.x);
            let in_right = (280.0..=380.0).contains(&p.x);
            assert!(in_left || in_right, "x {} fell in the split gap", p.x);
        }
    }

    #[test]
    fn test_rotation_and_flip_change_layout() {
        let g = glyph_of(vec![(0.0, 0.0), (1000.0, 200.0), (300.0, 900.0), (700.0, 400.0)]);
        let base = transformer(Archetype::General).doodle_positions(&g, 4);
        let rotated = StrokeTransformer::new(TransformOptions {
            rotation: Rotation::R90,
            archetype: Some(Archetype::General),
            ..Default::default()
        })
        .doodle_positions(&g, 4);
        assert_ne!(base, rotated);
    }

    #[test]
    fn test_min_spacing_on_tight_cluster() {
        // All source points nearly coincident; spacing must still hold
        let g = glyph_of(vec![(500.0, 500.0), (501.0, 500.0), (500.0, 501.0), (502.0, 502.0)]);
        let positions = transformer(Archetype::General).doodle_positions(&g, 4);
        for pair in positions.windows(2) {
            assert!(
                pair[0].distance(pair[1]) >= MIN_DOODLE_SPACING - 1.0,
                "spacing violated: {:?}",
                pair
            );
        }
    }

    proptest! {
        #[test]
        fn prop_positions_stay_in_bounds(
            points in prop::collection::vec((0f32..1000.0, 0f32..1000.0), 2..40),
            count in 1usize..12,
            archetype_idx in 0usize..7,
        ) {
            let g = glyph_of(points);
            let archetype = Archetype::ALL[archetype_idx];
            let positions = transformer(archetype).doodle_positions(&g, count);
            prop_assert_eq!(positions.len(), count);
            for p in &positions {
                prop_assert!((CANVAS_X_MIN..=CANVAS_X_MAX).contains(&p.x));
                prop_assert!((CANVAS_Y_MIN..=CANVAS_Y_MAX).contains(&p.y));
            }
        }

        #[test]
        fn prop_consecutive_spacing_holds(
            points in prop::collection::vec((0f32..1000.0, 0f32..1000.0), 2..40),
            count in 2usize..10,
        ) {
            let g = glyph_of(points);
            let positions = transformer(Archetype::General).doodle_positions(&g, count);
            for pair in positions.windows(2) {
                prop_assert!(pair[0].distance(pair[1]) >= MIN_DOODLE_SPACING - 1.0);
            }
        }
    }
}
