//! Coin population along stroke paths
//!
//! An overlay stroke is a polyline on the canvas with a width profile.
//! Population walks the polyline by arc length and drops collectibles at an
//! even spacing derived from the requested density.

use crate::glyph::StrokePoint;
use crate::level::{DoodlePlacement, DoodleSize};

/// A canvas-space stroke path decorated with placement bookkeeping
#[derive(Debug, Clone, Default)]
pub struct StrokeOverlay {
    pub points: Vec<StrokePoint>,
    /// Relative stroke width at each point, nominally around 1.0
    pub widths: Vec<f32>,
    pub populated: bool,
    pub doodle_ids: Vec<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct PopulateOptions {
    /// 0.0 (sparse) to 1.0 (one coin per `min_spacing` units)
    pub density: f32,
    pub start_id: u32,
    pub min_spacing: f32,
    pub scale_multiplier: f32,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self {
            density: 0.5,
            start_id: 1,
            min_spacing: 12.0,
            scale_multiplier: 1.0,
        }
    }
}

/// Total arc length of a polyline
pub fn stroke_length(points: &[StrokePoint]) -> f32 {
    points.windows(2).map(|p| p[0].distance(p[1])).sum()
}

/// Calligraphic width profile along a stroke: thick at the start, easing
/// out to thin at the end. Range 0.6 to 1.4.
pub fn stroke_widths(points: &[StrokePoint]) -> Vec<f32> {
    const MAX_WIDTH: f32 = 1.4;
    const MIN_WIDTH: f32 = 0.6;

    if points.is_empty() {
        return Vec::new();
    }
    if points.len() == 1 {
        return vec![1.0];
    }

    (0..points.len())
        .map(|i| {
            let progress = i as f32 / (points.len() - 1) as f32;
            let eased = 1.0 - progress.powf(0.7);
            MIN_WIDTH + eased * (MAX_WIDTH - MIN_WIDTH)
        })
        .collect()
}

/// Position and interpolated width at `progress` in [0,1] along the stroke
fn interpolate_along_stroke(
    points: &[StrokePoint],
    widths: &[f32],
    progress: f32,
) -> (StrokePoint, f32) {
    let Some(&first) = points.first() else {
        return (StrokePoint::default(), 1.0);
    };
    if points.len() == 1 {
        return (first, widths.first().copied().unwrap_or(1.0));
    }

    let target = progress * stroke_length(points);
    let mut traveled = 0.0;
    for i in 1..points.len() {
        let seg = points[i - 1].distance(points[i]);
        if traveled + seg >= target {
            let t = if seg > 0.0 { (target - traveled) / seg } else { 0.0 };
            let p = StrokePoint::new(
                points[i - 1].x + (points[i].x - points[i - 1].x) * t,
                points[i - 1].y + (points[i].y - points[i - 1].y) * t,
            );
            let w0 = widths.get(i - 1).copied().unwrap_or(1.0);
            let w1 = widths.get(i).copied().unwrap_or(w0);
            return (p, w0 + (w1 - w0) * t);
        }
        traveled += seg;
    }

    let last = points[points.len() - 1];
    (last, widths.last().copied().unwrap_or(1.0))
}

/// Drop coins along one stroke. Endpoints get the star sprite, the width
/// profile sets each coin's scale.
pub fn populate_stroke_with_coins(
    stroke: &StrokeOverlay,
    options: &PopulateOptions,
) -> Vec<DoodlePlacement> {
    if stroke.points.len() < 2 {
        return Vec::new();
    }

    let length = stroke_length(&stroke.points);
    let effective_spacing = options.min_spacing / options.density.max(0.1);
    let count = ((length / effective_spacing) as usize).max(1);

    (0..count)
        .map(|i| {
            let progress = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                0.5
            };
            let (p, width) = interpolate_along_stroke(&stroke.points, &stroke.widths, progress);
            let scale = (0.4 + width * 0.5) * options.scale_multiplier;
            let endpoint = i == 0 || i == count - 1;
            DoodlePlacement {
                x: p.x.round(),
                y: p.y.round(),
                size: if scale > 0.9 {
                    DoodleSize::Large
                } else {
                    DoodleSize::Small
                },
                sprite: if endpoint { "star" } else { "coin" }.to_string(),
                sequence: options.start_id + i as u32,
                scale: Some(scale),
                motion: None,
            }
        })
        .collect()
}

/// Populate every stroke in order, threading the sequence ids through
pub fn populate_strokes(
    strokes: &[StrokeOverlay],
    options: &PopulateOptions,
) -> (Vec<DoodlePlacement>, Vec<StrokeOverlay>) {
    let mut coins = Vec::new();
    let mut updated = Vec::with_capacity(strokes.len());
    let mut next_id = options.start_id;

    for stroke in strokes {
        let stroke_coins = populate_stroke_with_coins(
            stroke,
            &PopulateOptions {
                start_id: next_id,
                ..*options
            },
        );
        next_id += stroke_coins.len() as u32;

        updated.push(StrokeOverlay {
            points: stroke.points.clone(),
            widths: stroke.widths.clone(),
            populated: !stroke_coins.is_empty(),
            doodle_ids: stroke_coins.iter().map(|c| c.sequence).collect(),
        });
        coins.extend(stroke_coins);
    }

    (coins, updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(points: Vec<(f32, f32)>) -> StrokeOverlay {
        let widths = vec![1.0; points.len()];
        StrokeOverlay {
            points: points
                .into_iter()
                .map(|(x, y)| StrokePoint::new(x, y))
                .collect(),
            widths,
            populated: false,
            doodle_ids: vec![],
        }
    }

    #[test]
    fn test_stroke_length() {
        let s = overlay(vec![(0.0, 0.0), (30.0, 40.0), (30.0, 140.0)]);
        assert!((stroke_length(&s.points) - 150.0).abs() < 1e-4);
    }

    #[test]
    fn test_density_controls_count() {
        let s = overlay(vec![(0.0, 100.0), (240.0, 100.0)]);
        let dense = populate_stroke_with_coins(
            &s,
            &PopulateOptions {
                density: 1.0,
                ..Default::default()
            },
        );
        let sparse = populate_stroke_with_coins(
            &s,
            &PopulateOptions {
                density: 0.2,
                ..Default::default()
            },
        );
        assert_eq!(dense.len(), 20);
        assert_eq!(sparse.len(), 4);
    }

    #[test]
    fn test_endpoints_are_stars() {
        let s = overlay(vec![(0.0, 100.0), (200.0, 100.0)]);
        let coins = populate_stroke_with_coins(&s, &PopulateOptions::default());
        assert!(coins.len() >= 3);
        assert_eq!(coins[0].sprite, "star");
        assert_eq!(coins.last().unwrap().sprite, "star");
        assert!(coins[1..coins.len() - 1].iter().all(|c| c.sprite == "coin"));
    }

    #[test]
    fn test_width_drives_scale() {
        let mut s = overlay(vec![(0.0, 100.0), (100.0, 100.0)]);
        s.widths = vec![1.4, 1.4];
        let coins = populate_stroke_with_coins(&s, &PopulateOptions::default());
        for c in &coins {
            assert_eq!(c.size, DoodleSize::Large);
            assert!((c.scale.unwrap() - 1.1).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stroke_widths_taper_thick_to_thin() {
        let points: Vec<StrokePoint> =
            (0..6).map(|i| StrokePoint::new(i as f32 * 40.0, 100.0)).collect();
        let widths = stroke_widths(&points);
        assert_eq!(widths.len(), 6);
        assert!((widths[0] - 1.4).abs() < 1e-6);
        assert!((widths[5] - 0.6).abs() < 1e-6);
        for pair in widths.windows(2) {
            assert!(pair[1] < pair[0], "widths not strictly thinning: {pair:?}");
        }
        assert_eq!(stroke_widths(&points[..1]), vec![1.0]);
        assert!(stroke_widths(&[]).is_empty());
    }

    #[test]
    fn test_tapered_widths_size_coins_start_heavy() {
        let points: Vec<StrokePoint> =
            (0..6).map(|i| StrokePoint::new(i as f32 * 40.0, 100.0)).collect();
        let s = StrokeOverlay {
            widths: stroke_widths(&points),
            points,
            populated: false,
            doodle_ids: vec![],
        };
        let coins = populate_stroke_with_coins(
            &s,
            &PopulateOptions {
                density: 1.0,
                ..Default::default()
            },
        );
        assert!(coins.len() >= 3);
        // Start width 1.4 gives scale 1.1, end width 0.6 gives 0.7
        assert_eq!(coins[0].size, DoodleSize::Large);
        assert_eq!(coins.last().unwrap().size, DoodleSize::Small);
        assert!(coins[0].scale.unwrap() > coins.last().unwrap().scale.unwrap());
    }

    #[test]
    fn test_sequential_ids_across_strokes() {
        let strokes = vec![
            overlay(vec![(0.0, 100.0), (60.0, 100.0)]),
            overlay(vec![(0.0, 150.0), (60.0, 150.0)]),
        ];
        let (coins, updated) = populate_strokes(&strokes, &PopulateOptions::default());
        let ids: Vec<u32> = coins.iter().map(|c| c.sequence).collect();
        let expected: Vec<u32> = (1..=coins.len() as u32).collect();
        assert_eq!(ids, expected);
        assert!(updated.iter().all(|s| s.populated));
        assert_eq!(updated[0].doodle_ids.last(), Some(&(updated[1].doodle_ids[0] - 1)));
    }

    #[test]
    fn test_degenerate_stroke_yields_nothing() {
        let s = overlay(vec![(50.0, 50.0)]);
        assert!(populate_stroke_with_coins(&s, &PopulateOptions::default()).is_empty());
    }
}
