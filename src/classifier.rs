//! Shape metrics and archetype classification
//!
//! Pure functions over a glyph's point cloud. Degenerate geometry (zero
//! width/height, empty strokes) yields neutral defaults instead of NaN.

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::glyph::{CharacterData, StrokePoint};

/// Classification output for one glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub archetype: Archetype,
    pub aspect_ratio: f32,
    /// 0 = top-heavy, 1 = bottom-heavy
    pub vertical_center_of_mass: f32,
}

fn bounds(points: &[StrokePoint]) -> Option<(f32, f32, f32, f32)> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some((min_x, max_x, min_y, max_y))
}

/// Bounding width / height. 10 on zero height (treated as very wide),
/// 1 when there are fewer than two points.
pub fn aspect_ratio(glyph: &CharacterData) -> f32 {
    let points: Vec<StrokePoint> = glyph.all_points().collect();
    if points.len() < 2 {
        return 1.0;
    }
    let (min_x, max_x, min_y, max_y) = match bounds(&points) {
        Some(b) => b,
        None => return 1.0,
    };
    let height = max_y - min_y;
    if height == 0.0 {
        return 10.0;
    }
    (max_x - min_x) / height
}

/// Vertical center of mass normalized to the bounding box, 0.5 on
/// degenerate height
pub fn vertical_center_of_mass(glyph: &CharacterData) -> f32 {
    let points: Vec<StrokePoint> = glyph.all_points().collect();
    if points.is_empty() {
        return 0.5;
    }
    let (_, _, min_y, max_y) = match bounds(&points) {
        Some(b) => b,
        None => return 0.5,
    };
    if max_y == min_y {
        return 0.5;
    }
    let mean_y = points.iter().map(|p| p.y).sum::<f32>() / points.len() as f32;
    (mean_y - min_y) / (max_y - min_y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
    Other,
}

fn stroke_orientation(points: &[StrokePoint]) -> Orientation {
    if points.len() < 2 {
        return Orientation::Other;
    }
    let (min_x, max_x, min_y, max_y) = match bounds(points) {
        Some(b) => b,
        None => return Orientation::Other,
    };
    let width = max_x - min_x;
    let height = max_y - min_y;
    if width > height * 2.0 {
        Orientation::Horizontal
    } else if height > width * 2.0 {
        Orientation::Vertical
    } else {
        Orientation::Other
    }
}

/// At least 3 strokes with 2+ horizontal/vertical alternations
pub fn has_alternating_strokes(glyph: &CharacterData) -> bool {
    if glyph.strokes.len() < 3 {
        return false;
    }
    let orientations: Vec<Orientation> = glyph
        .strokes
        .iter()
        .map(|s| stroke_orientation(&s.points))
        .collect();

    let mut alternations = 0;
    for pair in orientations.windows(2) {
        match (pair[0], pair[1]) {
            (Orientation::Horizontal, Orientation::Vertical)
            | (Orientation::Vertical, Orientation::Horizontal) => alternations += 1,
            _ => {}
        }
    }
    alternations >= 2
}

/// More than 70% of points within 0.25 of an edge of the normalized box
pub fn has_perimeter_pattern(glyph: &CharacterData) -> bool {
    let points: Vec<StrokePoint> = glyph.all_points().collect();
    if points.len() < 4 {
        return false;
    }
    let (min_x, max_x, min_y, max_y) = match bounds(&points) {
        Some(b) => b,
        None => return false,
    };
    if max_x == min_x || max_y == min_y {
        return false;
    }

    let near_edge = points
        .iter()
        .filter(|p| {
            let nx = (p.x - min_x) / (max_x - min_x);
            let ny = (p.y - min_y) / (max_y - min_y);
            nx < 0.25 || nx > 0.75 || ny < 0.25 || ny > 0.75
        })
        .count();

    near_edge as f32 > points.len() as f32 * 0.7
}

/// Sparse central X band (<20% of points) with both outer thirds populated
/// (>25% each)
pub fn has_split_pattern(glyph: &CharacterData) -> bool {
    let points: Vec<StrokePoint> = glyph.all_points().collect();
    if points.len() < 4 {
        return false;
    }
    let (min_x, max_x, _, _) = match bounds(&points) {
        Some(b) => b,
        None => return false,
    };
    if max_x == min_x {
        return false;
    }

    let mut left = 0usize;
    let mut center = 0usize;
    let mut right = 0usize;
    for p in &points {
        let nx = (p.x - min_x) / (max_x - min_x);
        if nx < 0.35 {
            left += 1;
        } else if nx <= 0.65 {
            center += 1;
        } else {
            right += 1;
        }
    }

    let n = points.len() as f32;
    (center as f32) < n * 0.2 && (left as f32) > n * 0.25 && (right as f32) > n * 0.25
}

/// Classify a glyph into an archetype. Priority order, first match wins.
pub fn classify(glyph: &CharacterData) -> Classification {
    let aspect = aspect_ratio(glyph);
    let com = vertical_center_of_mass(glyph);

    let archetype = if aspect > 1.5 {
        Archetype::Runner
    } else if aspect < 0.7 && com > 0.5 {
        Archetype::Climber
    } else if com < 0.4 {
        Archetype::Diver
    } else if has_alternating_strokes(glyph) {
        Archetype::Zigzag
    } else if has_perimeter_pattern(glyph) {
        Archetype::Perimeter
    } else if has_split_pattern(glyph) {
        Archetype::Split
    } else {
        Archetype::General
    };

    Classification {
        archetype,
        aspect_ratio: aspect,
        vertical_center_of_mass: com,
    }
}
