//! Glyph stroke database - the read-only input to generation
//!
//! A glyph is an abstract 2D line drawing (one or more strokes, each a list
//! of key points in 0-1000 source space). Glyphs are used purely as layout
//! templates; only their coarse geometry matters. Loading is an explicit step
//! the caller controls - the core performs no implicit global initialization.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D coordinate, either in glyph source space or game-canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(self, other: StrokePoint) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }
}

impl From<Vec2> for StrokePoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// One stroke of a glyph: an ordered polyline of key points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphStroke {
    pub points: Vec<StrokePoint>,
}

/// One glyph record. Never mutated by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub character: String,
    pub stroke_count: u32,
    pub strokes: Vec<GlyphStroke>,
}

impl CharacterData {
    /// Every point of every stroke, in stroke order
    pub fn all_points(&self) -> impl Iterator<Item = StrokePoint> + '_ {
        self.strokes.iter().flat_map(|s| s.points.iter().copied())
    }
}

/// Stroke-count range used to match glyph complexity to level difficulty
pub fn stroke_range_for_level(level: u32) -> (u32, u32) {
    match level {
        0..=10 => (1, 3),
        11..=20 => (3, 5),
        21..=40 => (5, 8),
        41..=70 => (8, 12),
        71..=100 => (12, 16),
        101..=150 => (14, 18),
        151..=200 => (16, 22),
        _ => (18, 25),
    }
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("invalid glyph database JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("glyph database contains no records")]
    Empty,
}

/// In-memory glyph database
#[derive(Debug, Clone, Default)]
pub struct GlyphDatabase {
    records: Vec<CharacterData>,
}

impl GlyphDatabase {
    pub fn from_records(records: Vec<CharacterData>) -> Self {
        Self { records }
    }

    /// Parse a database from a JSON array of glyph records
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let records: Vec<CharacterData> = serde_json::from_str(json)?;
        if records.is_empty() {
            return Err(DatabaseError::Empty);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> &[CharacterData] {
        &self.records
    }

    /// Glyphs whose stroke count falls in [min, max]
    pub fn by_stroke_count(&self, min: u32, max: u32) -> Vec<&CharacterData> {
        self.records
            .iter()
            .filter(|c| c.stroke_count >= min && c.stroke_count <= max)
            .collect()
    }
}
