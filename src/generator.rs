//! Level generation pipeline
//!
//! One level = one seeded pipeline run: pick a glyph whose complexity fits
//! the level, lay doodles along its shape, place the props its archetype
//! needs, then prove the level is beatable with the physics search. Failed
//! candidates are retried with fresh glyphs and prop adjustments before the
//! generator gives up.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, archetype_for_level};
use crate::classifier::classify;
use crate::consts::{
    CANVAS_X_MAX, CANVAS_X_MIN, CANVAS_Y_MAX, CANVAS_Y_MIN, MIN_DOODLE_SPACING,
};
use crate::glyph::{CharacterData, GlyphDatabase, StrokePoint, stroke_range_for_level};
use crate::level::{
    ArcadeLevel, DoodlePlacement, DoodleSize, FrictionKind, FrictionZonePlacement, GhostInput,
    SpringDirection, SpringPlacement,
};
use crate::props::placer::{place_hazards, place_props_for_trajectory, strip_unused_props};
use crate::props::populator::{PopulateOptions, StrokeOverlay, populate_strokes, stroke_widths};
use crate::props::unlocks::{PropKind, PropVariant, is_unlocked};
use crate::props::connector::connect_strokes;
use crate::random::SeededRandom;
use crate::sim::search::find_optimal_inputs;
use crate::sim::simulate::PhysicsSimulator;
use crate::transform::{Rotation, StrokeTransformer, TransformOptions, enforce_min_spacing};

/// Validation search budget for a fresh candidate
const SEARCH_ATTEMPTS: u32 = 50;
/// Smaller budget for the prop-adjustment retry
const ADJUST_SEARCH_ATTEMPTS: u32 = 30;
/// Fresh glyph candidates tried before the lenient fallback
const MAX_CANDIDATE_ATTEMPTS: u32 = 5;

/// Outcome of one `generate_level` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<ArcadeLevel>,
    /// Input recording of the validated solution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost_replay: Option<Vec<GhostInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempts: u32,
}

/// Outcome of a batch run over a level range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub levels: Vec<ArcadeLevel>,
    pub ghost_replays: BTreeMap<u32, Vec<GhostInput>>,
    /// Level ids that produced no level at all
    pub failed: Vec<u32>,
}

/// Where the retry loop stands after a failed candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryStage {
    TryCharacter,
    TryPropAdjustment,
    GiveUp,
}

/// Landing target progression. Monotone non-decreasing: the strip the
/// projectile must stop on narrows as levels climb.
pub fn landing_target_for_level(level: u32) -> f32 {
    match level {
        0..=100 => 410.0,
        101..=110 => 411.0,
        111..=120 => 412.0,
        121..=130 => 413.0,
        131..=140 => 414.0,
        141..=150 => 415.0,
        151..=160 => 416.0,
        161..=170 => 417.0,
        171..=180 => 418.0,
        181..=200 => 419.0,
        201..=210 => 419.1,
        211..=220 => 419.2,
        221..=230 => 419.3,
        231..=240 => 419.4,
        _ => 419.5,
    }
}

/// Doodles per level: one per level up to 10, then slowing, capped at 25
pub fn doodle_count_for_level(level: u32) -> u32 {
    match level {
        0..=10 => level,
        11..=20 => 10 + (level - 10) / 2,
        _ => (15 + (level - 20) / 10).min(25),
    }
}

/// Position of a level inside its ten-level world, 1 through 10
fn position_in_world(level: u32) -> u32 {
    match level % 10 {
        0 => 10,
        p => p,
    }
}

/// Dense reward levels sit at positions 3, 6 and 10 of every world; the
/// rest are sparse puzzle levels
pub fn is_juicy_level(level: u32) -> bool {
    matches!(position_in_world(level), 3 | 6 | 10)
}

/// Coin density for the stroke-following layout
fn stroke_density_for_level(level: u32) -> f32 {
    if is_juicy_level(level) { 0.9 } else { 0.3 }
}

/// Upper coin bound for the stroke-following layout, growing with world
fn stroke_coin_cap(level: u32) -> usize {
    let world = level.div_ceil(10).max(1);
    if is_juicy_level(level) {
        (40 + world * 4 + 50).min(150) as usize
    } else {
        (5 + world / 5 * 2 + 15) as usize
    }
}

/// The per-level generation pipeline
pub struct LevelGenerator {
    database: GlyphDatabase,
    simulator: PhysicsSimulator,
}

impl LevelGenerator {
    pub fn new(database: GlyphDatabase) -> Self {
        Self {
            database,
            simulator: PhysicsSimulator::new(),
        }
    }

    /// Generate one level. Deterministic in `(seed, level_id)`.
    pub fn generate_level(&self, level_id: u32, seed: &str) -> GenerationResult {
        let mut rng = SeededRandom::new(&format!("{seed}-{level_id}"));

        let (min_strokes, max_strokes) = stroke_range_for_level(level_id);
        let mut candidates = self.database.by_stroke_count(min_strokes, max_strokes);
        if candidates.is_empty() {
            candidates = self.database.all().iter().collect();
        }
        if candidates.is_empty() {
            return GenerationResult {
                success: false,
                level: None,
                ghost_replay: None,
                error: Some(format!(
                    "no glyphs with {min_strokes}-{max_strokes} strokes"
                )),
                attempts: 0,
            };
        }

        // Prefer glyphs whose shape matches the world's dominant archetype
        let desired = archetype_for_level(level_id, rng.next());
        let matching: Vec<&CharacterData> = candidates
            .iter()
            .copied()
            .filter(|c| classify(c).archetype == desired)
            .collect();
        if !matching.is_empty() {
            candidates = matching;
        }

        let mut attempts = 0;
        let mut stage = RetryStage::TryCharacter;
        let mut last_level: Option<ArcadeLevel> = None;

        loop {
            match stage {
                RetryStage::TryCharacter => {
                    attempts += 1;
                    let glyph = *rng.pick(&candidates);
                    let result =
                        self.generate_from_character(level_id, glyph, rng.derive(attempts));
                    if result.success {
                        log::info!(
                            "level {level_id}: validated on attempt {attempts} ({})",
                            glyph.character
                        );
                        return GenerationResult { attempts, ..result };
                    }
                    log::debug!("level {level_id}: attempt {attempts} failed validation");
                    last_level = result.level;
                    stage = if last_level.is_some() {
                        RetryStage::TryPropAdjustment
                    } else if attempts >= MAX_CANDIDATE_ATTEMPTS {
                        RetryStage::GiveUp
                    } else {
                        RetryStage::TryCharacter
                    };
                }
                RetryStage::TryPropAdjustment => {
                    let level = last_level.take();
                    if let Some(level) = level {
                        let result =
                            self.try_prop_adjustment(level, rng.derive(format!("adj-{attempts}")));
                        if result.success {
                            log::info!("level {level_id}: passed after prop adjustment");
                            return GenerationResult { attempts, ..result };
                        }
                    }
                    stage = if attempts >= MAX_CANDIDATE_ATTEMPTS {
                        RetryStage::GiveUp
                    } else {
                        RetryStage::TryCharacter
                    };
                }
                RetryStage::GiveUp => {
                    // Lenient fallback: ship the layout even without a
                    // validated replay
                    let glyph = *rng.pick(&candidates);
                    let result =
                        self.generate_from_character(level_id, glyph, rng.derive("final"));
                    log::warn!(
                        "level {level_id}: giving up after {attempts} attempts (level kept: {})",
                        result.level.is_some()
                    );
                    return GenerationResult {
                        success: result.level.is_some(),
                        attempts,
                        ..result
                    };
                }
            }
        }
    }

    /// Build and validate one candidate level from one glyph
    fn generate_from_character(
        &self,
        level_id: u32,
        glyph: &CharacterData,
        mut rng: SeededRandom,
    ) -> GenerationResult {
        let archetype = classify(glyph).archetype;

        let (doodles, mut level) = if archetype == Archetype::General && glyph.strokes.len() >= 2 {
            self.layout_along_strokes(level_id, glyph, &mut rng)
        } else {
            let target_count = doodle_count_for_level(level_id).max(1) as usize;
            self.layout_by_archetype(level_id, glyph, archetype, target_count, &mut rng)
        };
        level.doodles = doodles;

        if is_unlocked(PropKind::Hazard, level_id) {
            let positions: Vec<StrokePoint> = level
                .doodles
                .iter()
                .map(|d| StrokePoint::new(d.x, d.y))
                .collect();
            level.hazards = place_hazards(&positions, level_id, &mut rng);
        }
        if is_unlocked(PropKind::Friction, level_id) && rng.next() < 0.4 {
            level.friction_zones.push(FrictionZonePlacement {
                x: rng.next_int(150, 350) as f32,
                width: rng.next_int(40, 80) as f32,
                kind: if rng.next() < 0.5 {
                    FrictionKind::Ice
                } else {
                    FrictionKind::Sticky
                },
                strength: None,
            });
        }
        // A single pair until multi-portal levels unlock
        if level.portals.len() > 1 && !PropVariant::MultiPortal.unlocked_at_level(level_id) {
            level.portals.truncate(1);
        }

        let mut search_rng = rng.derive("search");
        match find_optimal_inputs(&self.simulator, &level, &mut search_rng, SEARCH_ATTEMPTS) {
            Some(outcome) => {
                strip_unused_props(
                    &mut level,
                    archetype,
                    &outcome.result.springs_hit,
                    &outcome.result.portals_used,
                );
                GenerationResult {
                    success: true,
                    level: Some(level),
                    ghost_replay: Some(outcome.config.inputs),
                    error: None,
                    attempts: 1,
                }
            }
            None => GenerationResult {
                success: false,
                level: Some(level),
                ghost_replay: None,
                error: Some("physics validation failed".to_string()),
                attempts: 1,
            },
        }
    }

    /// Archetype path: transformer samples the target count directly
    fn layout_by_archetype(
        &self,
        level_id: u32,
        glyph: &CharacterData,
        archetype: Archetype,
        target_count: usize,
        rng: &mut SeededRandom,
    ) -> (Vec<DoodlePlacement>, ArcadeLevel) {
        let transformer = StrokeTransformer::new(TransformOptions {
            rotation: *rng.pick(&Rotation::ALL),
            flip_horizontal: rng.next() > 0.5,
            archetype: Some(archetype),
        });
        let mut positions = transformer.doodle_positions(glyph, target_count);
        positions.sort_by(|a, b| a.x.total_cmp(&b.x));

        let doodles: Vec<DoodlePlacement> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| DoodlePlacement {
                x: p.x,
                y: p.y,
                size: if rng.next() > 0.5 {
                    DoodleSize::Large
                } else {
                    DoodleSize::Small
                },
                sprite: if rng.next() > 0.7 { "star" } else { "coin" }.to_string(),
                sequence: i as u32 + 1,
                scale: None,
                motion: None,
            })
            .collect();

        let props = place_props_for_trajectory(&positions, archetype, level_id, rng);
        let level = ArcadeLevel {
            id: level_id,
            landing_target: landing_target_for_level(level_id),
            doodles: Vec::new(),
            springs: props.springs,
            portals: props.portals,
            hazards: Vec::new(),
            wind_zones: Vec::new(),
            gravity_wells: Vec::new(),
            friction_zones: Vec::new(),
        };
        (doodles, level)
    }

    /// Stroke path: follow the glyph's own strokes, populate them at the
    /// level type's coin density, and bridge the gaps between them
    fn layout_along_strokes(
        &self,
        level_id: u32,
        glyph: &CharacterData,
        rng: &mut SeededRandom,
    ) -> (Vec<DoodlePlacement>, ArcadeLevel) {
        let overlays = overlays_from_glyph(glyph);

        let options = PopulateOptions {
            density: stroke_density_for_level(level_id),
            start_id: 1,
            min_spacing: MIN_DOODLE_SPACING,
            scale_multiplier: 1.0,
        };
        let (mut doodles, populated) = populate_strokes(&overlays, &options);
        doodles.truncate(stroke_coin_cap(level_id));
        for d in &mut doodles {
            if rng.next() > 0.9 {
                d.sprite = "star".to_string();
            }
        }
        space_out_doodles(&mut doodles);

        let connections = connect_strokes(&populated, level_id);
        let level = ArcadeLevel {
            id: level_id,
            landing_target: landing_target_for_level(level_id),
            doodles: Vec::new(),
            springs: connections.springs,
            portals: connections.portals,
            hazards: Vec::new(),
            wind_zones: connections.wind_zones,
            gravity_wells: connections.gravity_wells,
            friction_zones: Vec::new(),
        };
        (doodles, level)
    }

    /// Add one helper spring under the flight path and re-validate
    fn try_prop_adjustment(
        &self,
        mut level: ArcadeLevel,
        mut rng: SeededRandom,
    ) -> GenerationResult {
        level.springs.push(SpringPlacement {
            x: rng.next_int(150, 300) as f32,
            y: rng.next_int(160, 200) as f32,
            direction: SpringDirection::Up,
            strength: rng.next_float(1.0, 1.5) as f32,
            timing: None,
            breakable: false,
            scale: None,
        });

        let mut search_rng = rng.derive("search");
        match find_optimal_inputs(
            &self.simulator,
            &level,
            &mut search_rng,
            ADJUST_SEARCH_ATTEMPTS,
        ) {
            Some(outcome) => GenerationResult {
                success: true,
                level: Some(level),
                ghost_replay: Some(outcome.config.inputs),
                error: None,
                attempts: 1,
            },
            None => GenerationResult {
                success: false,
                level: Some(level),
                ghost_replay: None,
                error: Some("prop adjustment failed".to_string()),
                attempts: 1,
            },
        }
    }

    /// Generate a contiguous range of levels. `on_progress` fires once per
    /// level with (current, total, result).
    pub fn generate_batch(
        &self,
        start_level: u32,
        end_level: u32,
        seed: &str,
        mut on_progress: impl FnMut(u32, u32, &GenerationResult),
    ) -> BatchResult {
        let mut batch = BatchResult::default();
        let total = end_level.saturating_sub(start_level) + 1;

        for (done, id) in (start_level..=end_level).enumerate() {
            let result = self.generate_level(id, seed);
            on_progress(done as u32 + 1, total, &result);

            match (&result.level, result.success) {
                (Some(level), true) => {
                    if let Some(replay) = &result.ghost_replay {
                        batch.ghost_replays.insert(id, replay.clone());
                    }
                    batch.levels.push(level.clone());
                }
                _ => batch.failed.push(id),
            }
        }

        log::info!(
            "batch {start_level}..={end_level}: {} generated, {} failed",
            batch.levels.len(),
            batch.failed.len()
        );
        batch
    }
}

/// Stroke curvature and seams between strokes can leave consecutive coins
/// closer than the doodle spacing floor; run the spacing walk over the
/// final collection order
fn space_out_doodles(doodles: &mut [DoodlePlacement]) {
    let mut positions: Vec<Vec2> = doodles.iter().map(|d| Vec2::new(d.x, d.y)).collect();
    enforce_min_spacing(&mut positions);
    for (d, p) in doodles.iter_mut().zip(&positions) {
        d.x = p.x.round();
        d.y = p.y.round();
    }
}

/// Map a glyph's strokes from source space onto the canvas, keeping each
/// stroke a separate polyline with its calligraphic width profile
fn overlays_from_glyph(glyph: &CharacterData) -> Vec<StrokeOverlay> {
    let all: Vec<StrokePoint> = glyph.all_points().collect();
    let Some(first) = all.first() else {
        return Vec::new();
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &all {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let span_x = (max_x - min_x).max(1.0);
    let span_y = (max_y - min_y).max(1.0);

    glyph
        .strokes
        .iter()
        .filter(|s| !s.points.is_empty())
        .map(|s| {
            let points: Vec<StrokePoint> = s
                .points
                .iter()
                .map(|p| {
                    StrokePoint::new(
                        CANVAS_X_MIN + (p.x - min_x) / span_x * (CANVAS_X_MAX - CANVAS_X_MIN),
                        CANVAS_Y_MIN + (p.y - min_y) / span_y * (CANVAS_Y_MAX - CANVAS_Y_MIN),
                    )
                })
                .collect();
            StrokeOverlay {
                widths: stroke_widths(&points),
                points,
                populated: false,
                doodle_ids: Vec::new(),
            }
        })
        .collect()
}
