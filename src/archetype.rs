//! Layout archetypes and their coordinate-transform table
//!
//! An archetype is a closed tag that decides how a glyph's geometry maps onto
//! the play area. Each tag has an associated record of transform parameters -
//! pure configuration data the [`crate::transform`] module dispatches on.

use serde::{Deserialize, Serialize};

use crate::world_for_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Wide glyph, horizontal traversal in a narrow altitude band
    Runner,
    /// Top-heavy glyph, full-height descent
    Diver,
    /// Tall bottom-heavy glyph, inverted Y so play climbs upward
    Climber,
    /// Alternating stroke orientations, doodles bounce between two bands
    Zigzag,
    /// Edge-clustered glyph, points pushed outward, portal wrap expected
    Perimeter,
    /// Two distinct clusters bridged by a portal
    Split,
    /// No strong pattern, plain linear mapping
    General,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Runner,
        Archetype::Diver,
        Archetype::Climber,
        Archetype::Zigzag,
        Archetype::Perimeter,
        Archetype::Split,
        Archetype::General,
    ];
}

/// A closed interval used for bands and clusters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Linear map of t in [0,1] into the band
    #[inline]
    pub fn lerp(self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }
}

/// Per-archetype coordinate-mapping parameters. No behavior, just data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeTransform {
    pub x_range: Band,
    pub y_range: Band,
    pub invert_y: bool,
    /// Alternate Y between these two bands by point-index parity
    pub alternate_bands: Option<(Band, Band)>,
    /// Pull points away from the normalized center before mapping
    pub push_to_edges: bool,
    /// Alternate X between left/right clusters by point-index parity
    pub bifurcate_x: Option<(Band, Band)>,
}

impl ArchetypeTransform {
    const fn linear(x_range: Band, y_range: Band) -> Self {
        Self {
            x_range,
            y_range,
            invert_y: false,
            alternate_bands: None,
            push_to_edges: false,
            bifurcate_x: None,
        }
    }
}

/// Transform parameter table, keyed by archetype
pub fn transform_for(archetype: Archetype) -> ArchetypeTransform {
    match archetype {
        Archetype::Runner => {
            ArchetypeTransform::linear(Band::new(50.0, 400.0), Band::new(90.0, 150.0))
        }
        Archetype::Diver => {
            ArchetypeTransform::linear(Band::new(80.0, 350.0), Band::new(40.0, 190.0))
        }
        Archetype::Climber => ArchetypeTransform {
            invert_y: true,
            ..ArchetypeTransform::linear(Band::new(120.0, 280.0), Band::new(30.0, 190.0))
        },
        Archetype::Zigzag => ArchetypeTransform {
            alternate_bands: Some((Band::new(40.0, 100.0), Band::new(130.0, 190.0))),
            ..ArchetypeTransform::linear(Band::new(50.0, 400.0), Band::new(40.0, 190.0))
        },
        Archetype::Perimeter => ArchetypeTransform {
            push_to_edges: true,
            ..ArchetypeTransform::linear(Band::new(50.0, 400.0), Band::new(30.0, 190.0))
        },
        Archetype::Split => ArchetypeTransform {
            bifurcate_x: Some((Band::new(60.0, 150.0), Band::new(280.0, 380.0))),
            ..ArchetypeTransform::linear(Band::new(50.0, 400.0), Band::new(40.0, 180.0))
        },
        Archetype::General => {
            ArchetypeTransform::linear(Band::new(50.0, 400.0), Band::new(40.0, 180.0))
        }
    }
}

/// Which mechanic placements an archetype cannot play without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropRequirements {
    pub springs: bool,
    pub portals: bool,
}

impl Archetype {
    pub fn required_props(self) -> PropRequirements {
        match self {
            Archetype::Climber | Archetype::Zigzag => PropRequirements {
                springs: true,
                portals: false,
            },
            Archetype::Perimeter | Archetype::Split => PropRequirements {
                springs: false,
                portals: true,
            },
            _ => PropRequirements {
                springs: false,
                portals: false,
            },
        }
    }

    /// What to do with props the validated solution never touched
    pub fn unused_prop_strategy(self) -> UnusedPropStrategy {
        match self {
            Archetype::Runner | Archetype::Diver => UnusedPropStrategy::Remove,
            _ => UnusedPropStrategy::Keep,
        }
    }
}

/// Runner/diver levels are stripped clean; every other archetype keeps
/// unused props as decoration or alternative-path puzzle material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedPropStrategy {
    Remove,
    Keep,
}

/// Dominant archetype, dominance share, and fallbacks for one world
fn world_config(world: u32) -> (Archetype, f64, &'static [Archetype]) {
    use Archetype::*;
    const REMIX: &[Archetype] = &[Runner, Diver, Climber, Zigzag, Perimeter, Split];
    match world {
        0 | 1 => (Runner, 1.0, &[]),
        2 => (Runner, 0.9, &[Diver]),
        3 => (Diver, 0.8, &[Runner]),
        4 => (Climber, 0.7, &[Runner, Diver]),
        5 => (Runner, 0.7, &[Climber, Diver]),
        6 => (Zigzag, 0.7, &[Runner, Diver]),
        7 => (Climber, 0.6, &[Zigzag, Runner]),
        8..=11 => (General, 0.5, &[Runner, Diver, Climber, Zigzag]),
        12 => (Perimeter, 0.4, &[Runner, Diver, Climber, Zigzag]),
        13 => (Split, 0.4, &[Runner, Diver, Climber, Zigzag, Perimeter]),
        14 => (General, 0.4, REMIX),
        15 => (Runner, 0.6, &[Diver, Climber, Zigzag, Perimeter, Split]),
        16 => (Climber, 0.6, &[Zigzag, Runner, Diver, Perimeter, Split]),
        17 => (Perimeter, 0.6, &[Split, Runner, Diver, Climber, Zigzag]),
        _ => (General, 0.3, REMIX),
    }
}

/// Archetype for a world given a uniform roll in [0,1)
pub fn archetype_for_world(world: u32, roll: f64) -> Archetype {
    let (dominant, dominance, fallbacks) = world_config(world);

    if roll < dominance || fallbacks.is_empty() {
        return dominant;
    }

    // Distribute the remaining probability mass across the fallbacks
    let fallback_roll = (roll - dominance) / (1.0 - dominance);
    let idx = (fallback_roll * fallbacks.len() as f64) as usize;
    fallbacks[idx.min(fallbacks.len() - 1)]
}

/// Archetype for a specific level id
pub fn archetype_for_level(level: u32, roll: f64) -> Archetype {
    archetype_for_world(world_for_level(level), roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_one_is_all_runner() {
        for i in 0..20 {
            let roll = i as f64 / 20.0;
            assert_eq!(archetype_for_level(1, roll), Archetype::Runner);
            assert_eq!(archetype_for_level(10, roll), Archetype::Runner);
        }
    }

    #[test]
    fn test_dominance_split() {
        // World 3: diver 80%, runner fallback
        assert_eq!(archetype_for_world(3, 0.0), Archetype::Diver);
        assert_eq!(archetype_for_world(3, 0.79), Archetype::Diver);
        assert_eq!(archetype_for_world(3, 0.81), Archetype::Runner);
        assert_eq!(archetype_for_world(3, 0.99), Archetype::Runner);
    }

    #[test]
    fn test_fallback_distribution_covers_all() {
        // World 13 fallbacks include perimeter at the top of the roll range
        assert_eq!(archetype_for_world(13, 0.999), Archetype::Perimeter);
        assert_eq!(archetype_for_world(13, 0.41), Archetype::Runner);
    }

    #[test]
    fn test_deep_worlds_use_remix_config() {
        assert_eq!(archetype_for_world(25, 0.0), Archetype::General);
        assert_eq!(archetype_for_world(99, 0.0), Archetype::General);
    }

    #[test]
    fn test_transform_table_values() {
        let runner = transform_for(Archetype::Runner);
        assert_eq!(runner.y_range, Band::new(90.0, 150.0));
        assert!(!runner.invert_y);

        let climber = transform_for(Archetype::Climber);
        assert!(climber.invert_y);
        assert_eq!(climber.x_range, Band::new(120.0, 280.0));

        let split = transform_for(Archetype::Split);
        let (left, right) = split.bifurcate_x.unwrap();
        assert_eq!(left, Band::new(60.0, 150.0));
        assert_eq!(right, Band::new(280.0, 380.0));

        assert!(transform_for(Archetype::Perimeter).push_to_edges);
        assert!(transform_for(Archetype::Zigzag).alternate_bands.is_some());
    }

    #[test]
    fn test_prop_requirements() {
        assert!(Archetype::Climber.required_props().springs);
        assert!(Archetype::Perimeter.required_props().portals);
        assert!(!Archetype::Runner.required_props().springs);
        assert_eq!(
            Archetype::Diver.unused_prop_strategy(),
            UnusedPropStrategy::Remove
        );
        assert_eq!(
            Archetype::Split.unused_prop_strategy(),
            UnusedPropStrategy::Keep
        );
    }

    #[test]
    fn test_serde_tag_names() {
        let json = serde_json::to_string(&Archetype::Zigzag).unwrap();
        assert_eq!(json, "\"zigzag\"");
        let back: Archetype = serde_json::from_str("\"perimeter\"").unwrap();
        assert_eq!(back, Archetype::Perimeter);
    }
}
