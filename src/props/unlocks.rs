//! Prop unlock schedule
//!
//! Mechanics are introduced one world at a time so early levels stay
//! readable. Variants (timed, breakable, multi-portal) unlock later than
//! their base prop.

use crate::world_for_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Spring,
    Portal,
    Wind,
    Gravity,
    Hazard,
    Friction,
}

impl PropKind {
    pub const ALL: [PropKind; 6] = [
        PropKind::Spring,
        PropKind::Portal,
        PropKind::Wind,
        PropKind::Gravity,
        PropKind::Hazard,
        PropKind::Friction,
    ];

    /// First world in which this prop may appear
    pub fn unlock_world(self) -> u32 {
        match self {
            PropKind::Spring => 1,
            PropKind::Portal => 3,
            PropKind::Wind => 5,
            PropKind::Gravity => 7,
            PropKind::Hazard => 9,
            PropKind::Friction => 11,
        }
    }
}

/// Later twists on already-unlocked props
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropVariant {
    TimedSprings,
    MultiPortal,
    TimedPortals,
    BreakableSprings,
}

impl PropVariant {
    pub fn unlock_world(self) -> u32 {
        match self {
            PropVariant::TimedSprings => 7,
            PropVariant::MultiPortal => 13,
            PropVariant::TimedPortals => 15,
            PropVariant::BreakableSprings => 17,
        }
    }

    pub fn unlocked_at_level(self, level: u32) -> bool {
        world_for_level(level) >= self.unlock_world()
    }
}

/// Whether a prop kind may appear on the given level
pub fn is_unlocked(prop: PropKind, level: u32) -> bool {
    world_for_level(level) >= prop.unlock_world()
}

/// All prop kinds available at the given level
pub fn available_props(level: u32) -> Vec<PropKind> {
    let world = world_for_level(level);
    PropKind::ALL
        .into_iter()
        .filter(|p| world >= p.unlock_world())
        .collect()
}

/// The prop kind introduced by this level's world, if any
pub fn newly_unlocked_prop(level: u32) -> Option<PropKind> {
    let world = world_for_level(level);
    PropKind::ALL.into_iter().find(|p| p.unlock_world() == world)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_schedule() {
        assert!(is_unlocked(PropKind::Spring, 1));
        assert!(!is_unlocked(PropKind::Portal, 20));
        assert!(is_unlocked(PropKind::Portal, 21));
        assert!(!is_unlocked(PropKind::Friction, 100));
        assert!(is_unlocked(PropKind::Friction, 101));
    }

    #[test]
    fn test_available_props_grow_monotonically() {
        let mut prev = 0;
        for level in [1, 21, 41, 61, 81, 101] {
            let n = available_props(level).len();
            assert!(n > prev, "level {level} lost props");
            prev = n;
        }
        assert_eq!(available_props(101).len(), PropKind::ALL.len());
    }

    #[test]
    fn test_newly_unlocked() {
        assert_eq!(newly_unlocked_prop(1), Some(PropKind::Spring));
        assert_eq!(newly_unlocked_prop(25), Some(PropKind::Portal));
        assert_eq!(newly_unlocked_prop(15), None);
    }

    #[test]
    fn test_variant_unlocks() {
        assert!(!PropVariant::TimedSprings.unlocked_at_level(60));
        assert!(PropVariant::TimedSprings.unlocked_at_level(61));
        assert!(PropVariant::MultiPortal.unlocked_at_level(125));
        assert!(!PropVariant::BreakableSprings.unlocked_at_level(160));
        assert!(PropVariant::BreakableSprings.unlocked_at_level(165));
    }
}
