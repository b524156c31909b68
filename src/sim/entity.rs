//! Spawned entities (pure data)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entity identifier, unique within a game
pub type EntityId = u32;

/// Asteroid classes - cosmetic size plus a speed multiplier that does affect motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidClass {
    Comet,
    Boulder,
    DarkMoon,
    Cinder,
    NewMoon,
}

impl AsteroidClass {
    pub const ALL: [AsteroidClass; 5] = [
        AsteroidClass::Comet,
        AsteroidClass::Boulder,
        AsteroidClass::DarkMoon,
        AsteroidClass::Cinder,
        AsteroidClass::NewMoon,
    ];

    pub fn speed_factor(&self) -> f32 {
        match self {
            AsteroidClass::Comet => 1.2,
            AsteroidClass::Boulder => 1.0,
            AsteroidClass::DarkMoon => 0.8,
            AsteroidClass::Cinder => 1.5,
            AsteroidClass::NewMoon => 0.6,
        }
    }
}

/// Entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Lethal planet
    Obstacle,
    /// Lethal asteroid, moves at its class speed
    Asteroid(AsteroidClass),
    /// Hunt target, scores on contact
    Bonus,
    /// The single final-phase target
    FinalTarget,
}

/// Kinds without payload, used for per-kind bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Obstacle,
    Asteroid,
    Bonus,
    FinalTarget,
}

impl KindTag {
    /// Number of cosmetic variants the presentation layer has for this kind
    pub fn visual_variants(&self) -> u8 {
        match self {
            KindTag::Obstacle => 9,
            KindTag::Asteroid => 1,
            KindTag::Bonus => 3,
            KindTag::FinalTarget => 1,
        }
    }
}

impl EntityKind {
    pub fn tag(&self) -> KindTag {
        match self {
            EntityKind::Obstacle => KindTag::Obstacle,
            EntityKind::Asteroid(_) => KindTag::Asteroid,
            EntityKind::Bonus => KindTag::Bonus,
            EntityKind::FinalTarget => KindTag::FinalTarget,
        }
    }

    /// Touching this kind ends the game
    pub fn is_lethal(&self) -> bool {
        matches!(self, EntityKind::Obstacle | EntityKind::Asteroid(_))
    }
}

/// A spawned obstacle or target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Center position; x decreases as the field scrolls, y is fixed at spawn
    pub pos: Vec2,
    pub collision_radius: f32,
    /// Set once on contact, never cleared
    pub hit: bool,
    pub speed_factor: f32,
    /// Cosmetic variant index
    pub visual: u8,
}

impl Entity {
    /// Circle overlap test against another extent
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.collision_radius, center, radius)
    }

    /// Latch the hit flag. Returns false if the entity was already hit.
    pub fn mark_hit(&mut self) -> bool {
        if self.hit {
            return false;
        }
        self.hit = true;
        true
    }
}

/// Two circular extents collide iff their centers are closer than the radius sum
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus_at(x: f32, y: f32) -> Entity {
        Entity {
            id: 1,
            kind: EntityKind::Bonus,
            pos: Vec2::new(x, y),
            collision_radius: 25.0,
            hit: false,
            speed_factor: 1.0,
            visual: 0,
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        // Exactly touching is not a collision
        assert!(!circles_overlap(Vec2::ZERO, 20.0, Vec2::new(45.0, 0.0), 25.0));
        assert!(circles_overlap(Vec2::ZERO, 20.0, Vec2::new(44.9, 0.0), 25.0));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Vec2::new(10.0, 3.0);
        let b = Vec2::new(40.0, 20.0);
        assert_eq!(
            circles_overlap(a, 12.0, b, 25.0),
            circles_overlap(b, 25.0, a, 12.0)
        );
    }

    #[test]
    fn test_mark_hit_latches_once() {
        let mut bonus = bonus_at(0.0, 0.0);
        assert!(bonus.mark_hit());
        assert!(!bonus.mark_hit());
        assert!(bonus.hit);
    }

    #[test]
    fn test_lethal_kinds() {
        assert!(EntityKind::Obstacle.is_lethal());
        assert!(EntityKind::Asteroid(AsteroidClass::Cinder).is_lethal());
        assert!(!EntityKind::Bonus.is_lethal());
        assert!(!EntityKind::FinalTarget.is_lethal());
    }

    #[test]
    fn test_entity_overlap_uses_own_radius() {
        let bonus = bonus_at(100.0, 100.0);
        assert!(bonus.overlaps(Vec2::new(100.0, 140.0), 20.0));
        assert!(!bonus.overlaps(Vec2::new(100.0, 150.0), 20.0));
    }
}
