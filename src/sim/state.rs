//! Game state and core simulation types
//!
//! One `GameState` per game. Every stage takes it by `&mut` and nothing else
//! holds game data between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, KindTag};
use super::spawn::SpawnTimers;
use crate::tuning::TuningProfile;
use crate::{Millis, clamp_between};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Bonus targets are being hunted
    Hunt,
    /// The final target is on the field; nothing else spawns
    FinalPhase,
}

/// Phase plus the counters that gate the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    pub bonus_hit_count: u32,
    pub bonus_total_spawned: u32,
    pub final_target_spawned: bool,
    /// Last label pushed to presentation (so it is only sent on change)
    #[serde(skip)]
    pub shown_label: Option<String>,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self {
            phase: Phase::Hunt,
            bonus_hit_count: 0,
            bonus_total_spawned: 0,
            final_target_spawned: false,
            shown_label: None,
        }
    }
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub y: f32,
    /// Vertical velocity (always zero in tracking mode)
    pub vel: f32,
    pub radius: f32,
}

impl Craft {
    pub fn new(y: f32, radius: f32) -> Self {
        Self { y, vel: 0.0, radius }
    }
}

/// What killed the craft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LethalCause {
    Obstacle,
    Asteroid,
}

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Lethal(LethalCause),
    /// The final target left the field untouched
    Escaped,
    /// The final target was destroyed (the win)
    Destroyed,
}

impl OutcomeKind {
    pub fn is_win(&self) -> bool {
        matches!(self, OutcomeKind::Destroyed)
    }

    pub fn title(&self) -> &'static str {
        match self {
            OutcomeKind::Lethal(LethalCause::Obstacle) => "Rocket crashed! You hit a planet.",
            OutcomeKind::Lethal(LethalCause::Asteroid) => "Asteroid impact!",
            OutcomeKind::Escaped => "The target escaped!",
            OutcomeKind::Destroyed => "Target destroyed!",
        }
    }
}

/// Terminal result of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub kind: OutcomeKind,
    pub score: u64,
    pub bonus_hits: u32,
    pub bonus_target: u32,
    pub final_target_spawned: bool,
}

/// Sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Flap,
    Hit,
    Explosion,
    Crash,
}

/// Changes the presentation layer needs to hear about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned(Entity),
    /// Entity was hit and will be removed after a delay
    Consumed(EntityId),
    Removed(EntityId),
    ScoreChanged(u64),
    PhaseLabel(String),
    Cue(Cue),
    Outcome(GameOutcome),
}

/// Live entities, one ordered collection per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    pub obstacles: Vec<Entity>,
    pub asteroids: Vec<Entity>,
    pub bonuses: Vec<Entity>,
    pub final_target: Option<Entity>,
}

impl EntitySet {
    /// All live entities in collision order (obstacles, asteroids, bonuses, final target)
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.obstacles
            .iter()
            .chain(self.asteroids.iter())
            .chain(self.bonuses.iter())
            .chain(self.final_target.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.obstacles
            .iter_mut()
            .chain(self.asteroids.iter_mut())
            .chain(self.bonuses.iter_mut())
            .chain(self.final_target.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
            + self.asteroids.len()
            + self.bonuses.len()
            + usize::from(self.final_target.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.iter().find(|e| e.id == id)
    }

    fn insert(&mut self, entity: Entity) {
        match entity.kind.tag() {
            KindTag::Obstacle => self.obstacles.push(entity),
            KindTag::Asteroid => self.asteroids.push(entity),
            KindTag::Bonus => self.bonuses.push(entity),
            KindTag::FinalTarget => self.final_target = Some(entity),
        }
    }

    /// Remove by id from whichever collection holds it
    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        if self.final_target.as_ref().is_some_and(|e| e.id == id) {
            return self.final_target.take();
        }
        for list in [&mut self.obstacles, &mut self.asteroids, &mut self.bonuses] {
            if let Some(idx) = list.iter().position(|e| e.id == id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    /// True while no hunt-phase entity is live
    pub fn hunt_cleared(&self) -> bool {
        self.obstacles.is_empty() && self.asteroids.is_empty() && self.bonuses.is_empty()
    }
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Identifies this game instance; deferred effects from other epochs are ignored
    pub epoch: u64,
    pub tuning: TuningProfile,
    pub score: u64,
    pub phase: PhaseState,
    pub craft: Craft,
    pub entities: EntitySet,
    pub timers: SpawnTimers,
    /// Win announced but still waiting for the explosion to play out
    pub outcome_pending: Option<OutcomeKind>,
    /// Set once; after this no tick mutates the game
    pub outcome: Option<GameOutcome>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Clock time of the previous tick
    pub last_tick_ms: Millis,
    pub rng: Pcg32,
    /// Events for presentation, drained by the loop after each tick
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a fresh game started at `now`
    pub fn new(tuning: TuningProfile, epoch: u64, now: Millis, seed: u64) -> Self {
        let craft = Craft::new(
            clamp_between(tuning.craft_start_y, tuning.craft_min_y, tuning.craft_max_y),
            tuning.radii.craft,
        );
        let timers = SpawnTimers::new(&tuning, now);
        Self {
            epoch,
            tuning,
            score: 0,
            phase: PhaseState::default(),
            craft,
            entities: EntitySet::default(),
            timers,
            outcome_pending: None,
            outcome: None,
            time_ticks: 0,
            last_tick_ms: now,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn craft_pos(&self) -> Vec2 {
        Vec2::new(self.tuning.craft_x(), self.craft.y)
    }

    /// Whether an entity of this kind may be created right now
    pub fn may_spawn(&self, tag: KindTag) -> bool {
        if self.is_over() || self.outcome_pending.is_some() {
            return false;
        }
        match tag {
            KindTag::Obstacle | KindTag::Asteroid => self.phase.phase == Phase::Hunt,
            KindTag::Bonus => {
                self.phase.phase == Phase::Hunt
                    && self.phase.bonus_total_spawned < self.tuning.bonus_target
            }
            KindTag::FinalTarget => {
                self.phase.phase == Phase::FinalPhase && !self.phase.final_target_spawned
            }
        }
    }

    /// Create an entity at `pos`. Refuses (returns None) when the phase or
    /// bonus cap forbids the kind; that is the single place those rules live.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, visual: u8) -> Option<EntityId> {
        let tag = kind.tag();
        if !self.may_spawn(tag) {
            return None;
        }
        let (collision_radius, speed_factor) = match kind {
            EntityKind::Obstacle => (self.tuning.radii.obstacle, 1.0),
            EntityKind::Asteroid(class) => (self.tuning.radii.asteroid, class.speed_factor()),
            EntityKind::Bonus => (self.tuning.radii.bonus, 1.0),
            EntityKind::FinalTarget => (
                self.tuning.radii.final_target,
                self.tuning.final_target_speed_factor,
            ),
        };
        match tag {
            KindTag::Bonus => self.phase.bonus_total_spawned += 1,
            KindTag::FinalTarget => self.phase.final_target_spawned = true,
            _ => {}
        }
        let id = self.next_entity_id();
        let entity = Entity {
            id,
            kind,
            pos,
            collision_radius,
            hit: false,
            speed_factor,
            visual,
        };
        log::debug!("spawned {:?} #{id} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.events.push(GameEvent::Spawned(entity.clone()));
        self.entities.insert(entity);
        Some(id)
    }

    /// Remove an entity. Missing ids are a no-op (double removal, stale timers).
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(id);
        if removed.is_some() {
            self.events.push(GameEvent::Removed(id));
        }
        removed
    }

    /// Drop every obstacle, asteroid and bonus at once
    pub fn purge_hunt_entities(&mut self) {
        let purged: Vec<EntityId> = self
            .entities
            .obstacles
            .drain(..)
            .chain(self.entities.asteroids.drain(..))
            .chain(self.entities.bonuses.drain(..))
            .map(|e| e.id)
            .collect();
        if !purged.is_empty() {
            log::debug!("purged {} hunt entities", purged.len());
        }
        self.events.extend(purged.into_iter().map(GameEvent::Removed));
    }

    pub fn add_score(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Record the terminal outcome. Only the first call has any effect.
    pub fn finish(&mut self, kind: OutcomeKind) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        let outcome = GameOutcome {
            kind,
            score: self.score,
            bonus_hits: self.phase.bonus_hit_count,
            bonus_target: self.tuning.bonus_target,
            final_target_spawned: self.phase.final_target_spawned,
        };
        log::info!("game over: {:?} with score {}", kind, self.score);
        self.outcome = Some(outcome);
        self.outcome_pending = None;
        self.events.push(GameEvent::Outcome(outcome));
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
