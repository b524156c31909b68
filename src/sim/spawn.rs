//! Time-gated entity spawning with a difficulty ramp

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{AsteroidClass, Entity, EntityKind, KindTag};
use super::state::GameState;
use crate::Millis;
use crate::tuning::{SpawnCadence, TuningProfile};

/// Cooldown for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub last_spawn_ms: Millis,
    pub interval_ms: Millis,
}

impl SpawnTimer {
    fn new(cadence: &SpawnCadence, now: Millis) -> Self {
        Self {
            last_spawn_ms: now,
            interval_ms: cadence.interval_ms,
        }
    }

    /// Strictly more than one interval has passed since the last spawn
    pub fn ready(&self, now: Millis) -> bool {
        now.saturating_sub(self.last_spawn_ms) > self.interval_ms
    }
}

/// Per-kind cooldowns. The final target has none; it is spawned on the phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub obstacle: SpawnTimer,
    pub bonus: SpawnTimer,
    pub asteroid: SpawnTimer,
}

impl SpawnTimers {
    /// Cooldowns start at game start, so the first spawn of each kind waits one interval
    pub fn new(tuning: &TuningProfile, now: Millis) -> Self {
        Self {
            obstacle: SpawnTimer::new(&tuning.obstacle, now),
            bonus: SpawnTimer::new(&tuning.bonus, now),
            asteroid: SpawnTimer::new(&tuning.asteroid, now),
        }
    }

    pub fn get(&self, tag: KindTag) -> Option<&SpawnTimer> {
        match tag {
            KindTag::Obstacle => Some(&self.obstacle),
            KindTag::Bonus => Some(&self.bonus),
            KindTag::Asteroid => Some(&self.asteroid),
            KindTag::FinalTarget => None,
        }
    }

    fn get_mut(&mut self, tag: KindTag) -> Option<&mut SpawnTimer> {
        match tag {
            KindTag::Obstacle => Some(&mut self.obstacle),
            KindTag::Bonus => Some(&mut self.bonus),
            KindTag::Asteroid => Some(&mut self.asteroid),
            KindTag::FinalTarget => None,
        }
    }
}

fn cadence(tuning: &TuningProfile, tag: KindTag) -> Option<&SpawnCadence> {
    match tag {
        KindTag::Obstacle => Some(&tuning.obstacle),
        KindTag::Bonus => Some(&tuning.bonus),
        KindTag::Asteroid => Some(&tuning.asteroid),
        KindTag::FinalTarget => None,
    }
}

/// Random spawn height within the field margins
fn random_y(state: &mut GameState) -> f32 {
    let lo = state.tuning.spawn_margin;
    let hi = state.tuning.field_height - state.tuning.spawn_margin;
    if hi > lo {
        state.rng.random_range(lo..hi)
    } else {
        state.tuning.field_height / 2.0
    }
}

/// Spawn one entity of `tag` if its cooldown has elapsed and the phase allows it
pub fn try_spawn(state: &mut GameState, tag: KindTag, now: Millis) -> Option<Entity> {
    if !state.may_spawn(tag) {
        return None;
    }
    let timer = *state.timers.get(tag)?;
    if !timer.ready(now) {
        return None;
    }

    let variants = tag.visual_variants();
    let visual = state.rng.random_range(0..variants);
    let kind = match tag {
        KindTag::Obstacle => EntityKind::Obstacle,
        KindTag::Bonus => EntityKind::Bonus,
        KindTag::Asteroid => {
            let idx = state.rng.random_range(0..AsteroidClass::ALL.len());
            EntityKind::Asteroid(AsteroidClass::ALL[idx])
        }
        KindTag::FinalTarget => return None,
    };
    let pos = Vec2::new(
        state.tuning.field_width + state.tuning.spawn_offset_x,
        random_y(state),
    );
    let id = state.spawn(kind, pos, visual)?;

    // Ramp difficulty: each spawn shortens the next wait, down to the floor
    let next_interval = cadence(&state.tuning, tag).map(|c| c.decayed(timer.interval_ms));
    if let (Some(timer), Some(interval)) = (state.timers.get_mut(tag), next_interval) {
        timer.last_spawn_ms = now;
        timer.interval_ms = interval;
    }
    state.entities.get(id).cloned()
}

/// Run every cooldown-gated spawner once
pub fn run_spawners(state: &mut GameState, now: Millis) {
    for tag in [KindTag::Obstacle, KindTag::Bonus, KindTag::Asteroid] {
        try_spawn(state, tag, now);
    }
}

/// Spawn the single final target, vertically centered just past the right edge
pub fn spawn_final_target(state: &mut GameState) -> Option<Entity> {
    let pos = Vec2::new(
        // Fully off-screen on entry
        state.tuning.field_width + state.tuning.radii.final_target * 2.0,
        state.tuning.field_height / 2.0,
    );
    let id = state.spawn(EntityKind::FinalTarget, pos, 0)?;
    state.entities.get(id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Phase;

    fn fresh() -> GameState {
        GameState::new(TuningProfile::tracking(), 1, 1_000, 42)
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = fresh();
        // Exactly one interval is not enough; the gate is strict
        assert!(try_spawn(&mut state, KindTag::Obstacle, 5_000).is_none());
        assert!(try_spawn(&mut state, KindTag::Obstacle, 5_001).is_some());
    }

    #[test]
    fn test_spawn_within_margins() {
        let mut state = fresh();
        let mut now = 1_000;
        for _ in 0..50 {
            now += 5_000;
            if let Some(entity) = try_spawn(&mut state, KindTag::Obstacle, now) {
                assert!(entity.pos.y >= 60.0 && entity.pos.y < 340.0);
                assert_eq!(entity.pos.x, 860.0);
                assert!(entity.visual < 9);
            }
        }
    }

    #[test]
    fn test_obstacle_interval_ramps_to_floor() {
        let mut state = fresh();
        let mut now = 1_000;
        for _ in 0..40 {
            now += 10_000;
            try_spawn(&mut state, KindTag::Obstacle, now);
        }
        assert_eq!(state.timers.obstacle.interval_ms, 2_000);
    }

    #[test]
    fn test_asteroid_ramp_and_speed_factor() {
        let mut state = fresh();
        let entity = try_spawn(&mut state, KindTag::Asteroid, 5_000).unwrap();
        assert_eq!(state.timers.asteroid.interval_ms, 2_950);
        let EntityKind::Asteroid(class) = entity.kind else {
            panic!("expected asteroid, got {:?}", entity.kind);
        };
        assert_eq!(entity.speed_factor, class.speed_factor());
    }

    #[test]
    fn test_bonus_interval_is_fixed() {
        let mut state = fresh();
        try_spawn(&mut state, KindTag::Bonus, 5_000).unwrap();
        assert_eq!(state.timers.bonus.interval_ms, 3_000);
        assert_eq!(state.timers.bonus.last_spawn_ms, 5_000);
    }

    #[test]
    fn test_bonus_stops_at_target() {
        let mut state = fresh();
        let mut now = 1_000;
        let mut spawned = 0;
        for _ in 0..20 {
            now += 4_000;
            if try_spawn(&mut state, KindTag::Bonus, now).is_some() {
                spawned += 1;
            }
        }
        assert_eq!(spawned, 5);
        assert_eq!(state.phase.bonus_total_spawned, 5);
    }

    #[test]
    fn test_nothing_spawns_in_final_phase() {
        let mut state = fresh();
        state.phase.phase = Phase::FinalPhase;
        for tag in [KindTag::Obstacle, KindTag::Bonus, KindTag::Asteroid] {
            assert!(try_spawn(&mut state, tag, 100_000).is_none());
        }
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_final_target_centered_and_unique() {
        let mut state = fresh();
        state.phase.phase = Phase::FinalPhase;
        let target = spawn_final_target(&mut state).unwrap();
        assert_eq!(target.pos.y, 200.0);
        assert_eq!(target.speed_factor, 0.5);
        assert!(spawn_final_target(&mut state).is_none());
    }
}
