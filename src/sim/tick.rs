//! One simulation tick
//!
//! Stage order is fixed: due deferred effects → phase → motion → spawn →
//! collision. Each stage sees the mutations of the ones before it.

use super::deferred::{DeferredEffect, DeferredQueue};
use super::motion::DtPolicy;
use super::state::{GameOutcome, GameState};
use super::{collision, motion, phase, spawn};
use crate::Millis;

/// Input sampled for a single tick (latest value wins, nothing is queued)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer height in field coordinates (tracking control)
    pub pointer_y: Option<f32>,
    /// Action pressed since the previous tick (gravity control flap)
    pub action: bool,
}

/// Apply every deferred effect that has come due. Effects scheduled by an
/// earlier game (different epoch) are dropped.
pub fn fire_deferred(state: &mut GameState, deferred: &mut DeferredQueue, now: Millis) {
    for scheduled in deferred.take_due(now) {
        if scheduled.epoch != state.epoch {
            log::debug!(
                "dropping stale {:?} from epoch {} (current {})",
                scheduled.effect,
                scheduled.epoch,
                state.epoch
            );
            continue;
        }
        match scheduled.effect {
            DeferredEffect::RemoveEntity(id) => {
                state.remove_entity(id);
            }
            DeferredEffect::EmitOutcome(kind) => {
                state.finish(kind);
            }
        }
    }
}

/// Advance the game by one tick at clock time `now`
pub fn tick(
    state: &mut GameState,
    deferred: &mut DeferredQueue,
    input: &TickInput,
    now: Millis,
    policy: DtPolicy,
) -> Option<GameOutcome> {
    if state.is_over() {
        return state.outcome;
    }

    let elapsed = now.saturating_sub(state.last_tick_ms);
    state.last_tick_ms = now;
    state.time_ticks += 1;

    fire_deferred(state, deferred, now);
    if state.is_over() {
        return state.outcome;
    }

    phase::advance(state);

    motion::tick(state, input, policy, elapsed);
    if state.is_over() {
        return state.outcome;
    }

    spawn::run_spawners(state, now);

    collision::resolve(state, deferred, now);
    state.outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::sim::state::{GameEvent, OutcomeKind, Phase};
    use crate::tuning::TuningProfile;
    use glam::Vec2;

    fn fresh(epoch: u64) -> GameState {
        GameState::new(TuningProfile::tracking(), epoch, 0, 99)
    }

    #[test]
    fn test_first_tick_only_labels() {
        let mut state = fresh(1);
        let mut queue = DeferredQueue::new();
        let outcome = tick(&mut state, &mut queue, &TickInput::default(), 16, DtPolicy::PerFrame);
        assert!(outcome.is_none());
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PhaseLabel("Hunt: 0/5".to_string())]
        );
    }

    #[test]
    fn test_stale_epoch_effects_are_dropped() {
        let mut state = fresh(2);
        let mut queue = DeferredQueue::new();
        let id = state
            .spawn(EntityKind::Obstacle, Vec2::new(700.0, 60.0), 0)
            .unwrap();
        // Same id, scheduled by a previous game
        queue.schedule(1, 10, DeferredEffect::RemoveEntity(id));
        queue.schedule(1, 10, DeferredEffect::EmitOutcome(OutcomeKind::Destroyed));

        tick(&mut state, &mut queue, &TickInput::default(), 16, DtPolicy::PerFrame);
        assert!(state.entities.get(id).is_some());
        assert!(state.outcome.is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deferred_removal_of_missing_entity_is_noop() {
        let mut state = fresh(1);
        let mut queue = DeferredQueue::new();
        queue.schedule(1, 5, DeferredEffect::RemoveEntity(12345));
        tick(&mut state, &mut queue, &TickInput::default(), 16, DtPolicy::PerFrame);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = fresh(1);
        let mut queue = DeferredQueue::new();
        let pos = state.craft_pos();
        state.spawn(EntityKind::Obstacle, pos, 0);
        let outcome = tick(&mut state, &mut queue, &TickInput::default(), 16, DtPolicy::PerFrame);
        assert!(matches!(outcome.map(|o| o.kind), Some(OutcomeKind::Lethal(_))));

        let ticks = state.time_ticks;
        let input = TickInput {
            pointer_y: Some(40.0),
            action: true,
        };
        for now in [32, 5_000, 50_000] {
            tick(&mut state, &mut queue, &input, now, DtPolicy::PerFrame);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, 0);
        assert_ne!(state.craft.y, 40.0);
    }

    #[test]
    fn test_transition_happens_before_motion_and_spawn() {
        let mut state = fresh(1);
        let mut queue = DeferredQueue::new();
        state.phase.bonus_hit_count = 5;
        state.spawn(EntityKind::Obstacle, Vec2::new(700.0, 60.0), 0);
        // Far enough in the future that every spawner would be ready
        tick(&mut state, &mut queue, &TickInput::default(), 60_000, DtPolicy::PerFrame);
        assert_eq!(state.phase.phase, Phase::FinalPhase);
        assert!(state.entities.hunt_cleared());
        assert!(state.entities.final_target.is_some());
    }
}
