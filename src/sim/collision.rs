//! Collision detection and scoring
//!
//! Craft vs. every live entity, as circles. Kinds are tested in a fixed order
//! (obstacles, asteroids, bonuses, final target) and a lethal contact stops
//! the pass immediately.

use glam::Vec2;

use super::deferred::{DeferredEffect, DeferredQueue};
use super::entity::{Entity, EntityId};
use super::state::{Cue, GameEvent, GameState, LethalCause, OutcomeKind};
use crate::Millis;

/// First un-hit entity in `list` touching the craft
fn first_contact(list: &[Entity], craft: Vec2, radius: f32) -> Option<EntityId> {
    list.iter()
        .find(|e| !e.hit && e.overlaps(craft, radius))
        .map(|e| e.id)
}

/// Resolve this tick's contacts. Returns the outcome if one became final.
pub fn resolve(
    state: &mut GameState,
    deferred: &mut DeferredQueue,
    now: Millis,
) -> Option<OutcomeKind> {
    if state.is_over() {
        return state.outcome.map(|o| o.kind);
    }
    let craft = state.craft_pos();
    let radius = state.craft.radius;

    // Lethal kinds first; either one ends the game on the spot
    let lethal = [
        (
            first_contact(&state.entities.obstacles, craft, radius),
            LethalCause::Obstacle,
        ),
        (
            first_contact(&state.entities.asteroids, craft, radius),
            LethalCause::Asteroid,
        ),
    ];
    for (contact, cause) in lethal {
        if let Some(id) = contact {
            log::debug!("craft hit {:?} #{id}", cause);
            state.events.push(GameEvent::Cue(Cue::Crash));
            state.finish(OutcomeKind::Lethal(cause));
            return Some(OutcomeKind::Lethal(cause));
        }
    }

    // Bonuses: every touching, un-hit bonus scores once
    let mut consumed = Vec::new();
    for bonus in state.entities.bonuses.iter_mut() {
        if bonus.overlaps(craft, radius) && bonus.mark_hit() {
            consumed.push(bonus.id);
        }
    }
    for id in consumed {
        state.phase.bonus_hit_count += 1;
        log::debug!(
            "bonus #{id} hit ({}/{})",
            state.phase.bonus_hit_count,
            state.tuning.bonus_target
        );
        state.events.push(GameEvent::Consumed(id));
        state.events.push(GameEvent::Cue(Cue::Hit));
        state.add_score(state.tuning.scores.bonus);
        deferred.schedule(
            state.epoch,
            now + state.tuning.delays.bonus_removal_ms,
            DeferredEffect::RemoveEntity(id),
        );
    }

    // Final target: the win, announced after the explosion plays out
    let final_hit = state
        .entities
        .final_target
        .as_mut()
        .filter(|t| t.overlaps(craft, radius))
        .and_then(|t| t.mark_hit().then_some(t.id));
    if let Some(id) = final_hit {
        log::info!("final target destroyed");
        state.events.push(GameEvent::Consumed(id));
        state.events.push(GameEvent::Cue(Cue::Explosion));
        state.add_score(state.tuning.scores.final_target);
        state.outcome_pending = Some(OutcomeKind::Destroyed);
        let delays = state.tuning.delays;
        deferred.schedule(
            state.epoch,
            now + delays.final_target_removal_ms,
            DeferredEffect::RemoveEntity(id),
        );
        deferred.schedule(
            state.epoch,
            now + delays.outcome_display_ms,
            DeferredEffect::EmitOutcome(OutcomeKind::Destroyed),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{AsteroidClass, EntityKind};
    use crate::sim::state::Phase;
    use crate::tuning::TuningProfile;

    fn fresh() -> GameState {
        GameState::new(TuningProfile::tracking(), 3, 0, 1)
    }

    /// A point right on top of the craft
    fn at_craft(state: &GameState) -> Vec2 {
        state.craft_pos()
    }

    #[test]
    fn test_no_contacts_no_outcome() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        state.spawn(EntityKind::Obstacle, Vec2::new(800.0, 50.0), 0);
        assert_eq!(resolve(&mut state, &mut queue, 0), None);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_obstacle_is_lethal_immediately() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        let pos = at_craft(&state);
        state.spawn(EntityKind::Obstacle, pos, 0);
        state.spawn(EntityKind::Bonus, pos, 0);
        let outcome = resolve(&mut state, &mut queue, 0);
        assert_eq!(outcome, Some(OutcomeKind::Lethal(LethalCause::Obstacle)));
        // Short-circuit: the overlapping bonus was never scored
        assert_eq!(state.score, 0);
        assert!(!state.entities.bonuses[0].hit);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_asteroid_cause() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        let pos = at_craft(&state) + Vec2::new(30.0, 0.0);
        state.spawn(EntityKind::Asteroid(AsteroidClass::Boulder), pos, 0);
        assert_eq!(
            resolve(&mut state, &mut queue, 0),
            Some(OutcomeKind::Lethal(LethalCause::Asteroid))
        );
    }

    #[test]
    fn test_bonus_scores_once_and_schedules_removal() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        let pos = at_craft(&state);
        let id = state.spawn(EntityKind::Bonus, pos, 1).unwrap();

        assert_eq!(resolve(&mut state, &mut queue, 1_000), None);
        assert_eq!(state.score, 50);
        assert_eq!(state.phase.bonus_hit_count, 1);
        assert!(state.entities.bonuses[0].hit);

        // Repeated tests against a hit bonus never re-score
        resolve(&mut state, &mut queue, 1_016);
        resolve(&mut state, &mut queue, 1_032);
        assert_eq!(state.score, 50);
        assert_eq!(state.phase.bonus_hit_count, 1);

        let due = queue.take_due(1_500);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].effect, DeferredEffect::RemoveEntity(id));
        assert_eq!(due[0].epoch, 3);
    }

    #[test]
    fn test_final_target_hit_defers_outcome() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        state.phase.phase = Phase::FinalPhase;
        let pos = at_craft(&state);
        state.spawn(EntityKind::FinalTarget, pos, 0);
        state.add_score(250);

        assert_eq!(resolve(&mut state, &mut queue, 2_000), None);
        assert_eq!(state.score, 1_250);
        assert_eq!(state.outcome_pending, Some(OutcomeKind::Destroyed));
        assert!(state.outcome.is_none());

        assert!(queue.take_due(2_799).is_empty());
        let removal = queue.take_due(2_800);
        assert_eq!(removal.len(), 1);
        assert!(matches!(removal[0].effect, DeferredEffect::RemoveEntity(_)));
        let emit = queue.take_due(3_500);
        assert_eq!(
            emit[0].effect,
            DeferredEffect::EmitOutcome(OutcomeKind::Destroyed)
        );
    }

    #[test]
    fn test_final_target_scores_once() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        state.phase.phase = Phase::FinalPhase;
        let pos = at_craft(&state);
        state.spawn(EntityKind::FinalTarget, pos, 0);
        resolve(&mut state, &mut queue, 0);
        resolve(&mut state, &mut queue, 16);
        assert_eq!(state.score, 1_000);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_radius_sum_threshold() {
        let mut state = fresh();
        let mut queue = DeferredQueue::new();
        // craft 20 + bonus 25 = 45; just outside
        let pos = at_craft(&state) + Vec2::new(0.0, 45.0);
        state.spawn(EntityKind::Bonus, pos, 0);
        resolve(&mut state, &mut queue, 0);
        assert_eq!(state.score, 0);
    }
}
