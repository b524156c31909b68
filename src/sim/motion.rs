//! Per-tick movement of the craft and every live entity

use super::entity::KindTag;
use super::state::{Cue, GameEvent, GameState, OutcomeKind};
use super::tick::TickInput;
use crate::consts::{MAX_FRAME_SCALE, REFERENCE_FRAME_MS};
use crate::tuning::ControlScheme;
use crate::{Millis, clamp_between, clamp_sample};

/// How far a tick advances the world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DtPolicy {
    /// One tick is one reference frame, whatever the wall time
    #[default]
    PerFrame,
    /// Scale by elapsed clock time relative to a reference frame
    Elapsed { reference_frame_ms: f32 },
}

impl DtPolicy {
    pub fn elapsed() -> Self {
        DtPolicy::Elapsed {
            reference_frame_ms: REFERENCE_FRAME_MS,
        }
    }

    /// Movement multiplier for a tick spanning `elapsed_ms`
    pub fn frame_scale(&self, elapsed_ms: Millis) -> f32 {
        match *self {
            DtPolicy::PerFrame => 1.0,
            DtPolicy::Elapsed { reference_frame_ms } => {
                if reference_frame_ms <= 0.0 {
                    return 1.0;
                }
                (elapsed_ms as f32 / reference_frame_ms).clamp(0.0, MAX_FRAME_SCALE)
            }
        }
    }
}

/// Apply sampled input and integrate the craft. Leaves it inside its bounds.
pub fn move_craft(state: &mut GameState, input: &TickInput, scale: f32) {
    let min_y = state.tuning.craft_min_y;
    let max_y = state.tuning.craft_max_y;
    let craft = &mut state.craft;

    match state.tuning.control {
        ControlScheme::Gravity {
            gravity,
            flap_impulse,
        } => {
            if input.action {
                craft.vel = flap_impulse;
                state.events.push(GameEvent::Cue(Cue::Flap));
            }
            craft.vel += gravity * scale;
            craft.y += craft.vel * scale;
            if craft.y < min_y {
                craft.y = min_y;
                craft.vel = 0.0;
            }
            if craft.y > max_y {
                craft.y = max_y;
                craft.vel = 0.0;
            }
        }
        ControlScheme::Tracking => {
            craft.vel = 0.0;
            if let Some(y) = input.pointer_y.and_then(|y| clamp_sample(y, min_y, max_y)) {
                craft.y = y;
            }
        }
    }

    // A bad tuning or NaN from a previous tick must not leak out of bounds
    if !craft.y.is_finite() {
        craft.y = min_y;
        craft.vel = 0.0;
    }
    craft.y = clamp_between(craft.y, min_y, max_y);
}

/// Scroll every un-hit entity left. Hit entities hold still until their deferred removal.
pub fn move_entities(state: &mut GameState, scale: f32) {
    let step = state.tuning.base_speed * scale;
    for entity in state.entities.iter_mut().filter(|e| !e.hit) {
        entity.pos.x -= step * entity.speed_factor;
    }
}

/// Remove entities that scrolled past their threshold.
/// Evaded obstacles score; an escaped final target ends the game.
pub fn cull(state: &mut GameState) {
    let cull = state.tuning.cull;
    let mut evaded = 0u64;
    let mut culled = Vec::new();

    for entity in state.entities.iter().filter(|e| !e.hit) {
        let threshold = match entity.kind.tag() {
            KindTag::Obstacle => cull.obstacle,
            KindTag::Asteroid => cull.asteroid,
            KindTag::Bonus => cull.bonus,
            KindTag::FinalTarget => cull.final_target,
        };
        if entity.pos.x < threshold {
            if entity.kind.tag() == KindTag::Obstacle {
                evaded += 1;
            }
            culled.push((entity.id, entity.kind.tag()));
        }
    }

    for (id, tag) in culled {
        state.remove_entity(id);
        if tag == KindTag::FinalTarget {
            log::info!("final target escaped");
            state.finish(OutcomeKind::Escaped);
            return;
        }
    }
    state.add_score(evaded * state.tuning.scores.evade);
}

/// Full motion stage
pub fn tick(state: &mut GameState, input: &TickInput, policy: DtPolicy, elapsed_ms: Millis) {
    let scale = policy.frame_scale(elapsed_ms);
    move_craft(state, input, scale);
    move_entities(state, scale);
    cull(state);
}
