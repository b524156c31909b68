//! Hunt → final phase progression

use super::spawn::spawn_final_target;
use super::state::{GameEvent, GameState, Phase};

/// HUD label for the current phase
pub fn phase_label(state: &GameState) -> String {
    match state.phase.phase {
        Phase::Hunt => format!(
            "Hunt: {}/{}",
            state.phase.bonus_hit_count, state.tuning.bonus_target
        ),
        Phase::FinalPhase => "Final phase: destroy the target!".to_string(),
    }
}

/// Advance the phase machine. Returns true on the tick the final phase begins.
///
/// The transition fires at most once per game: it spawns the final target and
/// purges every obstacle, asteroid and bonus still on the field.
pub fn advance(state: &mut GameState) -> bool {
    let mut transitioned = false;
    if state.phase.phase == Phase::Hunt
        && state.phase.bonus_hit_count >= state.tuning.bonus_target
        && !state.phase.final_target_spawned
    {
        log::info!(
            "final phase reached after {} bonus hits",
            state.phase.bonus_hit_count
        );
        state.phase.phase = Phase::FinalPhase;
        state.purge_hunt_entities();
        transitioned = spawn_final_target(state).is_some();
    }

    let label = phase_label(state);
    if state.phase.shown_label.as_deref() != Some(label.as_str()) {
        state.events.push(GameEvent::PhaseLabel(label.clone()));
        state.phase.shown_label = Some(label);
    }
    transitioned
}
