//! Presentation sink
//!
//! The core pushes visual and audio updates here and never reads anything
//! back. Rendering and sound synthesis live on the other side of this trait.

use crate::sim::{Cue, Entity, EntityId, GameOutcome};

pub trait PresentationSink {
    fn spawn_visual(&mut self, entity: &Entity);
    fn move_visual(&mut self, id: EntityId, x: f32);
    /// Entity was hit; it stays visible until `remove_visual`
    fn mark_consumed(&mut self, _id: EntityId) {}
    fn remove_visual(&mut self, id: EntityId);
    fn set_craft_visual(&mut self, y: f32);
    fn set_score_display(&mut self, score: u64);
    fn set_high_score_display(&mut self, _score: u64) {}
    fn set_phase_label(&mut self, text: &str);
    fn show_outcome(&mut self, outcome: &GameOutcome);
    fn play_cue(&mut self, _cue: Cue) {}
}

/// Writes every presentation call to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl PresentationSink for LogSink {
    fn spawn_visual(&mut self, entity: &Entity) {
        log::debug!(
            "+ {:?} #{} at y={:.0}",
            entity.kind,
            entity.id,
            entity.pos.y
        );
    }

    fn move_visual(&mut self, _id: EntityId, _x: f32) {}

    fn mark_consumed(&mut self, id: EntityId) {
        log::debug!("* #{id} hit");
    }

    fn remove_visual(&mut self, id: EntityId) {
        log::debug!("- #{id}");
    }

    fn set_craft_visual(&mut self, _y: f32) {}

    fn set_score_display(&mut self, score: u64) {
        log::info!("Score: {score}");
    }

    fn set_high_score_display(&mut self, score: u64) {
        log::info!("Best: {score}");
    }

    fn set_phase_label(&mut self, text: &str) {
        log::info!("{text}");
    }

    fn show_outcome(&mut self, outcome: &GameOutcome) {
        log::info!(
            "{} Final score {} (bonus hits {}/{})",
            outcome.kind.title(),
            outcome.score,
            outcome.bonus_hits,
            outcome.bonus_target
        );
    }

    fn play_cue(&mut self, cue: Cue) {
        log::trace!("cue {:?}", cue);
    }
}

/// One recorded presentation call
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Spawn(EntityId),
    Move(EntityId, f32),
    Consumed(EntityId),
    Remove(EntityId),
    Craft(f32),
    Score(u64),
    HighScore(u64),
    Label(String),
    Outcome(GameOutcome),
    Cue(Cue),
}

/// Records every call, for tests and replay inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<GameOutcome> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Outcome(o) => Some(*o),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Label(l) => Some(l.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<EntityId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Remove(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn spawn_visual(&mut self, entity: &Entity) {
        self.calls.push(SinkCall::Spawn(entity.id));
    }

    fn move_visual(&mut self, id: EntityId, x: f32) {
        self.calls.push(SinkCall::Move(id, x));
    }

    fn mark_consumed(&mut self, id: EntityId) {
        self.calls.push(SinkCall::Consumed(id));
    }

    fn remove_visual(&mut self, id: EntityId) {
        self.calls.push(SinkCall::Remove(id));
    }

    fn set_craft_visual(&mut self, y: f32) {
        self.calls.push(SinkCall::Craft(y));
    }

    fn set_score_display(&mut self, score: u64) {
        self.calls.push(SinkCall::Score(score));
    }

    fn set_high_score_display(&mut self, score: u64) {
        self.calls.push(SinkCall::HighScore(score));
    }

    fn set_phase_label(&mut self, text: &str) {
        self.calls.push(SinkCall::Label(text.to_string()));
    }

    fn show_outcome(&mut self, outcome: &GameOutcome) {
        self.calls.push(SinkCall::Outcome(*outcome));
    }

    fn play_cue(&mut self, cue: Cue) {
        self.calls.push(SinkCall::Cue(cue));
    }
}

impl<P: PresentationSink + ?Sized> PresentationSink for &mut P {
    fn spawn_visual(&mut self, entity: &Entity) {
        (**self).spawn_visual(entity)
    }
    fn move_visual(&mut self, id: EntityId, x: f32) {
        (**self).move_visual(id, x)
    }
    fn mark_consumed(&mut self, id: EntityId) {
        (**self).mark_consumed(id)
    }
    fn remove_visual(&mut self, id: EntityId) {
        (**self).remove_visual(id)
    }
    fn set_craft_visual(&mut self, y: f32) {
        (**self).set_craft_visual(y)
    }
    fn set_score_display(&mut self, score: u64) {
        (**self).set_score_display(score)
    }
    fn set_high_score_display(&mut self, score: u64) {
        (**self).set_high_score_display(score)
    }
    fn set_phase_label(&mut self, text: &str) {
        (**self).set_phase_label(text)
    }
    fn show_outcome(&mut self, outcome: &GameOutcome) {
        (**self).show_outcome(outcome)
    }
    fn play_cue(&mut self, cue: Cue) {
        (**self).play_cue(cue)
    }
}
