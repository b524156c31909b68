//! Game loop driver
//!
//! Owns the current `GameState`, the deferred-effect queue and the three
//! collaborators (presentation, best-score store, clock). The host calls
//! [`GameLoop::frame`] once per rendered frame for as long as it returns true.

use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::platform::{Clock, InputSource};
use crate::presentation::PresentationSink;
use crate::sim::{
    DeferredQueue, DtPolicy, GameEvent, GameOutcome, GameState, TickInput, phase, tick,
};
use crate::tuning::TuningProfile;

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Nothing started yet
    Idle,
    /// Ticking every frame
    Running,
    /// A game ended; waiting for restart
    Terminal,
}

pub struct GameLoop<P, S, C> {
    tuning: TuningProfile,
    policy: DtPolicy,
    sink: P,
    store: S,
    clock: C,
    state: LoopState,
    game: Option<GameState>,
    deferred: DeferredQueue,
    epoch: u64,
    high: HighScore,
    seed: Option<u64>,
}

impl<P: PresentationSink, S: ScoreStore, C: Clock> GameLoop<P, S, C> {
    pub fn new(tuning: TuningProfile, mut sink: P, store: S, clock: C) -> Self {
        let high = HighScore::new(store.high_score());
        sink.set_high_score_display(high.best);
        Self {
            tuning,
            policy: DtPolicy::default(),
            sink,
            store,
            clock,
            state: LoopState::Idle,
            game: None,
            deferred: DeferredQueue::new(),
            epoch: 0,
            high,
            seed: None,
        }
    }

    /// Seed spawn randomness (each game derives its own stream from this)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: DtPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Begin a new game from any state. Counters, collections and phase are
    /// reset, and effects still pending from the previous game become stale.
    pub fn start(&mut self) {
        if let Some(old) = self.game.take() {
            for entity in old.entities.iter() {
                self.sink.remove_visual(entity.id);
            }
        }

        self.epoch += 1;
        let seed = match self.seed {
            Some(seed) => seed.wrapping_add(self.epoch),
            None => rand::random(),
        };
        let now = self.clock.now();
        let mut game = GameState::new(self.tuning.clone(), self.epoch, now, seed);

        self.sink.set_score_display(0);
        self.sink.set_craft_visual(game.craft.y);
        phase::advance(&mut game);
        self.game = Some(game);
        self.flush_events();

        self.state = LoopState::Running;
        log::info!("Game {} started ({} control)", self.epoch, self.tuning.name);
    }

    /// Start over after a game ended. Identical to [`GameLoop::start`].
    pub fn restart(&mut self) {
        self.start();
    }

    /// Run one tick with already-sampled input. Returns whether the host
    /// should schedule another frame.
    pub fn frame(&mut self, input: &TickInput) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        let now = self.clock.now();
        let Some(game) = self.game.as_mut() else {
            return false;
        };

        let outcome = tick(game, &mut self.deferred, input, now, self.policy);
        self.flush_events();
        self.sync_visuals();

        if outcome.is_some() {
            self.state = LoopState::Terminal;
            return false;
        }
        true
    }

    /// Sample `input` and run one tick
    pub fn frame_from<I: InputSource + ?Sized>(&mut self, input: &mut I) -> bool {
        let sampled = input.sample();
        self.frame(&sampled)
    }

    fn flush_events(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        for event in game.drain_events() {
            match event {
                GameEvent::Spawned(entity) => self.sink.spawn_visual(&entity),
                GameEvent::Consumed(id) => self.sink.mark_consumed(id),
                GameEvent::Removed(id) => self.sink.remove_visual(id),
                GameEvent::ScoreChanged(score) => {
                    self.sink.set_score_display(score);
                    if self.high.record(score) {
                        self.store.set_high_score(score);
                        self.sink.set_high_score_display(score);
                    }
                }
                GameEvent::PhaseLabel(label) => self.sink.set_phase_label(&label),
                GameEvent::Cue(cue) => self.sink.play_cue(cue),
                GameEvent::Outcome(outcome) => self.sink.show_outcome(&outcome),
            }
        }
    }

    fn sync_visuals(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        self.sink.set_craft_visual(game.craft.y);
        for entity in game.entities.iter().filter(|e| !e.hit) {
            self.sink.move_visual(entity.id, entity.pos.x);
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Direct access to the running game (scripted scenarios, debugging)
    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.game.as_ref().and_then(|g| g.outcome)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn high_score(&self) -> u64 {
        self.high.best
    }

    pub fn tuning(&self) -> &TuningProfile {
        &self.tuning
    }

    pub fn pending_effects(&self) -> usize {
        self.deferred.len()
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
