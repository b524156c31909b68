//! Simulation module
//!
//! All gameplay logic lives here. No rendering, audio or platform code:
//! - One `GameState` passed by `&mut` through every stage
//! - Clock time comes in as a parameter
//! - Presentation learns about changes only through drained `GameEvent`s

pub mod collision;
pub mod deferred;
pub mod entity;
pub mod motion;
pub mod phase;
pub mod spawn;
pub mod state;
pub mod tick;

pub use deferred::{DeferredEffect, DeferredQueue};
pub use entity::{AsteroidClass, Entity, EntityId, EntityKind, KindTag, circles_overlap};
pub use motion::DtPolicy;
pub use state::{
    Craft, Cue, EntitySet, GameEvent, GameOutcome, GameState, LethalCause, OutcomeKind, Phase,
    PhaseState,
};
pub use tick::{TickInput, tick};
