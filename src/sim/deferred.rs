//! Timer-scheduled effects
//!
//! Delayed removals and the delayed win announcement. Each entry carries the
//! epoch of the game that scheduled it; when it comes due in a different game
//! it is dropped instead of applied.

use super::entity::EntityId;
use super::state::OutcomeKind;
use crate::Millis;

/// A state mutation applied some time after the tick that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEffect {
    RemoveEntity(EntityId),
    EmitOutcome(OutcomeKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due_ms: Millis,
    pub epoch: u64,
    pub effect: DeferredEffect,
    seq: u64,
}

/// Pending deferred effects. Outlives individual games.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire-once effect
    pub fn schedule(&mut self, epoch: u64, due_ms: Millis, effect: DeferredEffect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due_ms,
            epoch,
            effect,
            seq,
        });
    }

    /// Remove and return everything due at `now`, earliest first (ties in scheduling order)
    pub fn take_due(&mut self, now: Millis) -> Vec<Scheduled> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now);
        self.pending = rest;
        due.sort_by_key(|s| (s.due_ms, s.seq));
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
