//! Generation bookkeeping for cancellable timers.
//!
//! A host timer cannot be recalled once its wake-up is queued. Instead each
//! arm hands out a fresh generation, and a wake-up only fires when its
//! generation is still the live one for that kind.

use std::collections::HashMap;

use crate::page::TimerKind;

#[derive(Debug, Default)]
pub struct TimerGenerations {
    live: HashMap<TimerKind, u64>,
    next: u64,
}

impl TimerGenerations {
    /// Arm `kind`, superseding any earlier generation of it.
    pub fn arm(&mut self, kind: TimerKind) -> u64 {
        self.next += 1;
        self.live.insert(kind, self.next);
        self.next
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.live.remove(&kind);
    }

    pub fn cancel_all(&mut self) {
        self.live.clear();
    }

    pub fn is_live(&self, kind: TimerKind, generation: u64) -> bool {
        self.live.get(&kind) == Some(&generation)
    }

    /// Called when a wake-up for `generation` arrives. Returns whether the
    /// timer should fire; a one-shot timer is retired by firing.
    pub fn claim(&mut self, kind: TimerKind, generation: u64) -> bool {
        if !self.is_live(kind, generation) {
            return false;
        }
        if !kind.repeats() {
            self.live.remove(&kind);
        }
        true
    }
}
