//! Cancellable timers on top of `gloo_timers` futures.
//!
//! Each armed timer runs as a local task that checks its generation with
//! [`TimerGenerations`] on every wake-up; stale tasks exit without firing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::future::TimeoutFuture;

use super::WebDispatcher;
use crate::page::TimerKind;
use crate::schedule::TimerGenerations;
use crate::viewer::PageEvent;

#[derive(Default)]
pub(crate) struct Timers {
    generations: Rc<RefCell<TimerGenerations>>,
}

impl Timers {
    pub(crate) fn start(
        &mut self,
        kind: TimerKind,
        delay_ms: u32,
        dispatcher: Weak<WebDispatcher>,
    ) {
        let generation = self.generations.borrow_mut().arm(kind);
        let generations = self.generations.clone();
        wasm_bindgen_futures::spawn_local(async move {
            loop {
                TimeoutFuture::new(delay_ms).await;
                if !generations.borrow_mut().claim(kind, generation) {
                    return;
                }
                let Some(dispatcher) = dispatcher.upgrade() else {
                    return;
                };
                dispatcher.dispatch(PageEvent::TimerFired(kind));
                if !kind.repeats() {
                    return;
                }
            }
        });
    }

    pub(crate) fn cancel(&mut self, kind: TimerKind) {
        self.generations.borrow_mut().cancel(kind);
    }

    pub(crate) fn cancel_all(&mut self) {
        self.generations.borrow_mut().cancel_all();
    }
}
