//! Event queue for callbacks that fire while a dispatch is in progress.

use std::cell::RefCell;
use std::collections::VecDeque;

/// A single-threaded FIFO that can be pushed to through a shared reference.
pub struct EventQueue<T> {
    inner: RefCell<VecDeque<T>>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(VecDeque::new()),
        }
    }

    pub fn push(&self, event: T) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Take the oldest event. The queue is not borrowed once this returns,
    /// so handlers may push while the caller processes the event.
    pub fn pop(&self) -> Option<T> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
