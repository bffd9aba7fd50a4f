//! Single owner of the viewer and its page.
//!
//! Host callbacks (DOM listeners, timers, clipboard completions) all enter
//! through [`Dispatcher::dispatch`]. A callback that fires while another
//! dispatch holds the viewer is queued and handled, in arrival order,
//! before the outer dispatch returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::page::Page;
use crate::queue::EventQueue;
use crate::viewer::{LogViewer, PageEvent, Propagation};

struct Shell<P> {
    viewer: LogViewer,
    page: P,
}

pub struct Dispatcher<P> {
    shell: RefCell<Shell<P>>,
    pending: EventQueue<PageEvent>,
    closed: Cell<bool>,
}

impl<P: Page> Dispatcher<P> {
    pub fn new(viewer: LogViewer, page: P) -> Self {
        Self {
            shell: RefCell::new(Shell { viewer, page }),
            pending: EventQueue::new(),
            closed: Cell::new(false),
        }
    }

    /// Build a dispatcher whose page keeps a weak reference back to it, so
    /// host callbacks created by the page can re-enter.
    pub fn new_cyclic(viewer: LogViewer, page: impl FnOnce(Weak<Self>) -> P) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self::new(viewer, page(weak.clone())))
    }

    pub fn dispatch(&self, event: PageEvent) -> Propagation {
        if self.closed.get() {
            return Propagation::Continue;
        }
        let Ok(mut shell) = self.shell.try_borrow_mut() else {
            if matches!(event, PageEvent::Key(_)) {
                // The originating DOM event is gone by the time the queue drains.
                log::debug!("Key event queued behind a running dispatch; default not prevented");
            }
            self.pending.push(event);
            return Propagation::Continue;
        };
        let Shell { viewer, page } = &mut *shell;
        let propagation = viewer.handle_event(event, page);
        self.drain(viewer, page);
        propagation
    }

    /// Run `f` against the viewer. Returns `None` once closed, or when
    /// called from inside a dispatch.
    pub fn with<R>(&self, f: impl FnOnce(&mut LogViewer, &mut P) -> R) -> Option<R> {
        if self.closed.get() {
            log::debug!("Log viewer destroyed, call ignored");
            return None;
        }
        let Ok(mut shell) = self.shell.try_borrow_mut() else {
            log::warn!("Log viewer busy, call ignored");
            return None;
        };
        let Shell { viewer, page } = &mut *shell;
        let result = f(viewer, page);
        self.drain(viewer, page);
        Some(result)
    }

    /// Stop accepting events and calls. Anything still queued is dropped.
    pub fn close(&self) {
        self.closed.set(true);
        while self.pending.pop().is_some() {}
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn drain(&self, viewer: &mut LogViewer, page: &mut P) {
        while let Some(event) = self.pending.pop() {
            viewer.handle_event(event, page);
        }
    }
}
