use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use crate::error::ViewerError;

type Callback = Closure<dyn FnMut(Event)>;

/// DOM listeners registered by the viewer. Dropping the registry
/// unregisters every callback.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(EventTarget, &'static str, Callback)>,
}

impl Listeners {
    pub(crate) fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), ViewerError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.entries.push((target.clone(), event, callback));
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        for (target, event, callback) in self.entries.drain(..) {
            if let Err(e) =
                target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", event, e);
            }
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}
