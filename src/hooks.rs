//! Lifecycle-scoped event listener attachment.
//!
//! [`EventListenerHook`] is owned by a view and called on every render with
//! whatever callback the render produced, usually a fresh closure. The
//! callback lands in a single-slot cell; the native listener registered on the
//! target only reads through that cell, so swapping callbacks never touches
//! the registration. The registration itself is keyed by (event name, target)
//! and is detached when either changes, on [`EventListenerHook::unmount`], or
//! when the hook is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::dom::{Document, Event, EventTarget, Listener, ListenerId};

type Callback = Rc<dyn Fn(&Event)>;

struct ActiveBinding {
    event_name: String,
    target: EventTarget,
    id: ListenerId,
}

#[derive(Default)]
pub struct EventListenerHook {
    current: Rc<RefCell<Option<Callback>>>,
    active: Option<ActiveBinding>,
}

impl EventListenerHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen on the document's window target.
    pub fn use_event_listener<F>(&mut self, document: &Document, event_name: &str, callback: F)
    where
        F: Fn(&Event) + 'static,
    {
        let window = document.window();
        self.use_event_listener_on(event_name, callback, Some(&window));
    }

    /// Listen on `target`. A `None` target registers nothing and is not an
    /// error; a previous binding, if any, is still released.
    pub fn use_event_listener_on<F>(
        &mut self,
        event_name: &str,
        callback: F,
        target: Option<&EventTarget>,
    ) where
        F: Fn(&Event) + 'static,
    {
        *self.current.borrow_mut() = Some(Rc::new(callback));

        let unchanged = match (&self.active, target) {
            (Some(active), Some(target)) => {
                active.event_name == event_name && active.target.same(target)
            }
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.detach();
        let Some(target) = target else {
            return;
        };

        let cell = Rc::clone(&self.current);
        let listener: Listener = Rc::new(move |event: &Event| {
            // Clone out of the cell so the callback may re-render and
            // replace itself while running.
            let callback = cell.borrow().clone();
            if let Some(callback) = callback {
                callback(event);
            }
        });
        let id = target.add_event_listener(event_name, listener);
        debug!(event = event_name, on = target.label(), "attached listener");
        self.active = Some(ActiveBinding {
            event_name: event_name.to_string(),
            target: target.clone(),
            id,
        });
    }

    #[cfg(test)]
    fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    /// Detach the listener and forget the callback.
    pub fn unmount(&mut self) {
        self.detach();
        self.current.borrow_mut().take();
    }

    fn detach(&mut self) {
        if let Some(active) = self.active.take() {
            active.target.remove_event_listener(&active.event_name, active.id);
            debug!(
                event = %active.event_name,
                on = active.target.label(),
                "detached listener"
            );
        }
    }
}

impl Drop for EventListenerHook {
    fn drop(&mut self) {
        self.detach();
    }
}
