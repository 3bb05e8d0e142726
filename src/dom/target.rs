use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// A native listener as registered on an [`EventTarget`].
pub type Listener = Rc<dyn Fn(&Event)>;

/// Handle returned by [`EventTarget::add_event_listener`]; removal is by
/// handle, so the exact registration is always the one detached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: String,
    pub key: Option<String>,
    pub target_id: Option<String>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            target_id: None,
        }
    }

    pub fn keydown(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(crate::events::KEYDOWN)
        }
    }

    pub fn click(target_id: impl Into<String>) -> Self {
        Self {
            target_id: Some(target_id.into()),
            ..Self::new(crate::events::CLICK)
        }
    }
}

struct Registration {
    event_name: String,
    id: ListenerId,
    listener: Listener,
}

struct TargetInner {
    label: String,
    next_id: Cell<u64>,
    registrations: RefCell<Vec<Registration>>,
}

/// Shared handle to something events can be dispatched on.
///
/// Clones refer to the same target; [`EventTarget::same`] compares identity.
#[derive(Clone)]
pub struct EventTarget {
    inner: Rc<TargetInner>,
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("label", &self.inner.label)
            .field("listeners", &self.inner.registrations.borrow().len())
            .finish()
    }
}

impl EventTarget {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(TargetInner {
                label: label.into(),
                next_id: Cell::new(1),
                registrations: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn same(&self, other: &EventTarget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn add_event_listener(&self, event_name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0.wrapping_add(1));
        self.inner.registrations.borrow_mut().push(Registration {
            event_name: event_name.to_string(),
            id,
            listener,
        });
        id
    }

    /// Returns `false` when no such registration exists (already removed or
    /// registered under another event name).
    pub fn remove_event_listener(&self, event_name: &str, id: ListenerId) -> bool {
        let mut regs = self.inner.registrations.borrow_mut();
        let before = regs.len();
        regs.retain(|r| !(r.id == id && r.event_name == event_name));
        regs.len() != before
    }

    /// Invoke every listener registered for `event.kind`, in registration
    /// order. Returns how many listeners ran.
    ///
    /// Listeners run from a snapshot so they may add or remove registrations
    /// while dispatching. A listener removed mid-dispatch is skipped; one
    /// added mid-dispatch first fires on the next dispatch.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .inner
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.event_name == event.kind)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect();

        let mut invoked = 0;
        for (id, listener) in snapshot {
            if !self.is_registered(id) {
                continue;
            }
            listener(event);
            invoked += 1;
        }
        trace!(on = %self.inner.label, kind = %event.kind, invoked, "dispatched event");
        invoked
    }

    pub fn listener_count(&self, event_name: &str) -> usize {
        self.inner
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.event_name == event_name)
            .count()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.inner.registrations.borrow().iter().any(|r| r.id == id)
    }
}
