use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::debug;

/// State that knows how to apply its own intents.
pub trait Reducer {
    type Intent: std::fmt::Debug;

    fn reduce(&mut self, intent: &Self::Intent);
}

type ObserverRc<S> = Rc<dyn Fn(&S)>;
type ObserverWeak<S> = Weak<dyn Fn(&S)>;

struct StoreInner<S: Reducer> {
    state: RefCell<S>,
    version: Cell<u64>,
    observers: RefCell<Vec<ObserverWeak<S>>>,
    queue: RefCell<VecDeque<S::Intent>>,
    draining: Cell<bool>,
}

/// Single-writer state container.
///
/// The only way to change the state is [`Store::dispatch`]. Clones are
/// handles to the same container.
///
/// # Invariants
///
/// 1. Intents are applied one at a time, in dispatch order.
/// 2. `version` increments by exactly 1 per applied intent.
/// 3. Observers run after each committed intent and only ever see the state
///    with that intent fully applied.
/// 4. An intent dispatched from inside an observer is queued and applied
///    once the current notification round has finished.
pub struct Store<S: Reducer> {
    inner: Rc<StoreInner<S>>,
}

impl<S: Reducer> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Reducer + Default + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Keeps an observer registered. Dropping it unregisters the observer.
#[must_use = "dropping the subscription unregisters the observer"]
pub struct Subscription {
    _guard: Box<dyn Any>,
}

/// Resets the draining flag even if a reducer or observer panics, so the
/// store stays usable behind an error boundary. Intents queued by the
/// aborted round are dropped with it.
struct DrainGuard<'a, S: Reducer>(&'a StoreInner<S>);

impl<S: Reducer> Drop for DrainGuard<'_, S> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.queue.borrow_mut().clear();
        }
        self.0.draining.set(false);
    }
}

impl<S: Reducer + 'static> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                version: Cell::new(0),
                observers: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                draining: Cell::new(false),
            }),
        }
    }

    pub fn dispatch(&self, intent: S::Intent) {
        self.inner.queue.borrow_mut().push_back(intent);
        if self.inner.draining.replace(true) {
            // The outer dispatch drains the queue after its notification round.
            return;
        }
        let _guard = DrainGuard(&*self.inner);

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(intent) = next else { break };
            self.inner.state.borrow_mut().reduce(&intent);
            let version = self.inner.version.get() + 1;
            self.inner.version.set(version);
            debug!(?intent, version, "applied intent");
            self.notify();
        }
    }

    /// Read a projection of the current state.
    pub fn select<T>(&self, projection: impl FnOnce(&S) -> T) -> T {
        projection(&*self.inner.state.borrow())
    }

    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Register an observer: `on_change` runs after a committed intent
    /// whenever `projection` yields a value different from the last one seen.
    pub fn subscribe<T, P, F>(&self, projection: P, on_change: F) -> Subscription
    where
        T: PartialEq + 'static,
        P: Fn(&S) -> T + 'static,
        F: Fn(&T) + 'static,
    {
        let last = RefCell::new(self.select(&projection));
        let observer: ObserverRc<S> = Rc::new(move |state: &S| {
            let next = projection(state);
            if *last.borrow() == next {
                return;
            }
            on_change(&next);
            *last.borrow_mut() = next;
        });
        self.inner
            .observers
            .borrow_mut()
            .push(Rc::downgrade(&observer));
        Subscription {
            _guard: Box::new(observer),
        }
    }

    /// Number of registered observers, including dropped ones not yet pruned.
    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn notify(&self) {
        let live: Vec<ObserverRc<S>> = {
            let mut observers = self.inner.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        let state = self.inner.state.borrow();
        for observer in live {
            observer(&*state);
        }
    }
}
