use crate::dom::Node;
use crate::error::RenderError;
use crate::state::{AppStore, RootState, Subscription};

use super::{Component, RenderContext, RenderScheduler};

/// Makes the store reachable from every descendant and binds store changes
/// to re-renders: each committed intent that changes the state schedules one.
pub struct StoreProvider<C> {
    store: AppStore,
    child: C,
    _binding: Subscription,
}

impl<C: Component> StoreProvider<C> {
    pub fn new(store: AppStore, scheduler: &RenderScheduler, child: C) -> Self {
        let scheduler = scheduler.clone();
        let binding = store.subscribe(|state: &RootState| state.clone(), move |_| scheduler.request());
        Self {
            store,
            child,
            _binding: binding,
        }
    }
}

impl<C: Component> Component for StoreProvider<C> {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        self.child.render(&cx.with_store(self.store.clone()))
    }
}
