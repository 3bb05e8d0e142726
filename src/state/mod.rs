pub mod counter;
mod store;

use serde::Serialize;

pub use counter::{CounterIntent, CounterState};
pub use store::{Reducer, Store, Subscription};

/// Everything the application keeps in its store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RootState {
    pub counter: CounterState,
}

impl Reducer for RootState {
    type Intent = CounterIntent;

    fn reduce(&mut self, intent: &CounterIntent) {
        self.counter.apply(*intent);
    }
}

pub type AppStore = Store<RootState>;

/// Read projection exposed to views: `state.counter.count`.
pub fn select_count(state: &RootState) -> i64 {
    state.counter.count
}
