use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SLICE: &str = "counter";

pub mod action_types {
    use super::SLICE;

    pub const INCREMENT: &str = const_format::concatcp!(SLICE, "/increment");
    pub const DECREMENT: &str = const_format::concatcp!(SLICE, "/decrement");
    pub const RESET: &str = const_format::concatcp!(SLICE, "/reset");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterIntent {
    Increment,
    Decrement,
    Reset,
}

impl CounterIntent {
    pub fn action_type(self) -> &'static str {
        match self {
            CounterIntent::Increment => action_types::INCREMENT,
            CounterIntent::Decrement => action_types::DECREMENT,
            CounterIntent::Reset => action_types::RESET,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown counter intent `{0}`")]
pub struct UnknownIntent(pub String);

impl FromStr for CounterIntent {
    type Err = UnknownIntent;

    /// Accepts the bare name (`increment`) or the action type
    /// (`counter/increment`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix(SLICE).and_then(|rest| rest.strip_prefix('/')).unwrap_or(s) {
            "increment" => Ok(CounterIntent::Increment),
            "decrement" => Ok(CounterIntent::Decrement),
            "reset" => Ok(CounterIntent::Reset),
            _ => Err(UnknownIntent(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub count: i64,
}

impl CounterState {
    pub fn apply(&mut self, intent: CounterIntent) {
        self.count = apply(intent, self.count);
    }
}

// ── Math ────────────────────────────────────────────────────────────────────

fn apply(intent: CounterIntent, count: i64) -> i64 {
    match intent {
        CounterIntent::Increment => count.saturating_add(1),
        CounterIntent::Decrement => count.saturating_sub(1),
        CounterIntent::Reset => 0,
    }
}
