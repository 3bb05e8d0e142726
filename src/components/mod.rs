pub mod counter;
pub mod error_boundary;
pub mod provider;
pub mod router;

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::Node;
use crate::error::RenderError;
use crate::state::AppStore;

pub mod ids {
    use crate::APP_ID;

    pub const ROOT: &str = "root";
    pub const COUNT: &str = const_format::concatcp!(APP_ID, "-count");
    pub const INCREMENT: &str = const_format::concatcp!(APP_ID, "-increment");
    pub const DECREMENT: &str = const_format::concatcp!(APP_ID, "-decrement");
    pub const RESET: &str = const_format::concatcp!(APP_ID, "-reset");
    pub const FALLBACK: &str = const_format::concatcp!(APP_ID, "-fallback");
    pub const RETRY: &str = const_format::concatcp!(APP_ID, "-retry");
    pub const NOT_FOUND: &str = const_format::concatcp!(APP_ID, "-not-found");
}

pub trait Component {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError>;
}

impl Component for Box<dyn Component> {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        (**self).render(cx)
    }
}

/// Coalesces re-render requests until the host flushes.
#[derive(Clone, Default)]
pub struct RenderScheduler {
    pending: Rc<Cell<bool>>,
}

impl RenderScheduler {
    pub fn request(&self) {
        self.pending.set(true);
    }

    /// Returns whether a render was requested, clearing the request.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

/// What a component can reach while rendering. Providers hand a narrowed copy
/// down to their children.
#[derive(Clone)]
pub struct RenderContext {
    scheduler: RenderScheduler,
    store: Option<AppStore>,
}

impl RenderContext {
    pub fn new(scheduler: RenderScheduler) -> Self {
        Self {
            scheduler,
            store: None,
        }
    }

    pub fn with_store(&self, store: AppStore) -> Self {
        Self {
            store: Some(store),
            ..self.clone()
        }
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn store(&self, component: &'static str) -> Result<&AppStore, RenderError> {
        self.store
            .as_ref()
            .ok_or(RenderError::MissingProvider(component))
    }
}
