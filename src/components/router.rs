use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::dom::{Element, Node};
use crate::error::RenderError;

use super::{Component, RenderContext, RenderScheduler, ids};

pub const HOME: &str = "/";

/// Handle for changing the current location from outside the tree.
#[derive(Clone)]
pub struct Navigator {
    location: Rc<RefCell<String>>,
    scheduler: RenderScheduler,
}

impl Navigator {
    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    /// Move to `path`. A render is scheduled only if the location changed.
    pub fn navigate(&self, path: &str) {
        let next = normalize(path);
        if *self.location.borrow() == next {
            return;
        }
        debug!(from = %self.location.borrow(), to = %next, "navigating");
        *self.location.borrow_mut() = next;
        self.scheduler.request();
    }
}

/// Navigation root: the home page at `/`, a not-found page anywhere else.
pub struct Router<H> {
    navigator: Navigator,
    home: H,
}

impl<H: Component> Router<H> {
    pub fn new(scheduler: RenderScheduler, home: H) -> Self {
        Self {
            navigator: Navigator {
                location: Rc::new(RefCell::new(HOME.to_string())),
                scheduler,
            },
            home,
        }
    }

    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }
}

impl<H: Component> Component for Router<H> {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        let location = self.navigator.location();
        let page = if location == HOME {
            self.home.render(cx)?
        } else {
            not_found(&location)
        };
        Ok(Element::new("main").attr("data-location", location).child(page).into())
    }
}

fn not_found(location: &str) -> Node {
    Element::new("section")
        .id(ids::NOT_FOUND)
        .child(Element::new("h2").text("Page not found"))
        .child(Element::new("p").text(format!("Nothing lives at {location}.")))
        .into()
}

/// Drop query and fragment, force a leading slash, drop a trailing one.
fn normalize(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        HOME.to_string()
    } else {
        format!("/{trimmed}")
    }
}
