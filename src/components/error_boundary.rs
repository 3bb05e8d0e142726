use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::error;

use crate::dom::{Element, Node};
use crate::error::RenderError;
use crate::events::CLICK;

use super::{Component, RenderContext, ids};

/// Contains render failures of its subtree.
///
/// Both `Err` results and panics raised while rendering the child are caught.
/// Once tripped, the boundary keeps showing its fallback until it is reset,
/// through the fallback's retry button.
pub struct ErrorBoundary<C> {
    child: C,
    failure: Rc<RefCell<Option<String>>>,
}

impl<C: Component> ErrorBoundary<C> {
    pub fn new(child: C) -> Self {
        Self {
            child,
            failure: Rc::new(RefCell::new(None)),
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failure.borrow().is_some()
    }

    /// Render the child, or the fallback if it fails. Never fails itself.
    pub fn render_contained(&self, cx: &RenderContext) -> Node {
        if let Some(message) = self.failure.borrow().clone() {
            return self.fallback(cx, &message);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.child.render(cx)));
        let err = match outcome {
            Ok(Ok(node)) => return node,
            Ok(Err(err)) => err,
            Err(payload) => RenderError::Failed(panic_message(payload.as_ref())),
        };
        let message = err.to_string();

        error!(error = %message, "render failed, showing fallback");
        *self.failure.borrow_mut() = Some(message.clone());
        self.fallback(cx, &message)
    }

    fn fallback(&self, cx: &RenderContext, message: &str) -> Node {
        let failure = Rc::clone(&self.failure);
        let scheduler = cx.scheduler().clone();
        Element::new("div")
            .id(ids::FALLBACK)
            .attr("role", "alert")
            .child(Element::new("h2").text("Something went wrong."))
            .child(Element::new("pre").text(message))
            .child(
                Element::new("button")
                    .id(ids::RETRY)
                    .attr("type", "button")
                    .text("Try again")
                    .on(CLICK, move |_| {
                        failure.borrow_mut().take();
                        scheduler.request();
                    }),
            )
            .into()
    }
}

impl<C: Component> Component for ErrorBoundary<C> {
    fn render(&self, cx: &RenderContext) -> Result<Node, RenderError> {
        Ok(self.render_contained(cx))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "component panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::components::RenderScheduler;

    struct Flaky {
        failures_left: Cell<u32>,
        panics: bool,
    }

    impl Component for Flaky {
        fn render(&self, _cx: &RenderContext) -> Result<Node, RenderError> {
            if self.failures_left.get() == 0 {
                return Ok(Element::new("p").id("ok").text("fine").into());
            }
            self.failures_left.set(self.failures_left.get() - 1);
            if self.panics {
                panic!("child exploded");
            }
            Err(RenderError::Failed("bad data".into()))
        }
    }

    fn flaky(failures: u32, panics: bool) -> Flaky {
        Flaky {
            failures_left: Cell::new(failures),
            panics,
        }
    }

    fn cx() -> RenderContext {
        RenderContext::new(RenderScheduler::default())
    }

    #[test]
    fn passes_through_healthy_children() {
        let boundary = ErrorBoundary::new(flaky(0, false));
        let node = boundary.render_contained(&cx());
        assert!(node.find_by_id("ok").is_some());
        assert!(!boundary.has_failed());
    }

    #[test]
    fn contains_render_errors() {
        let boundary = ErrorBoundary::new(flaky(1, false));
        let node = boundary.render_contained(&cx());
        let fallback = node.find_by_id(ids::FALLBACK).expect("fallback rendered");
        assert!(fallback.text_content().contains("Something went wrong."));
        assert!(fallback.text_content().contains("bad data"));
        assert!(boundary.has_failed());
    }

    #[test]
    fn contains_panics() {
        let boundary = ErrorBoundary::new(flaky(1, true));
        let node = boundary.render_contained(&cx());
        assert!(node.text_content().contains("child exploded"));
    }

    #[test]
    fn stays_tripped_until_retried() {
        let boundary = ErrorBoundary::new(flaky(1, false));
        boundary.render_contained(&cx());

        // The child would succeed now, but the boundary keeps its fallback.
        let node = boundary.render_contained(&cx());
        assert!(node.find_by_id(ids::FALLBACK).is_some());

        boundary.failure.borrow_mut().take();
        let node = boundary.render_contained(&cx());
        assert!(node.find_by_id("ok").is_some());
    }

    #[test]
    fn retry_button_resets_and_requests_render() {
        let scheduler = RenderScheduler::default();
        let cx = RenderContext::new(scheduler.clone());
        let boundary = ErrorBoundary::new(flaky(1, false));
        let node = boundary.render_contained(&cx);

        let retry = node.find_by_id(ids::RETRY).expect("retry button");
        for handler in retry.handlers_for(CLICK) {
            handler(&crate::dom::Event::click(ids::RETRY));
        }
        assert!(!boundary.has_failed());
        assert!(scheduler.take());
    }
}
