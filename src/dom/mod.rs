//! Headless host document: mount points holding committed element trees,
//! plus the window target that stands in for the global browsing context.

mod node;
mod target;

pub use node::{Element, Node};
pub use target::{Event, EventTarget, Listener, ListenerId};

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::events::CLICK;
use crate::render::render_markup;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("no element with id `{0}`")]
    ElementNotFound(String),
}

struct MountPoint {
    id: String,
    tree: Option<Node>,
}

impl MountPoint {
    fn container(&self) -> Element {
        let el = Element::new("div").id(self.id.clone());
        match &self.tree {
            Some(tree) => el.child(tree.clone()),
            None => el,
        }
    }
}

struct DocumentInner {
    window: EventTarget,
    mounts: RefCell<Vec<MountPoint>>,
}

/// Cheap to clone; all clones see the same document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                window: EventTarget::new("window"),
                mounts: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Add an empty container element the application can be attached to.
    pub fn with_mount_point(self, id: &str) -> Self {
        if !self.has_mount_point(id) {
            self.inner.mounts.borrow_mut().push(MountPoint {
                id: id.to_string(),
                tree: None,
            });
        }
        self
    }

    pub fn window(&self) -> EventTarget {
        self.inner.window.clone()
    }

    pub fn has_mount_point(&self, id: &str) -> bool {
        self.inner.mounts.borrow().iter().any(|m| m.id == id)
    }

    /// Replace whatever is attached under `mount_id` with `tree`.
    pub fn commit(&self, mount_id: &str, tree: Node) -> Result<(), DomError> {
        let mut mounts = self.inner.mounts.borrow_mut();
        let mount = mounts
            .iter_mut()
            .find(|m| m.id == mount_id)
            .ok_or_else(|| DomError::ElementNotFound(mount_id.to_string()))?;
        mount.tree = Some(tree);
        Ok(())
    }

    pub fn clear(&self, mount_id: &str) {
        if let Some(mount) = self.inner.mounts.borrow_mut().iter_mut().find(|m| m.id == mount_id) {
            mount.tree = None;
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        let mounts = self.inner.mounts.borrow();
        mounts.iter().find_map(|m| {
            if m.id == id {
                Some(m.container())
            } else {
                m.tree.as_ref().and_then(|t| t.find_by_id(id)).cloned()
            }
        })
    }

    pub fn text_content(&self, id: &str) -> Option<String> {
        self.get_element_by_id(id).map(|el| el.text_content())
    }

    /// Fire a click on the element with `id`. Returns the number of handlers
    /// that ran.
    pub fn click(&self, id: &str) -> Result<usize, DomError> {
        let el = self
            .get_element_by_id(id)
            .ok_or_else(|| DomError::ElementNotFound(id.to_string()))?;
        let event = Event::click(id);
        let handlers = el.handlers_for(CLICK);
        for handler in &handlers {
            handler(&event);
        }
        Ok(handlers.len())
    }

    /// Deliver a keydown to the window target.
    pub fn key(&self, key: &str) -> usize {
        self.inner.window.dispatch_event(&Event::keydown(key))
    }

    pub fn markup(&self) -> String {
        self.inner
            .mounts
            .borrow()
            .iter()
            .map(|m| render_markup(&m.container().into()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
