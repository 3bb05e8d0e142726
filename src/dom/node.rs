use std::fmt;
use std::rc::Rc;

use super::target::Event;

/// Declarative handler attached to an element, the `onClick` of a view.
pub type Handler = Rc<dyn Fn(&Event)>;

#[derive(Clone, Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        match self {
            Node::Element(el) => el.find_by_id(id),
            Node::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

#[derive(Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    handlers: Vec<(String, Handler)>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<&str> = self.handlers.iter().map(|(e, _)| e.as_str()).collect();
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("handlers", &events)
            .finish()
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn on(mut self, event_name: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.handlers.push((event_name.to_string(), Rc::new(handler)));
        self
    }

    pub fn handlers_for(&self, event_name: &str) -> Vec<Handler> {
        self.handlers
            .iter()
            .filter(|(name, _)| name == event_name)
            .map(|(_, h)| Rc::clone(h))
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.collect_text(&mut out));
        out
    }
}
