//! Event names shared by the views and the host.

/// Fired on an element by [`crate::dom::Document::click`].
pub const CLICK: &str = "click";

/// Fired on the window target by [`crate::dom::Document::key`].
/// Listened for by the keyboard shortcuts installed in `App`.
pub const KEYDOWN: &str = "keydown";
