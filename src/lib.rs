//! A counter widget on a single-writer store, mounted into a headless host
//! document behind an error boundary, a store provider and a router.

pub mod app;
pub mod components;
pub mod dom;
pub mod error;
pub mod events;
pub mod hooks;
pub mod host;
pub mod logging;
pub mod render;
pub mod settings;
pub mod state;

pub const APP_ID: &str = "counter";
