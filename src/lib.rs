//! Navigation core for a remote-controlled media browser.
//!
//! The crate is organized around a small set of singletons owned by the
//! [`nav::Shell`]: an event bus for decoupled commands, a layered key
//! dispatch stack, a view lifecycle stack with per-view state restore, and a
//! menu model driving the top-level navigation. Feature modules contribute
//! views, menu entries and command listeners on top of that core.

pub mod config;
pub mod locale;
pub mod modules;
pub mod nav;
pub mod platform;
pub mod views;
