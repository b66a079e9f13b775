//! Browser DOM layer for the quire rich-text editor.
//!
//! This crate implements the `quire-editor-core` platform traits on top of
//! `web-sys` and wires DOM events to an `EditorSession`. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: mount element and surface lookup
//! - `platform`: `DomPlatform`, the `EditorPlatform` implementation
//! - `cursor`: Selection API capture and restore
//! - `clipboard`: paste payload extraction
//! - `events`: per-instance listeners (gloo-events)
//! - `timer`: debounce timer on `setTimeout` (gloo-timers)
//! - `dialog`: modal link and table dialogs
//! - `instance`: `EditorInstance`, one mounted editor
//!
//! # Re-exports
//!
//! This crate re-exports `quire-editor-core` for convenience, so consumers
//! only need to depend on `quire-editor-browser`.

// Re-export core crate
pub use quire_editor_core;
pub use quire_editor_core::*;

pub mod clipboard;
pub mod cursor;
pub mod dialog;
pub mod dom;
pub mod events;
pub mod instance;
pub mod platform;
pub mod timer;

pub use clipboard::paste_data;
pub use events::{control_command, key_combo};
pub use instance::{BrowserSession, EditorInstance, HostCallback, Outbox};
pub use platform::DomPlatform;
pub use timer::TimeoutTimer;
