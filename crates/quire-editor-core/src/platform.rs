//! Platform abstraction traits for editor operations.
//!
//! These traits define the interface between the editor logic and
//! platform-specific implementations (browser DOM, test fakes). The session
//! only ever talks to the page through them.

use crate::error::{HostError, PlatformError};
use crate::selection::SelectionBridge;
use crate::toolbar::{FormatQuery, ToolbarView};

/// Which surface is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Wysiwyg,
    /// Raw markup editing in the text surface.
    Raw,
}

/// Everything the session needs from the page around one editor.
pub trait EditorPlatform: FormatQuery + ToolbarView + SelectionBridge {
    /// Serialized markup of the editable surface.
    fn surface_html(&self) -> String;

    /// Overwrite the editable surface.
    fn set_surface_html(&mut self, markup: &str);

    /// Text of the raw markup surface, if the editor has one.
    fn raw_text(&self) -> Option<String>;

    /// Overwrite the raw markup surface. No-op without one.
    fn set_raw_text(&mut self, text: &str);

    /// Show one surface and hide the other.
    fn show_view(&mut self, mode: ViewMode);

    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Run a formatting primitive (`execCommand`) on the editable surface.
    fn exec(&mut self, command: &str, value: Option<&str>) -> Result<(), PlatformError>;

    /// Insert markup at the current selection.
    fn insert_html(&mut self, markup: &str) -> Result<(), PlatformError>;

    /// Insert literal text at the current selection.
    fn insert_text(&mut self, text: &str) -> Result<(), PlatformError>;

    /// Give the editable surface keyboard focus.
    fn focus_surface(&self);
}

/// Change notifications to the host collaborator.
///
/// Errors mean the host side is gone or its callback threw; the session
/// discards them and never retries.
pub trait HostChannel {
    fn notify(&self, markup: &str) -> Result<(), HostError>;
}

impl<F> HostChannel for F
where
    F: Fn(&str) -> Result<(), HostError>,
{
    fn notify(&self, markup: &str) -> Result<(), HostError> {
        self(markup)
    }
}
