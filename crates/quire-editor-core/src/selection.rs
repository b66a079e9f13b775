//! Selection capture across modal interruptions.
//!
//! Opening a dialog moves focus away from the editable surface, which can
//! collapse or drop the live selection. The bridge takes a detached copy
//! before the dialog opens and reinstates it right before insertion.

use crate::error::PlatformError;

/// A captured selection range plus the text it covered.
///
/// Only valid until the next mutation of the editable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection<R> {
    pub range: R,
    pub text: String,
}

impl<R> PendingSelection<R> {
    pub fn new(range: R, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Whether the captured range covered any text.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Platform-specific selection capture and restore.
///
/// The browser implementation clones the DOM `Range` from
/// `window.getSelection()`; test fakes can use plain offsets.
pub trait SelectionBridge {
    /// Detached copy of a live range.
    type Range: Clone;

    /// Read the live selection if it lies within the editable surface.
    fn capture(&self) -> Option<PendingSelection<Self::Range>>;

    /// Make `pending` the live selection again.
    fn restore(&self, pending: &PendingSelection<Self::Range>) -> Result<(), PlatformError>;
}
