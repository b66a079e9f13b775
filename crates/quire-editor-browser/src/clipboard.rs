//! Paste payload extraction.

use quire_editor_core::PasteData;

/// Read the HTML and plain-text flavours of a paste event.
///
/// Empty flavours come back as `None`, so a plain-text paste never goes
/// through the sanitizer.
pub fn paste_data(evt: &web_sys::ClipboardEvent) -> PasteData {
    let Some(dt) = evt.clipboard_data() else {
        return PasteData::default();
    };
    PasteData::new(
        dt.get_data("text/html").ok(),
        dt.get_data("text/plain").ok(),
    )
}
