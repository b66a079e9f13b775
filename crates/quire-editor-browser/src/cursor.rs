//! DOM Selection API helpers.
//!
//! Captures the live selection as a detached `Range` while a dialog has
//! focus, and puts it back right before insertion.

use quire_editor_core::{PendingSelection, PlatformError};

/// Clone the live selection if it lies inside `surface`.
pub fn capture_selection(surface: &web_sys::Node) -> Option<PendingSelection<web_sys::Range>> {
    let selection = web_sys::window()?.get_selection().ok()??;
    if selection.range_count() == 0 {
        return None;
    }
    let range = selection.get_range_at(0).ok()?;
    let ancestor = range.common_ancestor_container().ok()?;
    if !surface.contains(Some(&ancestor)) {
        tracing::trace!("selection outside editable surface, not captured");
        return None;
    }
    let text: String = range.to_string().into();
    Some(PendingSelection::new(range.clone_range(), text))
}

/// Make `range` the live selection.
pub fn restore_selection(range: &web_sys::Range) -> Result<(), PlatformError> {
    let selection = web_sys::window()
        .ok_or("no window")?
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or("no selection object")?;
    selection
        .remove_all_ranges()
        .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
    selection
        .add_range(range)
        .map_err(|e| format!("add_range failed: {:?}", e))?;
    Ok(())
}

/// Whether the live selection is inside `surface`.
pub fn selection_within(surface: &web_sys::Node) -> bool {
    let Some(Ok(Some(selection))) = web_sys::window().map(|w| w.get_selection()) else {
        return false;
    };
    selection
        .anchor_node()
        .is_some_and(|anchor| surface.contains(Some(&anchor)))
}

/// Collapse the selection to the end of `surface`.
///
/// Insertion without a captured selection lands here.
pub fn place_caret_at_end(surface: &web_sys::Node) -> Result<(), PlatformError> {
    let document = web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let range = document
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;
    range
        .select_node_contents(surface)
        .map_err(|e| format!("select_node_contents failed: {:?}", e))?;
    range.collapse_with_to_start(false);
    restore_selection(&range)
}
