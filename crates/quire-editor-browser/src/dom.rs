//! Mount element lookup.
//!
//! The host renders the editor markup; this module finds the pieces inside
//! the mount element:
//!
//! - editable surface: the first `[contenteditable]` descendant, else the
//!   mount element itself (made editable on attach)
//! - raw markup surface: the first `textarea` descendant, if any, and only
//!   when the editable surface is a dedicated element
//! - toolbar controls: descendants carrying `data-command`

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, HtmlTextAreaElement};

use quire_editor_core::PlatformError;

pub const FULLSCREEN_CLASS: &str = "quire-fullscreen";
pub const CODE_VIEW_CLASS: &str = "quire-code-view";
pub const ACTIVE_CLASS: &str = "active";

/// The parts of one mounted editor.
#[derive(Debug, Clone)]
pub struct Surfaces {
    pub root: HtmlElement,
    pub editable: HtmlElement,
    pub raw: Option<HtmlTextAreaElement>,
    /// Whether attaching had to add `contenteditable` to the root.
    pub root_made_editable: bool,
}

pub fn html_document() -> Result<HtmlDocument, PlatformError> {
    let document = web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    document
        .dyn_into::<HtmlDocument>()
        .map_err(|_| "document is not an HTML document".into())
}

/// Look up the mount element by id.
pub fn mount_element(element_id: &str) -> Result<HtmlElement, PlatformError> {
    let element = html_document()?
        .get_element_by_id(element_id)
        .ok_or_else(|| PlatformError::MissingElement(element_id.to_string()))?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("#{element_id} is not an HTML element").into())
}

/// Locate the surfaces inside `root`, making the root editable when the
/// host did not provide a dedicated surface.
pub fn find_surfaces(root: HtmlElement) -> Result<Surfaces, PlatformError> {
    let editable = root
        .query_selector("[contenteditable]")
        .map_err(|e| format!("query_selector failed: {:?}", e))?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let raw = root
        .query_selector("textarea")
        .map_err(|e| format!("query_selector failed: {:?}", e))?
        .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok());

    let (editable, raw, root_made_editable) = match editable {
        Some(editable) => (editable, raw, false),
        None => {
            if raw.is_some() {
                tracing::debug!("no dedicated editable surface, raw view disabled");
            }
            root.set_content_editable("true");
            (root.clone(), None, true)
        }
    };

    Ok(Surfaces {
        root,
        editable,
        raw,
        root_made_editable,
    })
}

/// All toolbar controls bound to `command`.
pub fn command_controls(root: &HtmlElement, command: &str) -> Vec<web_sys::Element> {
    let selector = format!("[data-command=\"{command}\"]");
    let Ok(list) = root.query_selector_all(&selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

/// The nearest `data-command` control at or above `target`, within `root`.
pub fn control_for_target(
    root: &HtmlElement,
    target: &web_sys::EventTarget,
) -> Option<web_sys::Element> {
    let element = target.dyn_ref::<web_sys::Element>()?;
    let control = element.closest("[data-command]").ok()??;
    root.contains(Some(&control)).then_some(control)
}
