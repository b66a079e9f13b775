//! Instance lifecycle exports.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use quire_editor_browser::{
    EditorInstance, EditorOptions, HostCallback, HostError, InstanceRegistry, PlatformError,
};

thread_local! {
    static INSTANCES: RefCell<InstanceRegistry<Rc<EditorInstance>>> =
        RefCell::new(InstanceRegistry::new());
}

/// Look up a live instance. The registry borrow ends before the caller
/// touches the instance, so host callbacks may re-enter any export.
fn instance(element_id: &str) -> Option<Rc<EditorInstance>> {
    INSTANCES.with(|instances| instances.borrow().get(element_id).cloned())
}

fn parse_options(options: JsValue) -> EditorOptions {
    if options.is_undefined() || options.is_null() {
        return EditorOptions::default();
    }
    serde_wasm_bindgen::from_value(options).unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid editor options, using defaults");
        EditorOptions::default()
    })
}

fn host_callback(notify: js_sys::Function) -> HostCallback {
    Box::new(move |markup| {
        notify
            .call1(&JsValue::NULL, &JsValue::from_str(markup))
            .map(|_| ())
            .map_err(|e| HostError::Callback(format!("{:?}", e)))
    })
}

/// Mount an editor on the element with id `elementId`.
///
/// `notify` receives the markup after every settled change. A previous
/// instance on the same element is destroyed first. Does nothing when the
/// element does not exist.
#[wasm_bindgen]
pub fn initialize(element_id: &str, notify: js_sys::Function, options: JsValue) {
    destroy(element_id);

    let options = parse_options(options);
    match EditorInstance::mount(element_id, host_callback(notify), options) {
        Ok(instance) => {
            INSTANCES.with(|instances| instances.borrow_mut().insert(element_id, instance));
            tracing::debug!(id = element_id, "editor initialized");
        }
        Err(PlatformError::MissingElement(_)) => {
            tracing::debug!(id = element_id, "no such element, initialize skipped");
        }
        Err(err) => tracing::warn!(id = element_id, %err, "editor mount failed"),
    }
}

/// Replace the content of both surfaces, bypassing sanitization and undo.
#[wasm_bindgen(js_name = setContent)]
pub fn set_content(element_id: &str, markup: &str) {
    match instance(element_id) {
        Some(instance) => instance.set_content(markup),
        None => tracing::trace!(id = element_id, "setContent on unknown editor"),
    }
}

/// Current markup, or `""` when no editor is mounted on `elementId`.
#[wasm_bindgen(js_name = getContent)]
pub fn get_content(element_id: &str) -> String {
    instance(element_id)
        .map(|instance| instance.content())
        .unwrap_or_default()
}

/// Tear down the editor on `elementId` and forget it.
#[wasm_bindgen]
pub fn destroy(element_id: &str) {
    let removed = INSTANCES.with(|instances| instances.borrow_mut().remove(element_id));
    if let Some(instance) = removed {
        instance.teardown();
    }
}
