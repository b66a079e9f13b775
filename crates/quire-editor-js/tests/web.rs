//! WASM browser tests for the quire-editor-js exports.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use quire_editor_js::{destroy, get_content, initialize, set_content};

fn fixture(id: &str, inner: &str) -> web_sys::HtmlElement {
    let doc = web_sys::window().unwrap().document().unwrap();
    let root = doc
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    root.set_id(id);
    root.set_inner_html(inner);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn noop() -> js_sys::Function {
    js_sys::Function::new_no_args("")
}

#[wasm_bindgen_test]
fn test_unknown_editor_is_empty() {
    assert_eq!(get_content("quire-js-unknown"), "");
    set_content("quire-js-unknown", "<p>ignored</p>");
    destroy("quire-js-unknown");
    assert_eq!(get_content("quire-js-unknown"), "");
}

#[wasm_bindgen_test]
fn test_initialize_missing_element_is_noop() {
    initialize("quire-js-missing", noop(), JsValue::UNDEFINED);
    assert_eq!(get_content("quire-js-missing"), "");
}

#[wasm_bindgen_test]
fn test_lifecycle() {
    let root = fixture(
        "quire-js-life",
        r#"<div contenteditable="true"><p>start</p></div><textarea></textarea>"#,
    );
    initialize("quire-js-life", noop(), JsValue::NULL);
    assert_eq!(get_content("quire-js-life"), "<p>start</p>");

    set_content("quire-js-life", "<p>next</p>");
    assert_eq!(get_content("quire-js-life"), "<p>next</p>");

    destroy("quire-js-life");
    assert_eq!(get_content("quire-js-life"), "");
    root.remove();
}

#[wasm_bindgen_test]
fn test_reinitialize_replaces_instance() {
    let root = fixture("quire-js-again", "<p>bare</p>");
    initialize("quire-js-again", noop(), JsValue::UNDEFINED);
    initialize("quire-js-again", noop(), JsValue::UNDEFINED);
    assert_eq!(
        root.get_attribute("contenteditable").as_deref(),
        Some("true")
    );
    assert_eq!(get_content("quire-js-again"), "<p>bare</p>");

    destroy("quire-js-again");
    assert!(root.get_attribute("contenteditable").is_none());
    root.remove();
}

#[wasm_bindgen_test]
fn test_host_callback_may_reenter() {
    let root = fixture(
        "quire-js-reenter",
        r#"<button data-command="code">code</button><div contenteditable="true"><p>x</p></div><textarea></textarea>"#,
    );
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = seen.clone();
    let callback = Closure::<dyn Fn(String)>::new(move |_markup: String| {
        sink.borrow_mut().push(get_content("quire-js-reenter"));
    });
    let notify: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
    initialize("quire-js-reenter", notify, JsValue::UNDEFINED);

    root.query_selector("[data-command=\"code\"]")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap()
        .click();
    assert_eq!(seen.borrow().as_slice(), ["<p>x</p>".to_string()]);

    destroy("quire-js-reenter");
    drop(callback);
    root.remove();
}
