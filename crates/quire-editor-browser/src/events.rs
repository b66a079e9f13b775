//! DOM event wiring for one editor instance.
//!
//! Every listener holds the instance weakly and forwards to one session
//! operation. The returned handles are stored on the instance; dropping
//! them deregisters the listeners.

use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlSelectElement, KeyboardEvent};

use quire_editor_core::{BlockFormat, EditorCommand, Key, KeyCombo, KeyOutcome, Modifiers};

use crate::clipboard::paste_data;
use crate::dom;
use crate::instance::EditorInstance;

/// Convert a keyboard event into a key combination.
pub fn key_combo(evt: &KeyboardEvent) -> KeyCombo {
    KeyCombo::new(
        Key::from_key_str(&evt.key()),
        Modifiers {
            ctrl: evt.ctrl_key(),
            alt: evt.alt_key(),
            shift: evt.shift_key(),
            meta: evt.meta_key(),
        },
    )
}

/// Parse the command a toolbar control carries.
pub fn control_command(control: &web_sys::Element) -> Option<EditorCommand> {
    let name = control.get_attribute("data-command")?;
    if name == "formatBlock" {
        let select = control.dyn_ref::<HtmlSelectElement>()?;
        return BlockFormat::parse(&select.value()).map(EditorCommand::FormatBlock);
    }
    EditorCommand::parse(&name)
}

fn listen<F>(
    target: &EventTarget,
    event_type: &'static str,
    instance: &Weak<EditorInstance>,
    handler: F,
) -> EventListener
where
    F: Fn(&Rc<EditorInstance>, &Event) + 'static,
{
    let instance = instance.clone();
    EventListener::new_with_options(
        target,
        event_type,
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if let Some(instance) = instance.upgrade() {
                handler(&instance, event);
            }
        },
    )
}

/// Register every listener the instance needs.
pub fn attach_listeners(instance: &Rc<EditorInstance>) -> Vec<EventListener> {
    let weak = Rc::downgrade(instance);
    let editable = instance.editable().clone();
    let root = instance.root().clone();
    let mut listeners = Vec::new();

    // Typing and blur, on both surfaces.
    let editable_target: &EventTarget = &editable;
    let mut surfaces = vec![editable_target];
    if let Some(raw) = instance.raw() {
        surfaces.push(raw);
    }
    for surface in surfaces {
        listeners.push(listen(surface, "input", &weak, |inst, _| {
            inst.with_session(|s| s.handle_input());
        }));
        listeners.push(listen(surface, "blur", &weak, |inst, _| {
            inst.with_session(|s| s.handle_blur());
        }));
    }

    listeners.push(listen(&editable, "paste", &weak, |inst, event| {
        let Some(clipboard_event) = event.dyn_ref::<web_sys::ClipboardEvent>() else {
            return;
        };
        let data = paste_data(clipboard_event);
        if inst.with_session(|s| s.handle_paste(data)) == Some(true) {
            event.prevent_default();
        }
    }));

    listeners.push(listen(&editable, "keydown", &weak, |inst, event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let combo = key_combo(key_event);
        if inst.with_session(|s| s.handle_keydown(&combo)) == Some(KeyOutcome::Handled) {
            event.prevent_default();
        }
    }));

    for event_type in ["mouseup", "keyup"] {
        listeners.push(listen(&editable, event_type, &weak, |inst, _| {
            inst.refresh_toolbar();
        }));
    }

    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        let editable_element: web_sys::Element = editable.clone().into();
        let doc = document.clone();
        listeners.push(listen(&document, "selectionchange", &weak, move |inst, _| {
            let focused = doc
                .active_element()
                .is_some_and(|active| active == editable_element);
            if focused {
                inst.refresh_toolbar();
            }
        }));

        listeners.push(listen(&document, "keydown", &weak, |inst, event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if Key::from_key_str(&key_event.key()) == Key::Escape {
                inst.with_session(|s| s.handle_escape());
            }
        }));
    }

    // Toolbar buttons must not steal the selection from the surface.
    let root_for_mousedown = root.clone();
    listeners.push(listen(&root, "mousedown", &weak, move |_, event| {
        let Some(target) = event.target() else {
            return;
        };
        let Some(control) = dom::control_for_target(&root_for_mousedown, &target) else {
            return;
        };
        if control.dyn_ref::<HtmlSelectElement>().is_none() {
            event.prevent_default();
        }
    }));

    let root_for_click = root.clone();
    listeners.push(listen(&root, "click", &weak, move |inst, event| {
        let Some(target) = event.target() else {
            return;
        };
        let Some(control) = dom::control_for_target(&root_for_click, &target) else {
            return;
        };
        if control.dyn_ref::<HtmlSelectElement>().is_some() {
            return;
        }
        event.prevent_default();
        match control_command(&control) {
            Some(command) => inst.dispatch(command),
            None => tracing::debug!(
                command = control.get_attribute("data-command").as_deref(),
                "unknown toolbar command"
            ),
        }
    }));

    let root_for_change = root.clone();
    listeners.push(listen(&root, "change", &weak, move |inst, event| {
        let Some(target) = event.target() else {
            return;
        };
        let Some(control) = dom::control_for_target(&root_for_change, &target) else {
            return;
        };
        if let Some(command @ EditorCommand::FormatBlock(_)) = control_command(&control) {
            inst.dispatch(command);
        }
    }));

    listeners
}
