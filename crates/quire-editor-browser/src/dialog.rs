//! Modal link and table dialogs.
//!
//! Each dialog is an overlay appended to `<body>`, tagged with its owning
//! editor. Open dialogs live in a thread-local `DialogRegistry`; taking a
//! dialog out of the registry is the only way it resolves or closes, and
//! dropping the taken `OpenDialog` removes the overlay and deregisters all
//! of its listeners, including the document-level Escape handler.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent};

use quire_editor_core::{
    DialogId, DialogRegistry, LinkForm, LinkRequest, PlatformError, TableForm, TableLimits,
    TableRequest,
};

thread_local! {
    static DIALOGS: RefCell<DialogRegistry<OpenDialog>> = RefCell::new(DialogRegistry::new());
}

/// A rendered dialog. Dropping it closes it.
pub struct OpenDialog {
    overlay: Element,
    _listeners: Vec<EventListener>,
}

impl Drop for OpenDialog {
    fn drop(&mut self) {
        self.overlay.remove();
    }
}

/// Ask for a link. `on_submit` runs at most once, with a non-empty URL.
pub fn prompt_for_link(
    owner: &str,
    selected_text: &str,
    on_submit: impl FnOnce(LinkRequest) + 'static,
) -> Result<DialogId, PlatformError> {
    let id = reserve_id();
    let document = document()?;
    let shell = Shell::new(&document, owner, "Insert link")?;

    let url = shell.input("URL", "url", "")?;
    url.set_placeholder("https://");
    let text = shell.input("Text", "text", selected_text)?;
    let new_tab = shell.input("Open in new tab", "checkbox", "")?;
    new_tab.set_checked(LinkForm::default().new_tab);

    let callback = once(on_submit);
    let submit: Rc<dyn Fn()> = {
        let url = url.clone();
        Rc::new(move || {
            let form = LinkForm {
                url: url.value(),
                text: text.value(),
                new_tab: new_tab.checked(),
            };
            match LinkRequest::from_form(&form) {
                Some(request) => resolve(id, &callback, request),
                None => {
                    tracing::trace!("link dialog submitted without a URL");
                    let _ = url.focus();
                }
            }
        })
    };

    let mut listeners = shell.listeners(id, &document, &submit);
    listeners.push(submit_on_enter(&url, &submit));
    shell.open(id, owner, listeners)?;
    let _ = url.focus();
    Ok(id)
}

/// Ask for table dimensions. Input is clamped, so every submission resolves.
pub fn prompt_for_table(
    owner: &str,
    limits: TableLimits,
    on_submit: impl FnOnce(TableRequest) + 'static,
) -> Result<DialogId, PlatformError> {
    let id = reserve_id();
    let document = document()?;
    let shell = Shell::new(&document, owner, "Insert table")?;

    let defaults = TableForm::default();
    let rows = shell.input("Rows", "number", &defaults.rows)?;
    rows.set_min("1");
    rows.set_max(&limits.max_rows.to_string());
    let columns = shell.input("Columns", "number", &defaults.columns)?;
    columns.set_min("1");
    columns.set_max(&limits.max_columns.to_string());

    let callback = once(on_submit);
    let submit: Rc<dyn Fn()> = {
        let rows = rows.clone();
        let columns = columns.clone();
        Rc::new(move || {
            let form = TableForm {
                rows: rows.value(),
                columns: columns.value(),
            };
            resolve(id, &callback, TableRequest::from_form(&form, limits));
        })
    };

    let mut listeners = shell.listeners(id, &document, &submit);
    listeners.push(submit_on_enter(&rows, &submit));
    listeners.push(submit_on_enter(&columns, &submit));
    shell.open(id, owner, listeners)?;
    let _ = rows.focus();
    Ok(id)
}

/// Dismiss one dialog without resolving it.
pub fn close(id: DialogId) -> bool {
    // The registry borrow ends before the dialog drops.
    let dialog = DIALOGS.with(|dialogs| dialogs.borrow_mut().remove(id));
    dialog.is_some()
}

/// Dismiss every dialog owned by `owner`.
pub fn close_all(owner: &str) -> usize {
    let dialogs = DIALOGS.with(|dialogs| dialogs.borrow_mut().remove_owner(owner));
    dialogs.len()
}

/// Number of dialogs currently open for `owner`.
pub fn open_count(owner: &str) -> usize {
    DIALOGS.with(|dialogs| dialogs.borrow().count_for(owner))
}

type Callback<T> = Rc<RefCell<Option<Box<dyn FnOnce(T)>>>>;

fn once<T: 'static>(f: impl FnOnce(T) + 'static) -> Callback<T> {
    let f: Box<dyn FnOnce(T)> = Box::new(f);
    Rc::new(RefCell::new(Some(f)))
}

fn reserve_id() -> DialogId {
    DIALOGS.with(|dialogs| dialogs.borrow_mut().reserve_id())
}

/// Close the dialog and hand `value` to its callback, unless it already
/// resolved or was dismissed.
fn resolve<T>(id: DialogId, callback: &Callback<T>, value: T) {
    if !close(id) {
        return;
    }
    let callback = callback.borrow_mut().take();
    if let Some(callback) = callback {
        callback(value);
    }
}

fn document() -> Result<Document, PlatformError> {
    web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or_else(|| "no document".into())
}

fn submit_on_enter(input: &HtmlInputElement, submit: &Rc<dyn Fn()>) -> EventListener {
    let submit = submit.clone();
    EventListener::new_with_options(
        input,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Enter" {
                event.prevent_default();
                submit();
            }
        },
    )
}

/// Overlay, panel and buttons shared by both dialogs.
struct Shell {
    document: Document,
    overlay: Element,
    body: Element,
    fields: Element,
    cancel: Element,
    confirm: Element,
}

impl Shell {
    fn new(document: &Document, owner: &str, title: &str) -> Result<Self, PlatformError> {
        let create = |tag: &str, class: &str| -> Result<Element, PlatformError> {
            let el = document
                .create_element(tag)
                .map_err(|e| format!("create_element failed: {:?}", e))?;
            el.set_class_name(class);
            Ok(el)
        };

        let overlay = create("div", "quire-dialog-backdrop")?;
        let _ = overlay.set_attribute("data-quire-owner", owner);
        let body = create("div", "quire-dialog")?;
        let _ = body.set_attribute("role", "dialog");
        let _ = body.set_attribute("aria-modal", "true");
        let heading = create("h3", "quire-dialog-title")?;
        heading.set_text_content(Some(title));
        let fields = create("div", "quire-dialog-fields")?;
        let actions = create("div", "quire-dialog-actions")?;
        let cancel = create("button", "quire-dialog-cancel")?;
        let _ = cancel.set_attribute("type", "button");
        cancel.set_text_content(Some("Cancel"));
        let confirm = create("button", "quire-dialog-submit")?;
        let _ = confirm.set_attribute("type", "button");
        confirm.set_text_content(Some("Insert"));

        let append = |parent: &Element, child: &Element| -> Result<(), PlatformError> {
            parent
                .append_child(child)
                .map_err(|e| format!("append_child failed: {:?}", e))?;
            Ok(())
        };
        append(&actions, &cancel)?;
        append(&actions, &confirm)?;
        append(&body, &heading)?;
        append(&body, &fields)?;
        append(&body, &actions)?;
        append(&overlay, &body)?;

        Ok(Self {
            document: document.clone(),
            overlay,
            body,
            fields,
            cancel,
            confirm,
        })
    }

    /// Add a labelled input.
    fn input(
        &self,
        label: &str,
        input_type: &str,
        value: &str,
    ) -> Result<HtmlInputElement, PlatformError> {
        let wrapper = self
            .document
            .create_element("label")
            .map_err(|e| format!("create_element failed: {:?}", e))?;
        let caption = self
            .document
            .create_element("span")
            .map_err(|e| format!("create_element failed: {:?}", e))?;
        caption.set_text_content(Some(label));
        let input = self
            .document
            .create_element("input")
            .map_err(|e| format!("create_element failed: {:?}", e))?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| "input is not an HtmlInputElement")?;
        input.set_type(input_type);
        input.set_value(value);

        wrapper
            .append_child(&caption)
            .and_then(|_| wrapper.append_child(&input))
            .and_then(|_| self.fields.append_child(&wrapper))
            .map_err(|e| format!("append_child failed: {:?}", e))?;
        Ok(input)
    }

    /// Backdrop, Cancel, Insert and Escape handling.
    fn listeners(
        &self,
        id: DialogId,
        document: &Document,
        submit: &Rc<dyn Fn()>,
    ) -> Vec<EventListener> {
        let overlay = self.overlay.clone();
        let backdrop = EventListener::new(&self.overlay, "click", move |event| {
            // Clicks inside the panel bubble up here too.
            let on_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|target| target == overlay);
            if on_backdrop {
                close(id);
            }
        });

        let cancel = EventListener::new(&self.cancel, "click", move |_| {
            close(id);
        });

        let submit = submit.clone();
        let confirm = EventListener::new(&self.confirm, "click", move |_| submit());

        let escape = EventListener::new(document, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" {
                close(id);
            }
        });

        vec![backdrop, cancel, confirm, escape]
    }

    /// Insert the overlay and register the dialog.
    fn open(
        self,
        id: DialogId,
        owner: &str,
        listeners: Vec<EventListener>,
    ) -> Result<(), PlatformError> {
        let host: HtmlElement = self.document.body().ok_or("no body")?;
        host.append_child(&self.overlay)
            .map_err(|e| format!("append_child failed: {:?}", e))?;
        let _ = self.body.set_attribute("data-dialog-id", &id.get().to_string());
        let dialog = OpenDialog {
            overlay: self.overlay,
            _listeners: listeners,
        };
        DIALOGS.with(|dialogs| dialogs.borrow_mut().insert(id, owner, dialog));
        tracing::debug!(owner, dialog = id.get(), "dialog opened");
        Ok(())
    }
}
