//! `EditorPlatform` on top of a live DOM.
//!
//! Formatting goes through `document.execCommand` and state comes from
//! `queryCommandState`/`queryCommandValue`. Both are deprecated but remain
//! the only primitives that edit a contenteditable surface with native undo
//! and selection behaviour.

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement, HtmlSelectElement, HtmlTextAreaElement};

use quire_editor_core::{
    BlockFormat, EditorPlatform, FormatQuery, PendingSelection, PlatformError, SelectionBridge,
    ToggleCommand, ToolbarView, ViewMode,
};

use crate::cursor;
use crate::dom::{self, ACTIVE_CLASS, CODE_VIEW_CLASS, FULLSCREEN_CLASS, Surfaces};

/// One editor's mount element and surfaces.
pub struct DomPlatform {
    document: HtmlDocument,
    root: HtmlElement,
    editable: HtmlElement,
    raw: Option<HtmlTextAreaElement>,
    root_made_editable: bool,
}

impl DomPlatform {
    /// Attach to the mount element with the given id.
    pub fn attach(element_id: &str) -> Result<Self, PlatformError> {
        let root = dom::mount_element(element_id)?;
        Self::from_surfaces(dom::find_surfaces(root)?)
    }

    pub fn from_surfaces(surfaces: Surfaces) -> Result<Self, PlatformError> {
        let platform = Self {
            document: dom::html_document()?,
            root: surfaces.root,
            editable: surfaces.editable,
            raw: surfaces.raw,
            root_made_editable: surfaces.root_made_editable,
        };
        platform.apply_view(ViewMode::Wysiwyg);
        Ok(platform)
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn editable(&self) -> &HtmlElement {
        &self.editable
    }

    pub fn raw(&self) -> Option<&HtmlTextAreaElement> {
        self.raw.as_ref()
    }

    /// Undo what attaching changed on the host's markup.
    pub fn release(&mut self) {
        self.apply_view(ViewMode::Wysiwyg);
        let classes = self.root.class_list();
        let _ = classes.remove_2(FULLSCREEN_CLASS, CODE_VIEW_CLASS);
        if self.root_made_editable {
            let _ = self.root.remove_attribute("contenteditable");
            self.root_made_editable = false;
        }
    }

    fn apply_view(&self, mode: ViewMode) {
        let raw_view = mode == ViewMode::Raw;
        if let Some(raw) = &self.raw {
            raw.set_hidden(!raw_view);
            self.editable.set_hidden(raw_view);
        }
        let _ = self
            .root
            .class_list()
            .toggle_with_force(CODE_VIEW_CLASS, raw_view);
    }

    fn run_command(&self, command: &str, value: Option<&str>) -> Result<(), PlatformError> {
        let executed = match value {
            Some(value) => self
                .document
                .exec_command_with_show_ui_and_value(command, false, value),
            None => self.document.exec_command(command),
        }
        .map_err(|e| format!("execCommand({command}) threw: {:?}", e))?;
        if executed {
            Ok(())
        } else {
            Err(format!("execCommand({command}) was not executed").into())
        }
    }

    /// Keep insertions inside the surface when nothing there is selected.
    fn ensure_caret(&self) {
        if cursor::selection_within(&self.editable) {
            return;
        }
        if let Err(err) = cursor::place_caret_at_end(&self.editable) {
            tracing::debug!(%err, "could not place caret in editable surface");
        }
    }
}

impl FormatQuery for DomPlatform {
    fn query_state(&self, command: ToggleCommand) -> Result<bool, PlatformError> {
        self.document
            .query_command_state(command.command_name())
            .map_err(|e| format!("queryCommandState failed: {:?}", e).into())
    }

    fn query_block_format(&self) -> Result<String, PlatformError> {
        self.document
            .query_command_value("formatBlock")
            .map_err(|e| format!("queryCommandValue failed: {:?}", e).into())
    }
}

impl ToolbarView for DomPlatform {
    fn set_active(&mut self, command: ToggleCommand, active: bool) {
        for control in dom::command_controls(&self.root, command.command_name()) {
            let _ = control.class_list().toggle_with_force(ACTIVE_CLASS, active);
            let _ = control.set_attribute("aria-pressed", if active { "true" } else { "false" });
        }
    }

    fn set_block_format(&mut self, format: BlockFormat) {
        for control in dom::command_controls(&self.root, "formatBlock") {
            if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
                select.set_value(&format.tag());
            }
        }
    }
}

impl SelectionBridge for DomPlatform {
    type Range = web_sys::Range;

    fn capture(&self) -> Option<PendingSelection<web_sys::Range>> {
        cursor::capture_selection(&self.editable)
    }

    fn restore(&self, pending: &PendingSelection<web_sys::Range>) -> Result<(), PlatformError> {
        // The range may have been detached by an edit made while the dialog was up.
        let container = pending
            .range
            .common_ancestor_container()
            .map_err(|e| format!("range is no longer valid: {:?}", e))?;
        if !self.editable.contains(Some(&container)) {
            return Err("captured range left the editable surface".into());
        }
        cursor::restore_selection(&pending.range)
    }
}

impl EditorPlatform for DomPlatform {
    fn surface_html(&self) -> String {
        self.editable.inner_html()
    }

    fn set_surface_html(&mut self, markup: &str) {
        self.editable.set_inner_html(markup);
    }

    fn raw_text(&self) -> Option<String> {
        self.raw.as_ref().map(HtmlTextAreaElement::value)
    }

    fn set_raw_text(&mut self, text: &str) {
        if let Some(raw) = &self.raw {
            raw.set_value(text);
        }
    }

    fn show_view(&mut self, mode: ViewMode) {
        self.apply_view(mode);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let _ = self
            .root
            .class_list()
            .toggle_with_force(FULLSCREEN_CLASS, fullscreen);
    }

    fn exec(&mut self, command: &str, value: Option<&str>) -> Result<(), PlatformError> {
        self.run_command(command, value)
    }

    fn insert_html(&mut self, markup: &str) -> Result<(), PlatformError> {
        self.ensure_caret();
        self.run_command("insertHTML", Some(markup))
    }

    fn insert_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.ensure_caret();
        self.run_command("insertText", Some(text))
    }

    fn focus_surface(&self) {
        let _ = self.editable.focus();
    }
}
