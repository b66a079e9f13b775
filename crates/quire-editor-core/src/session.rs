//! Per-instance editor state machine.
//!
//! `EditorSession` owns one editor's history, debounce timer, view mode and
//! host channel, and drives the platform through the traits in
//! [`crate::platform`]. Event wiring lives in the platform layer; each DOM
//! event maps onto one method here.

use smol_str::SmolStr;

use crate::actions::{EditorCommand, KeyCombo};
use crate::debounce::{Debouncer, Timer};
use crate::dialog::{LinkRequest, TableLimits, TableRequest};
use crate::options::EditorOptions;
use crate::platform::{EditorPlatform, HostChannel, ViewMode};
use crate::sanitize::sanitize;
use crate::selection::PendingSelection;
use crate::toolbar::{self, ToolbarState};
use crate::undo::{UndoHistory, UndoManager};

/// What the caller has to do after `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran.
    Applied,
    /// Nothing happened: wrong view, empty history, or the platform refused.
    Ignored,
    /// Show the link dialog, prefilled with the captured selection text.
    PromptLink { selected_text: String },
    /// Show the table dialog.
    PromptTable(TableLimits),
}

/// Whether a key event was consumed and its native default must be prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    PassThrough,
}

/// Clipboard payload of a paste event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteData {
    pub html: Option<String>,
    pub text: Option<String>,
}

impl PasteData {
    pub fn new(html: Option<String>, text: Option<String>) -> Self {
        Self {
            html: html.filter(|s| !s.is_empty()),
            text: text.filter(|s| !s.is_empty()),
        }
    }
}

/// One mounted editor.
pub struct EditorSession<P, T, H>
where
    P: EditorPlatform,
    T: Timer,
    H: HostChannel,
{
    id: SmolStr,
    platform: P,
    host: H,
    history: UndoHistory,
    debounce: Debouncer<T>,
    view: ViewMode,
    fullscreen: bool,
    options: EditorOptions,
    pending_selection: Option<PendingSelection<P::Range>>,
    closed: bool,
}

impl<P, T, H> EditorSession<P, T, H>
where
    P: EditorPlatform,
    T: Timer,
    H: HostChannel,
{
    /// Mount a session. The surface's current markup becomes the undo
    /// baseline.
    pub fn new(
        id: impl Into<SmolStr>,
        platform: P,
        timer: T,
        host: H,
        options: EditorOptions,
    ) -> Self {
        let options = options.normalized();
        let history = UndoHistory::with_baseline(
            &platform.surface_html(),
            options.undo_stack_size as usize,
        );
        let debounce = Debouncer::new(timer, options.debounce());
        let id = id.into();
        tracing::debug!(%id, ?options, "editor session created");
        Self {
            id,
            platform,
            host,
            history,
            debounce,
            view: ViewMode::Wysiwyg,
            fullscreen: false,
            options,
            pending_selection: None,
            closed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn has_pending_edit(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Markup of whichever surface is authoritative.
    pub fn content(&self) -> String {
        match self.view {
            ViewMode::Raw => self
                .platform
                .raw_text()
                .unwrap_or_else(|| self.platform.surface_html()),
            ViewMode::Wysiwyg => self.platform.surface_html(),
        }
    }

    /// Overwrite both surfaces without sanitizing or touching history.
    pub fn set_content(&mut self, markup: &str) {
        if self.closed {
            return;
        }
        if self.content() == markup {
            tracing::trace!(id = %self.id, "set_content skipped, markup unchanged");
            return;
        }
        self.platform.set_surface_html(markup);
        self.platform.set_raw_text(markup);
    }

    /// Typing in either surface. Restarts the quiet period.
    pub fn handle_input(&mut self) {
        if self.closed {
            return;
        }
        self.debounce.reset();
        tracing::trace!(id = %self.id, "debounce reset");
    }

    /// The debounce timer elapsed.
    pub fn fire_debounce(&mut self) {
        if self.closed || !self.debounce.fire() {
            return;
        }
        self.commit();
    }

    pub fn handle_blur(&mut self) {
        if self.closed {
            return;
        }
        self.settle_pending();
        self.notify();
    }

    /// Returns whether the native paste must be prevented. A failed insertion
    /// returns `false` so the browser's own paste still happens.
    pub fn handle_paste(&mut self, paste: PasteData) -> bool {
        if self.closed || self.view == ViewMode::Raw {
            return false;
        }
        let inserted = match (&paste.html, &paste.text) {
            (Some(html), _) => {
                self.settle_pending();
                self.platform.insert_html(&sanitize(html))
            }
            (None, Some(text)) => {
                self.settle_pending();
                self.platform.insert_text(text)
            }
            (None, None) => return false,
        };
        match inserted {
            Ok(()) => {
                self.commit();
                self.refresh_toolbar();
                true
            }
            Err(err) => {
                // Let the native paste run instead of losing the clipboard.
                tracing::debug!(id = %self.id, %err, "paste insertion failed");
                false
            }
        }
    }

    /// Ctrl/Cmd shortcuts on the editable surface.
    pub fn handle_keydown(&mut self, combo: &KeyCombo) -> KeyOutcome {
        if self.closed || self.view == ViewMode::Raw {
            return KeyOutcome::PassThrough;
        }
        match combo.shortcut() {
            Some(command) => {
                self.execute(command);
                KeyOutcome::Handled
            }
            None => KeyOutcome::PassThrough,
        }
    }

    /// Escape anywhere in the document. Only leaves fullscreen.
    pub fn handle_escape(&mut self) -> KeyOutcome {
        if self.closed || !self.fullscreen {
            return KeyOutcome::PassThrough;
        }
        self.set_fullscreen(false);
        KeyOutcome::Handled
    }

    /// Dispatch one toolbar or shortcut command.
    pub fn execute(&mut self, command: EditorCommand) -> CommandOutcome {
        if self.closed {
            return CommandOutcome::Ignored;
        }
        if self.view == ViewMode::Raw && !command.available_in_raw_view() {
            tracing::trace!(id = %self.id, ?command, "command ignored in raw view");
            return CommandOutcome::Ignored;
        }
        if command.mutates_content() {
            self.settle_pending();
        }
        match command {
            EditorCommand::Toggle(toggle) => self.apply_format(toggle.command_name(), None),
            EditorCommand::Format(format) => self.apply_format(format.command_name(), None),
            EditorCommand::FormatBlock(block) => {
                let value = format!("<{}>", block.tag());
                self.apply_format("formatBlock", Some(&value))
            }
            EditorCommand::Link => {
                self.settle_pending();
                self.pending_selection = self.platform.capture();
                let selected_text = self
                    .pending_selection
                    .as_ref()
                    .map(|p| p.text.clone())
                    .unwrap_or_default();
                CommandOutcome::PromptLink { selected_text }
            }
            EditorCommand::Table => {
                self.settle_pending();
                self.pending_selection = self.platform.capture();
                CommandOutcome::PromptTable(TableLimits::from(&self.options))
            }
            EditorCommand::Code => self.toggle_view(),
            EditorCommand::Fullscreen => {
                self.set_fullscreen(!self.fullscreen);
                CommandOutcome::Applied
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        }
    }

    /// Insert a submitted link at the selection captured when the dialog
    /// opened.
    pub fn submit_link(&mut self, request: &LinkRequest) -> CommandOutcome {
        if self.closed || self.view == ViewMode::Raw {
            return CommandOutcome::Ignored;
        }
        let pending = self.pending_selection.take();
        self.restore_selection(pending.as_ref());
        let selected = pending
            .as_ref()
            .filter(|p| p.has_text())
            .map(|p| p.text.as_str());
        let markup = request.to_markup(selected);
        self.insert_markup(&markup)
    }

    pub fn submit_table(&mut self, request: &TableRequest) -> CommandOutcome {
        if self.closed || self.view == ViewMode::Raw {
            return CommandOutcome::Ignored;
        }
        let pending = self.pending_selection.take();
        self.restore_selection(pending.as_ref());
        self.insert_markup(&request.to_markup())
    }

    pub fn undo(&mut self) -> CommandOutcome {
        if self.closed || self.view == ViewMode::Raw {
            return CommandOutcome::Ignored;
        }
        self.settle_pending();
        match self.history.undo() {
            Some(snapshot) => self.restore_snapshot(&snapshot),
            None => CommandOutcome::Ignored,
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        if self.closed || self.view == ViewMode::Raw {
            return CommandOutcome::Ignored;
        }
        self.settle_pending();
        match self.history.redo() {
            Some(snapshot) => self.restore_snapshot(&snapshot),
            None => CommandOutcome::Ignored,
        }
    }

    /// Switch between the editable surface and the raw markup surface.
    pub fn toggle_view(&mut self) -> CommandOutcome {
        if self.closed {
            return CommandOutcome::Ignored;
        }
        let Some(raw) = self.platform.raw_text() else {
            tracing::debug!(id = %self.id, "no raw surface, code view unavailable");
            return CommandOutcome::Ignored;
        };
        self.settle_pending();
        match self.view {
            ViewMode::Wysiwyg => {
                self.pending_selection = None;
                let markup = self.platform.surface_html();
                self.platform.set_raw_text(&markup);
                self.view = ViewMode::Raw;
            }
            ViewMode::Raw => {
                // Raw text is trusted authoring input and goes in unsanitized.
                self.platform.set_surface_html(&raw);
                self.view = ViewMode::Wysiwyg;
                self.history.reset(&self.platform.surface_html());
            }
        }
        self.platform.show_view(self.view);
        tracing::debug!(id = %self.id, view = ?self.view, "view toggled");
        self.notify();
        self.refresh_toolbar();
        CommandOutcome::Applied
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if self.closed || self.fullscreen == fullscreen {
            return;
        }
        self.fullscreen = fullscreen;
        self.platform.set_fullscreen(fullscreen);
    }

    /// Reflect formatting at the caret onto the toolbar.
    ///
    /// Returns `None` when there is nothing to reflect (raw view or closed).
    pub fn refresh_toolbar(&mut self) -> Option<ToolbarState> {
        if self.closed || self.view == ViewMode::Raw {
            return None;
        }
        Some(toolbar::refresh(&mut self.platform))
    }

    /// Stop the session. Any pending edit is abandoned and every later call
    /// is a no-op.
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.debounce.cancel();
        self.pending_selection = None;
        if self.fullscreen {
            self.platform.set_fullscreen(false);
            self.fullscreen = false;
        }
        self.closed = true;
        tracing::debug!(id = %self.id, "editor session torn down");
    }

    fn apply_format(&mut self, command: &str, value: Option<&str>) -> CommandOutcome {
        self.platform.focus_surface();
        match self.platform.exec(command, value) {
            Ok(()) => {
                self.commit();
                self.refresh_toolbar();
                CommandOutcome::Applied
            }
            Err(err) => {
                tracing::debug!(id = %self.id, command, %err, "formatting command failed");
                CommandOutcome::Ignored
            }
        }
    }

    fn restore_selection(&mut self, pending: Option<&PendingSelection<P::Range>>) {
        self.platform.focus_surface();
        if let Some(pending) = pending {
            if let Err(err) = self.platform.restore(pending) {
                tracing::debug!(id = %self.id, %err, "selection restore failed");
            }
        }
    }

    fn insert_markup(&mut self, markup: &str) -> CommandOutcome {
        self.settle_pending();
        match self.platform.insert_html(markup) {
            Ok(()) => {
                self.commit();
                self.refresh_toolbar();
                CommandOutcome::Applied
            }
            Err(err) => {
                tracing::debug!(id = %self.id, %err, "insertion failed");
                CommandOutcome::Ignored
            }
        }
    }

    fn restore_snapshot(&mut self, snapshot: &str) -> CommandOutcome {
        self.platform.set_surface_html(snapshot);
        self.notify();
        self.refresh_toolbar();
        CommandOutcome::Applied
    }

    /// Commit a debounced edit early, if one is waiting.
    fn settle_pending(&mut self) -> bool {
        if !self.debounce.cancel() {
            return false;
        }
        self.record();
        true
    }

    fn commit(&mut self) {
        self.record();
        self.notify();
    }

    fn record(&mut self) {
        // Raw edits are not tracked; leaving raw view resets the baseline.
        if self.view == ViewMode::Wysiwyg {
            let markup = self.platform.surface_html();
            self.history.push(&markup);
        }
    }

    fn notify(&self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.host.notify(&self.content()) {
            tracing::debug!(id = %self.id, %err, "host notification dropped");
        }
    }
}

impl<P, T, H> std::fmt::Debug for EditorSession<P, T, H>
where
    P: EditorPlatform,
    T: Timer,
    H: HostChannel,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("view", &self.view)
            .field("fullscreen", &self.fullscreen)
            .field("history", &self.history)
            .field("pending_edit", &self.debounce.is_pending())
            .field("closed", &self.closed)
            .finish()
    }
}
