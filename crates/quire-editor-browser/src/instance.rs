//! A mounted editor: session, listeners and host delivery.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use smol_str::SmolStr;
use web_sys::{HtmlElement, HtmlTextAreaElement};

use quire_editor_core::{
    CommandOutcome, EditorCommand, EditorOptions, EditorSession, HostChannel, HostError,
    PlatformError,
};

use crate::dialog;
use crate::events;
use crate::platform::DomPlatform;
use crate::timer::TimeoutTimer;

pub type BrowserSession = EditorSession<DomPlatform, TimeoutTimer, Outbox>;

/// The host's change callback.
pub type HostCallback = Box<dyn Fn(&str) -> Result<(), HostError>>;

/// Notifications queued by the session, delivered once its borrow ends.
#[derive(Clone, Default)]
pub struct Outbox(Rc<RefCell<Vec<String>>>);

impl Outbox {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl HostChannel for Outbox {
    fn notify(&self, markup: &str) -> Result<(), HostError> {
        self.0.borrow_mut().push(markup.to_string());
        Ok(())
    }
}

pub struct EditorInstance {
    id: SmolStr,
    root: HtmlElement,
    editable: HtmlElement,
    raw: Option<HtmlTextAreaElement>,
    session: RefCell<BrowserSession>,
    outbox: Outbox,
    host: HostCallback,
    listeners: RefCell<Vec<EventListener>>,
}

impl EditorInstance {
    /// Mount an editor on the element with id `element_id`.
    ///
    /// Fails with `PlatformError::MissingElement` when there is no such element.
    pub fn mount(
        element_id: &str,
        host: HostCallback,
        options: EditorOptions,
    ) -> Result<Rc<Self>, PlatformError> {
        let platform = DomPlatform::attach(element_id)?;
        let root = platform.root().clone();
        let editable = platform.editable().clone();
        let raw = platform.raw().cloned();
        let outbox = Outbox::default();

        let instance = Rc::new_cyclic(|weak| {
            let session = EditorSession::new(
                element_id,
                platform,
                TimeoutTimer::new(weak.clone()),
                outbox.clone(),
                options,
            );
            Self {
                id: SmolStr::new(element_id),
                root,
                editable,
                raw,
                session: RefCell::new(session),
                outbox,
                host,
                listeners: RefCell::new(Vec::new()),
            }
        });

        let listeners = events::attach_listeners(&instance);
        *instance.listeners.borrow_mut() = listeners;
        instance.refresh_toolbar();
        tracing::debug!(id = element_id, "editor mounted");
        Ok(instance)
    }

    pub fn id(&self) -> &str {
        &self.id
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

    /// Run `f` on the session, then deliver whatever it queued.
    ///
    /// DOM mutations made by the session (`execCommand`, `innerHTML`) fire
    /// events synchronously. Those arrive while the session is borrowed and
    /// are dropped here, which is what keeps programmatic edits from being
    /// counted as typing.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut BrowserSession) -> R) -> Option<R> {
        let result = match self.session.try_borrow_mut() {
            Ok(mut session) => Some(f(&mut session)),
            Err(_) => {
                tracing::trace!(id = %self.id, "session busy, nested event skipped");
                None
            }
        };
        self.flush();
        result
    }

    pub fn content(&self) -> String {
        match self.session.try_borrow() {
            Ok(session) => session.content(),
            Err(_) => self.editable.inner_html(),
        }
    }

    pub fn set_content(&self, markup: &str) {
        self.with_session(|s| s.set_content(markup));
    }

    pub fn is_closed(&self) -> bool {
        self.session.try_borrow().is_ok_and(|s| s.is_closed())
    }

    pub fn fire_debounce(&self) {
        self.with_session(|s| s.fire_debounce());
    }

    pub fn refresh_toolbar(&self) {
        self.with_session(|s| {
            s.refresh_toolbar();
        });
    }

    /// Execute a command, opening a dialog when it asks for input.
    pub fn dispatch(self: &Rc<Self>, command: EditorCommand) {
        let Some(outcome) = self.with_session(|s| s.execute(command)) else {
            return;
        };
        let opened = match outcome {
            CommandOutcome::PromptLink { selected_text } => {
                let weak = Rc::downgrade(self);
                dialog::prompt_for_link(&self.id, &selected_text, move |request| {
                    if let Some(instance) = weak.upgrade() {
                        instance.with_session(|s| s.submit_link(&request));
                    }
                })
            }
            CommandOutcome::PromptTable(limits) => {
                let weak = Rc::downgrade(self);
                dialog::prompt_for_table(&self.id, limits, move |request| {
                    if let Some(instance) = weak.upgrade() {
                        instance.with_session(|s| s.submit_table(&request));
                    }
                })
            }
            CommandOutcome::Applied | CommandOutcome::Ignored => return,
        };
        if let Err(err) = opened {
            tracing::warn!(id = %self.id, %err, "could not open dialog");
        }
    }

    /// Detach listeners, close dialogs and stop the session.
    ///
    /// Queued notifications are discarded.
    pub fn teardown(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        drop(listeners);
        let closed = dialog::close_all(&self.id);
        match self.session.try_borrow_mut() {
            Ok(mut session) => {
                session.teardown();
                session.platform_mut().release();
            }
            Err(_) => tracing::warn!(id = %self.id, "session busy during teardown"),
        }
        self.outbox.clear();
        tracing::debug!(id = %self.id, dialogs = closed, "editor torn down");
    }

    fn flush(&self) {
        for markup in self.outbox.take() {
            if self.is_closed() {
                return;
            }
            if let Err(err) = (self.host)(&markup) {
                tracing::debug!(id = %self.id, %err, "host notification failed");
            }
        }
    }
}

impl std::fmt::Debug for EditorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorInstance")
            .field("id", &self.id)
            .field("session", &self.session)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
