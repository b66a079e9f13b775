//! quire-editor-core: Pure Rust rich-text editor logic without DOM dependencies.
//!
//! This crate provides:
//! - `sanitize` - allowlist filtering for pasted markup
//! - `UndoHistory` - bounded snapshot history with redo branch discarding
//! - `EditorSession<P, T, H>` - the per-instance state machine, generic over
//!   the page (`EditorPlatform`), the debounce timer (`Timer`) and the host
//!   callback (`HostChannel`)
//! - `InstanceRegistry` - live sessions keyed by element id
//! - Command enumeration, toolbar sync and dialog input models

pub mod actions;
pub mod debounce;
pub mod dialog;
pub mod error;
pub mod options;
pub mod platform;
pub mod registry;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod toolbar;
pub mod undo;

pub use actions::{
    BlockFormat, EditorCommand, FormatCommand, Key, KeyCombo, Modifiers, ToggleCommand,
};
pub use debounce::{Debouncer, Timer};
pub use dialog::{
    DialogId, DialogRegistry, LinkForm, LinkRequest, TableForm, TableLimits, TableRequest,
};
pub use error::{HostError, PlatformError};
pub use options::EditorOptions;
pub use platform::{EditorPlatform, HostChannel, ViewMode};
pub use registry::InstanceRegistry;
pub use sanitize::{POLICY, SanitizationPolicy, sanitize};
pub use selection::{PendingSelection, SelectionBridge};
pub use session::{CommandOutcome, EditorSession, KeyOutcome, PasteData};
pub use smol_str::SmolStr;
pub use toolbar::{FormatQuery, Indicator, ToolbarState, ToolbarView};
pub use undo::{UndoHistory, UndoManager};
