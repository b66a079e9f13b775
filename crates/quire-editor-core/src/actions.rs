//! Editor commands and keyboard input types.
//!
//! Commands are a closed enumeration rather than string-keyed dispatch, so
//! every handler in the session is checked for exhaustiveness. Toolbar
//! controls carry the command name in a `data-command` attribute, which
//! `EditorCommand::parse` maps onto a variant.

use smol_str::SmolStr;

/// Formatting commands whose active state can be queried at the caret.
///
/// These are the controls that `ToolbarSync` reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    UnorderedList,
    OrderedList,
}

impl ToggleCommand {
    /// Commands reflected onto the toolbar after every selection change.
    pub const REFLECTED: [ToggleCommand; 8] = [
        ToggleCommand::Bold,
        ToggleCommand::Italic,
        ToggleCommand::Underline,
        ToggleCommand::JustifyLeft,
        ToggleCommand::JustifyCenter,
        ToggleCommand::JustifyRight,
        ToggleCommand::UnorderedList,
        ToggleCommand::OrderedList,
    ];

    /// The browser command identifier (`execCommand` / `queryCommandState`).
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::StrikeThrough => "strikeThrough",
            Self::JustifyLeft => "justifyLeft",
            Self::JustifyCenter => "justifyCenter",
            Self::JustifyRight => "justifyRight",
            Self::UnorderedList => "insertUnorderedList",
            Self::OrderedList => "insertOrderedList",
        }
    }
}

/// Formatting commands without a queryable on/off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Indent,
    Outdent,
    RemoveFormat,
    HorizontalRule,
    Unlink,
}

impl FormatCommand {
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Indent => "indent",
            Self::Outdent => "outdent",
            Self::RemoveFormat => "removeFormat",
            Self::HorizontalRule => "insertHorizontalRule",
            Self::Unlink => "unlink",
        }
    }
}

/// Block formats offered by the format picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockFormat {
    #[default]
    Paragraph,
    Heading(u8),
    Blockquote,
    Preformatted,
}

impl BlockFormat {
    /// Parse a picker value or a `queryCommandValue("formatBlock")` result.
    ///
    /// Browsers disagree on the shape of the query result (`h1`, `H1`,
    /// `<h1>`, `Heading 1`); all of the tag forms are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        let tag = value
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .to_ascii_lowercase();
        match tag.as_str() {
            "p" | "div" | "normal" => Some(Self::Paragraph),
            "blockquote" => Some(Self::Blockquote),
            "pre" => Some(Self::Preformatted),
            _ => {
                let level = tag.strip_prefix('h')?.parse::<u8>().ok()?;
                (1..=6).contains(&level).then_some(Self::Heading(level))
            }
        }
    }

    /// The tag name passed as the `formatBlock` value and shown in the picker.
    pub fn tag(self) -> SmolStr {
        match self {
            Self::Paragraph => SmolStr::new_static("p"),
            Self::Heading(level) => SmolStr::new(format!("h{level}")),
            Self::Blockquote => SmolStr::new_static("blockquote"),
            Self::Preformatted => SmolStr::new_static("pre"),
        }
    }
}

/// All commands an editor instance accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Toggle(ToggleCommand),
    Format(FormatCommand),
    FormatBlock(BlockFormat),
    /// Open the link dialog.
    Link,
    /// Open the table dialog.
    Table,
    /// Toggle between WYSIWYG and raw markup view.
    Code,
    Fullscreen,
    Undo,
    Redo,
}

impl EditorCommand {
    /// Parse a toolbar `data-command` name.
    ///
    /// `formatBlock` needs a value; use `EditorCommand::FormatBlock` with
    /// `BlockFormat::parse` for the picker instead.
    pub fn parse(name: &str) -> Option<Self> {
        use ToggleCommand as T;
        Some(match name {
            "bold" => Self::Toggle(T::Bold),
            "italic" => Self::Toggle(T::Italic),
            "underline" => Self::Toggle(T::Underline),
            "strikeThrough" => Self::Toggle(T::StrikeThrough),
            "justifyLeft" => Self::Toggle(T::JustifyLeft),
            "justifyCenter" => Self::Toggle(T::JustifyCenter),
            "justifyRight" => Self::Toggle(T::JustifyRight),
            "insertUnorderedList" => Self::Toggle(T::UnorderedList),
            "insertOrderedList" => Self::Toggle(T::OrderedList),
            "indent" => Self::Format(FormatCommand::Indent),
            "outdent" => Self::Format(FormatCommand::Outdent),
            "removeFormat" => Self::Format(FormatCommand::RemoveFormat),
            "insertHorizontalRule" => Self::Format(FormatCommand::HorizontalRule),
            "unlink" => Self::Format(FormatCommand::Unlink),
            "createLink" => Self::Link,
            "insertTable" => Self::Table,
            "code" => Self::Code,
            "fullscreen" => Self::Fullscreen,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            _ => return None,
        })
    }

    /// Whether this command changes document content.
    pub fn mutates_content(&self) -> bool {
        matches!(
            self,
            Self::Toggle(_) | Self::Format(_) | Self::FormatBlock(_) | Self::Undo | Self::Redo
        )
    }

    /// Whether this command is meaningful while the raw markup view is active.
    pub fn available_in_raw_view(&self) -> bool {
        matches!(self, Self::Code | Self::Fullscreen)
    }
}

/// Key values for keyboard input.
///
/// Only the keys the editor reacts to are distinguished; everything else
/// maps to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key, as reported by `KeyboardEvent.key`.
    Character(SmolStr),
    Escape,
    Enter,
    Tab,
    Other,
}

impl Key {
    /// Convert a `KeyboardEvent.key` string.
    pub fn from_key_str(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            s if s.chars().count() == 1 => Self::Character(SmolStr::new(s)),
            _ => Self::Other,
        }
    }
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS. Either is accepted.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key plus its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Map a key combination onto an editor shortcut.
    ///
    /// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo, and
    /// Ctrl/Cmd+B/I/U toggle bold, italic and underline. Alt combinations are
    /// left to the browser.
    pub fn shortcut(&self) -> Option<EditorCommand> {
        if !self.modifiers.primary() || self.modifiers.alt {
            return None;
        }
        let Key::Character(ch) = &self.key else {
            return None;
        };
        let shift = self.modifiers.shift;
        match ch.to_ascii_lowercase().as_str() {
            "z" if shift => Some(EditorCommand::Redo),
            "z" => Some(EditorCommand::Undo),
            "y" => Some(EditorCommand::Redo),
            "b" if !shift => Some(EditorCommand::Toggle(ToggleCommand::Bold)),
            "i" if !shift => Some(EditorCommand::Toggle(ToggleCommand::Italic)),
            "u" if !shift => Some(EditorCommand::Toggle(ToggleCommand::Underline)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(key: &str, ctrl: bool, shift: bool, meta: bool) -> KeyCombo {
        KeyCombo::new(
            Key::from_key_str(key),
            Modifiers {
                ctrl,
                alt: false,
                shift,
                meta,
            },
        )
    }

    #[test]
    fn test_parse_round_trips_command_names() {
        for cmd in ToggleCommand::REFLECTED {
            assert_eq!(
                EditorCommand::parse(cmd.command_name()),
                Some(EditorCommand::Toggle(cmd))
            );
        }
        assert_eq!(EditorCommand::parse("code"), Some(EditorCommand::Code));
        assert_eq!(
            EditorCommand::parse("createLink"),
            Some(EditorCommand::Link)
        );
        assert_eq!(
            EditorCommand::parse("insertTable"),
            Some(EditorCommand::Table)
        );
        assert_eq!(EditorCommand::parse("formatBlock"), None);
        assert_eq!(EditorCommand::parse("nope"), None);
    }

    #[test]
    fn test_block_format_parse_variants() {
        assert_eq!(BlockFormat::parse("h2"), Some(BlockFormat::Heading(2)));
        assert_eq!(BlockFormat::parse("<H3>"), Some(BlockFormat::Heading(3)));
        assert_eq!(BlockFormat::parse("p"), Some(BlockFormat::Paragraph));
        assert_eq!(BlockFormat::parse("div"), Some(BlockFormat::Paragraph));
        assert_eq!(
            BlockFormat::parse("blockquote"),
            Some(BlockFormat::Blockquote)
        );
        assert_eq!(BlockFormat::parse("h7"), None);
        assert_eq!(BlockFormat::parse(""), None);
        assert_eq!(BlockFormat::Heading(4).tag(), "h4");
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            combo("z", true, false, false).shortcut(),
            Some(EditorCommand::Undo)
        );
        assert_eq!(
            combo("Z", true, true, false).shortcut(),
            Some(EditorCommand::Redo)
        );
        assert_eq!(
            combo("y", false, false, true).shortcut(),
            Some(EditorCommand::Redo)
        );
        assert_eq!(
            combo("b", false, false, true).shortcut(),
            Some(EditorCommand::Toggle(ToggleCommand::Bold))
        );
        assert_eq!(
            combo("u", true, false, false).shortcut(),
            Some(EditorCommand::Toggle(ToggleCommand::Underline))
        );
        // No primary modifier.
        assert_eq!(combo("b", false, false, false).shortcut(), None);
        assert_eq!(combo("Escape", true, false, false).shortcut(), None);
    }

    #[test]
    fn test_mutating_commands() {
        assert!(EditorCommand::Toggle(ToggleCommand::Bold).mutates_content());
        assert!(EditorCommand::Format(FormatCommand::Indent).mutates_content());
        assert!(EditorCommand::FormatBlock(BlockFormat::Paragraph).mutates_content());
        assert!(EditorCommand::Undo.mutates_content());
        assert!(!EditorCommand::Link.mutates_content());
        assert!(!EditorCommand::Table.mutates_content());
        assert!(!EditorCommand::Code.mutates_content());
        assert!(!EditorCommand::Fullscreen.mutates_content());
    }

    #[test]
    fn test_raw_view_availability() {
        assert!(EditorCommand::Code.available_in_raw_view());
        assert!(EditorCommand::Fullscreen.available_in_raw_view());
        assert!(!EditorCommand::Undo.available_in_raw_view());
        assert!(!EditorCommand::Link.available_in_raw_view());
    }
}
