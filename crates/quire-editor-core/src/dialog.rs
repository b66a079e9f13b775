//! Dialog input models and per-owner dialog tracking.
//!
//! Rendering lives in the platform layer. This module validates what the
//! user typed, builds the markup a submission inserts, and keeps the table
//! of open dialogs so an editor's teardown can close all of its own.

use smol_str::SmolStr;

use crate::options::EditorOptions;
use crate::sanitize::{escape_attr, escape_text};

/// Raw link dialog fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkForm {
    pub url: String,
    pub text: String,
    pub new_tab: bool,
}

impl Default for LinkForm {
    fn default() -> Self {
        Self {
            url: String::new(),
            text: String::new(),
            new_tab: true,
        }
    }
}

/// A validated link submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub url: String,
    pub text: Option<String>,
    pub new_tab: bool,
}

impl LinkRequest {
    /// Validate the form. An empty URL refuses submission.
    pub fn from_form(form: &LinkForm) -> Option<Self> {
        let url = form.url.trim();
        if url.is_empty() {
            return None;
        }
        let text = form.text.trim();
        Some(Self {
            url: url.to_string(),
            text: (!text.is_empty()).then(|| text.to_string()),
            new_tab: form.new_tab,
        })
    }

    /// Anchor markup for insertion.
    ///
    /// The visible text is the typed display text, else the selected text,
    /// else the URL itself.
    pub fn to_markup(&self, selected_text: Option<&str>) -> String {
        let text = self
            .text
            .as_deref()
            .or(selected_text.filter(|s| !s.is_empty()))
            .unwrap_or(&self.url);
        let target = if self.new_tab {
            r#" target="_blank" rel="noopener noreferrer""#
        } else {
            ""
        };
        format!(
            r#"<a href="{}"{}>{}</a>"#,
            escape_attr(&self.url),
            target,
            escape_text(text)
        )
    }
}

/// Upper bounds for the table dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    pub max_rows: u32,
    pub max_columns: u32,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_rows: 20,
            max_columns: 10,
        }
    }
}

impl From<&EditorOptions> for TableLimits {
    fn from(options: &EditorOptions) -> Self {
        Self {
            max_rows: options.max_table_rows.max(1),
            max_columns: options.max_table_columns.max(1),
        }
    }
}

/// Raw table dialog fields, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableForm {
    pub rows: String,
    pub columns: String,
}

impl Default for TableForm {
    fn default() -> Self {
        Self {
            rows: TableRequest::DEFAULT_SIZE.to_string(),
            columns: TableRequest::DEFAULT_SIZE.to_string(),
        }
    }
}

/// A validated table submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRequest {
    pub rows: u32,
    pub columns: u32,
}

impl TableRequest {
    /// Used when a field is not a number.
    pub const DEFAULT_SIZE: u32 = 3;

    /// Clamp both fields into `[1, limit]`. Table submission never fails.
    pub fn from_form(form: &TableForm, limits: TableLimits) -> Self {
        Self {
            rows: clamp_dimension(&form.rows, limits.max_rows),
            columns: clamp_dimension(&form.columns, limits.max_columns),
        }
    }

    /// Table markup for insertion, followed by an empty paragraph so the
    /// caret can leave the table.
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<table><tbody>");
        for _ in 0..self.rows {
            out.push_str("<tr>");
            for _ in 0..self.columns {
                out.push_str("<td><br></td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table><p><br></p>");
        out
    }
}

fn clamp_dimension(input: &str, max: u32) -> u32 {
    let max = max.max(1);
    match input.trim().parse::<i64>() {
        Ok(n) => n.clamp(1, i64::from(max)) as u32,
        Err(_) => TableRequest::DEFAULT_SIZE.min(max),
    }
}

/// Identifier of one open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(u64);

impl DialogId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Open dialogs, each tagged with the editor that owns it.
///
/// `D` is whatever keeps the rendered dialog alive. In the browser that is
/// the overlay element plus its key listener, which deregisters on drop, so
/// removing an entry here is what closes the dialog. Because an id can be
/// removed only once, a dialog resolves at most once.
#[derive(Debug)]
pub struct DialogRegistry<D> {
    next_id: u64,
    open: Vec<(DialogId, SmolStr, D)>,
}

impl<D> Default for DialogRegistry<D> {
    fn default() -> Self {
        Self {
            next_id: 1,
            open: Vec::new(),
        }
    }
}

impl<D> DialogRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id before the dialog exists, so its event handlers can
    /// refer to it.
    pub fn reserve_id(&mut self) -> DialogId {
        let id = DialogId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Track an open dialog under `owner`.
    pub fn insert(&mut self, id: DialogId, owner: &str, dialog: D) {
        self.open.push((id, SmolStr::new(owner), dialog));
    }

    /// Remove one dialog. Returns `None` if it was already closed.
    pub fn remove(&mut self, id: DialogId) -> Option<D> {
        let pos = self.open.iter().position(|(open_id, _, _)| *open_id == id)?;
        Some(self.open.remove(pos).2)
    }

    /// Remove every dialog belonging to `owner`.
    pub fn remove_owner(&mut self, owner: &str) -> Vec<D> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.open.len() {
            if self.open[i].1 == owner {
                removed.push(self.open.remove(i).2);
            } else {
                i += 1;
            }
        }
        removed
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.open.iter().any(|(open_id, _, _)| *open_id == id)
    }

    /// Number of dialogs open for `owner`.
    pub fn count_for(&self, owner: &str) -> usize {
        self.open.iter().filter(|(_, o, _)| o == owner).count()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn table(rows: &str, columns: &str, limits: TableLimits) -> (u32, u32) {
        let request = TableRequest::from_form(
            &TableForm {
                rows: rows.into(),
                columns: columns.into(),
            },
            limits,
        );
        (request.rows, request.columns)
    }

    #[test]
    fn test_table_clamps_to_limits() {
        let limits = TableLimits::default();
        assert_eq!(table("999", "999", limits), (20, 10));
        assert_eq!(table("0", "-4", limits), (1, 1));
        assert_eq!(table(" 5 ", "2", limits), (5, 2));
    }

    #[test]
    fn test_table_non_numeric_defaults() {
        let limits = TableLimits::default();
        assert_eq!(table("abc", "", limits), (3, 3));
        assert_eq!(table("2.5", "x1", limits), (3, 3));
    }

    #[test]
    fn test_table_default_respects_small_limits() {
        let limits = TableLimits {
            max_rows: 2,
            max_columns: 1,
        };
        assert_eq!(table("abc", "abc", limits), (2, 1));
    }

    #[test]
    fn test_table_markup() {
        let request = TableRequest {
            rows: 2,
            columns: 3,
        };
        let markup = request.to_markup();
        assert_eq!(markup.matches("<tr>").count(), 2);
        assert_eq!(markup.matches("<td>").count(), 6);
        assert!(markup.ends_with("<p><br></p>"));
    }

    #[test]
    fn test_link_requires_url() {
        let form = LinkForm {
            url: "   ".into(),
            ..LinkForm::default()
        };
        assert_eq!(LinkRequest::from_form(&form), None);
    }

    #[test]
    fn test_link_markup_text_fallbacks() {
        let req = LinkRequest::from_form(&LinkForm {
            url: "https://example.com/?a=1&b=2".into(),
            text: String::new(),
            new_tab: false,
        })
        .unwrap();

        assert_eq!(
            req.to_markup(None),
            r#"<a href="https://example.com/?a=1&amp;b=2">https://example.com/?a=1&amp;b=2</a>"#
        );
        assert_eq!(
            req.to_markup(Some("<sel>")),
            r#"<a href="https://example.com/?a=1&amp;b=2">&lt;sel&gt;</a>"#
        );
    }

    #[test]
    fn test_link_markup_new_tab() {
        let req = LinkRequest::from_form(&LinkForm {
            url: "/docs".into(),
            text: "Docs".into(),
            new_tab: true,
        })
        .unwrap();
        assert_eq!(
            req.to_markup(Some("ignored")),
            r#"<a href="/docs" target="_blank" rel="noopener noreferrer">Docs</a>"#
        );
    }

    #[test]
    fn test_registry_resolves_once() {
        let mut dialogs = DialogRegistry::new();
        let id = dialogs.reserve_id();
        dialogs.insert(id, "editor-a", "link");

        assert!(dialogs.contains(id));
        assert_eq!(dialogs.remove(id), Some("link"));
        assert_eq!(dialogs.remove(id), None);
        assert!(dialogs.is_empty());
    }

    #[test]
    fn test_registry_owner_teardown_is_scoped() {
        struct Guard(Rc<Cell<u32>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let dropped = Rc::new(Cell::new(0));
        let mut dialogs = DialogRegistry::new();
        for owner in ["a", "b", "a"] {
            let id = dialogs.reserve_id();
            dialogs.insert(id, owner, Guard(dropped.clone()));
        }

        assert_eq!(dialogs.count_for("a"), 2);
        drop(dialogs.remove_owner("a"));
        assert_eq!(dropped.get(), 2);
        assert_eq!(dialogs.count_for("a"), 0);
        assert_eq!(dialogs.count_for("b"), 1);
    }
}
