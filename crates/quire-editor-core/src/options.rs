//! Per-instance editor configuration.

use std::time::Duration;

use serde::Deserialize;

/// Options recognized by `initialize`.
///
/// Deserialized from the host's options object; unknown keys are ignored
/// and missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    /// Quiet period before a typing burst is committed and reported.
    pub debounce_ms: u32,
    /// Maximum number of undo snapshots kept.
    pub undo_stack_size: u32,
    pub max_table_rows: u32,
    pub max_table_columns: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            undo_stack_size: 100,
            max_table_rows: 20,
            max_table_columns: 10,
        }
    }
}

impl EditorOptions {
    /// Clamp sizes that would make the editor unusable.
    pub fn normalized(mut self) -> Self {
        self.undo_stack_size = self.undo_stack_size.max(1);
        self.max_table_rows = self.max_table_rows.max(1);
        self.max_table_columns = self.max_table_columns.max(1);
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps_zero() {
        let options = EditorOptions {
            debounce_ms: 0,
            undo_stack_size: 0,
            max_table_rows: 0,
            max_table_columns: 0,
        }
        .normalized();
        assert_eq!(options.debounce_ms, 0);
        assert_eq!(options.undo_stack_size, 1);
        assert_eq!(options.max_table_rows, 1);
        assert_eq!(options.max_table_columns, 1);
    }

    #[test]
    fn test_deserialize_partial_camel_case() {
        let options: EditorOptions =
            serde_json::from_str(r#"{"debounceMs": 50, "maxTableRows": 5, "theme": "dark"}"#)
                .unwrap();
        assert_eq!(
            options,
            EditorOptions {
                debounce_ms: 50,
                max_table_rows: 5,
                ..EditorOptions::default()
            }
        );
    }

    #[test]
    fn test_debounce_duration() {
        assert_eq!(
            EditorOptions::default().debounce(),
            Duration::from_millis(300)
        );
    }
}
