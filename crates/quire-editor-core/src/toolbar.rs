//! Toolbar state synchronization.
//!
//! After anything that can move the selection, the toolbar is refreshed by
//! asking the platform which formats are active at the caret and reflecting
//! the answers onto the controls. A failed query is not an error: the
//! control just keeps whatever state it had.

use crate::actions::{BlockFormat, ToggleCommand};
use crate::error::PlatformError;

/// Formatting state queries (`queryCommandState`/`queryCommandValue`).
pub trait FormatQuery {
    fn query_state(&self, command: ToggleCommand) -> Result<bool, PlatformError>;

    /// The block format at the caret, in whatever form the platform reports.
    fn query_block_format(&self) -> Result<String, PlatformError>;
}

/// The toolbar controls.
pub trait ToolbarView {
    fn set_active(&mut self, command: ToggleCommand, active: bool);

    fn set_block_format(&mut self, format: BlockFormat);
}

/// Outcome of one state query.
///
/// `Unknown` covers both "unsupported here" and "query failed"; such
/// controls are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Active,
    Inactive,
    Unknown,
}

/// What a refresh observed, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    pub indicators: Vec<(ToggleCommand, Indicator)>,
    pub block_format: Option<BlockFormat>,
}

impl ToolbarState {
    pub fn indicator(&self, command: ToggleCommand) -> Option<Indicator> {
        self.indicators
            .iter()
            .find(|(c, _)| *c == command)
            .map(|(_, i)| *i)
    }
}

/// Query every reflected command and update the view.
///
/// The browser answers queries from the document and updates controls in
/// the toolbar container, so one platform value plays both roles.
pub fn refresh<P>(platform: &mut P) -> ToolbarState
where
    P: FormatQuery + ToolbarView + ?Sized,
{
    let mut indicators = Vec::with_capacity(ToggleCommand::REFLECTED.len());
    for command in ToggleCommand::REFLECTED {
        let indicator = match platform.query_state(command) {
            Ok(true) => Indicator::Active,
            Ok(false) => Indicator::Inactive,
            Err(err) => {
                tracing::trace!(command = command.command_name(), %err, "state query failed");
                Indicator::Unknown
            }
        };
        match indicator {
            Indicator::Active => platform.set_active(command, true),
            Indicator::Inactive => platform.set_active(command, false),
            Indicator::Unknown => {}
        }
        indicators.push((command, indicator));
    }

    let block_format = match platform.query_block_format() {
        Ok(value) => BlockFormat::parse(&value),
        Err(err) => {
            tracing::trace!(%err, "block format query failed");
            None
        }
    };
    if let Some(format) = block_format {
        platform.set_block_format(format);
    }

    ToolbarState {
        indicators,
        block_format,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct FakeToolbar {
        active_at_caret: Vec<ToggleCommand>,
        unsupported: Vec<ToggleCommand>,
        block_at_caret: Result<String, PlatformError>,
        shown: HashMap<ToggleCommand, bool>,
        shown_block: Option<BlockFormat>,
    }

    impl FakeToolbar {
        fn new(active: Vec<ToggleCommand>, block: Result<String, PlatformError>) -> Self {
            Self {
                active_at_caret: active,
                unsupported: Vec::new(),
                block_at_caret: block,
                shown: HashMap::new(),
                shown_block: None,
            }
        }
    }

    impl FormatQuery for FakeToolbar {
        fn query_state(&self, command: ToggleCommand) -> Result<bool, PlatformError> {
            if self.unsupported.contains(&command) {
                return Err(PlatformError::Unsupported(command.command_name()));
            }
            Ok(self.active_at_caret.contains(&command))
        }

        fn query_block_format(&self) -> Result<String, PlatformError> {
            self.block_at_caret.clone()
        }
    }

    impl ToolbarView for FakeToolbar {
        fn set_active(&mut self, command: ToggleCommand, active: bool) {
            self.shown.insert(command, active);
        }

        fn set_block_format(&mut self, format: BlockFormat) {
            self.shown_block = Some(format);
        }
    }

    #[test]
    fn test_refresh_reflects_active_commands() {
        let mut toolbar = FakeToolbar::new(
            vec![ToggleCommand::Bold, ToggleCommand::OrderedList],
            Ok("h2".into()),
        );
        let state = refresh(&mut toolbar);

        assert_eq!(toolbar.shown.get(&ToggleCommand::Bold), Some(&true));
        assert_eq!(toolbar.shown.get(&ToggleCommand::Italic), Some(&false));
        assert_eq!(toolbar.shown.get(&ToggleCommand::OrderedList), Some(&true));
        assert_eq!(toolbar.shown_block, Some(BlockFormat::Heading(2)));
        assert_eq!(state.indicators.len(), ToggleCommand::REFLECTED.len());
        // Strikethrough is executable but not reflected.
        assert_eq!(state.indicator(ToggleCommand::StrikeThrough), None);
    }

    #[test]
    fn test_failed_queries_leave_controls_unchanged() {
        let mut toolbar =
            FakeToolbar::new(vec![], Err(PlatformError::Unsupported("formatBlock")));
        toolbar.unsupported.push(ToggleCommand::JustifyCenter);
        toolbar.shown.insert(ToggleCommand::JustifyCenter, true);
        toolbar.shown_block = Some(BlockFormat::Blockquote);

        let state = refresh(&mut toolbar);

        assert_eq!(
            state.indicator(ToggleCommand::JustifyCenter),
            Some(Indicator::Unknown)
        );
        assert_eq!(
            toolbar.shown.get(&ToggleCommand::JustifyCenter),
            Some(&true)
        );
        assert_eq!(toolbar.shown_block, Some(BlockFormat::Blockquote));
        assert_eq!(state.block_format, None);
    }
}
