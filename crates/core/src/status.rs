//! Status bar model.

use crate::format::NumberFormat;
use crate::id::SubscriptionId;
use crate::notify::Notifier;

/// Raised when the user clicks the error, warning or DRC counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuesClicked {
    /// Errors shown at the time of the click
    pub errors: u32,
    /// Warnings shown at the time of the click
    pub warnings: u32,
    /// DRC violations shown at the time of the click
    pub drc_violations: u32,
}

/// Values shown in the status bar below the board.
#[derive(Debug, Default)]
pub struct StatusBar {
    /// Interaction mode, e.g. "Select" or "Route"
    pub mode: String,

    /// Error count
    pub errors: u32,

    /// Warning count
    pub warnings: u32,

    /// Design rule violations
    pub drc_violations: u32,

    /// Number of selected items
    pub selection: usize,

    /// Board score, if one has been computed
    pub score: Option<f64>,

    issue_listeners: Notifier<IssuesClicked>,
}

impl StatusBar {
    /// Create a status bar in select mode with no issues.
    pub fn new() -> Self {
        Self {
            mode: "Select".to_string(),
            ..Default::default()
        }
    }

    /// "Mode: ..." label.
    pub fn mode_text(&self) -> String {
        format!("Mode: {}", self.mode)
    }

    /// "Selection: ..." label.
    pub fn selection_text(&self) -> String {
        match self.selection {
            0 => "Selection: None".to_string(),
            1 => "Selection: 1 item".to_string(),
            n => format!("Selection: {} items", n),
        }
    }

    /// "DRC: n" label.
    pub fn drc_text(&self, format: &NumberFormat) -> String {
        format!("DRC: {}", format.format(self.drc_violations as i64))
    }

    /// "Score: ..." label, "-" until a score exists.
    pub fn score_text(&self) -> String {
        match self.score {
            Some(score) => format!("Score: {:.2}", score),
            None => "Score: -".to_string(),
        }
    }

    /// Register a handler for clicks on the issue counters.
    pub fn on_issues_clicked<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&IssuesClicked) + Send + Sync + 'static,
    {
        self.issue_listeners.subscribe(handler)
    }

    /// Handle a click on the error, warning or DRC counters.
    pub fn click_issues(&self) -> usize {
        let event = IssuesClicked {
            errors: self.errors,
            warnings: self.warnings,
            drc_violations: self.drc_violations,
        };
        self.issue_listeners.notify(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_labels() {
        let mut bar = StatusBar::new();
        assert_eq!(bar.mode_text(), "Mode: Select");
        assert_eq!(bar.selection_text(), "Selection: None");
        assert_eq!(bar.score_text(), "Score: -");

        bar.selection = 3;
        bar.drc_violations = 1200;
        bar.score = Some(87.456);
        assert_eq!(bar.selection_text(), "Selection: 3 items");
        assert_eq!(bar.drc_text(&NumberFormat::default()), "DRC: 1,200");
        assert_eq!(bar.score_text(), "Score: 87.46");
    }

    #[test]
    fn test_click_issues_notifies_listeners() {
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let mut bar = StatusBar::new();
        bar.errors = 2;
        bar.warnings = 5;

        let c = clicks.clone();
        bar.on_issues_clicked(move |e| c.lock().unwrap().push(*e));

        assert_eq!(bar.click_issues(), 1);
        let clicks = clicks.lock().unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].errors, 2);
        assert_eq!(clicks[0].warnings, 5);
    }
}
