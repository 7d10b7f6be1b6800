//! Net inspector state.

use crate::provider::NetProvider;
use crate::query::{focus, query_provider, FocusRequest, NetFilter};
use routeview_core::{NetRow, Notifier, SubscriptionId};
use tracing::debug;

const COLUMNS: [&str; 2] = ["Name", "Status"];

/// Filter state, current rows and focus listeners of the net inspector.
#[derive(Debug, Default)]
pub struct NetInspector {
    filter: NetFilter,
    rows: Vec<NetRow>,
    focus_listeners: Notifier<FocusRequest>,
}

impl NetInspector {
    /// Create an inspector with an empty filter and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter.
    pub fn filter(&self) -> &NetFilter {
        &self.filter
    }

    /// Toggle the unrouted-only filter. Takes effect on the next refresh.
    pub fn set_unrouted_only(&mut self, unrouted_only: bool) {
        self.filter.unrouted_only = unrouted_only;
    }

    /// Set the name filter. Takes effect on the next refresh.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
    }

    /// Switch to unrouted nets only and refresh.
    pub fn show_unrouted_only<P: NetProvider>(&mut self, provider: Option<&P>) -> &[NetRow] {
        self.set_unrouted_only(true);
        self.refresh(provider)
    }

    /// Rebuild the rows from the provider. No board clears the table.
    pub fn refresh<P: NetProvider>(&mut self, provider: Option<&P>) -> &[NetRow] {
        self.rows = query_provider(provider, &self.filter);
        debug!("Net inspector refreshed: {} rows", self.rows.len());
        &self.rows
    }

    /// Rows from the last refresh.
    pub fn rows(&self) -> &[NetRow] {
        &self.rows
    }

    /// Column headers.
    pub fn column_names(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    /// Cell text. Unknown columns are empty; unknown rows are `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let row = self.rows.get(row)?;
        Some(match column {
            0 => row.name.as_str(),
            1 => row.status_text(),
            _ => "",
        })
    }

    /// Register a handler for net focus requests.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&FocusRequest) + Send + Sync + 'static,
    {
        self.focus_listeners.subscribe(handler)
    }

    /// Remove a focus handler.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.focus_listeners.unsubscribe(id)
    }

    /// Select a row, notifying focus handlers. Out-of-range rows do nothing.
    pub fn select(&self, row: usize) -> Option<FocusRequest> {
        let row = self.rows.get(row)?;
        let request = focus(row.net_number);
        let notified = self.focus_listeners.notify(&request);
        debug!("Focus net {} ({} listeners)", row.net_number, notified);
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::JsonBoard;
    use routeview_core::Net;
    use std::sync::{Arc, Mutex};

    fn board() -> JsonBoard {
        JsonBoard {
            nets: vec![Net::new(1, "GND"), Net::new(2, "VCC"), Net::new(3, "CLK")],
            ratsnest: Some([(1, 4), (3, 1)].into_iter().collect()),
        }
    }

    #[test]
    fn test_refresh_and_table_model() {
        let board = board();
        let mut inspector = NetInspector::new();
        inspector.refresh(Some(&board));

        assert_eq!(inspector.column_names(), &["Name", "Status"]);
        assert_eq!(inspector.column_count(), 2);
        assert_eq!(inspector.row_count(), 3);
        assert_eq!(inspector.cell(0, 0), Some("CLK"));
        assert_eq!(inspector.cell(0, 1), Some("Unrouted"));
        assert_eq!(inspector.cell(2, 0), Some("VCC"));
        assert_eq!(inspector.cell(2, 1), Some("Routed"));
        assert_eq!(inspector.cell(2, 9), Some(""));
        assert_eq!(inspector.cell(3, 0), None);
    }

    #[test]
    fn test_show_unrouted_only() {
        let board = board();
        let mut inspector = NetInspector::new();
        let rows = inspector.show_unrouted_only(Some(&board));
        assert_eq!(rows.len(), 2);
        assert!(inspector.filter().unrouted_only);
    }

    #[test]
    fn test_filter_applies_on_refresh() {
        let mut board = board();
        let mut inspector = NetInspector::new();
        inspector.set_search_text("c");
        assert_eq!(inspector.row_count(), 0);

        inspector.refresh(Some(&board));
        assert_eq!(inspector.row_count(), 2);

        board.nets.push(Net::new(4, "CS"));
        inspector.refresh(Some(&board));
        assert_eq!(inspector.row_count(), 3);
    }

    #[test]
    fn test_refresh_without_board_clears_rows() {
        let board = board();
        let mut inspector = NetInspector::new();
        inspector.refresh(Some(&board));
        inspector.refresh::<JsonBoard>(None);
        assert_eq!(inspector.row_count(), 0);
    }

    #[test]
    fn test_select_notifies_focus_listeners() {
        let board = board();
        let focused = Arc::new(Mutex::new(Vec::new()));
        let mut inspector = NetInspector::new();
        let f = focused.clone();
        let id = inspector.subscribe(move |r| f.lock().unwrap().push(r.net_number));
        inspector.refresh(Some(&board));

        let request = inspector.select(1).unwrap();
        assert_eq!(request, focus(1));
        assert_eq!(*focused.lock().unwrap(), vec![1]);

        assert!(inspector.select(10).is_none());
        assert!(inspector.unsubscribe(id));
        inspector.select(0);
        assert_eq!(*focused.lock().unwrap(), vec![1]);
    }
}
