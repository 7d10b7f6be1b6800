//! Net queries.

use crate::provider::NetProvider;
use routeview_core::{Net, NetRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-edited filter applied to the net list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetFilter {
    /// Only keep nets with incomplete connections
    pub unrouted_only: bool,

    /// Case-insensitive substring matched against net names
    pub search_text: String,
}

/// Request to show only the incomplete connections of one net and redraw.
///
/// Pure data; applying it is up to the board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRequest {
    /// Net to focus
    pub net_number: u32,

    /// Restrict the ratsnest display to this net's incomplete connections
    pub incompletes_only: bool,

    /// Redraw the board afterwards
    pub repaint: bool,
}

/// Build the inspector rows for a set of nets.
///
/// Nets are visited in ascending net number starting at 1; net 0 is never
/// listed and a number that appears twice keeps its first net. Rows pass
/// the filter when the name contains `search_text` (trimmed,
/// case-insensitive) and, if `unrouted_only` is set,
/// when `is_unrouted` reports the net as unrouted. The result lists unrouted
/// nets first, then sorts by name using plain lexicographic order.
pub fn query<'a, I, F>(nets: I, is_unrouted: F, unrouted_only: bool, search_text: &str) -> Vec<NetRow>
where
    I: IntoIterator<Item = &'a Net>,
    F: Fn(u32) -> bool,
{
    let mut by_number: BTreeMap<u32, &Net> = BTreeMap::new();
    for net in nets.into_iter().filter(|n| n.net_number >= 1) {
        by_number.entry(net.net_number).or_insert(net);
    }

    let needle = search_text.trim().to_lowercase();

    let mut rows: Vec<NetRow> = by_number
        .into_values()
        .map(|net| NetRow::new(net, is_unrouted(net.net_number)))
        .filter(|row| needle.is_empty() || row.name.to_lowercase().contains(&needle))
        .filter(|row| !unrouted_only || row.unrouted)
        .collect();

    rows.sort_by(|a, b| b.unrouted.cmp(&a.unrouted).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Query the nets of a provider. No board means no rows.
pub fn query_provider<P: NetProvider>(provider: Option<&P>, filter: &NetFilter) -> Vec<NetRow> {
    match provider {
        Some(provider) => {
            let nets = provider.nets();
            query(
                &nets,
                |n| provider.is_unrouted(n),
                filter.unrouted_only,
                &filter.search_text,
            )
        }
        None => Vec::new(),
    }
}

/// Focus request for a net.
pub fn focus(net_number: u32) -> FocusRequest {
    FocusRequest {
        net_number,
        incompletes_only: true,
        repaint: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::JsonBoard;
    use std::collections::HashSet;

    fn sample() -> (Vec<Net>, HashSet<u32>) {
        let nets = vec![Net::new(1, "GND"), Net::new(2, "VCC"), Net::new(3, "CLK")];
        let unrouted = [1, 3].into_iter().collect();
        (nets, unrouted)
    }

    fn names(rows: &[NetRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_unrouted_only_sorted_by_name() {
        let (nets, unrouted) = sample();
        let rows = query(&nets, |n| unrouted.contains(&n), true, "");
        assert_eq!(names(&rows), vec!["CLK", "GND"]);
        assert!(rows.iter().all(|r| r.unrouted));
    }

    #[test]
    fn test_unrouted_first() {
        let (nets, unrouted) = sample();
        let rows = query(&nets, |n| unrouted.contains(&n), false, "");
        assert_eq!(names(&rows), vec!["CLK", "GND", "VCC"]);
        assert_eq!(rows[2].status_text(), "Routed");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (nets, unrouted) = sample();
        let rows = query(&nets, |n| unrouted.contains(&n), false, "vc");
        assert_eq!(names(&rows), vec!["VCC"]);
        assert_eq!(rows[0].net_number, 2);

        let rows = query(&nets, |n| unrouted.contains(&n), false, "  Gn ");
        assert_eq!(names(&rows), vec!["GND"]);
    }

    #[test]
    fn test_search_and_unrouted_filter_combine() {
        let (nets, unrouted) = sample();
        let rows = query(&nets, |n| unrouted.contains(&n), true, "vcc");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let nets: Vec<Net> = Vec::new();
        let rows = query(&nets, |_| true, false, "");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_lexicographic_not_locale_order() {
        let nets = vec![Net::new(1, "b"), Net::new(2, "B"), Net::new(3, "a"), Net::new(4, "A")];
        let rows = query(&nets, |_| false, false, "");
        assert_eq!(names(&rows), vec!["A", "B", "a", "b"]);
    }

    #[test]
    fn test_duplicate_and_gapped_numbers() {
        let nets = vec![
            Net::new(7, "SDA"),
            Net::new(2, "SCL"),
            Net::new(7, "SDA_DUP"),
        ];
        let rows = query(&nets, |_| false, false, "");
        assert_eq!(names(&rows), vec!["SCL", "SDA"]);
    }

    #[test]
    fn test_net_zero_is_skipped() {
        let nets = vec![Net::new(0, "NULL_NET"), Net::new(1, "GND")];
        let rows = query(&nets, |_| true, false, "");
        assert_eq!(names(&rows), vec!["GND"]);
        assert_eq!(rows[0].net_number, 1);
    }

    #[test]
    fn test_equal_names_keep_net_number_order() {
        let nets = vec![Net::new(5, "N"), Net::new(1, "N"), Net::new(3, "N")];
        let rows = query(&nets, |_| true, false, "");
        let numbers: Vec<u32> = rows.iter().map(|r| r.net_number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn test_query_provider() {
        let board = JsonBoard {
            nets: vec![Net::new(1, "GND"), Net::new(2, "VCC"), Net::new(3, "CLK")],
            ratsnest: Some([(1, 2), (3, 1)].into_iter().collect()),
        };
        let filter = NetFilter {
            unrouted_only: true,
            search_text: String::new(),
        };
        let rows = query_provider(Some(&board), &filter);
        assert_eq!(names(&rows), vec!["CLK", "GND"]);
    }

    #[test]
    fn test_query_without_board() {
        let rows = query_provider::<JsonBoard>(None, &NetFilter::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_focus_request() {
        let request = focus(42);
        assert_eq!(request.net_number, 42);
        assert!(request.incompletes_only);
        assert!(request.repaint);
    }
}
