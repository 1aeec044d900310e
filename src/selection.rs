//! Selection and highlight state machine.
//!
//! A session holds three values: the explicitly selected methods, the
//! highlighted method and the highlighted edge. Every UI interaction is a
//! [`SelectionEvent`] and [`transition`] maps (state, event) to the next
//! state. Highlighting a method and highlighting an edge are mutually
//! exclusive.

use crate::catalog::MethodCatalog;
use crate::models::MethodPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Insertion-ordered, no duplicates. Empty means "show the category view".
    pub selected_methods: Vec<String>,
    pub highlighted_method: Option<String>,
    pub highlighted_edge: Option<MethodPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// Toggle a method picked from the search results.
    SearchPick { method: String },
    /// Replace the selection with the top `n` methods of `categories`.
    TopNApply { n: usize, categories: BTreeSet<String> },
    Clear,
    NodeClick { method: String },
    EdgeClick { pair: MethodPair },
    Reset,
    #[serde(other)]
    Unknown,
}

/// Apply one event. Never fails; events that do not make sense leave the
/// state unchanged.
pub fn transition(
    mut state: SelectionState,
    event: &SelectionEvent,
    catalog: &MethodCatalog,
) -> SelectionState {
    match event {
        SelectionEvent::SearchPick { method } => {
            if method.is_empty() {
                return state;
            }
            if let Some(pos) = state.selected_methods.iter().position(|m| m == method) {
                state.selected_methods.remove(pos);
            } else {
                state.selected_methods.push(method.clone());
            }
        }
        SelectionEvent::TopNApply { n, categories } => {
            state.selected_methods = catalog.top_n(*n, categories);
        }
        SelectionEvent::Clear => {
            state.selected_methods.clear();
        }
        SelectionEvent::NodeClick { method } => {
            if method.is_empty() {
                return state;
            }
            if state.highlighted_method.as_deref() == Some(method.as_str()) {
                state.highlighted_method = None;
            } else {
                state.highlighted_method = Some(method.clone());
            }
            state.highlighted_edge = None;
        }
        SelectionEvent::EdgeClick { pair } => {
            state.highlighted_edge = Some(pair.clone());
            state.highlighted_method = None;
        }
        SelectionEvent::Reset => {
            state.highlighted_method = None;
            state.highlighted_edge = None;
        }
        SelectionEvent::Unknown => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::scenario_catalog;

    fn pair(a: &str, b: &str) -> MethodPair {
        MethodPair::new(a, b).unwrap()
    }

    fn run(events: &[SelectionEvent]) -> SelectionState {
        let catalog = scenario_catalog();
        events
            .iter()
            .fold(SelectionState::default(), |s, e| transition(s, e, &catalog))
    }

    #[test]
    fn test_initial_state_is_empty() {
        let s = SelectionState::default();
        assert!(s.selected_methods.is_empty());
        assert!(s.highlighted_method.is_none());
        assert!(s.highlighted_edge.is_none());
    }

    #[test]
    fn test_search_pick_toggles() {
        let pick = |m: &str| SelectionEvent::SearchPick { method: m.into() };
        let s = run(&[pick("a"), pick("b")]);
        assert_eq!(s.selected_methods, vec!["a", "b"]);
        let s = run(&[pick("a"), pick("b"), pick("a")]);
        assert_eq!(s.selected_methods, vec!["b"]);
    }

    #[test]
    fn test_top_n_apply_replaces_selection() {
        let cats: BTreeSet<String> = ["ml".to_string()].into_iter().collect();
        let s = run(&[
            SelectionEvent::SearchPick { method: "a".into() },
            SelectionEvent::TopNApply { n: 2, categories: cats },
        ]);
        assert_eq!(s.selected_methods, vec!["b", "c"]);
    }

    #[test]
    fn test_clear_keeps_highlight() {
        let s = run(&[
            SelectionEvent::SearchPick { method: "a".into() },
            SelectionEvent::NodeClick { method: "a".into() },
            SelectionEvent::Clear,
        ]);
        assert!(s.selected_methods.is_empty());
        assert_eq!(s.highlighted_method.as_deref(), Some("a"));
    }

    #[test]
    fn test_node_click_toggles_and_clears_edge() {
        let s = run(&[
            SelectionEvent::EdgeClick { pair: pair("a", "b") },
            SelectionEvent::NodeClick { method: "c".into() },
        ]);
        assert_eq!(s.highlighted_method.as_deref(), Some("c"));
        assert!(s.highlighted_edge.is_none());

        let s = run(&[
            SelectionEvent::NodeClick { method: "c".into() },
            SelectionEvent::NodeClick { method: "c".into() },
        ]);
        assert!(s.highlighted_method.is_none());
        assert!(s.highlighted_edge.is_none());
    }

    #[test]
    fn test_edge_click_clears_method() {
        let s = run(&[
            SelectionEvent::NodeClick { method: "a".into() },
            SelectionEvent::EdgeClick { pair: pair("b", "a") },
        ]);
        assert!(s.highlighted_method.is_none());
        assert_eq!(s.highlighted_edge, Some(pair("a", "b")));
    }

    #[test]
    fn test_mutual_exclusion_over_event_sequences() {
        let catalog = scenario_catalog();
        let events = [
            SelectionEvent::NodeClick { method: "a".into() },
            SelectionEvent::EdgeClick { pair: pair("a", "c") },
            SelectionEvent::NodeClick { method: "b".into() },
            SelectionEvent::NodeClick { method: "b".into() },
            SelectionEvent::EdgeClick { pair: pair("b", "c") },
            SelectionEvent::Reset,
            SelectionEvent::EdgeClick { pair: pair("a", "b") },
        ];
        let mut state = SelectionState::default();
        for event in &events {
            state = transition(state, event, &catalog);
            match event {
                SelectionEvent::EdgeClick { .. } => assert!(state.highlighted_method.is_none()),
                SelectionEvent::NodeClick { .. } => assert!(state.highlighted_edge.is_none()),
                _ => {}
            }
            assert!(state.highlighted_method.is_none() || state.highlighted_edge.is_none());
        }
    }

    #[test]
    fn test_reset_keeps_selection() {
        let s = run(&[
            SelectionEvent::SearchPick { method: "b".into() },
            SelectionEvent::EdgeClick { pair: pair("a", "b") },
            SelectionEvent::Reset,
        ]);
        assert_eq!(s.selected_methods, vec!["b"]);
        assert!(s.highlighted_edge.is_none());
        assert!(s.highlighted_method.is_none());
    }

    #[test]
    fn test_unknown_and_empty_events_are_identity() {
        let catalog = scenario_catalog();
        let start = run(&[
            SelectionEvent::SearchPick { method: "a".into() },
            SelectionEvent::NodeClick { method: "b".into() },
        ]);
        for event in [
            SelectionEvent::Unknown,
            SelectionEvent::SearchPick { method: String::new() },
            SelectionEvent::NodeClick { method: String::new() },
        ] {
            assert_eq!(transition(start.clone(), &event, &catalog), start);
        }
    }

    #[test]
    fn test_event_json_shape() {
        let e: SelectionEvent =
            serde_json::from_str(r#"{"type":"edge_click","pair":["b","a"]}"#).unwrap();
        assert_eq!(e, SelectionEvent::EdgeClick { pair: pair("a", "b") });

        let e: SelectionEvent =
            serde_json::from_str(r#"{"type":"top_n_apply","n":3,"categories":["ml"]}"#).unwrap();
        assert!(matches!(e, SelectionEvent::TopNApply { n: 3, .. }));

        let e: SelectionEvent = serde_json::from_str(r#"{"type":"wiggle"}"#).unwrap();
        assert_eq!(e, SelectionEvent::Unknown);
    }
}
