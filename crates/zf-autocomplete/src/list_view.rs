// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Suggestion overlay state for one input
//!
//! The view owns the candidates currently shown and the highlighted row.
//! The highlight runs from "nothing" (the `-1` sentinel exposed by
//! [`SuggestionListView::highlighted_index`]) to the last row and never
//! wraps.

use serde::Serialize;
use zf_domain_types::Candidate;

use crate::document::ElementId;

/// Keys the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListKeyResult {
    /// The key moved the highlight
    Consumed,
    /// Enter on a highlighted row
    Commit(Candidate),
    Dismissed,
    /// Not an overlay key, or no overlay is open
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    pub index: usize,
    pub label: String,
    pub detail: Option<String>,
    pub highlighted: bool,
}

/// Snapshot of an open overlay, positioned under `anchor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub anchor: ElementId,
    pub rows: Vec<SuggestionRow>,
    pub highlighted: Option<usize>,
}

#[derive(Debug)]
pub struct SuggestionListView {
    anchor: ElementId,
    candidates: Vec<Candidate>,
    highlighted: Option<usize>,
    open: bool,
    container_created: bool,
}

impl SuggestionListView {
    pub fn new(anchor: ElementId) -> Self {
        Self {
            anchor,
            candidates: Vec::new(),
            highlighted: None,
            open: false,
            container_created: false,
        }
    }

    /// Replace the shown rows. An empty list closes the overlay.
    pub fn render(&mut self, candidates: Vec<Candidate>) {
        if candidates.is_empty() {
            self.dismiss();
            return;
        }
        self.container_created = true;
        self.candidates = candidates;
        self.highlighted = None;
        self.open = true;
    }

    pub fn dismiss(&mut self) {
        self.open = false;
        self.highlighted = None;
        self.candidates.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the overlay container exists yet (created on first render, then reused)
    pub fn container_created(&self) -> bool {
        self.container_created
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_index(&self) -> isize {
        self.highlighted.map_or(-1, |i| i as isize)
    }

    pub fn candidate(&self, row: usize) -> Option<&Candidate> {
        if !self.open {
            return None;
        }
        self.candidates.get(row)
    }

    pub fn move_down(&mut self) -> bool {
        if !self.open || self.candidates.is_empty() {
            return false;
        }
        let last = self.candidates.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
        true
    }

    pub fn move_up(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
        true
    }

    pub fn hover(&mut self, row: usize) -> bool {
        if !self.open || row >= self.candidates.len() {
            return false;
        }
        self.highlighted = Some(row);
        true
    }

    /// The highlighted candidate, if any. The view stays open; the binding
    /// dismisses it once the fill has run.
    pub fn enter(&self) -> Option<Candidate> {
        self.highlighted.and_then(|i| self.candidate(i)).cloned()
    }

    pub fn handle_key(&mut self, key: Key) -> ListKeyResult {
        if !self.open {
            return ListKeyResult::Ignored;
        }
        match key {
            Key::ArrowDown => {
                self.move_down();
                ListKeyResult::Consumed
            }
            Key::ArrowUp => {
                self.move_up();
                ListKeyResult::Consumed
            }
            Key::Enter => match self.enter() {
                Some(candidate) => ListKeyResult::Commit(candidate),
                None => ListKeyResult::Ignored,
            },
            Key::Escape => {
                self.dismiss();
                ListKeyResult::Dismissed
            }
            Key::Tab | Key::Char(_) => ListKeyResult::Ignored,
        }
    }

    pub fn rows(&self) -> Vec<SuggestionRow> {
        if !self.open {
            return Vec::new();
        }
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| SuggestionRow {
                index,
                label: candidate.label(),
                detail: Some(candidate.county.clone()).filter(|c| !c.is_empty()),
                highlighted: self.highlighted == Some(index),
            })
            .collect()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.open.then(|| Overlay {
            anchor: self.anchor,
            rows: self.rows(),
            highlighted: self.highlighted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn beverly_hills() -> Vec<Candidate> {
        vec![
            Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles"),
            Candidate::new("90211", "Beverly Hills", "CA", "Los Angeles"),
            Candidate::new("90212", "Beverly Hills", "CA", ""),
        ]
    }

    fn render_text(view: &SuggestionListView) -> String {
        view.rows()
            .iter()
            .map(|row| {
                let mark = if row.highlighted { "[x]" } else { "[ ]" };
                match &row.detail {
                    Some(detail) => format!("{mark} {} ({detail})", row.label),
                    None => format!("{mark} {}", row.label),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn render_resets_highlight() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        view.move_down();
        view.move_down();
        assert_eq!(view.highlighted(), Some(1));

        view.render(beverly_hills());
        assert_eq!(view.highlighted_index(), -1);
        assert!(view.container_created());
    }

    #[test]
    fn rows_show_label_and_county() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        view.move_down();
        view.move_down();
        insta::assert_snapshot!(render_text(&view), @r"
        [ ] 90210 — Beverly Hills, CA (Los Angeles)
        [x] 90211 — Beverly Hills, CA (Los Angeles)
        [ ] 90212 — Beverly Hills, CA
        ");
    }

    #[test]
    fn highlight_clamps_at_both_ends() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        for _ in 0..10 {
            view.move_down();
        }
        assert_eq!(view.highlighted(), Some(2));
        for _ in 0..10 {
            view.move_up();
        }
        assert_eq!(view.highlighted_index(), -1);
    }

    #[test]
    fn enter_without_highlight_is_ignored() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        assert_eq!(view.handle_key(Key::Enter), ListKeyResult::Ignored);
        assert!(view.is_open());

        view.handle_key(Key::ArrowDown);
        match view.handle_key(Key::Enter) {
            ListKeyResult::Commit(candidate) => assert_eq!(candidate.zip_code, "90210"),
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn escape_and_empty_render_close() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        assert_eq!(view.handle_key(Key::Escape), ListKeyResult::Dismissed);
        assert!(view.overlay().is_none());
        assert_eq!(view.handle_key(Key::ArrowDown), ListKeyResult::Ignored);

        view.render(beverly_hills());
        view.render(Vec::new());
        assert!(!view.is_open());
    }

    #[test]
    fn hover_ignores_rows_past_the_end() {
        let mut view = SuggestionListView::new(ElementId(1));
        view.render(beverly_hills());
        assert!(view.hover(2));
        assert!(!view.hover(3));
        assert_eq!(view.highlighted(), Some(2));
    }

    #[derive(Debug, Clone)]
    enum Action {
        Down,
        Up,
        Hover(usize),
        Render(usize),
        Escape,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Down),
            Just(Action::Up),
            (0usize..12).prop_map(Action::Hover),
            (0usize..9).prop_map(Action::Render),
            Just(Action::Escape),
        ]
    }

    proptest! {
        #[test]
        fn highlight_stays_within_bounds(actions in prop::collection::vec(action(), 0..64)) {
            let mut view = SuggestionListView::new(ElementId(7));
            for action in actions {
                match action {
                    Action::Down => { view.move_down(); }
                    Action::Up => { view.move_up(); }
                    Action::Hover(row) => { view.hover(row); }
                    Action::Render(n) => {
                        let candidates = (0..n)
                            .map(|i| Candidate::new(format!("9{i:04}"), "Town", "CA", "County"))
                            .collect();
                        view.render(candidates);
                    }
                    Action::Escape => { view.handle_key(Key::Escape); }
                }
                let index = view.highlighted_index();
                prop_assert!(index >= -1);
                prop_assert!(index < view.len() as isize);
                if index == -1 {
                    prop_assert!(view.enter().is_none());
                }
            }
        }
    }
}
