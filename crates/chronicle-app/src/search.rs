// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! Live-search state: a query plus a keyboard-driven selection into the
//! filtered result list. Results themselves are recomputed from the
//! archive on every keystroke; only the query and selection live here.

use crate::model::Archive;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    query: String,
    selection: usize,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn selection(&self) -> usize {
        self.selection
    }

    /// Any query change invalidates the old result list, so the selection
    /// snaps back to the top.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selection = 0;
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
        self.selection = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selection = 0;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.selection = 0;
    }

    /// Moves the selection by one step, clamped into the current result
    /// list. Moving past either end is a no-op, not a wraparound.
    pub fn move_selection(&mut self, delta: isize, result_count: usize) {
        if result_count == 0 {
            self.selection = 0;
            return;
        }
        let current = self.selection as isize;
        let moved = (current + delta).clamp(0, result_count as isize - 1);
        self.selection = moved as usize;
    }

    /// Re-clamps after the result list changed size underneath the
    /// selection (e.g. the query narrowed the matches).
    pub fn clamp_to(&mut self, result_count: usize) {
        if result_count == 0 {
            self.selection = 0;
        } else if self.selection > result_count - 1 {
            self.selection = result_count - 1;
        }
    }

    /// Resolves the selected filtered position back to a display index.
    /// The filtered-space position never leaves this module.
    pub fn selected(&self, results: &[usize]) -> Option<usize> {
        results.get(self.selection.min(results.len().saturating_sub(1))).copied()
    }

    /// Runs the filter and resolves the committed chapter to its display
    /// index, ready to hand to the navigation layer.
    pub fn commit(&self, archive: &Archive) -> Option<usize> {
        let results = archive.filter(&self.query);
        self.selected(&results)
    }
}
