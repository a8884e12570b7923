//! # Selection Filter
//!
//! Transient view state for a catalog browser: the live search text and the
//! `{All, SelectedOnly}` view mode. The filter compiles into a [`ViewQuery`].
//!
//! Text edits are debounced. Each edit (re)arms a single deadline
//! [`DEBOUNCE`] in the future; the hosting event loop calls [`SelectionFilter::poll`]
//! and receives a query only once the text has been quiet for the whole
//! window. Mode switches (`show_all`, `show_selected_only`) commit at once and
//! cancel any pending text commit.
//!
//! The filter never sleeps or spawns anything. Time is passed in, so the same
//! code runs under a UI loop, a one-shot CLI (via [`SelectionFilter::flush`]) or
//! a test with synthetic instants.

use crate::query::ViewQuery;
use std::time::{Duration, Instant};

pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    All,
    SelectedOnly,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    query_text: String,
    mode: ViewMode,
    pending: Option<Instant>,
    visible: ViewQuery,
}

impl SelectionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// When the pending commit fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a text edit at `now` and restarts the debounce window.
    pub fn set_query_text(&mut self, text: impl Into<String>, now: Instant) {
        self.query_text = text.into();
        self.pending = Some(now + DEBOUNCE);
    }

    /// Commits the pending edit if its window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<ViewQuery> {
        match self.pending {
            Some(deadline) if now >= deadline => Some(self.commit()),
            _ => None,
        }
    }

    /// Commits a pending edit immediately, ignoring the window.
    pub fn flush(&mut self) -> Option<ViewQuery> {
        self.pending.map(|_| self.commit())
    }

    pub fn show_all(&mut self) -> ViewQuery {
        self.query_text.clear();
        self.mode = ViewMode::All;
        self.commit()
    }

    pub fn show_selected_only(&mut self) -> ViewQuery {
        self.query_text.clear();
        self.mode = ViewMode::SelectedOnly;
        self.commit()
    }

    /// The last committed query, i.e. what the view is showing. Pending
    /// edits are not part of it.
    pub fn visible_query(&self) -> &ViewQuery {
        &self.visible
    }

    /// The query for the current state, including a pending edit, without
    /// touching the timer.
    fn current_query(&self) -> ViewQuery {
        ViewQuery {
            filter_text: self.query_text.trim().to_string(),
            selected_only: self.mode == ViewMode::SelectedOnly,
        }
    }

    fn commit(&mut self) -> ViewQuery {
        self.pending = None;
        if !self.query_text.trim().is_empty() {
            self.mode = ViewMode::All;
        }
        let query = self.current_query();
        tracing::debug!(filter = %query.filter_text, selected_only = query.selected_only, "view query committed");
        self.visible = query.clone();
        query
    }
}
