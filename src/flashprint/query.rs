//! # View Queries
//!
//! A [`ViewQuery`] is what the selection filter compiles into and what the
//! command layer evaluates against the card table.
//!
//! Precedence: a non-empty filter text always wins; otherwise `selected_only`
//! restricts the view to selected cards; otherwise every card is visible.
//!
//! Matching is a case-insensitive substring test over lesson, front and back.
//! Results are in catalog order (lesson, then id).

use crate::model::{sort_catalog, Card, CardTable};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter_text: String,
    pub selected_only: bool,
}

impl ViewQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn selected_only() -> Self {
        Self {
            filter_text: String::new(),
            selected_only: true,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            filter_text: text.into(),
            selected_only: false,
        }
    }

    fn needle(&self) -> Option<String> {
        let trimmed = self.filter_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        match self.needle() {
            Some(needle) => contains_folded(card, &needle),
            None if self.selected_only => card.selected,
            None => true,
        }
    }

    /// Cards visible under this query, in catalog order.
    pub fn visible<'a>(&self, table: &'a CardTable) -> Vec<&'a Card> {
        let mut cards: Vec<&Card> = table.iter().filter(|card| self.matches(card)).collect();
        sort_catalog(&mut cards);
        cards
    }
}

fn contains_folded(card: &Card, needle: &str) -> bool {
    [&card.lesson, &card.front, &card.back]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
