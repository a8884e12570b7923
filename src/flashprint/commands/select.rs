use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::model::CardId;
use crate::query::ViewQuery;
use crate::store::DataStore;

/// Sets the selection flag of a single card.
pub fn set<S: DataStore>(store: &mut S, id: CardId, selected: bool) -> Result<CmdResult> {
    let card = transact(store, |table| {
        let card = table.get_mut(id).ok_or(FlashError::CardNotFound(id))?;
        card.selected = selected;
        Ok(card.clone())
    })?;

    let verb = if selected { "selected" } else { "unselected" };
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card {} ({}): {}",
        verb, id, card.front
    )));
    Ok(result.with_affected_cards(vec![card]))
}

/// Best-effort bulk update: missing ids are skipped and reported, every other
/// row is updated in the same commit.
pub fn bulk_set<S: DataStore>(
    store: &mut S,
    ids: &[CardId],
    selected: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let affected = transact(store, |table| {
        let mut affected = Vec::new();
        for &id in ids {
            match table.get_mut(id) {
                Some(card) => {
                    card.selected = selected;
                    affected.push(card.clone());
                }
                None => result.add_message(CmdMessage::warning(format!(
                    "Card not found: {}",
                    id
                ))),
            }
        }
        Ok(affected)
    })?;

    let verb = if selected { "Selected" } else { "Unselected" };
    result.add_message(CmdMessage::success(format!(
        "{} {} card(s)",
        verb,
        affected.len()
    )));
    Ok(result.with_affected_cards(affected))
}

/// Selects every card visible under `query`. Other selections are kept.
pub fn all_matching<S: DataStore>(store: &mut S, query: &ViewQuery) -> Result<CmdResult> {
    let visible: Vec<CardId> = query
        .visible(&store.load()?)
        .iter()
        .map(|card| card.id)
        .collect();

    if visible.is_empty() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("No visible cards to select."));
        return Ok(result);
    }

    bulk_set(store, &visible, true)
}

pub fn unselect_all<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let cleared = transact(store, |table| {
        let mut cleared = 0;
        for card in table.iter_mut().filter(|c| c.selected) {
            card.selected = false;
            cleared += 1;
        }
        Ok(cleared)
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Unselected {} card(s)",
        cleared
    )));
    Ok(result)
}

/// Clears every selection, then selects exactly the never-printed cards.
pub fn unprinted<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let selected = transact(store, |table| {
        for card in table.iter_mut() {
            card.selected = false;
        }
        let mut selected = Vec::new();
        for card in table.iter_mut().filter(|c| c.printed_count == 0) {
            card.selected = true;
            selected.push(card.clone());
        }
        Ok(selected)
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Selected {} unprinted card(s)",
        selected.len()
    )));
    Ok(result.with_affected_cards(selected))
}
