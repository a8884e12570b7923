use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::model::CardId;
use crate::store::DataStore;

pub fn by_id<S: DataStore>(store: &mut S, id: CardId) -> Result<CmdResult> {
    let card = transact(store, |table| {
        table.remove(id).ok_or(FlashError::CardNotFound(id))
    })?;

    tracing::info!(id, "card deleted");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card deleted ({}): {}",
        id, card.front
    )));
    Ok(result.with_affected_cards(vec![card]))
}

/// Removes every selected card. Reports zero affected when none is selected.
pub fn selected<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let table = store.load()?;
    if !table.iter().any(|c| c.selected) {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("No cards are selected."));
        return Ok(result);
    }

    let removed = transact(store, |table| {
        let removed: Vec<_> = table.iter().filter(|c| c.selected).cloned().collect();
        table.retain(|c| !c.selected);
        Ok(removed)
    })?;

    tracing::info!(count = removed.len(), "selected cards deleted");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted {} selected card(s)",
        removed.len()
    )));
    Ok(result.with_affected_cards(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn deletes_single_card() {
        let mut fixture = StoreFixture::new().with_cards(2, "L");
        by_id(&mut fixture.store, 1).unwrap();
        let table = fixture.store.load().unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get(1).is_none());
    }

    #[test]
    fn deleting_missing_card_fails() {
        let mut fixture = StoreFixture::new();
        assert!(matches!(
            by_id(&mut fixture.store, 3),
            Err(FlashError::CardNotFound(3))
        ));
    }

    #[test]
    fn delete_selected_without_selection_is_noop() {
        let mut fixture = StoreFixture::new().with_cards(2, "L");
        let before = fixture.store.commit_count();
        let result = selected(&mut fixture.store).unwrap();
        assert!(result.affected_cards.is_empty());
        assert_eq!(fixture.store.commit_count(), before);
        assert_eq!(fixture.store.load().unwrap().len(), 2);
    }

    #[test]
    fn delete_selected_removes_only_selected() {
        let mut fixture = StoreFixture::new()
            .with_cards(3, "L")
            .edit(1, |c| c.selected = true)
            .edit(3, |c| c.selected = true);
        let result = selected(&mut fixture.store).unwrap();
        assert_eq!(result.affected_cards.len(), 2);
        let remaining: Vec<u64> = fixture.store.load().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![2]);
    }
}
