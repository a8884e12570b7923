use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::store::DataStore;

pub fn run<S: DataStore>(
    store: &mut S,
    lesson: &str,
    front: &str,
    back: &str,
) -> Result<CmdResult> {
    let lesson = lesson.trim();
    let front = front.trim();
    let back = back.trim();

    if front.is_empty() || back.is_empty() {
        return Err(FlashError::Validation(
            "Front and back text is required".to_string(),
        ));
    }

    let card = transact(store, |table| {
        let id = table.insert_new(lesson.to_string(), front.to_string(), back.to_string());
        table
            .get(id)
            .cloned()
            .ok_or_else(|| FlashError::Store(format!("Card {} vanished after insert", id)))
    })?;

    tracing::info!(id = card.id, lesson = %card.lesson, "card added");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Card added ({}): {}",
        card.id, card.front
    )));
    Ok(result.with_affected_cards(vec![card]))
}
