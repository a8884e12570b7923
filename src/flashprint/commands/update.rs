use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::model::{CardField, CardId};
use crate::store::DataStore;

/// How a raw copies cell was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopiesValue {
    /// Parsed as an integer, clamped to at least 1.
    Parsed(u32),
    /// Not an integer; the edit falls back to 1 and the cell shows "1" again.
    Reset,
}

impl CopiesValue {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => CopiesValue::Parsed(n.clamp(1, u32::MAX as i64) as u32),
            Err(_) => CopiesValue::Reset,
        }
    }

    pub fn copies(self) -> u32 {
        match self {
            CopiesValue::Parsed(n) => n,
            CopiesValue::Reset => 1,
        }
    }
}

pub fn run<S: DataStore>(
    store: &mut S,
    id: CardId,
    field: CardField,
    value: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let card = transact(store, |table| {
        let card = table.get_mut(id).ok_or(FlashError::CardNotFound(id))?;
        match field {
            CardField::Lesson => card.lesson = value.to_string(),
            CardField::Front => card.front = value.to_string(),
            CardField::Back => card.back = value.to_string(),
            CardField::Copies => {
                let parsed = CopiesValue::parse(value);
                if parsed == CopiesValue::Reset {
                    result.add_message(CmdMessage::warning(format!(
                        "Invalid copies value '{}', reset to 1",
                        value
                    )));
                }
                card.copies = parsed.copies();
            }
        }
        Ok(card.clone())
    })?;

    tracing::debug!(id, %field, "card field updated");
    result.add_message(CmdMessage::success(format!(
        "Card updated ({}): {} = {}",
        id,
        field,
        field_display(&card, field)
    )));
    Ok(result.with_affected_cards(vec![card]))
}

fn field_display(card: &crate::model::Card, field: CardField) -> String {
    match field {
        CardField::Lesson => card.lesson.clone(),
        CardField::Front => card.front.clone(),
        CardField::Back => card.back.clone(),
        CardField::Copies => card.copies.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn text_fields_accept_empty_values() {
        let mut fixture = StoreFixture::new().with_card("L", "Hola", "Hello");
        let result = run(&mut fixture.store, 1, CardField::Lesson, "").unwrap();
        assert_eq!(result.affected_cards[0].lesson, "");
        assert!(!result.has_warnings());
    }

    #[test]
    fn copies_parse_and_clamp() {
        let mut fixture = StoreFixture::new().with_card("L", "Hola", "Hello");
        let result = run(&mut fixture.store, 1, CardField::Copies, " 3 ").unwrap();
        assert_eq!(result.affected_cards[0].copies, 3);

        let result = run(&mut fixture.store, 1, CardField::Copies, "-4").unwrap();
        assert_eq!(result.affected_cards[0].copies, 1);
        assert!(!result.has_warnings());
    }

    #[test]
    fn malformed_copies_reset_to_one() {
        let mut fixture = StoreFixture::new()
            .with_card("L", "Hola", "Hello")
            .edit(1, |c| c.copies = 5);
        let result = run(&mut fixture.store, 1, CardField::Copies, "two").unwrap();
        assert_eq!(result.affected_cards[0].copies, 1);
        assert!(result.has_warnings());
    }

    #[test]
    fn missing_card_is_reported() {
        let mut fixture = StoreFixture::new();
        assert!(matches!(
            run(&mut fixture.store, 42, CardField::Front, "x"),
            Err(FlashError::CardNotFound(42))
        ));
    }

    #[test]
    fn copies_value_parsing() {
        assert_eq!(CopiesValue::parse("0"), CopiesValue::Parsed(1));
        assert_eq!(CopiesValue::parse("12"), CopiesValue::Parsed(12));
        assert_eq!(CopiesValue::parse("1.5"), CopiesValue::Reset);
        assert_eq!(CopiesValue::parse(""), CopiesValue::Reset);
    }
}
