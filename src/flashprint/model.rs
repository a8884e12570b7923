use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Format used for print-completion stamps, in local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type CardId = u64;

/// The current local time truncated to whole seconds.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub lesson: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default = "default_copies")]
    pub copies: u32,
    #[serde(default)]
    pub printed_count: u64,
    #[serde(default, with = "last_printed_format")]
    pub last_printed: Option<NaiveDateTime>,
}

fn default_copies() -> u32 {
    1
}

impl Card {
    pub fn new(id: CardId, lesson: String, front: String, back: String) -> Self {
        Self {
            id,
            lesson,
            front,
            back,
            selected: false,
            copies: 1,
            printed_count: 0,
            last_printed: None,
        }
    }

    pub fn is_printed(&self) -> bool {
        self.printed_count > 0
    }

    /// Expands the card into one `RenderCard` per physical copy.
    pub fn render_copies(&self) -> impl Iterator<Item = RenderCard> + '_ {
        (0..self.copies.max(1)).map(move |_| RenderCard::from(self))
    }
}

/// One physical copy of a card, as handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCard {
    pub lesson: String,
    pub front: String,
    pub back: String,
}

impl RenderCard {
    pub fn new(
        lesson: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            lesson: lesson.into(),
            front: front.into(),
            back: back.into(),
        }
    }
}

impl From<&Card> for RenderCard {
    fn from(card: &Card) -> Self {
        Self::new(card.lesson.clone(), card.front.clone(), card.back.clone())
    }
}

/// Editable columns of a card row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Lesson,
    Front,
    Back,
    Copies,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardField::Lesson => "lesson",
            CardField::Front => "front",
            CardField::Back => "back",
            CardField::Copies => "copies",
        };
        f.write_str(name)
    }
}

impl FromStr for CardField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lesson" => Ok(CardField::Lesson),
            "front" => Ok(CardField::Front),
            "back" => Ok(CardField::Back),
            "copies" => Ok(CardField::Copies),
            other => Err(format!(
                "Unknown field '{}' (expected lesson, front, back or copies)",
                other
            )),
        }
    }
}

/// The persisted unit: every card plus the id counter.
///
/// Commands load the whole table, mutate it in memory and commit it back in a
/// single write, so one logical operation is never observed half-applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTable {
    #[serde(default)]
    last_id: CardId,
    #[serde(default)]
    cards: BTreeMap<CardId, Card>,
}

impl CardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh card and returns its id. Ids are never reused.
    pub fn insert_new(&mut self, lesson: String, front: String, back: String) -> CardId {
        let floor = self.cards.keys().next_back().copied().unwrap_or(0);
        self.last_id = self.last_id.max(floor) + 1;
        let id = self.last_id;
        self.cards.insert(id, Card::new(id, lesson, front, back));
        id
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        self.cards.remove(&id)
    }

    pub fn retain<F: FnMut(&Card) -> bool>(&mut self, mut keep: F) {
        self.cards.retain(|_, card| keep(card));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.values_mut()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All cards in catalog order: lesson ascending, then id.
    pub fn ordered(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        sort_catalog(&mut cards);
        cards
    }
}

pub fn sort_catalog(cards: &mut [&Card]) {
    cards.sort_by(|a, b| a.lesson.cmp(&b.lesson).then(a.id.cmp(&b.id)));
}

mod last_printed_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let mut table = CardTable::new();
        let a = table.insert_new("L".into(), "a".into(), "A".into());
        let b = table.insert_new("L".into(), "b".into(), "B".into());
        table.remove(b);
        let c = table.insert_new("L".into(), "c".into(), "C".into());
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(c, 3);
    }

    #[test]
    fn ordered_sorts_by_lesson_then_id() {
        let mut table = CardTable::new();
        table.insert_new("B".into(), "1".into(), "1".into());
        table.insert_new("A".into(), "2".into(), "2".into());
        table.insert_new("B".into(), "3".into(), "3".into());
        let ids: Vec<CardId> = table.ordered().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn render_copies_expands_by_copy_count() {
        let mut card = Card::new(1, "L".into(), "f".into(), "b".into());
        card.copies = 3;
        assert_eq!(card.render_copies().count(), 3);
    }

    #[test]
    fn table_serialization_keeps_timestamp_format() {
        let mut table = CardTable::new();
        let id = table.insert_new("L".into(), "f".into(), "b".into());
        let ts = NaiveDateTime::parse_from_str("2024-03-01 09:15:00", TIMESTAMP_FORMAT).unwrap();
        table.get_mut(id).unwrap().last_printed = Some(ts);

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"2024-03-01 09:15:00\""));

        let parsed: CardTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn parses_field_names() {
        assert_eq!("Copies".parse::<CardField>().unwrap(), CardField::Copies);
        assert!("selected".parse::<CardField>().is_err());
    }
}
