use super::DataStore;
use crate::error::{FlashError, Result};
use crate::model::CardTable;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    table: CardTable,
    fail_commits: bool,
    commits: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent commit fail, to exercise error propagation.
    pub fn fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<CardTable> {
        Ok(self.table.clone())
    }

    fn commit(&mut self, table: &CardTable) -> Result<()> {
        if self.fail_commits {
            return Err(FlashError::Store("commit rejected".to_string()));
        }
        self.table = table.clone();
        self.commits += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::CardId;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_card(mut self, lesson: &str, front: &str, back: &str) -> Self {
            let mut table = self.store.load().unwrap();
            table.insert_new(lesson.into(), front.into(), back.into());
            self.store.commit(&table).unwrap();
            self
        }

        pub fn with_cards(mut self, count: usize, lesson: &str) -> Self {
            for i in 0..count {
                self = self.with_card(lesson, &format!("Front {}", i + 1), &format!("Back {}", i + 1));
            }
            self
        }

        /// Applies `edit` to the card with `id` and commits the change.
        pub fn edit(mut self, id: CardId, edit: impl FnOnce(&mut crate::model::Card)) -> Self {
            let mut table = self.store.load().unwrap();
            edit(table.get_mut(id).unwrap());
            self.store.commit(&table).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn failing_commit_leaves_table_untouched() {
        let mut fixture = StoreFixture::new().with_cards(2, "L");
        fixture.store.fail_commits(true);

        let mut table = fixture.store.load().unwrap();
        table.insert_new("L".into(), "x".into(), "y".into());
        assert!(fixture.store.commit(&table).is_err());
        assert_eq!(fixture.store.load().unwrap().len(), 2);
    }

    #[test]
    fn fixtures_build_cards() {
        let fixture = StoreFixture::default()
            .with_cards(2, "Lesson 1")
            .with_card("Lesson 2", "Hola", "Hello")
            .edit(3, |c| c.copies = 4);

        let table = fixture.store.load().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(3).unwrap().copies, 4);
        assert_eq!(fixture.store.commit_count(), 4);
    }
}
