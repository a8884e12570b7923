use super::DataStore;
use crate::error::{FlashError, Result};
use crate::model::CardTable;
use std::fs;
use std::path::{Path, PathBuf};

const CARDS_FILENAME: &str = "cards.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(CARDS_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FlashError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load(&self) -> Result<CardTable> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(CardTable::new());
        }
        let content = fs::read_to_string(&data_file).map_err(FlashError::Io)?;
        if content.trim().is_empty() {
            return Ok(CardTable::new());
        }
        let table: CardTable = serde_json::from_str(&content).map_err(FlashError::Serialization)?;
        Ok(table)
    }

    fn commit(&mut self, table: &CardTable) -> Result<()> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(table).map_err(FlashError::Serialization)?;
        let tmp_file = self.root.join(format!("{}.tmp", CARDS_FILENAME));
        fs::write(&tmp_file, content).map_err(FlashError::Io)?;
        fs::rename(&tmp_file, self.data_file()).map_err(FlashError::Io)?;

        tracing::debug!(cards = table.len(), path = %self.root.display(), "committed card table");
        Ok(())
    }
}
