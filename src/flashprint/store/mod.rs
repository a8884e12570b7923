//! # Storage Layer
//!
//! The [`DataStore`] trait is the persistence seam for the card catalog. Query
//! and update semantics live in `commands/`; a store only knows how to load
//! and commit a whole [`CardTable`].
//!
//! ## Batch Atomicity
//!
//! Every logical operation (add, bulk select, print completion, ...) is a
//! single `load` → mutate → `commit` cycle. A store must make `commit`
//! all-or-nothing so a reader never sees a batch half-applied.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage
//!   - The table lives in `cards.json` inside the data directory
//!   - Commits write a temporary file and rename it over the old one
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── cards.json          # The card table (id counter + cards keyed by id)
//! └── settings.json       # Layout and UI settings
//! ```

use crate::error::Result;
use crate::model::CardTable;

pub mod fs;
pub mod memory;

/// Abstract interface for card storage.
pub trait DataStore {
    /// Load the full card table. A store with no data yields an empty table.
    fn load(&self) -> Result<CardTable>;

    /// Replace the persisted table with `table` in one atomic step.
    fn commit(&mut self, table: &CardTable) -> Result<()>;
}
