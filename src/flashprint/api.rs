//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every client (the CLI today, a catalog GUI tomorrow).
//!
//! The facade:
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Normalizes inputs**: card id lists and ranges (`3`, `1-4`) become ids
//! - **Owns view state**: the [`SelectionFilter`] and the [`Translator`]
//!   capability live here, not in the store
//! - **Returns structured types** (`Result<CmdResult>`), never strings
//!
//! Business logic belongs in the commands; presentation belongs in the client.
//!
//! ## Row Commands
//!
//! Per-row catalog actions (checkbox toggles, cell edits, delete buttons) are
//! expressed as [`RowCommand`] values keyed by card id and run through
//! [`FlashApi::dispatch`].
//!
//! ## Generic Over DataStore
//!
//! `FlashApi<S: DataStore>` runs on `FileStore` in production and on
//! `InMemoryStore` in tests.

use crate::commands::config::ConfigAction;
use crate::commands::print::PrintJob;
use crate::commands::{self, CmdResult, FlashPaths};
use crate::error::{FlashError, Result};
use crate::filter::SelectionFilter;
use crate::model::{now_timestamp, CardField, CardId};
use crate::query::ViewQuery;
use crate::settings::Settings;
use crate::store::DataStore;
use crate::translate::{AutoFill, TranslationBackend, Translator};
use std::path::Path;
use std::time::Instant;

/// A per-row action from a catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCommand {
    SetSelected(CardId, bool),
    Edit(CardId, CardField, String),
    Delete(CardId),
}

pub struct FlashApi<S: DataStore> {
    store: S,
    paths: FlashPaths,
    filter: SelectionFilter,
    translator: Translator,
}

impl<S: DataStore> FlashApi<S> {
    pub fn new(store: S, paths: FlashPaths) -> Self {
        Self {
            store,
            paths,
            filter: SelectionFilter::new(),
            translator: Translator::Disabled,
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn paths(&self) -> &FlashPaths {
        &self.paths
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Rebuilds the translator from the saved `auto_fill_language` setting.
    pub fn load_translator(&mut self, backend: Option<Box<dyn TranslationBackend>>) -> Result<()> {
        let language = self.settings()?.auto_fill_language;
        self.translator = Translator::new(language, backend);
        tracing::debug!(%language, available = self.translator.is_available(), "translator configured");
        Ok(())
    }

    // --- Cards ---

    /// Adds a card. An empty back is auto-filled when translation is available.
    pub fn add_card(&mut self, lesson: &str, front: &str, back: &str) -> Result<CmdResult> {
        let back = match self.translator.auto_fill(front, back) {
            AutoFill::Fill(text) => text,
            AutoFill::Clear | AutoFill::Unchanged => back.to_string(),
        };
        commands::add::run(&mut self.store, lesson, front, &back)
    }

    /// What auto-fill would put in the back field for this input.
    pub fn suggest_back(&self, front: &str, back: &str) -> AutoFill {
        self.translator.auto_fill(front, back)
    }

    pub fn list_cards(&self, query: &ViewQuery) -> Result<CmdResult> {
        commands::list::run(&self.store, query)
    }

    pub fn update_card(&mut self, id: CardId, field: CardField, value: &str) -> Result<CmdResult> {
        commands::update::run(&mut self.store, id, field, value)
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<CmdResult> {
        commands::delete::by_id(&mut self.store, id)
    }

    pub fn delete_selected(&mut self) -> Result<CmdResult> {
        commands::delete::selected(&mut self.store)
    }

    // --- Selection ---

    pub fn set_selected(&mut self, id: CardId, selected: bool) -> Result<CmdResult> {
        commands::select::set(&mut self.store, id, selected)
    }

    /// Sets the selection flag for every id named by `selectors` (`3`, `1-4`).
    pub fn select_cards<I: AsRef<str>>(&mut self, selectors: &[I], selected: bool) -> Result<CmdResult> {
        let ids = parse_ids(selectors)?;
        commands::select::bulk_set(&mut self.store, &ids, selected)
    }

    pub fn select_all_matching(&mut self, query: &ViewQuery) -> Result<CmdResult> {
        commands::select::all_matching(&mut self.store, query)
    }

    /// Selects the cards the view is showing. A search edit still inside its
    /// debounce window does not count.
    pub fn select_all_visible(&mut self) -> Result<CmdResult> {
        let query = self.filter.visible_query().clone();
        commands::select::all_matching(&mut self.store, &query)
    }

    pub fn unselect_all(&mut self) -> Result<CmdResult> {
        commands::select::unselect_all(&mut self.store)
    }

    pub fn select_unprinted(&mut self) -> Result<CmdResult> {
        commands::select::unprinted(&mut self.store)
    }

    pub fn dispatch(&mut self, command: RowCommand) -> Result<CmdResult> {
        match command {
            RowCommand::SetSelected(id, selected) => self.set_selected(id, selected),
            RowCommand::Edit(id, field, value) => self.update_card(id, field, &value),
            RowCommand::Delete(id) => self.delete_card(id),
        }
    }

    // --- View state ---

    pub fn filter(&self) -> &SelectionFilter {
        &self.filter
    }

    /// Records a search edit. The view refreshes on a later [`Self::poll_view`].
    pub fn set_search_text(&mut self, text: &str, now: Instant) {
        self.filter.set_query_text(text, now);
    }

    /// Lists the new view if the debounce window has elapsed.
    pub fn poll_view(&mut self, now: Instant) -> Result<Option<CmdResult>> {
        match self.filter.poll(now) {
            Some(query) => self.list_cards(&query).map(Some),
            None => Ok(None),
        }
    }

    /// Commits any pending search at once and lists the current view.
    pub fn flush_view(&mut self) -> Result<CmdResult> {
        let query = self
            .filter
            .flush()
            .unwrap_or_else(|| self.filter.visible_query().clone());
        self.list_cards(&query)
    }

    pub fn show_all(&mut self) -> Result<CmdResult> {
        let query = self.filter.show_all();
        self.list_cards(&query)
    }

    pub fn show_selected_only(&mut self) -> Result<CmdResult> {
        let query = self.filter.show_selected_only();
        self.list_cards(&query)
    }

    // --- Data exchange ---

    pub fn import_csv(&mut self, path: &Path) -> Result<CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn export_csv(&self, path: &Path) -> Result<CmdResult> {
        commands::export::run(&self.store, path)
    }

    // --- Printing ---

    pub fn prepare_print(&self) -> Result<PrintJob> {
        let settings = self.settings()?;
        commands::print::prepare(&self.store, &settings)
    }

    pub fn write_print_pages(&self, job: &PrintJob, out_dir: &Path) -> Result<CmdResult> {
        commands::print::write_pages(job, out_dir)
    }

    /// Records a finished print for the cards captured in `job`.
    pub fn complete_print(&mut self, job: &PrintJob) -> Result<CmdResult> {
        commands::print::mark_printed(&mut self.store, &job.card_ids, now_timestamp())
    }

    // --- Settings ---

    pub fn settings(&self) -> Result<Settings> {
        Settings::load(&self.paths.data_dir)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

/// Expands id selectors (`7`, `2-5`) into ids, dropping repeats but keeping
/// first-seen order.
pub fn parse_ids<I: AsRef<str>>(selectors: &[I]) -> Result<Vec<CardId>> {
    let mut ids = Vec::new();
    for raw in selectors {
        let raw = raw.as_ref().trim();
        let expanded = match raw.split_once('-') {
            Some((start, end)) => {
                let start = parse_id(start, raw)?;
                let end = parse_id(end, raw)?;
                if start > end {
                    return Err(FlashError::Api(format!(
                        "Invalid range '{}': start is greater than end",
                        raw
                    )));
                }
                (start..=end).collect::<Vec<_>>()
            }
            None => vec![parse_id(raw, raw)?],
        };
        for id in expanded {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

fn parse_id(part: &str, whole: &str) -> Result<CardId> {
    part.trim()
        .parse()
        .map_err(|_| FlashError::Api(format!("Invalid card id: {}", whole)))
}
