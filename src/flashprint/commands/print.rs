//! Print jobs and print-completion bookkeeping.
//!
//! A [`PrintJob`] is captured once, at print start: the selected cards in
//! catalog order expanded by their copy counts, the ids of those cards, and
//! the layout parameters. Rendering the job is pure and can be repeated, so a
//! preview never touches the store. Only [`mark_printed`] does, and only for
//! the ids captured in the job.

use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::layout::svg::SvgSurface;
use crate::layout::{layout, LayoutParams, PagePaint};
use crate::model::{format_timestamp, sort_catalog, CardId, RenderCard};
use crate::settings::Settings;
use crate::store::DataStore;
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Upper bound on card faces in one print job, after copy expansion.
pub const MAX_JOB_CARDS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct PrintJob {
    pub cards: Vec<RenderCard>,
    pub card_ids: Vec<CardId>,
    pub params: LayoutParams,
}

impl PrintJob {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pages(&self) -> Result<Vec<PagePaint>> {
        layout(&self.cards, &self.params)
    }

    /// Renders every page to SVG, in print order.
    pub fn render_svg(&self) -> Result<Vec<String>> {
        let mut surface = SvgSurface::new();
        for page in self.pages()? {
            page.paint_onto(&mut surface);
        }
        Ok(surface.into_pages())
    }
}

/// Captures a print job from the current selection.
///
/// Layout parameters are validated here, so a bad configuration fails before
/// anything is rendered or written. A selection whose copies add up to more
/// than [`MAX_JOB_CARDS`] is refused before it is expanded.
pub fn prepare<S: DataStore>(store: &S, settings: &Settings) -> Result<PrintJob> {
    let params = settings.layout_params()?;
    params.validate()?;

    let table = store.load()?;
    let mut selected: Vec<_> = table.iter().filter(|c| c.selected).collect();
    sort_catalog(&mut selected);

    let total: u64 = selected.iter().map(|c| u64::from(c.copies.max(1))).sum();
    if total > MAX_JOB_CARDS {
        return Err(FlashError::Validation(format!(
            "Print job has {} card copies, the limit is {}",
            total, MAX_JOB_CARDS
        )));
    }

    let job = PrintJob {
        cards: selected.iter().flat_map(|&card| card.render_copies()).collect(),
        card_ids: selected.iter().map(|c| c.id).collect(),
        params,
    };
    tracing::info!(
        cards = job.card_ids.len(),
        copies = job.cards.len(),
        "print job prepared"
    );
    Ok(job)
}

/// Renders `job` into `out_dir` as `page-NNN-front.svg` / `page-NNN-back.svg`.
pub fn write_pages(job: &PrintJob, out_dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if job.is_empty() {
        result.add_message(CmdMessage::info("No cards are selected for printing."));
        return Ok(result);
    }

    let svgs = job.render_svg()?;
    fs::create_dir_all(out_dir)?;

    let mut paths = Vec::with_capacity(svgs.len());
    for (i, svg) in svgs.iter().enumerate() {
        let side = if i % 2 == 0 { "front" } else { "back" };
        let path = out_dir.join(format!("page-{:03}-{}.svg", i / 2 + 1, side));
        fs::write(&path, svg)?;
        paths.push(path);
    }

    result.add_message(CmdMessage::success(format!(
        "Rendered {} card(s) on {} sheet(s)",
        job.cards.len(),
        svgs.len() / 2
    )));
    Ok(result.with_output_paths(paths))
}

/// Records a completed print for the given cards.
///
/// Each card's counter grows by its copies value as stored at commit time.
/// Missing ids are skipped, duplicate ids count once, and all rows share one
/// timestamp and one commit.
pub fn mark_printed<S: DataStore>(
    store: &mut S,
    ids: &[CardId],
    timestamp: NaiveDateTime,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let unique: BTreeSet<CardId> = ids.iter().copied().collect();

    let affected = transact(store, |table| {
        let mut affected = Vec::new();
        for id in unique {
            match table.get_mut(id) {
                Some(card) => {
                    card.printed_count += u64::from(card.copies);
                    card.last_printed = Some(timestamp);
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

    tracing::info!(cards = affected.len(), at = %format_timestamp(&timestamp), "marked printed");
    result.add_message(CmdMessage::success(format!(
        "Marked {} card(s) as printed",
        affected.len()
    )));
    Ok(result.with_affected_cards(affected))
}
