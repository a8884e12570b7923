use crate::commands::{transact, CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::store::DataStore;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 3] = ["lesson", "front", "back"];

/// A CSV row that passed the completeness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub lesson: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub rows: Vec<ImportRow>,
    pub skipped: usize,
}

/// Reads `lesson,front,back` by header name. Other columns are ignored; rows
/// where any of the three is empty after trimming are skipped. A missing
/// column reads as empty, so every row of such a file is skipped.
pub fn read_rows<R: Read>(input: R) -> Result<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let positions = REQUIRED_COLUMNS.map(|name| headers.iter().position(|h| h.trim() == name));
    for (name, _) in REQUIRED_COLUMNS.iter().zip(&positions).filter(|(_, p)| p.is_none()) {
        tracing::warn!(column = *name, "csv has no such column, its rows will be skipped");
    }

    let mut parsed = ParsedCsv::default();
    for record in reader.records() {
        let record = record?;
        let field = |i: usize| {
            positions[i]
                .and_then(|pos| record.get(pos))
                .map(str::trim)
                .unwrap_or("")
        };
        let (lesson, front, back) = (field(0), field(1), field(2));
        if lesson.is_empty() || front.is_empty() || back.is_empty() {
            parsed.skipped += 1;
            continue;
        }
        parsed.rows.push(ImportRow {
            lesson: lesson.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        });
    }
    Ok(parsed)
}

/// Imports every complete row of the CSV at `path` in a single commit.
///
/// Imported cards start unselected, with one copy and no print history.
pub fn run<S: DataStore>(store: &mut S, path: &Path) -> Result<CmdResult> {
    let file = File::open(path).map_err(FlashError::Io)?;
    let parsed = read_rows(file)?;

    let added = transact(store, |table| {
        let added: Vec<_> = parsed
            .rows
            .iter()
            .map(|row| table.insert_new(row.lesson.clone(), row.front.clone(), row.back.clone()))
            .collect();
        Ok(added
            .into_iter()
            .filter_map(|id| table.get(id).cloned())
            .collect::<Vec<_>>())
    })?;

    tracing::info!(
        path = %path.display(),
        imported = added.len(),
        skipped = parsed.skipped,
        "csv import finished"
    );

    let mut result = CmdResult::default();
    if parsed.skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} incomplete row(s)",
            parsed.skipped
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Imported {} card(s)",
        added.len()
    )));
    Ok(result.with_affected_cards(added))
}
