use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::model::{format_timestamp, CardTable};
use crate::store::DataStore;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const EXPORT_HEADER: [&str; 6] = [
    "lesson",
    "front",
    "back",
    "copies",
    "printed_count",
    "last_printed",
];

/// Writes every card in id order. Selection state is not exported.
pub fn write_csv<W: Write>(table: &CardTable, out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(EXPORT_HEADER)?;
    for card in table.iter() {
        let last_printed = card
            .last_printed
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();
        let copies = card.copies.to_string();
        let printed_count = card.printed_count.to_string();
        writer.write_record([
            card.lesson.as_str(),
            card.front.as_str(),
            card.back.as_str(),
            copies.as_str(),
            printed_count.as_str(),
            last_printed.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(table.len())
}

pub fn run<S: DataStore>(store: &S, path: &Path) -> Result<CmdResult> {
    let table = store.load()?;
    let file = File::create(path).map_err(FlashError::Io)?;
    let count = write_csv(&table, file)?;

    tracing::info!(path = %path.display(), cards = count, "csv export finished");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} card(s) to {}",
        count,
        path.display()
    )));
    Ok(result.with_output_paths(vec![path.to_path_buf()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::import;
    use crate::model::now_timestamp;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn writes_header_and_rows() {
        let ts = now_timestamp();
        let store = StoreFixture::new()
            .with_card("L1", "hola, amigo", "hello")
            .edit(1, |c| {
                c.copies = 2;
                c.printed_count = 4;
                c.last_printed = Some(ts);
            })
            .with_card("L2", "gato", "cat")
            .store;

        let mut buf = Vec::new();
        write_csv(&store.load().unwrap(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "lesson,front,back,copies,printed_count,last_printed");
        assert_eq!(
            lines[1],
            format!("L1,\"hola, amigo\",hello,2,4,{}", format_timestamp(&ts))
        );
        assert_eq!(lines[2], "L2,gato,cat,1,0,");
    }

    #[test]
    fn reimport_drops_print_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let store = StoreFixture::new()
            .with_card("L", "a", "A")
            .edit(1, |c| {
                c.copies = 3;
                c.printed_count = 2;
            })
            .store;
        run(&store, &path).unwrap();

        let mut fresh = InMemoryStore::new();
        import::run(&mut fresh, &path).unwrap();
        let card = fresh.load().unwrap().get(1).cloned().unwrap();
        assert_eq!(card.copies, 1);
        assert_eq!(card.printed_count, 0);
        assert_eq!(card.last_printed, None);
    }
}
