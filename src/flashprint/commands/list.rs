use crate::commands::CmdResult;
use crate::error::Result;
use crate::query::ViewQuery;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, query: &ViewQuery) -> Result<CmdResult> {
    let table = store.load()?;
    let listed = query.visible(&table).into_iter().cloned().collect();
    Ok(CmdResult::default().with_listed_cards(listed))
}
