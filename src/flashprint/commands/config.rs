use crate::commands::{CmdMessage, CmdResult, FlashPaths};
use crate::error::Result;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
    /// Persist a catalog column width in pixels.
    ResizeColumn(usize, u32),
}

pub fn run(paths: &FlashPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    let mut settings = Settings::load(dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => Ok(result.with_settings(settings)),
        ConfigAction::ShowKey(key) => {
            match settings.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => result.add_message(CmdMessage::error(format!("Unknown config key: {}", key))),
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = settings.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            settings.save(dir)?;
            let display_val = settings.get(&key).unwrap_or(value);
            tracing::debug!(key = %key, value = %display_val, "setting saved");
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            Ok(result.with_settings(settings))
        }
        ConfigAction::ResizeColumn(column, width) => {
            settings.set_column_width(column, width);
            settings.save(dir)?;
            result.add_message(CmdMessage::success(format!(
                "Column {} width set to {}",
                column, width
            )));
            Ok(result.with_settings(settings))
        }
    }
}
