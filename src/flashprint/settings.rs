//! # Settings
//!
//! Layout and UI settings, stored as `settings.json` in the data directory.
//!
//! The on-disk document is a loose key/value blob (numbers are written as
//! strings). Loading is forgiving: missing keys fall back to defaults, unknown
//! keys are carried through untouched so a newer client's settings survive a
//! round trip, and an unreadable document yields full defaults.
//!
//! Numeric layout keys are the exception. A stored value that is not a
//! non-negative integer is kept verbatim in [`Settings::invalid`] and makes
//! [`Settings::layout_params`] fail, so a print never runs on values the user
//! did not choose. Range checks are NOT applied on load; they run on
//! [`Settings::set`] and again in the layout engine.

use crate::error::{FlashError, Result};
use crate::layout::{Color, LayoutParams, Orientation, PageSize};
use crate::translate::Language;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

const SETTINGS_FILENAME: &str = "settings.json";

pub const CARDS_PER_PAGE_RANGE: RangeInclusive<u32> = 1..=12;
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=120;
pub const PEN_WIDTH_RANGE: RangeInclusive<u32> = 1..=10;
pub const DPI_RANGE: RangeInclusive<u32> = 72..=1200;

const DEFAULT_COLUMN_WIDTHS: [(&str, u32); 8] = [
    ("0", 60),
    ("1", 100),
    ("2", 150),
    ("3", 150),
    ("4", 80),
    ("5", 60),
    ("6", 80),
    ("7", 120),
];

const NUMERIC_LAYOUT_KEYS: [&str; 4] = ["cards_per_page", "font_size", "pen_width", "dpi"];

/// Keys this version understands, in display order.
pub const KEYS: [&str; 8] = [
    "cards_per_page",
    "orientation",
    "font_size",
    "auto_fill_language",
    "pen_color",
    "pen_width",
    "dpi",
    "column_widths",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cards_per_page: u32,
    pub orientation: Orientation,
    pub font_size: u32,
    pub auto_fill_language: Language,
    pub pen_color: Color,
    pub pen_width: u32,
    pub dpi: u32,
    pub column_widths: BTreeMap<String, u32>,
    /// Numeric layout values that could not be read, as stored.
    pub invalid: BTreeMap<String, Value>,
    /// Keys this version does not know about, preserved on save.
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cards_per_page: 6,
            orientation: Orientation::Portrait,
            font_size: 60,
            auto_fill_language: Language::Disabled,
            pen_color: Color::BLACK,
            pen_width: 2,
            dpi: 300,
            column_widths: default_column_widths(),
            invalid: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

pub fn default_column_widths() -> BTreeMap<String, u32> {
    DEFAULT_COLUMN_WIDTHS
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

impl Settings {
    /// Load settings from `dir`, or defaults if the file is missing or unreadable.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(SETTINGS_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(FlashError::Io)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(Self::from_map(map)),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "settings file is not an object, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(FlashError::Io)?;
        }
        let content =
            serde_json::to_string_pretty(&Value::Object(self.to_map())).map_err(FlashError::Serialization)?;
        fs::write(dir.join(SETTINGS_FILENAME), content).map_err(FlashError::Io)?;
        Ok(())
    }

    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let defaults = Self::default();
        let mut invalid = BTreeMap::new();
        let mut number = |map: &mut Map<String, Value>, key: &str, default: u32| {
            match take_u32(map, key) {
                Some(Ok(n)) => n,
                Some(Err(raw)) => {
                    tracing::warn!(key, value = %raw, "unreadable layout setting");
                    invalid.insert(key.to_string(), raw);
                    default
                }
                None => default,
            }
        };
        let cards_per_page = number(&mut map, "cards_per_page", defaults.cards_per_page);
        let font_size = number(&mut map, "font_size", defaults.font_size);
        let pen_width = number(&mut map, "pen_width", defaults.pen_width);
        let dpi = number(&mut map, "dpi", defaults.dpi);

        let mut settings = Self {
            cards_per_page,
            orientation: take_parsed(&mut map, "orientation").unwrap_or(defaults.orientation),
            font_size,
            auto_fill_language: take_parsed(&mut map, "auto_fill_language")
                .unwrap_or(defaults.auto_fill_language),
            pen_color: take_parsed(&mut map, "pen_color").unwrap_or(defaults.pen_color),
            pen_width,
            dpi,
            column_widths: defaults.column_widths,
            invalid,
            extra: Map::new(),
        };

        if let Some(widths) = map.remove("column_widths").and_then(parse_column_widths) {
            settings.column_widths = widths;
        }

        settings.extra = map;
        settings
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        for key in KEYS {
            let value = match key {
                "column_widths" => Value::Object(
                    self.column_widths
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from(*v)))
                        .collect(),
                ),
                _ => match self.invalid.get(key) {
                    Some(raw) => raw.clone(),
                    None => Value::String(self.get(key).unwrap_or_default()),
                },
            };
            map.insert(key.to_string(), value);
        }
        map
    }

    /// Display value of a recognized key.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(raw) = self.invalid.get(key) {
            return Some(match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
        let value = match key {
            "cards_per_page" => self.cards_per_page.to_string(),
            "orientation" => self.orientation.to_string(),
            "font_size" => self.font_size.to_string(),
            "auto_fill_language" => self.auto_fill_language.to_string(),
            "pen_color" => self.pen_color.to_string(),
            "pen_width" => self.pen_width.to_string(),
            "dpi" => self.dpi.to_string(),
            "column_widths" => self
                .column_widths
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect::<Vec<_>>()
                .join(","),
            _ => return None,
        };
        Some(value)
    }

    /// Sets a recognized key, validating the value against its documented range.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "cards_per_page" => self.cards_per_page = parse_in_range(key, value, CARDS_PER_PAGE_RANGE)?,
            "font_size" => self.font_size = parse_in_range(key, value, FONT_SIZE_RANGE)?,
            "pen_width" => self.pen_width = parse_in_range(key, value, PEN_WIDTH_RANGE)?,
            "dpi" => self.dpi = parse_in_range(key, value, DPI_RANGE)?,
            "orientation" => self.orientation = value.parse()?,
            "auto_fill_language" => self.auto_fill_language = value.parse()?,
            "pen_color" => self.pen_color = value.parse()?,
            "column_widths" => {
                return Err("column_widths is managed by the catalog view".to_string())
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        self.invalid.remove(key);
        Ok(())
    }

    /// Records a resized catalog column.
    pub fn set_column_width(&mut self, column: usize, width: u32) {
        self.column_widths.insert(column.to_string(), width);
    }

    /// Layout parameters for a print run on US Letter paper.
    ///
    /// Fails with [`FlashError::LayoutConfig`] if a numeric layout value could
    /// not be read. Readable values are passed through as stored; the layout
    /// engine does the range checks.
    pub fn layout_params(&self) -> Result<LayoutParams> {
        if let Some((key, raw)) = NUMERIC_LAYOUT_KEYS
            .iter()
            .find_map(|key| self.invalid.get_key_value(*key))
        {
            return Err(FlashError::LayoutConfig(format!(
                "{} must be an integer, got {}",
                key, raw
            )));
        }
        Ok(LayoutParams {
            cards_per_sheet: self.cards_per_page,
            orientation: self.orientation,
            font_size: self.font_size,
            pen_color: self.pen_color,
            pen_width: self.pen_width,
            dpi: self.dpi,
            page_size: PageSize::LETTER,
        })
    }
}

fn parse_in_range(key: &str, value: &str, range: RangeInclusive<u32>) -> std::result::Result<u32, String> {
    let n: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be an integer, got '{}'", key, value))?;
    if !range.contains(&n) {
        return Err(format!(
            "{} must be between {} and {}, got {}",
            key,
            range.start(),
            range.end(),
            n
        ));
    }
    Ok(n)
}

/// `None` if the key is absent, `Err` with the raw value if it is not a `u32`.
fn take_u32(map: &mut Map<String, Value>, key: &str) -> Option<std::result::Result<u32, Value>> {
    let raw = map.remove(key)?;
    let parsed = match &raw {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    Some(parsed.ok_or(raw))
}

fn take_parsed<T: std::str::FromStr>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let parsed = match map.remove(key)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(key, "ignoring unparseable setting");
    }
    parsed
}

/// A widths map only counts if it covers every default column; otherwise the
/// full default map is used.
fn parse_column_widths(value: Value) -> Option<BTreeMap<String, u32>> {
    let Value::Object(obj) = value else {
        return None;
    };
    let mut widths = BTreeMap::new();
    for (k, v) in obj {
        if let Some(w) = v.as_u64().and_then(|w| u32::try_from(w).ok()) {
            widths.insert(k, w);
        }
    }
    let complete = DEFAULT_COLUMN_WIDTHS
        .iter()
        .all(|(k, _)| widths.contains_key(*k));
    complete.then_some(widths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.cards_per_page, 6);
        assert_eq!(settings.font_size, 60);
        assert_eq!(settings.pen_width, 2);
        assert_eq!(settings.pen_color, Color::BLACK);
        assert_eq!(settings.column_widths.len(), 8);
    }

    #[test]
    fn test_missing_keys_are_defaulted() {
        let settings = Settings::from_map(as_map(json!({ "font_size": "24" })));
        assert_eq!(settings.font_size, 24);
        assert_eq!(settings.cards_per_page, 6);
        assert_eq!(settings.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_numbers_accepted_as_strings_or_numbers() {
        let settings = Settings::from_map(as_map(json!({
            "cards_per_page": 8,
            "pen_width": "4",
            "orientation": "Landscape",
            "pen_color": "#ff0000"
        })));
        assert_eq!(settings.cards_per_page, 8);
        assert_eq!(settings.pen_width, 4);
        assert_eq!(settings.orientation, Orientation::Landscape);
        assert_eq!(settings.pen_color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let settings = Settings::from_map(as_map(json!({ "window_geometry": "1100x600" })));
        let map = settings.to_map();
        assert_eq!(map["window_geometry"], json!("1100x600"));
        assert_eq!(map["cards_per_page"], json!("6"));
    }

    #[test]
    fn test_partial_column_widths_fall_back_to_defaults() {
        let settings = Settings::from_map(as_map(json!({
            "column_widths": { "0": 99, "1": 10 }
        })));
        assert_eq!(settings.column_widths, default_column_widths());

        let mut full = default_column_widths();
        full.insert("2".into(), 300);
        let settings = Settings::from_map(as_map(json!({ "column_widths": full.clone() })));
        assert_eq!(settings.column_widths, full);
    }

    #[test]
    fn test_set_validates_ranges() {
        let mut settings = Settings::default();
        assert!(settings.set("cards_per_page", "12").is_ok());
        assert!(settings.set("cards_per_page", "13").is_err());
        assert!(settings.set("font_size", "5").is_err());
        assert!(settings.set("pen_width", "abc").is_err());
        assert!(settings.set("pen_color", "red").is_err());
        assert!(settings.set("nope", "1").is_err());
        assert_eq!(settings.cards_per_page, 12);
    }

    #[test]
    fn test_out_of_range_values_survive_load() {
        let settings = Settings::from_map(as_map(json!({ "cards_per_page": "40" })));
        assert_eq!(settings.cards_per_page, 40);
    }

    #[test]
    fn test_unreadable_layout_numbers_are_kept_not_defaulted() {
        let settings = Settings::from_map(as_map(json!({
            "cards_per_page": "5000000000",
            "font_size": "-3",
            "pen_width": "abc"
        })));
        assert_eq!(settings.invalid.len(), 3);
        assert_eq!(settings.get("font_size").as_deref(), Some("-3"));
        assert!(matches!(
            settings.layout_params(),
            Err(FlashError::LayoutConfig(_))
        ));

        let map = settings.to_map();
        assert_eq!(map["cards_per_page"], json!("5000000000"));
        assert_eq!(map["dpi"], json!("300"));
    }

    #[test]
    fn test_set_replaces_unreadable_value() {
        let mut settings = Settings::from_map(as_map(json!({ "font_size": "-3" })));
        settings.set("font_size", "24").unwrap();
        assert!(settings.invalid.is_empty());
        assert_eq!(settings.layout_params().unwrap().font_size, 24);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.set("font_size", "18").unwrap();
        settings.set_column_width(3, 210);
        settings.extra.insert("legacy".into(), json!(true));
        settings.save(dir.path()).unwrap();

        let loaded = Settings::load(dir.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "{ broken").unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());
    }
}
