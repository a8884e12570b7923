//! Terminal output for command results.

use chrono::{Local, NaiveDateTime};
use colored::*;
use flashprint::commands::{CmdMessage, MessageLevel};
use flashprint::model::Card;
use flashprint::settings::{Settings, KEYS};
use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LESSON_WIDTH: usize = 14;
const TEXT_WIDTH: usize = 24;
const TIME_WIDTH: usize = 16;
const SELECTED_MARKER: &str = "●";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub fn print_card_list(cards: &[Card]) {
    print!("{}", render_card_list(cards));
}

pub fn render_card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        format!(
            "{:>4}   {}  {}  {}  {:>6}  {:>7}  {:>w$}",
            "id",
            pad("lesson", LESSON_WIDTH),
            pad("front", TEXT_WIDTH),
            pad("back", TEXT_WIDTH),
            "copies",
            "printed",
            "last printed",
            w = TIME_WIDTH
        )
        .dimmed()
    ));

    for card in cards {
        let marker = if card.selected {
            SELECTED_MARKER.green()
        } else {
            " ".normal()
        };
        let last = card
            .last_printed
            .map(format_time_ago)
            .unwrap_or_else(|| "never".to_string());

        out.push_str(&format!(
            "{:>4} {} {}  {}  {}  {:>6}  {:>7}  {}\n",
            card.id.to_string().yellow(),
            marker,
            pad(&card.lesson, LESSON_WIDTH).bold(),
            pad(&card.front, TEXT_WIDTH),
            pad(&card.back, TEXT_WIDTH),
            card.copies,
            card.printed_count,
            format!("{:>w$}", last, w = TIME_WIDTH).dimmed()
        ));
    }
    out
}

pub fn print_settings(settings: &Settings) {
    for key in KEYS {
        if let Some(value) = settings.get(key) {
            println!("{} = {}", key.cyan(), value);
        }
    }
}

pub fn print_paths(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

/// Truncates to `width` display columns, then pads with spaces.
fn pad(s: &str, width: usize) -> String {
    let flat: String = s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();
    let truncated = truncate_to_width(&flat, width);
    let fill = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: NaiveDateTime) -> String {
    let elapsed = Local::now().naive_local().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(elapsed.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("hola", 10), "hola");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        let wide = truncate_to_width("日本語の文", 6);
        assert!(wide.width() <= 6);
        assert!(wide.ends_with('…'));
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("ab", 4).width(), 4);
        assert_eq!(pad("line\nbreak", 20), format!("line break{}", " ".repeat(10)));
    }

    #[test]
    fn empty_list_message() {
        assert_eq!(render_card_list(&[]), "No cards found.\n");
    }

    #[test]
    fn list_shows_never_for_unprinted() {
        colored::control::set_override(false);
        let card = Card::new(7, "L".into(), "gato".into(), "cat".into());
        let out = render_card_list(&[card]);
        assert!(out.contains("gato"));
        assert!(out.contains("never"));
    }
}
