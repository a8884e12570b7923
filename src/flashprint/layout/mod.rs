//! # Print Layout
//!
//! Turns an ordered list of [`RenderCard`]s into page paint instructions for
//! manual duplex printing.
//!
//! ## Sheet Pattern
//!
//! Cards are packed N to a sheet in a two-column grid. Every sheet produces a
//! front page followed by a back page:
//!
//! ```text
//!        front                 back
//!   ┌──────┬──────┐       ┌──────┬──────┐
//!   │  0   │  1   │       │  1   │  0   │
//!   ├──────┼──────┤       ├──────┼──────┤
//!   │  2   │  3   │       │  3   │  2   │
//!   └──────┴──────┘       └──────┴──────┘
//! ```
//!
//! Back cells are mirrored per row, so flipping the printed sheet along its
//! vertical centerline puts every back text behind its front text. Grid cells
//! without a card get no instructions at all, not even a border.
//!
//! ## Units
//!
//! Everything is in device pixels: the physical page size in inches times the
//! configured DPI. Font sizes are in points and converted with `pt * dpi / 72`.
//!
//! The engine is pure. It never mutates its inputs and only talks to the
//! output through [`PaintSurface`], so a print job can be rendered any number
//! of times (preview, then final output).

use crate::error::{FlashError, Result};
use crate::model::RenderCard;
use crate::settings::{CARDS_PER_PAGE_RANGE, DPI_RANGE, FONT_SIZE_RANGE, PEN_WIDTH_RANGE};
use std::fmt;
use std::str::FromStr;

pub mod svg;

pub const COLUMNS: usize = 2;
/// Lesson labels use a fixed size regardless of the configured font size.
pub const LABEL_POINT_SIZE: u32 = 16;
/// Horizontal inset of the text box from the cell edge, in device pixels.
pub const TEXT_INSET_X: f64 = 10.0;
/// Vertical inset of the text box from the cell edge, in device pixels.
pub const TEXT_INSET_Y: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("Portrait"),
            Orientation::Landscape => f.write_str("Landscape"),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "Unknown orientation '{}' (expected Portrait or Landscape)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parses `#RRGGBB` (case-insensitive).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| format!("Invalid color '{}' (expected #RRGGBB)", s))?;
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Physical paper size in inches, portrait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize {
        width_in: 8.5,
        height_in: 11.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub cards_per_sheet: u32,
    pub orientation: Orientation,
    pub font_size: u32,
    pub pen_color: Color,
    pub pen_width: u32,
    pub dpi: u32,
    pub page_size: PageSize,
}

impl LayoutParams {
    /// Rejects parameters outside their documented ranges. No clamping.
    pub fn validate(&self) -> Result<()> {
        check_range("cards per sheet", self.cards_per_sheet, &CARDS_PER_PAGE_RANGE)?;
        check_range("font size", self.font_size, &FONT_SIZE_RANGE)?;
        check_range("pen width", self.pen_width, &PEN_WIDTH_RANGE)?;
        check_range("resolution", self.dpi, &DPI_RANGE)?;
        let PageSize {
            width_in,
            height_in,
        } = self.page_size;
        if !(width_in > 0.0 && height_in > 0.0) {
            return Err(FlashError::LayoutConfig(format!(
                "page size must be positive, got {}x{} in",
                width_in, height_in
            )));
        }
        Ok(())
    }

    /// Page size in device pixels, after applying the orientation.
    pub fn page_pixels(&self) -> (f64, f64) {
        let dpi = f64::from(self.dpi);
        let w = (self.page_size.width_in * dpi).floor();
        let h = (self.page_size.height_in * dpi).floor();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn points_to_pixels(&self, points: u32) -> f64 {
        f64::from(points) * f64::from(self.dpi) / 72.0
    }
}

fn check_range(name: &str, value: u32, range: &std::ops::RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FlashError::LayoutConfig(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Centered on both axes.
    Center,
    /// Horizontally centered, pinned to the top edge.
    TopCenter,
}

/// A border stroke. Cosmetic strokes keep their device-pixel width under any
/// scale the surface applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub cosmetic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub point_size: u32,
    pub pixel_size: f64,
    pub color: Color,
    pub align: Align,
    pub wrap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Rect {
        rect: Rect,
        stroke: Stroke,
    },
    Text {
        rect: Rect,
        text: String,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Everything drawn in one grid cell for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPaint {
    pub row: usize,
    pub column: usize,
    /// Position of the card within its sheet.
    pub slot: usize,
    pub ops: Vec<PaintOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePaint {
    /// Zero-based sheet number; front and back of a sheet share it.
    pub sheet: usize,
    pub side: Side,
    pub width: f64,
    pub height: f64,
    /// Only cells holding a card appear here.
    pub cells: Vec<CellPaint>,
}

impl PagePaint {
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&CellPaint> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.column == column)
    }

    pub fn paint_onto<P: PaintSurface>(&self, surface: &mut P) {
        surface.begin_page(self.width, self.height);
        for op in self.cells.iter().flat_map(|cell| &cell.ops) {
            match op {
                PaintOp::Rect { rect, stroke } => surface.draw_rect(rect, stroke),
                PaintOp::Text { rect, text, style } => surface.draw_text(rect, text, style),
            }
        }
        surface.end_page();
    }
}

/// The primitive operations the layout needs from an output device.
pub trait PaintSurface {
    fn begin_page(&mut self, width: f64, height: f64);
    fn draw_rect(&mut self, rect: &Rect, stroke: &Stroke);
    fn draw_text(&mut self, rect: &Rect, text: &str, style: &TextStyle);
    fn end_page(&mut self);
}

/// Cell geometry for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Grid {
    /// Two columns and `ceil(n / 2)` rows; an odd count leaves the last row half full.
    pub fn new(cards_per_sheet: usize, page_width: f64, page_height: f64) -> Self {
        let rows = cards_per_sheet.div_ceil(COLUMNS).max(1);
        Self {
            rows,
            cell_width: page_width / COLUMNS as f64,
            cell_height: page_height / rows as f64,
        }
    }

    /// Row and column of sheet position `slot` on the given side.
    pub fn position(slot: usize, side: Side) -> (usize, usize) {
        let row = slot / COLUMNS;
        let column = match side {
            Side::Front => slot % COLUMNS,
            Side::Back => COLUMNS - 1 - (slot % COLUMNS),
        };
        (row, column)
    }

    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        Rect::new(
            column as f64 * self.cell_width,
            row as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// Lays out `cards` into front/back page pairs.
///
/// Produces exactly `ceil(cards.len() / N)` pairs, front first. Fails with
/// [`FlashError::LayoutConfig`] before producing anything if `params` is out
/// of range.
pub fn layout(cards: &[RenderCard], params: &LayoutParams) -> Result<Vec<PagePaint>> {
    params.validate()?;

    let per_sheet = params.cards_per_sheet as usize;
    let (width, height) = params.page_pixels();
    let grid = Grid::new(per_sheet, width, height);

    let mut pages = Vec::with_capacity(cards.len().div_ceil(per_sheet) * 2);
    for (sheet, chunk) in cards.chunks(per_sheet).enumerate() {
        for side in [Side::Front, Side::Back] {
            let cells = chunk
                .iter()
                .enumerate()
                .map(|(slot, card)| {
                    let (row, column) = Grid::position(slot, side);
                    let rect = grid.cell_rect(row, column);
                    let ops = match side {
                        Side::Front => front_ops(card, rect, params),
                        Side::Back => back_ops(card, rect, params),
                    };
                    CellPaint {
                        row,
                        column,
                        slot,
                        ops,
                    }
                })
                .collect();
            pages.push(PagePaint {
                sheet,
                side,
                width,
                height,
                cells,
            });
        }
    }

    tracing::debug!(
        cards = cards.len(),
        pages = pages.len(),
        per_sheet,
        rows = grid.rows,
        "layout computed"
    );
    Ok(pages)
}

fn content_style(params: &LayoutParams) -> TextStyle {
    TextStyle {
        point_size: params.font_size,
        pixel_size: params.points_to_pixels(params.font_size),
        color: Color::BLACK,
        align: Align::Center,
        wrap: true,
    }
}

fn front_ops(card: &RenderCard, cell: Rect, params: &LayoutParams) -> Vec<PaintOp> {
    let border = PaintOp::Rect {
        rect: cell,
        stroke: Stroke {
            color: params.pen_color,
            width: f64::from(params.pen_width),
            cosmetic: true,
        },
    };

    let label_px = params.points_to_pixels(LABEL_POINT_SIZE);
    let text_box = cell.inset(TEXT_INSET_X, TEXT_INSET_Y);
    let label = PaintOp::Text {
        rect: Rect::new(
            text_box.x,
            text_box.y,
            text_box.width,
            (label_px * 1.5).min(text_box.height),
        ),
        text: card.lesson.clone(),
        style: TextStyle {
            point_size: LABEL_POINT_SIZE,
            pixel_size: label_px,
            color: Color::BLACK,
            align: Align::TopCenter,
            wrap: false,
        },
    };

    let front = PaintOp::Text {
        rect: text_box,
        text: card.front.clone(),
        style: content_style(params),
    };

    vec![border, label, front]
}

fn back_ops(card: &RenderCard, cell: Rect, params: &LayoutParams) -> Vec<PaintOp> {
    vec![PaintOp::Text {
        rect: cell.inset(TEXT_INSET_X, TEXT_INSET_Y),
        text: card.back.clone(),
        style: content_style(params),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: u32) -> LayoutParams {
        LayoutParams {
            cards_per_sheet: n,
            orientation: Orientation::Portrait,
            font_size: 24,
            pen_color: Color::rgb(0x33, 0x66, 0x99),
            pen_width: 3,
            dpi: 100,
            page_size: PageSize::LETTER,
        }
    }

    fn cards(m: usize) -> Vec<RenderCard> {
        (0..m)
            .map(|i| RenderCard::new("L", format!("front {}", i), format!("back {}", i)))
            .collect()
    }

    fn texts(cell: &CellPaint) -> Vec<&str> {
        cell.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn page_pair_count_is_ceil_m_over_n() {
        for n in 1..=12u32 {
            for m in 0..=30usize {
                let pages = layout(&cards(m), &params(n)).unwrap();
                let pairs = m.div_ceil(n as usize);
                assert_eq!(pages.len(), pairs * 2, "n={} m={}", n, m);
                for (i, pair) in pages.chunks(2).enumerate() {
                    assert_eq!(pair[0].side, Side::Front);
                    assert_eq!(pair[1].side, Side::Back);
                    assert_eq!(pair[0].sheet, i);
                    assert_eq!(pair[1].sheet, i);
                }
            }
        }
    }

    #[test]
    fn back_cells_mirror_front_columns() {
        for n in 1..=12u32 {
            let pages = layout(&cards(n as usize + 1), &params(n)).unwrap();
            for pair in pages.chunks(2) {
                let (front, back) = (&pair[0], &pair[1]);
                assert_eq!(front.cells.len(), back.cells.len());
                for (f, b) in front.cells.iter().zip(&back.cells) {
                    assert_eq!(f.slot, b.slot);
                    assert_eq!(f.row, b.row);
                    assert_eq!(f.column, f.slot % 2);
                    assert_eq!(b.column, 1 - (b.slot % 2));
                }
            }
        }
    }

    #[test]
    fn unfilled_cells_have_no_instructions() {
        let pages = layout(&cards(3), &params(6)).unwrap();
        assert_eq!(pages.len(), 2);

        let front = &pages[0];
        assert_eq!(front.cells.len(), 3);
        assert!(front.cell_at(1, 1).is_none());
        assert!(front.cell_at(2, 0).is_none());
        assert!(front.cell_at(2, 1).is_none());

        let back = &pages[1];
        assert_eq!(back.cells.len(), 3);
        assert_eq!(back.cell_at(0, 0).map(|c| c.slot), Some(1));
        assert_eq!(back.cell_at(0, 1).map(|c| c.slot), Some(0));
        assert_eq!(back.cell_at(1, 1).map(|c| c.slot), Some(2));
        assert!(back.cell_at(1, 0).is_none());
    }

    #[test]
    fn front_has_border_label_and_text_back_has_text_only() {
        let cards = vec![RenderCard::new("Lesson 4", "Hola", "Hello")];
        let pages = layout(&cards, &params(2)).unwrap();

        let front = &pages[0].cells[0];
        assert_eq!(front.ops.len(), 3);
        match &front.ops[0] {
            PaintOp::Rect { stroke, .. } => {
                assert!(stroke.cosmetic);
                assert_eq!(stroke.width, 3.0);
                assert_eq!(stroke.color, Color::rgb(0x33, 0x66, 0x99));
            }
            other => panic!("expected border, got {:?}", other),
        }
        assert_eq!(texts(front), vec!["Lesson 4", "Hola"]);
        match &front.ops[1] {
            PaintOp::Text { style, .. } => {
                assert_eq!(style.point_size, LABEL_POINT_SIZE);
                assert_eq!(style.align, Align::TopCenter);
            }
            other => panic!("expected label, got {:?}", other),
        }
        match &front.ops[2] {
            PaintOp::Text { style, .. } => {
                assert_eq!(style.point_size, 24);
                assert!(style.wrap);
                assert_eq!(style.align, Align::Center);
            }
            other => panic!("expected front text, got {:?}", other),
        }

        let back = &pages[1].cells[0];
        assert_eq!(back.ops.len(), 1);
        assert_eq!(texts(back), vec!["Hello"]);
        assert_eq!(back.column, 1);
    }

    #[test]
    fn grid_geometry_follows_page_size_and_orientation() {
        let p = params(6);
        let pages = layout(&cards(6), &p).unwrap();
        assert_eq!((pages[0].width, pages[0].height), (850.0, 1100.0));
        let cell = pages[0].cell_at(2, 1).unwrap();
        match &cell.ops[0] {
            PaintOp::Rect { rect, .. } => {
                assert_eq!(rect.x, 425.0);
                assert!((rect.y - 2.0 * 1100.0 / 3.0).abs() < 1e-9);
                assert_eq!(rect.width, 425.0);
            }
            other => panic!("expected border, got {:?}", other),
        }

        let landscape = LayoutParams {
            orientation: Orientation::Landscape,
            ..p
        };
        let pages = layout(&cards(1), &landscape).unwrap();
        assert_eq!((pages[0].width, pages[0].height), (1100.0, 850.0));
    }

    #[test]
    fn front_text_is_inset_from_cell() {
        let pages = layout(&cards(1), &params(2)).unwrap();
        match &pages[0].cells[0].ops[2] {
            PaintOp::Text { rect, .. } => {
                assert_eq!(rect.x, TEXT_INSET_X);
                assert_eq!(rect.y, TEXT_INSET_Y);
                assert_eq!(rect.width, 425.0 - 2.0 * TEXT_INSET_X);
                assert_eq!(rect.height, 1100.0 - 2.0 * TEXT_INSET_Y);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn out_of_range_params_are_rejected() {
        let bad = [
            LayoutParams { cards_per_sheet: 0, ..params(6) },
            LayoutParams { cards_per_sheet: 13, ..params(6) },
            LayoutParams { font_size: 5, ..params(6) },
            LayoutParams { font_size: 121, ..params(6) },
            LayoutParams { pen_width: 0, ..params(6) },
            LayoutParams { pen_width: 11, ..params(6) },
        ];
        for p in bad {
            assert!(matches!(
                layout(&cards(4), &p),
                Err(FlashError::LayoutConfig(_))
            ));
        }
    }

    #[test]
    fn copies_scenario_produces_two_full_sheets() {
        let cards = vec![
            RenderCard::new("L", "a", "A"),
            RenderCard::new("L", "b", "B"),
            RenderCard::new("L", "b", "B"),
            RenderCard::new("L", "c", "C"),
        ];
        let pages = layout(&cards, &params(2)).unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].cells.len(), 2);
        assert_eq!(pages[2].cells.len(), 2);
    }

    #[test]
    fn layout_does_not_mutate_and_is_repeatable() {
        let input = cards(5);
        let before = input.clone();
        let first = layout(&input, &params(4)).unwrap();
        let second = layout(&input, &params(4)).unwrap();
        assert_eq!(first, second);
        assert_eq!(input, before);
    }

    #[test]
    fn color_parsing() {
        assert_eq!("#FF8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::rgb(255, 128, 0).to_string(), "#ff8000");
        assert!("FF8000".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
    }
}
