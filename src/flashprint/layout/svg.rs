//! SVG output for print pages.
//!
//! Each page becomes a standalone SVG document sized in device pixels. Text is
//! placed in a `foreignObject` so the viewer handles word wrapping and
//! centering inside the cell box.

use super::{Align, Color, PaintSurface, Rect, Stroke, TextStyle};
use std::fmt::Write as _;

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

#[derive(Debug, Default)]
pub struct SvgSurface {
    pages: Vec<String>,
    current: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finished pages, in the order they were painted.
    pub fn into_pages(mut self) -> Vec<String> {
        if self.current.is_some() {
            self.end_page();
        }
        self.pages
    }

    fn buf(&mut self) -> &mut String {
        self.current.get_or_insert_with(String::new)
    }
}

fn css_color(color: &Color) -> String {
    color.to_string()
}

impl PaintSurface for SvgSurface {
    fn begin_page(&mut self, width: f64, height: f64) {
        if self.current.is_some() {
            self.end_page();
        }
        let mut page = String::new();
        let _ = writeln!(
            page,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        let _ = writeln!(
            page,
            r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
            width, height
        );
        self.current = Some(page);
    }

    fn draw_rect(&mut self, rect: &Rect, stroke: &Stroke) {
        let effect = if stroke.cosmetic {
            r#" vector-effect="non-scaling-stroke""#
        } else {
            ""
        };
        let _ = writeln!(
            self.buf(),
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            css_color(&stroke.color),
            stroke.width,
            effect
        );
    }

    fn draw_text(&mut self, rect: &Rect, text: &str, style: &TextStyle) {
        let align_items = match style.align {
            Align::Center => "center",
            Align::TopCenter => "flex-start",
        };
        let wrap = if style.wrap {
            "white-space:pre-wrap;overflow-wrap:anywhere;"
        } else {
            "white-space:nowrap;overflow:hidden;"
        };
        let _ = writeln!(
            self.buf(),
            concat!(
                r#"<foreignObject x="{}" y="{}" width="{}" height="{}">"#,
                r#"<div xmlns="http://www.w3.org/1999/xhtml" style="width:100%;height:100%;display:flex;"#,
                r#"align-items:{};justify-content:center;text-align:center;{}font-family:{};font-size:{:.1}px;color:{};">"#,
                r#"{}</div></foreignObject>"#
            ),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            align_items,
            wrap,
            FONT_FAMILY,
            style.pixel_size,
            css_color(&style.color),
            html_escape::encode_text(text)
        );
    }

    fn end_page(&mut self) {
        if let Some(mut page) = self.current.take() {
            page.push_str("</svg>\n");
            self.pages.push(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, LayoutParams, Orientation, PageSize};
    use crate::model::RenderCard;

    fn params() -> LayoutParams {
        LayoutParams {
            cards_per_sheet: 2,
            orientation: Orientation::Portrait,
            font_size: 12,
            pen_color: Color::rgb(0xaa, 0, 0),
            pen_width: 2,
            dpi: 72,
            page_size: PageSize::LETTER,
        }
    }

    fn render(cards: &[RenderCard]) -> Vec<String> {
        let mut surface = SvgSurface::new();
        for page in layout(cards, &params()).unwrap() {
            page.paint_onto(&mut surface);
        }
        surface.into_pages()
    }

    #[test]
    fn one_document_per_page() {
        let pages = render(&[
            RenderCard::new("L", "a", "A"),
            RenderCard::new("L", "b", "B"),
            RenderCard::new("L", "c", "C"),
        ]);
        assert_eq!(pages.len(), 4);
        for page in &pages {
            assert!(page.starts_with("<svg"));
            assert!(page.trim_end().ends_with("</svg>"));
        }
        assert!(pages[0].contains(r#"width="612" height="792""#));
    }

    #[test]
    fn text_is_escaped() {
        let pages = render(&[RenderCard::new("<b>", "Tom & Jerry", "1 < 2")]);
        assert!(pages[0].contains("&lt;b&gt;"));
        assert!(pages[0].contains("Tom &amp; Jerry"));
        assert!(pages[1].contains("1 &lt; 2"));
        assert!(!pages[0].contains("<b>"));
    }

    #[test]
    fn borders_only_on_front_pages() {
        let pages = render(&[RenderCard::new("L", "a", "A")]);
        assert!(pages[0].contains(r##"stroke="#aa0000""##));
        assert!(pages[0].contains("non-scaling-stroke"));
        assert!(!pages[1].contains("stroke="));
    }

    #[test]
    fn unfinished_page_is_closed() {
        let mut surface = SvgSurface::new();
        surface.begin_page(10.0, 10.0);
        surface.begin_page(10.0, 10.0);
        assert_eq!(surface.page_count(), 1);
        assert_eq!(surface.into_pages().len(), 2);
    }
}
