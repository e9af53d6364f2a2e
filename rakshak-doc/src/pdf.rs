//! Statement PDF rendering
//!
//! A4 portrait, 15 mm margins. Centred bold title, then the model's text
//! in 11 pt Helvetica wrapped at 95 columns with 14 pt leading. Pages
//! are added when the cursor passes the bottom margin.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt};
use thiserror::Error;

pub const TITLE: &str = "Worker Statement";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
/// Helvetica-Bold advance width of [`TITLE`] at 16 pt
const TITLE_WIDTH_PT: f32 = 136.9;
const BODY_SIZE: f32 = 11.0;
const LEADING_PT: f32 = 14.0;
/// Gap between the title baseline and the first body line
const TITLE_GAP_PT: f32 = 30.0;
pub const WRAP_COLUMNS: usize = 95;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// One body line and its baseline, in points from the page bottom
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub y: f32,
    pub text: String,
}

fn mm_to_pt(mm: f32) -> f32 {
    Pt::from(Mm(mm)).0
}

/// Wrap and place body text; one inner vec per page.
///
/// Blank source lines produce no output line.
pub fn layout(text: &str) -> Vec<Vec<PlacedLine>> {
    let page_height = mm_to_pt(PAGE_HEIGHT_MM);
    let margin = mm_to_pt(MARGIN_MM);

    let mut pages = vec![Vec::new()];
    let mut y = page_height - margin - TITLE_GAP_PT;

    for source_line in text.lines() {
        for wrapped in textwrap::wrap(source_line, WRAP_COLUMNS) {
            if wrapped.trim().is_empty() {
                continue;
            }
            if y < margin {
                pages.push(Vec::new());
                y = page_height - margin;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    y,
                    text: wrapped.into_owned(),
                });
            }
            y -= LEADING_PT;
        }
    }

    pages
}

/// Render the statement to PDF bytes
pub fn render_statement(text: &str) -> Result<Vec<u8>, PdfError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Body",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Render(format!("{:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Render(format!("{:?}", e)))?;

    let title_layer = doc.get_page(first_page).get_layer(first_layer);
    let title_x = (mm_to_pt(PAGE_WIDTH_MM) - TITLE_WIDTH_PT) / 2.0;
    title_layer.use_text(
        TITLE,
        TITLE_SIZE,
        Mm::from(Pt(title_x)),
        Mm(PAGE_HEIGHT_MM - MARGIN_MM),
        &bold,
    );

    for (index, lines) in layout(text).into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Body");
            doc.get_page(page).get_layer(layer)
        };
        write_lines(&layer, &lines, &regular);
    }

    doc.save_to_bytes()
        .map_err(|e| PdfError::Render(format!("{:?}", e)))
}

fn write_lines(layer: &PdfLayerReference, lines: &[PlacedLine], font: &IndirectFontRef) {
    for line in lines {
        layer.use_text(
            line.text.as_str(),
            BODY_SIZE,
            Mm(MARGIN_MM),
            Mm::from(Pt(line.y)),
            font,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_wraps_long_lines() {
        let long = "word ".repeat(40);
        let pages = layout(&long);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 3);
        assert!(pages[0].iter().all(|l| l.text.chars().count() <= WRAP_COLUMNS));
        assert!((pages[0][0].y - pages[0][1].y - LEADING_PT).abs() < 0.01);
    }

    #[test]
    fn test_layout_skips_blank_lines() {
        let pages = layout("HEADER:\n\n- Worker: Asha\n   \nFACTS:");
        let texts: Vec<&str> = pages[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["HEADER:", "- Worker: Asha", "FACTS:"]);
    }

    #[test]
    fn test_layout_breaks_pages_at_bottom_margin() {
        let text = (0..120).map(|i| format!("- point {}", i)).collect::<Vec<_>>().join("\n");
        let pages = layout(&text);
        assert!(pages.len() >= 3);

        let margin = mm_to_pt(MARGIN_MM);
        let top = mm_to_pt(PAGE_HEIGHT_MM) - margin;
        for page in &pages[1..] {
            assert!((page[0].y - top).abs() < 0.01);
        }
        let total: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(total, 120);
        assert!(pages.iter().flatten().all(|l| l.y >= margin));
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = render_statement("HEADER:\n- Worker statement body").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
