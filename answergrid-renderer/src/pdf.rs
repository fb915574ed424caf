//! PDF rendering of a layout plan via `printpdf`.
//!
//! Plans use top-left-origin millimetre coordinates; PDF pages measure from
//! the bottom-left, so every `y` is flipped against the page height here
//! and nowhere else.

use answergrid_layout::text::{text_width, PT_TO_MM};
use answergrid_layout::{DocumentPlan, DrawOp, PagePlan, TextAlign};
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use crate::error::{RenderError, RenderResult};

/// Render a plan into a single multi-page PDF document.
///
/// Uses the built-in Helvetica faces, so the output embeds no font files.
///
/// # Errors
///
/// Returns an error if font preparation or document serialization fails.
pub fn render_pdf(plan: &DocumentPlan, title: &str) -> RenderResult<Vec<u8>> {
    let width = plan.page_width;
    let height = plan.page_height;
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(width), Mm(height), "Page 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    for (index, page) in plan.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(width), Mm(height), format!("Page {}", index + 1));
            doc.get_page(page_index).get_layer(layer_index)
        };
        render_page(&layer, page, height, &regular, &bold);
    }

    tracing::debug!(pages = plan.pages.len(), "pdf assembled");
    doc.save_to_bytes()
        .map_err(|e| RenderError::Export(e.to_string()))
}

/// Paint one page's instructions onto a layer.
fn render_page(
    layer: &PdfLayerReference,
    page: &PagePlan,
    page_height: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke_width,
            } => {
                let mode = match (fill, stroke_width) {
                    (Some(_), Some(_)) => PaintMode::FillStroke,
                    (Some(_), None) => PaintMode::Fill,
                    (None, Some(_)) => PaintMode::Stroke,
                    (None, None) => continue,
                };
                if let Some(rgb) = fill {
                    layer.set_fill_color(color_from_rgb(*rgb));
                }
                if let Some(stroke) = stroke_width {
                    layer.set_outline_color(color_from_rgb([0, 0, 0]));
                    layer.set_outline_thickness(stroke / PT_TO_MM);
                }
                let rect = printpdf::Rect::new(
                    Mm(*x),
                    Mm(page_height - y - height),
                    Mm(x + width),
                    Mm(page_height - y),
                )
                .with_mode(mode);
                layer.add_rect(rect);
            }

            DrawOp::Text {
                x,
                y,
                text,
                font_pt,
                bold: is_bold,
                align,
                color,
            } => {
                layer.set_fill_color(color_from_rgb(*color));
                let font = if *is_bold { bold } else { regular };
                let anchor_x = match align {
                    TextAlign::Left => *x,
                    TextAlign::Center => x - text_width(text, *font_pt) * 0.5,
                };
                layer.use_text(
                    text.clone(),
                    *font_pt,
                    Mm(anchor_x),
                    Mm(page_height - y),
                    font,
                );
            }
        }
    }
}

/// Convert 8-bit RGB into printpdf's normalized color space.
fn color_from_rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use answergrid_layout::PagePlan;

    fn two_page_plan() -> DocumentPlan {
        let ops = vec![
            DrawOp::Rect {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 20.0,
                fill: Some([250, 128, 114]),
                stroke_width: Some(0.2),
            },
            DrawOp::Text {
                x: 105.0,
                y: 20.0,
                text: "Centered title".to_string(),
                font_pt: 22.0,
                bold: true,
                align: TextAlign::Center,
                color: [0, 0, 0],
            },
        ];
        DocumentPlan {
            page_width: 210.0,
            page_height: 297.0,
            pages: vec![PagePlan { ops }, PagePlan::default()],
            placements: Vec::new(),
        }
    }

    #[test]
    fn test_pdf_magic_bytes() {
        let pdf = render_pdf(&two_page_plan(), "Test").expect("pdf");
        assert!(pdf.len() > 5);
        assert_eq!(&pdf[0..5], b"%PDF-");
    }

    #[test]
    fn test_empty_plan_renders() {
        let plan = DocumentPlan {
            page_width: 210.0,
            page_height: 297.0,
            pages: vec![PagePlan::default()],
            placements: Vec::new(),
        };
        let pdf = render_pdf(&plan, "Empty").expect("pdf");
        assert_eq!(&pdf[0..5], b"%PDF-");
    }
}
