//! SVG rendering of a layout plan: one XML document per page.

use std::fmt::Write;

use answergrid_layout::{DocumentPlan, DrawOp, PagePlan, TextAlign};

/// Render every page of a plan to a standalone SVG document.
#[must_use]
pub fn render_svg_pages(plan: &DocumentPlan) -> Vec<String> {
    plan.pages
        .iter()
        .map(|page| render_page(page, plan.page_width, plan.page_height))
        .collect()
}

/// Render one page to an SVG document string.
fn render_page(page: &PagePlan, width: f32, height: f32) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}mm\" height=\"{height}mm\" viewBox=\"0 0 {width} {height}\">",
    );
    let _ = write!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

    for op in &page.ops {
        render_op(&mut svg, op);
    }

    svg.push_str("</svg>");
    svg
}

/// Render a single draw instruction.
fn render_op(svg: &mut String, op: &DrawOp) {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke_width,
        } => {
            let fill_attr = match fill {
                Some([r, g, b]) => format!("rgb({r},{g},{b})"),
                None => "none".to_string(),
            };
            let _ = write!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" fill=\"{fill_attr}\"",
            );
            if let Some(stroke) = stroke_width {
                let _ = write!(svg, " stroke=\"#000000\" stroke-width=\"{stroke}\"");
            }
            svg.push_str("/>");
        }

        DrawOp::Text {
            x,
            y,
            text,
            font_pt,
            bold,
            align,
            color: [r, g, b],
        } => {
            // Font size in viewBox units (mm).
            let font_mm = font_pt * answergrid_layout::text::PT_TO_MM;
            let escaped = escape_xml(text);
            let anchor = match align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
            };
            let weight = if *bold { " font-weight=\"bold\"" } else { "" };
            let _ = write!(
                svg,
                "<text x=\"{x}\" y=\"{y}\" font-size=\"{font_mm}\" fill=\"rgb({r},{g},{b})\" text-anchor=\"{anchor}\"{weight} font-family=\"Helvetica, sans-serif\">{escaped}</text>",
            );
        }
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
