//! # Answergrid Renderer
//!
//! Export backends for answergrid layout plans. A [`DocumentPlan`] is pure
//! draw instructions; this crate turns it into deliverable bytes — a
//! multi-page PDF for printing, or one SVG document per page for preview.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               DocumentPlan                  │
//! ├──────────────────────┬──────────────────────┤
//! │  PDF (printpdf)      │  SVG (per page)      │
//! │  - built-in fonts    │  - viewBox in mm     │
//! │  - bottom-left flip  │  - XML escaping      │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod pdf;
pub mod svg;

pub use error::{RenderError, RenderResult};
pub use pdf::render_pdf;
pub use svg::render_svg_pages;

use answergrid_layout::DocumentPlan;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One SVG document per page.
    Svg,
    /// A single multi-page PDF document.
    Pdf,
}

/// The produced export artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// One SVG document per page.
    Svg(Vec<String>),
    /// PDF bytes.
    Pdf(Vec<u8>),
}

/// Exports a [`DocumentPlan`] to the supported output formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanExporter;

impl PlanExporter {
    /// Create an exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Export a plan to the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error if PDF assembly fails; SVG output is infallible.
    pub fn export(
        &self,
        plan: &DocumentPlan,
        title: &str,
        format: ExportFormat,
    ) -> RenderResult<ExportOutput> {
        match format {
            ExportFormat::Svg => Ok(ExportOutput::Svg(render_svg_pages(plan))),
            ExportFormat::Pdf => Ok(ExportOutput::Pdf(render_pdf(plan, title)?)),
        }
    }
}
