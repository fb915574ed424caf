//! The paginated draw-instruction plan handed to rendering backends.
//!
//! A [`DocumentPlan`] is pure data: fixed-size pages of absolute-positioned
//! rectangles and text runs, in millimetres with the origin at the top-left
//! of each page. Rendering backends (PDF, SVG, canvas) consume it without
//! re-running any layout logic.

use serde::{Deserialize, Serialize};

/// Horizontal anchoring of a text instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// `x` is the left edge of the text run.
    Left,
    /// `x` is the horizontal center of the text run.
    Center,
}

/// A single absolute-positioned draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    /// An axis-aligned rectangle.
    Rect {
        /// Left edge, mm from the page's left.
        x: f32,
        /// Top edge, mm from the page's top.
        y: f32,
        /// Width in mm.
        width: f32,
        /// Height in mm.
        height: f32,
        /// Fill color; `None` leaves the interior unpainted.
        fill: Option<[u8; 3]>,
        /// Stroke width in mm; `None` draws no outline.
        stroke_width: Option<f32>,
    },
    /// A single run of text.
    Text {
        /// Anchor x in mm (meaning depends on `align`).
        x: f32,
        /// Baseline y, mm from the page's top.
        y: f32,
        /// The text to draw.
        text: String,
        /// Font size in points.
        font_pt: f32,
        /// Whether to use the bold face.
        bold: bool,
        /// Horizontal anchoring.
        align: TextAlign,
        /// Text color.
        color: [u8; 3],
    },
}

/// One output page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    /// Draw instructions in paint order.
    pub ops: Vec<DrawOp>,
}

/// Which layout region a legend block landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementRegion {
    /// The column to the right of the grid on page 1.
    Side,
    /// The content columns below the grid (and on later pages).
    Below,
}

/// Record of where one question's legend block was placed.
///
/// Emitted alongside the draw instructions so callers (and tests) can check
/// completeness and non-overlap without reverse-engineering the ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacement {
    /// Zero-based position of the question in the input list.
    pub question_index: usize,
    /// Zero-based page number.
    pub page: usize,
    /// Region the block landed in.
    pub region: PlacementRegion,
    /// Zero-based column within the region.
    pub column: usize,
    /// Top edge of the block, mm from the page's top.
    pub y: f32,
    /// Block height in mm at its placed column width.
    pub height: f32,
}

/// The full paginated plan for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPlan {
    /// Page width in mm.
    pub page_width: f32,
    /// Page height in mm.
    pub page_height: f32,
    /// The pages, in order.
    pub pages: Vec<PagePlan>,
    /// One placement record per input question.
    pub placements: Vec<BlockPlacement>,
}

impl DocumentPlan {
    /// Total number of draw instructions across all pages.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.pages.iter().map(|p| p.ops.len()).sum()
    }
}
