//! Pagination: the grid square, the side column, and below-grid column flow.

use answergrid_core::{resolve_bindings, AnswerBindings, GridSnapshot, Question};

use crate::block::{build_blocks, LegendBlock, LegendLine};
use crate::plan::{BlockPlacement, DocumentPlan, DrawOp, PagePlan, PlacementRegion, TextAlign};
use crate::text::{wrap_text, PT_TO_MM};
use crate::LayoutConfig;

/// Fraction of a line's height sitting above the text baseline.
const ASCENT_RATIO: f32 = 0.75;

/// Default ink color.
const BLACK: [u8; 3] = [0, 0, 0];

/// Produces a [`DocumentPlan`] from a grid snapshot and question list.
///
/// Questions are placed in strict list order with no bin-packing, so the
/// `Q{n}` references printed in grid cells always match the legend. Layout
/// never fails: content that does not fit keeps opening new pages. The one
/// accepted edge case: a single block taller than a full column is placed
/// at the cursor without being split, and may overrun the page bottom.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given page geometry.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create an engine with the default A4 geometry.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// The page geometry in use.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out one activity into a paginated plan.
    #[must_use]
    pub fn plan(&self, title: &str, grid: &GridSnapshot, questions: &[Question]) -> DocumentPlan {
        let cfg = &self.config;
        let bindings = resolve_bindings(questions);
        let blocks = build_blocks(questions);

        let mut pages = vec![PagePlan::default()];
        let mut placements = Vec::with_capacity(blocks.len());

        let grid_top = cfg.margin + cfg.title_gap;
        let grid_bottom = grid_top + cfg.grid_extent;

        self.emit_title(&mut pages[0].ops, title);
        self.emit_grid(&mut pages[0].ops, grid, &bindings, grid_top);

        // Side column: from the grid's top edge down to its bottom edge.
        let side_x = cfg.margin + cfg.grid_extent + cfg.side_gap;
        let side_width = cfg.page_width - cfg.margin - side_x;
        let mut cursor = grid_top;

        pages[0].ops.push(DrawOp::Text {
            x: side_x,
            y: cursor + cfg.heading_line_height * ASCENT_RATIO,
            text: "Legend".to_string(),
            font_pt: cfg.heading_font_pt,
            bold: true,
            align: TextAlign::Left,
            color: BLACK,
        });
        cursor += cfg.heading_line_height + cfg.block_gap;

        // Walk in order until a block no longer fits; everything from that
        // point on flows below the grid, keeping strict list order.
        let mut deferred_from = blocks.len();
        for (position, block) in blocks.iter().enumerate() {
            let height = block.height(side_width, cfg);
            if cursor + height > grid_bottom {
                deferred_from = position;
                tracing::debug!(
                    placed = position,
                    deferred = blocks.len() - position,
                    "side column exhausted"
                );
                break;
            }
            self.emit_block(&mut pages[0].ops, block, side_x, cursor, side_width);
            placements.push(BlockPlacement {
                question_index: block.question_index,
                page: 0,
                region: PlacementRegion::Side,
                column: 0,
                y: cursor,
                height,
            });
            cursor += height + cfg.block_gap;
        }

        if deferred_from < blocks.len() {
            self.flow_below(
                &blocks[deferred_from..],
                grid_bottom,
                &mut pages,
                &mut placements,
            );
        }

        DocumentPlan {
            page_width: cfg.page_width,
            page_height: cfg.page_height,
            pages,
            placements,
        }
    }

    /// Flow deferred blocks through the content columns below the grid,
    /// opening new pages as needed.
    #[allow(clippy::cast_precision_loss)]
    fn flow_below(
        &self,
        blocks: &[LegendBlock],
        grid_bottom: f32,
        pages: &mut Vec<PagePlan>,
        placements: &mut Vec<BlockPlacement>,
    ) {
        let cfg = &self.config;
        let columns = cfg.below_columns.max(1);
        let content_width = cfg.page_width - 2.0 * cfg.margin;
        let column_width =
            (content_width - cfg.column_gap * (columns as f32 - 1.0)) / columns as f32;
        let bottom = cfg.page_height - cfg.margin;

        let mut page = 0usize;
        let mut column = 0usize;
        // Page 1 columns start under the grid; later pages use the full
        // height from the top margin.
        let mut top = grid_bottom + cfg.below_gap;
        let mut y = top;

        for block in blocks {
            let height = block.height(column_width, cfg);
            loop {
                let fits = y + height <= bottom;
                let at_column_top = (y - top).abs() < f32::EPSILON;
                let full_height_column = page > 0;
                if fits || (at_column_top && full_height_column) {
                    if !fits {
                        tracing::debug!(
                            question = block.question_index,
                            height,
                            "block taller than a full column, placed unsplit"
                        );
                    }
                    let x = cfg.margin + column as f32 * (column_width + cfg.column_gap);
                    self.emit_block(&mut pages[page].ops, block, x, y, column_width);
                    placements.push(BlockPlacement {
                        question_index: block.question_index,
                        page,
                        region: PlacementRegion::Below,
                        column,
                        y,
                        height,
                    });
                    y += height + cfg.block_gap;
                    break;
                }
                if column + 1 < columns {
                    column += 1;
                } else {
                    column = 0;
                    page += 1;
                    top = cfg.margin;
                    if page == pages.len() {
                        pages.push(PagePlan::default());
                    }
                }
                y = top;
            }
        }
    }

    /// Centered bold title at the top of page 1.
    fn emit_title(&self, ops: &mut Vec<DrawOp>, title: &str) {
        let cfg = &self.config;
        ops.push(DrawOp::Text {
            x: cfg.page_width * 0.5,
            y: cfg.margin + cfg.title_font_pt * PT_TO_MM * ASCENT_RATIO,
            text: title.to_string(),
            font_pt: cfg.title_font_pt,
            bold: true,
            align: TextAlign::Center,
            color: BLACK,
        });
    }

    /// The fixed-size grid square with reference-labeled cells.
    ///
    /// Cell size is `grid_extent / size`, independent of the grid
    /// dimension. Non-blank cells are labeled with their binding reference,
    /// falling back to the literal token when unbound; labels longer than
    /// two characters drop to the smaller font.
    #[allow(clippy::cast_precision_loss)]
    fn emit_grid(
        &self,
        ops: &mut Vec<DrawOp>,
        grid: &GridSnapshot,
        bindings: &AnswerBindings,
        grid_top: f32,
    ) {
        let cfg = &self.config;
        let size = grid.size();
        let cell = cfg.grid_extent / size as f32;

        for row in 0..size {
            for col in 0..size {
                let x = cfg.margin + col as f32 * cell;
                let y = grid_top + row as f32 * cell;
                ops.push(DrawOp::Rect {
                    x,
                    y,
                    width: cell,
                    height: cell,
                    fill: None,
                    stroke_width: Some(cfg.grid_stroke),
                });

                let Some(token) = grid.cell(grid.index_of(row, col)) else {
                    continue;
                };
                if token.is_empty() {
                    continue;
                }
                let label = bindings.label_for(token);
                let font_pt = if label.chars().count() > 2 {
                    cfg.cell_font_small_pt
                } else {
                    cfg.cell_font_pt
                };
                ops.push(DrawOp::Text {
                    x: x + cell * 0.5,
                    y: y + cell * 0.5 + font_pt * PT_TO_MM * 0.35,
                    text: label.to_string(),
                    font_pt,
                    bold: false,
                    align: TextAlign::Center,
                    color: BLACK,
                });
            }
        }
    }

    /// Emit one legend block at an absolute position.
    fn emit_block(
        &self,
        ops: &mut Vec<DrawOp>,
        block: &LegendBlock,
        x: f32,
        y: f32,
        width: f32,
    ) {
        let cfg = &self.config;
        let mut cursor = y;
        for line in &block.lines {
            match line {
                LegendLine::Heading { text } => {
                    for wrapped in wrap_text(text, width, cfg.heading_font_pt) {
                        ops.push(DrawOp::Text {
                            x,
                            y: cursor + cfg.heading_line_height * ASCENT_RATIO,
                            text: wrapped,
                            font_pt: cfg.heading_font_pt,
                            bold: true,
                            align: TextAlign::Left,
                            color: BLACK,
                        });
                        cursor += cfg.heading_line_height;
                    }
                }
                LegendLine::Entry { swatch, text } => {
                    if let Some(rgb) = swatch {
                        ops.push(DrawOp::Rect {
                            x,
                            y: cursor + (cfg.line_height - cfg.swatch_size) * 0.5,
                            width: cfg.swatch_size,
                            height: cfg.swatch_size,
                            fill: Some(*rgb),
                            stroke_width: Some(0.1),
                        });
                    }
                    let text_x = x + cfg.entry_indent();
                    let wrap_width = width - cfg.entry_indent();
                    for wrapped in wrap_text(text, wrap_width, cfg.legend_font_pt) {
                        ops.push(DrawOp::Text {
                            x: text_x,
                            y: cursor + cfg.line_height * ASCENT_RATIO,
                            text: wrapped,
                            font_pt: cfg.legend_font_pt,
                            bold: false,
                            align: TextAlign::Left,
                            color: BLACK,
                        });
                        cursor += cfg.line_height;
                    }
                }
            }
        }
    }
}
