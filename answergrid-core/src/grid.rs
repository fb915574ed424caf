//! Grid snapshots and the brush paint engine.
//!
//! A [`GridSnapshot`] is an immutable value holding the full cell contents
//! of an activity grid at one instant. All paint operations are pure: they
//! return a fresh snapshot and never mutate in place, so they compose
//! directly with the history store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::PaintColor;
use crate::error::{CoreError, CoreResult};

/// Grid dimensions offered by the editor.
pub const SUPPORTED_GRID_SIZES: [usize; 3] = [10, 15, 20];

/// Square brush sizes offered by the editor.
pub const BRUSH_SIZES: [usize; 3] = [1, 2, 3];

/// The active painting tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BrushTool {
    /// Write an answer token into painted cells.
    Paint {
        /// The token written into each painted cell.
        answer: String,
        /// The display color shown while painting.
        color: PaintColor,
    },
    /// Blank out painted cells.
    Eraser,
}

/// An immutable snapshot of the grid's cell contents.
///
/// Cells are stored row-major. An empty string is an unpainted cell and is
/// distinct from an absent cell: the vector always holds exactly
/// `size * size` entries, and storage backends must round-trip it as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    size: usize,
    cells: Vec<String>,
}

impl GridSnapshot {
    /// Create an all-blank snapshot of the given dimension.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![String::new(); size * size],
        }
    }

    /// Rebuild a snapshot from stored parts, validating the shape.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::GridShape`] if `cells.len() != size * size`.
    pub fn from_parts(size: usize, cells: Vec<String>) -> CoreResult<Self> {
        let expected = size * size;
        if cells.len() != expected {
            return Err(CoreError::GridShape {
                size,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Grid dimension (cells per side).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// The value of one cell, if the index is in range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Row-major index of `(row, col)`.
    #[must_use]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Whether any cell holds a token.
    #[must_use]
    pub fn has_paint(&self) -> bool {
        self.cells.iter().any(|c| !c.is_empty())
    }

    /// Apply a square brush stamp anchored at `start_index`.
    ///
    /// The stamp covers `brush_size x brush_size` cells extending right and
    /// down from the anchor and is clipped at the grid edges; cells outside
    /// the grid are never touched. Painting with a blank answer token is a
    /// no-op per cell, so an unconfigured tool cannot write values that are
    /// indistinguishable from erased cells.
    #[must_use]
    pub fn paint(&self, start_index: usize, brush_size: usize, tool: &BrushTool) -> Self {
        let mut cells = self.cells.clone();
        let start_row = start_index / self.size;
        let start_col = start_index % self.size;
        for dr in 0..brush_size {
            for dc in 0..brush_size {
                let row = start_row + dr;
                let col = start_col + dc;
                if row >= self.size || col >= self.size {
                    continue;
                }
                let target = row * self.size + col;
                match tool {
                    BrushTool::Eraser => cells[target].clear(),
                    BrushTool::Paint { answer, .. } => {
                        if !answer.trim().is_empty() {
                            cells[target].clone_from(answer);
                        }
                    }
                }
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Blank every cell whose token is in `answers`.
    ///
    /// Used whenever a token is removed from the question list so stale
    /// paintings don't linger with a dangling reference.
    #[must_use]
    pub fn erase_answers(&self, answers: &HashSet<String>) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                if answers.contains(cell) {
                    String::new()
                } else {
                    cell.clone()
                }
            })
            .collect();
        Self {
            size: self.size,
            cells,
        }
    }

    /// Rewrite every cell equal to `old` with `new`.
    ///
    /// A blank `old` is a no-op: blank cells must never be bulk-rewritten
    /// when a question gains its first answer token.
    #[must_use]
    pub fn replace_answer(&self, old: &str, new: &str) -> Self {
        if old.trim().is_empty() {
            return self.clone();
        }
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                if cell == old {
                    new.to_string()
                } else {
                    cell.clone()
                }
            })
            .collect();
        Self {
            size: self.size,
            cells,
        }
    }

    /// An all-blank snapshot of the same dimension.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::empty(self.size)
    }
}
