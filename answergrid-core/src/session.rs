//! Editor session: the single mutable editing state for one activity.
//!
//! A session owns the grid history, the question list and the active tool,
//! and keeps them consistent: renaming or removing an answer token rewrites
//! or erases the matching painted cells, and a tool pointing at a vanished
//! token is dropped. All methods are synchronous and driven by UI events;
//! a session must only ever be touched from one logical thread of control.

use std::collections::HashSet;

use crate::binding::{resolve_bindings, AnswerBindings};
use crate::color::{next_available, standard_palette, PaintColor};
use crate::error::{CoreError, CoreResult};
use crate::grid::{BrushTool, GridSnapshot, BRUSH_SIZES, SUPPORTED_GRID_SIZES};
use crate::history::History;
use crate::question::{Question, QuestionId, QuestionKind, QuestionType};

/// Title given to a freshly created activity.
pub const UNTITLED_ACTIVITY: &str = "Untitled Activity";

/// Grid dimension of a freshly created activity.
pub const DEFAULT_GRID_SIZE: usize = 15;

/// The editing state for one open activity.
#[derive(Debug, Clone)]
pub struct EditorSession {
    title: String,
    history: History<GridSnapshot>,
    /// The grid as currently displayed, including any uncommitted stroke.
    live_grid: GridSnapshot,
    /// Snapshot taken at stroke start; `Some` while a stroke is in flight.
    stroke_origin: Option<GridSnapshot>,
    questions: Vec<Question>,
    active_tool: Option<BrushTool>,
    brush_size: usize,
}

impl EditorSession {
    /// Create a session with the default grid size and one blank question.
    #[must_use]
    pub fn new() -> Self {
        let palette = standard_palette();
        let grid = GridSnapshot::empty(DEFAULT_GRID_SIZE);
        Self {
            title: UNTITLED_ACTIVITY.to_string(),
            live_grid: grid.clone(),
            history: History::new(grid),
            stroke_origin: None,
            questions: vec![Question::single("", "", palette.first().cloned())],
            active_tool: None,
            brush_size: BRUSH_SIZES[0],
        }
    }

    /// Create a session with a specific grid size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedGridSize`] for sizes outside
    /// [`SUPPORTED_GRID_SIZES`].
    pub fn with_grid_size(size: usize) -> CoreResult<Self> {
        if !SUPPORTED_GRID_SIZES.contains(&size) {
            return Err(CoreError::UnsupportedGridSize(size));
        }
        let mut session = Self::new();
        let grid = GridSnapshot::empty(size);
        session.live_grid = grid.clone();
        session.history = History::new(grid);
        Ok(session)
    }

    /// Activity title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the activity title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The grid as currently displayed, including any in-flight stroke.
    #[must_use]
    pub fn grid(&self) -> &GridSnapshot {
        &self.live_grid
    }

    /// The last committed grid (the value persistence should read).
    #[must_use]
    pub fn committed_grid(&self) -> &GridSnapshot {
        self.history.current()
    }

    /// Grid dimension.
    #[must_use]
    pub fn grid_size(&self) -> usize {
        self.live_grid.size()
    }

    /// The question list, in display order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Current bindings derived from the question list.
    #[must_use]
    pub fn bindings(&self) -> AnswerBindings {
        resolve_bindings(&self.questions)
    }

    /// Tokens currently claimed by more than one option.
    #[must_use]
    pub fn duplicate_answers(&self) -> HashSet<String> {
        self.bindings().duplicates().clone()
    }

    /// The active painting tool, if any.
    #[must_use]
    pub fn active_tool(&self) -> Option<&BrushTool> {
        self.active_tool.as_ref()
    }

    /// Select or clear the painting tool.
    pub fn set_active_tool(&mut self, tool: Option<BrushTool>) {
        self.active_tool = tool;
    }

    /// Switch to the eraser.
    pub fn select_eraser(&mut self) {
        self.active_tool = Some(BrushTool::Eraser);
    }

    /// Current brush size.
    #[must_use]
    pub fn brush_size(&self) -> usize {
        self.brush_size
    }

    /// Set the brush size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedBrushSize`] for sizes outside
    /// [`BRUSH_SIZES`].
    pub fn set_brush_size(&mut self, size: usize) -> CoreResult<()> {
        if !BRUSH_SIZES.contains(&size) {
            return Err(CoreError::UnsupportedBrushSize(size));
        }
        self.brush_size = size;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Stroke lifecycle
    // -----------------------------------------------------------------------

    /// Begin a painting stroke (pointer down).
    ///
    /// Captures the pre-stroke snapshot so the terminating
    /// [`end_stroke`](Self::end_stroke) can commit the whole gesture as one
    /// undo step. Calling again mid-stroke is a no-op.
    pub fn begin_stroke(&mut self) {
        if self.stroke_origin.is_none() {
            self.stroke_origin = Some(self.live_grid.clone());
        }
    }

    /// Whether a stroke is in flight.
    #[must_use]
    pub fn stroke_active(&self) -> bool {
        self.stroke_origin.is_some()
    }

    /// Apply the brush at a cell index (pointer move during a stroke).
    ///
    /// Updates only the live grid; nothing reaches the history until
    /// [`end_stroke`](Self::end_stroke). A no-op without an active stroke
    /// or a selected tool.
    pub fn paint_at(&mut self, index: usize) {
        if self.stroke_origin.is_none() {
            return;
        }
        let Some(tool) = &self.active_tool else {
            return;
        };
        self.live_grid = self.live_grid.paint(index, self.brush_size, tool);
    }

    /// End the stroke (pointer up) and commit it as one undo step.
    ///
    /// Returns whether a history entry was recorded; a stroke that changed
    /// nothing leaves the history untouched.
    pub fn end_stroke(&mut self) -> bool {
        let Some(origin) = self.stroke_origin.take() else {
            return false;
        };
        if self.live_grid == origin {
            return false;
        }
        tracing::debug!(size = self.live_grid.size(), "stroke committed");
        self.history.commit(self.live_grid.clone())
    }

    /// Abandon the in-flight stroke, restoring the pre-stroke grid.
    pub fn cancel_stroke(&mut self) {
        if let Some(origin) = self.stroke_origin.take() {
            self.live_grid = origin;
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step the grid back one committed state. Cancels any in-flight stroke.
    pub fn undo(&mut self) -> bool {
        self.cancel_stroke();
        let moved = self.history.undo();
        if moved {
            self.live_grid = self.history.current().clone();
        }
        moved
    }

    /// Step the grid forward one committed state. Cancels any in-flight
    /// stroke.
    pub fn redo(&mut self) -> bool {
        self.cancel_stroke();
        let moved = self.history.redo();
        if moved {
            self.live_grid = self.history.current().clone();
        }
        moved
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Whole-grid operations
    // -----------------------------------------------------------------------

    /// Blank the whole grid as a single undoable step.
    ///
    /// The core performs this unconditionally; confirmation prompts belong
    /// to the UI layer.
    pub fn clear_grid(&mut self) -> bool {
        self.cancel_stroke();
        let cleared = self.live_grid.cleared();
        self.commit_grid(cleared)
    }

    /// Switch to a new grid dimension, discarding all painted content.
    ///
    /// Destructive: the old grid's paint data is not migrated — a fresh
    /// all-blank snapshot replaces the history outright, so undo cannot
    /// reach back across the resize.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedGridSize`] for sizes outside
    /// [`SUPPORTED_GRID_SIZES`].
    pub fn resize_grid(&mut self, new_size: usize) -> CoreResult<()> {
        if !SUPPORTED_GRID_SIZES.contains(&new_size) {
            return Err(CoreError::UnsupportedGridSize(new_size));
        }
        self.stroke_origin = None;
        tracing::debug!(
            from = self.live_grid.size(),
            to = new_size,
            "grid resized, paint discarded"
        );
        self.history.overwrite(GridSnapshot::empty(new_size));
        self.live_grid = self.history.current().clone();
        Ok(())
    }

    /// Replace the whole session content with a loaded activity.
    ///
    /// The history is overwritten so undo cannot cross into the previously
    /// open activity's shape.
    pub fn load_activity(
        &mut self,
        title: impl Into<String>,
        grid: GridSnapshot,
        questions: Vec<Question>,
    ) {
        self.title = title.into();
        self.questions = questions;
        self.active_tool = None;
        self.stroke_origin = None;
        self.history.overwrite(grid);
        self.live_grid = self.history.current().clone();
        tracing::debug!(
            size = self.live_grid.size(),
            questions = self.questions.len(),
            "activity loaded"
        );
    }

    /// Erase the given tokens from the grid as one undoable step, dropping
    /// a tool that references any of them.
    pub fn erase_answers(&mut self, answers: &[String]) -> bool {
        if answers.is_empty() {
            return false;
        }
        self.cancel_stroke();
        self.reset_tool_if_referencing(answers);
        let set: HashSet<String> = answers.iter().cloned().collect();
        let erased = self.live_grid.erase_answers(&set);
        self.commit_grid(erased)
    }

    // -----------------------------------------------------------------------
    // Question operations
    // -----------------------------------------------------------------------

    /// Append a blank single-answer question colored by the next free
    /// palette entry. Returns its ID.
    pub fn add_question(&mut self) -> QuestionId {
        let palette = standard_palette();
        let used = self.used_color_values();
        let color = next_available(&palette, &used).or_else(|| palette.first().cloned());
        let question = Question::single("", "", color);
        let id = question.id;
        self.questions.push(question);
        id
    }

    /// Replace a question with an edited version, keeping the grid and the
    /// active tool in sync.
    ///
    /// Two edits rewrite painted cells: a single question's answer token
    /// changing, and a multiple question's correct option moving (its grid
    /// cells carry the correct option's token). In both cases a tool
    /// holding the old token is re-pointed at the new one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::QuestionNotFound`] if no question has the given
    /// ID.
    pub fn update_question(&mut self, updated: Question) -> CoreResult<()> {
        let position = self
            .questions
            .iter()
            .position(|q| q.id == updated.id)
            .ok_or_else(|| CoreError::QuestionNotFound(updated.id.to_string()))?;
        let old = self.questions[position].clone();

        match (&old.kind, &updated.kind) {
            (
                QuestionKind::Multiple {
                    options: old_options,
                    correct_option: old_correct,
                    ..
                },
                QuestionKind::Multiple {
                    options: new_options,
                    option_colors: new_colors,
                    correct_option: new_correct,
                },
            ) if old_correct != new_correct => {
                let old_answer = old_options
                    .iter()
                    .find(|o| o.id == *old_correct)
                    .map(|o| o.answer.clone());
                let new_option = new_options.iter().find(|o| o.id == *new_correct);
                if let (Some(old_answer), Some(new_option)) = (old_answer, new_option) {
                    if !old_answer.trim().is_empty() {
                        self.rewrite_token(&old_answer, &new_option.answer);
                        self.repoint_tool(
                            &old_answer,
                            &new_option.answer,
                            new_colors.get(new_correct).cloned(),
                        );
                    }
                }
            }
            (
                QuestionKind::Single {
                    option: old_option, ..
                },
                QuestionKind::Single {
                    option: new_option,
                    color,
                },
            ) if old_option.answer != new_option.answer => {
                if !old_option.answer.trim().is_empty() {
                    self.rewrite_token(&old_option.answer, &new_option.answer);
                    self.repoint_tool(&old_option.answer, &new_option.answer, color.clone());
                }
            }
            _ => {}
        }

        self.questions[position] = updated;
        Ok(())
    }

    /// Remove a question, erasing its painted tokens from the grid.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::QuestionNotFound`] if no question has the given
    /// ID.
    pub fn remove_question(&mut self, id: QuestionId) -> CoreResult<Question> {
        let position = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| CoreError::QuestionNotFound(id.to_string()))?;
        let removed = self.questions.remove(position);
        self.erase_answers(&removed.answer_tokens());
        tracing::debug!(question = %id, "question removed");
        Ok(removed)
    }

    /// Switch a question between single-answer and multiple-choice.
    ///
    /// Tokens that exist only in the old shape are erased from the grid so
    /// no cell keeps a dangling reference. A no-op when the question
    /// already has the requested shape.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::QuestionNotFound`] if no question has the given
    /// ID.
    pub fn set_question_type(
        &mut self,
        id: QuestionId,
        question_type: QuestionType,
    ) -> CoreResult<()> {
        let position = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| CoreError::QuestionNotFound(id.to_string()))?;
        if self.questions[position].question_type() == question_type {
            return Ok(());
        }

        let palette = standard_palette();
        let used = self.used_color_values();
        let old = self.questions[position].clone();
        let converted = match question_type {
            QuestionType::Single => old.converted_to_single(&palette, &used),
            QuestionType::Multiple => old.converted_to_multiple(&palette, &used),
        };

        let kept: HashSet<String> = converted.answer_tokens().into_iter().collect();
        let vanished: Vec<String> = old
            .answer_tokens()
            .into_iter()
            .filter(|t| !kept.contains(t))
            .collect();

        self.questions[position] = converted;
        self.erase_answers(&vanished);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Commit a grid value and refresh the live view from the history.
    fn commit_grid(&mut self, grid: GridSnapshot) -> bool {
        let recorded = self.history.commit(grid);
        self.live_grid = self.history.current().clone();
        recorded
    }

    /// Rewrite a token across the grid as one undoable step.
    fn rewrite_token(&mut self, old: &str, new: &str) {
        self.cancel_stroke();
        self.history.commit_with(|grid| grid.replace_answer(old, new));
        self.live_grid = self.history.current().clone();
    }

    /// Re-point a tool holding `old` at `new` with the given color.
    fn repoint_tool(&mut self, old: &str, new: &str, color: Option<PaintColor>) {
        let holds_old = matches!(
            &self.active_tool,
            Some(BrushTool::Paint { answer, .. }) if answer == old
        );
        if holds_old {
            let palette = standard_palette();
            let color = color
                .or_else(|| palette.first().cloned())
                .unwrap_or_else(|| PaintColor::new("Black", "#000000"));
            self.active_tool = Some(BrushTool::Paint {
                answer: new.to_string(),
                color,
            });
        }
    }

    /// Drop the tool if it paints any of the given tokens.
    fn reset_tool_if_referencing(&mut self, answers: &[String]) {
        let referenced = matches!(
            &self.active_tool,
            Some(BrushTool::Paint { answer, .. }) if answers.iter().any(|a| a == answer)
        );
        if referenced {
            self.active_tool = None;
        }
    }

    /// Hex values of every color currently assigned to a question.
    fn used_color_values(&self) -> HashSet<String> {
        let mut used = HashSet::new();
        for question in &self.questions {
            match &question.kind {
                QuestionKind::Single { color, .. } => {
                    if let Some(color) = color {
                        used.insert(color.value.clone());
                    }
                }
                QuestionKind::Multiple { option_colors, .. } => {
                    for color in option_colors.values() {
                        used.insert(color.value.clone());
                    }
                }
            }
        }
        used
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
