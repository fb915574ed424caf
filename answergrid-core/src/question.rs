//! Question model: single-answer and multiple-choice questions.
//!
//! The single/multiple duality is a tagged union so every consumer is forced
//! to handle both shapes exhaustively, instead of one struct with optional
//! fields that only sometimes apply.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::{next_available, PaintColor};

/// Letters assigned to generated multiple-choice options.
const OPTION_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Unique identifier for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Create a new unique question ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Short display form, used to derive generated answer tokens.
    #[must_use]
    pub fn short(&self) -> String {
        let mut hex = self.0.simple().to_string();
        hex.truncate(8);
        hex
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionId(Uuid);

impl OptionId {
    /// Create a new unique option ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for OptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Unique identifier.
    pub id: OptionId,
    /// The option text shown in the legend.
    pub text: String,
    /// The literal token painted into grid cells.
    pub answer: String,
}

impl AnswerOption {
    /// Create an option with a fresh ID.
    #[must_use]
    pub fn new(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(),
            text: text.into(),
            answer: answer.into(),
        }
    }
}

/// Whether a question takes one free-form answer or several lettered options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// One free-form answer.
    Single,
    /// Lettered options, one correct.
    Multiple,
}

/// The single/multiple payload of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// One free-form answer painted literally into the grid.
    Single {
        /// The single answer option.
        option: AnswerOption,
        /// Display color. `None` when the stored color was missing or
        /// malformed; the binding layer then skips the question.
        color: Option<PaintColor>,
    },
    /// A set of lettered options, one of which is correct.
    Multiple {
        /// The selectable options, in display order.
        options: Vec<AnswerOption>,
        /// Per-option display colors; options without an entry are skipped
        /// in binding and rendering.
        option_colors: HashMap<OptionId, PaintColor>,
        /// The correct option.
        correct_option: OptionId,
    },
}

/// A question bound to painted answer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: QuestionId,
    /// The question text shown in the legend.
    pub text: String,
    /// Single or multiple-choice payload.
    pub kind: QuestionKind,
}

impl Question {
    /// Create a single-answer question.
    #[must_use]
    pub fn single(
        text: impl Into<String>,
        answer: impl Into<String>,
        color: Option<PaintColor>,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            text: text.into(),
            kind: QuestionKind::Single {
                option: AnswerOption::new("", answer),
                color,
            },
        }
    }

    /// Create a multiple-choice question.
    #[must_use]
    pub fn multiple(
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        option_colors: HashMap<OptionId, PaintColor>,
        correct_option: OptionId,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            text: text.into(),
            kind: QuestionKind::Multiple {
                options,
                option_colors,
                correct_option,
            },
        }
    }

    /// Which shape this question takes.
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::Single { .. } => QuestionType::Single,
            QuestionKind::Multiple { .. } => QuestionType::Multiple,
        }
    }

    /// All options, in display order (a single question has exactly one).
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        match &self.kind {
            QuestionKind::Single { option, .. } => std::slice::from_ref(option),
            QuestionKind::Multiple { options, .. } => options,
        }
    }

    /// The answer token of the correct option.
    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        match &self.kind {
            QuestionKind::Single { option, .. } => Some(option.answer.as_str()),
            QuestionKind::Multiple {
                options,
                correct_option,
                ..
            } => options
                .iter()
                .find(|o| o.id == *correct_option)
                .map(|o| o.answer.as_str()),
        }
    }

    /// All non-blank answer tokens owned by this question.
    #[must_use]
    pub fn answer_tokens(&self) -> Vec<String> {
        self.options()
            .iter()
            .filter(|o| !o.answer.trim().is_empty())
            .map(|o| o.answer.clone())
            .collect()
    }

    /// Rebuild this question as single-answer.
    ///
    /// Keeps the first option and its color where one exists; otherwise the
    /// color is drawn from the first palette entry not in `used_colors`.
    #[must_use]
    pub fn converted_to_single(
        &self,
        palette: &[PaintColor],
        used_colors: &HashSet<String>,
    ) -> Self {
        let option = self
            .options()
            .first()
            .cloned()
            .unwrap_or_else(|| AnswerOption::new("", ""));
        let color = match &self.kind {
            QuestionKind::Single { color, .. } => color.clone(),
            QuestionKind::Multiple { option_colors, .. } => {
                option_colors.get(&option.id).cloned()
            }
        }
        .or_else(|| next_available(palette, used_colors))
        .or_else(|| palette.first().cloned());

        Self {
            id: self.id,
            text: self.text.clone(),
            kind: QuestionKind::Single { option, color },
        }
    }

    /// Rebuild this question as multiple-choice with four lettered options.
    ///
    /// Option texts carry over by position; answer tokens are generated as
    /// `{short-question-id}-{letter}` so they stay unique across questions.
    /// Each option is assigned the next palette color not yet in use,
    /// cycling through the palette once it is exhausted. The first option
    /// becomes the correct one.
    #[must_use]
    pub fn converted_to_multiple(
        &self,
        palette: &[PaintColor],
        used_colors: &HashSet<String>,
    ) -> Self {
        let short = self.id.short();
        let existing = self.options();
        let options: Vec<AnswerOption> = OPTION_LETTERS
            .iter()
            .enumerate()
            .map(|(i, letter)| {
                let text = existing.get(i).map(|o| o.text.clone()).unwrap_or_default();
                AnswerOption::new(text, format!("{short}-{letter}"))
            })
            .collect();

        let mut option_colors = HashMap::new();
        let mut locally_used = used_colors.clone();
        for (i, option) in options.iter().enumerate() {
            let color = next_available(palette, &locally_used)
                .unwrap_or_else(|| palette[i % palette.len()].clone());
            locally_used.insert(color.value.clone());
            option_colors.insert(option.id, color);
        }

        let correct_option = options[0].id;
        Self {
            id: self.id,
            text: self.text.clone(),
            kind: QuestionKind::Multiple {
                options,
                option_colors,
                correct_option,
            },
        }
    }
}
