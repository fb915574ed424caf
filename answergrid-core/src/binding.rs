//! Answer token bindings: display colors, grid references, duplicates.
//!
//! Bindings are derived from the question list in a single pass and carry no
//! cached state; callers recompute them whenever the list changes.

use std::collections::{HashMap, HashSet};

use crate::color::PaintColor;
use crate::question::{Question, QuestionKind};

/// Token-keyed maps derived from the question list.
///
/// A single-answer token maps to its question's color and displays as the
/// literal token. Every token of a multiple-choice question maps to its own
/// option color but displays as the question's ordinal reference (`Q{n}`):
/// in the grid all of a question's tokens must render identically, and only
/// the legend tells the options apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBindings {
    color_of: HashMap<String, PaintColor>,
    ref_of: HashMap<String, String>,
    duplicates: HashSet<String>,
}

impl AnswerBindings {
    /// Display color bound to a token.
    #[must_use]
    pub fn color_of(&self, token: &str) -> Option<&PaintColor> {
        self.color_of.get(token)
    }

    /// Display reference bound to a token.
    #[must_use]
    pub fn ref_of(&self, token: &str) -> Option<&str> {
        self.ref_of.get(token).map(String::as_str)
    }

    /// The cell label for a token: its reference, or the literal token when
    /// unbound.
    #[must_use]
    pub fn label_for<'a>(&'a self, token: &'a str) -> &'a str {
        self.ref_of(token).unwrap_or(token)
    }

    /// Whether a token is claimed by more than one option.
    #[must_use]
    pub fn is_duplicate(&self, token: &str) -> bool {
        self.duplicates.contains(token)
    }

    /// Every token claimed by more than one option.
    ///
    /// Informational only: duplicates are surfaced as an editor warning and
    /// never block painting or export.
    #[must_use]
    pub fn duplicates(&self) -> &HashSet<String> {
        &self.duplicates
    }

    /// Number of bound tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.color_of.len()
    }

    /// Whether no tokens are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color_of.is_empty()
    }
}

/// Derive bindings from the question list in one pass.
///
/// Questions or options without a usable color are skipped from the maps
/// (a missing color is never an error), but their tokens still count
/// towards duplicate detection.
#[must_use]
pub fn resolve_bindings(questions: &[Question]) -> AnswerBindings {
    let mut bindings = AnswerBindings::default();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (index, question) in questions.iter().enumerate() {
        let reference = format!("Q{}", index + 1);
        for option in question.options() {
            if !option.answer.trim().is_empty() {
                *counts.entry(option.answer.clone()).or_insert(0) += 1;
            }
        }
        match &question.kind {
            QuestionKind::Single { option, color } => {
                if option.answer.trim().is_empty() {
                    continue;
                }
                if let Some(color) = color {
                    bindings
                        .color_of
                        .insert(option.answer.clone(), color.clone());
                    bindings
                        .ref_of
                        .insert(option.answer.clone(), option.answer.clone());
                }
            }
            QuestionKind::Multiple {
                options,
                option_colors,
                ..
            } => {
                for option in options {
                    if option.answer.trim().is_empty() {
                        continue;
                    }
                    if let Some(color) = option_colors.get(&option.id) {
                        bindings
                            .color_of
                            .insert(option.answer.clone(), color.clone());
                        bindings
                            .ref_of
                            .insert(option.answer.clone(), reference.clone());
                    }
                }
            }
        }
    }

    bindings.duplicates = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(token, _)| token)
        .collect();

    bindings
}
