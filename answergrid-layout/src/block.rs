//! Legend blocks: the layout unit derived from one question.

use answergrid_core::{Question, QuestionKind};
use serde::{Deserialize, Serialize};

use crate::text::wrap_text;
use crate::LayoutConfig;

/// Letters shown before multiple-choice options, by position.
const OPTION_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// One renderable line inside a legend block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "line", rename_all = "lowercase")]
pub enum LegendLine {
    /// A bold heading line (the multiple-choice question text).
    Heading {
        /// Heading text.
        text: String,
    },
    /// A swatched entry line.
    Entry {
        /// Swatch color; `None` renders the text without a swatch.
        swatch: Option<[u8; 3]>,
        /// Entry text.
        text: String,
    },
}

/// The legend layout unit for one question.
///
/// Blocks carry unwrapped text; heights depend on the width of whichever
/// column is asking, so wrapping happens at fit/placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendBlock {
    /// Zero-based position of the question in the input list.
    pub question_index: usize,
    /// The lines of this block, in render order.
    pub lines: Vec<LegendLine>,
}

impl LegendBlock {
    /// Height of this block in mm when wrapped at `width`.
    #[must_use]
    pub fn height(&self, width: f32, config: &LayoutConfig) -> f32 {
        self.lines
            .iter()
            .map(|line| match line {
                LegendLine::Heading { text } => {
                    line_count(text, width, config.heading_font_pt)
                        * config.heading_line_height
                }
                LegendLine::Entry { text, .. } => {
                    line_count(text, width - config.entry_indent(), config.legend_font_pt)
                        * config.line_height
                }
            })
            .sum()
    }
}

#[allow(clippy::cast_precision_loss)]
fn line_count(text: &str, width: f32, font_pt: f32) -> f32 {
    wrap_text(text, width, font_pt).len() as f32
}

/// Derive one legend block per question, in list order.
///
/// A single-answer question becomes one colored entry
/// (`"(n) text = answer"`). A multiple-choice question becomes a heading
/// (`"Qn. text"`) plus one lettered entry per option; options without a
/// decodable color are skipped, since a student cannot paint with them.
#[must_use]
pub fn build_blocks(questions: &[Question]) -> Vec<LegendBlock> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let number = index + 1;
            let lines = match &question.kind {
                QuestionKind::Single { option, color } => {
                    let text = format!("({number}) {} = {}", question.text, option.answer);
                    vec![LegendLine::Entry {
                        swatch: color.as_ref().and_then(answergrid_core::PaintColor::rgb),
                        text,
                    }]
                }
                QuestionKind::Multiple {
                    options,
                    option_colors,
                    ..
                } => {
                    let mut lines = vec![LegendLine::Heading {
                        text: format!("Q{number}. {}", question.text),
                    }];
                    for (position, option) in options.iter().enumerate() {
                        let Some(swatch) =
                            option_colors.get(&option.id).and_then(|c| c.rgb())
                        else {
                            continue;
                        };
                        let letter =
                            char::from(OPTION_LETTERS[position % OPTION_LETTERS.len()]);
                        lines.push(LegendLine::Entry {
                            swatch: Some(swatch),
                            text: format!("{letter}) {}", option.text),
                        });
                    }
                    lines
                }
            };
            LegendBlock {
                question_index: index,
                lines,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use answergrid_core::{standard_palette, AnswerOption, OptionId, PaintColor};
    use std::collections::HashMap;

    fn red() -> PaintColor {
        PaintColor::new("Red", "#FF0000")
    }

    fn multiple(text: &str, option_texts: &[&str]) -> Question {
        let palette = standard_palette();
        let options: Vec<AnswerOption> = option_texts
            .iter()
            .enumerate()
            .map(|(i, t)| AnswerOption::new(*t, format!("m-{i}")))
            .collect();
        let option_colors: HashMap<OptionId, PaintColor> = options
            .iter()
            .zip(palette.iter().skip(1))
            .map(|(o, c)| (o.id, c.clone()))
            .collect();
        let correct = options[0].id;
        Question::multiple(text, options, option_colors, correct)
    }

    #[test]
    fn test_single_block_one_entry() {
        let questions = vec![Question::single("6 x 7?", "42", Some(red()))];
        let blocks = build_blocks(&questions);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 1);
        let LegendLine::Entry { swatch, text } = &blocks[0].lines[0] else {
            panic!("expected entry");
        };
        assert_eq!(*swatch, Some([255, 0, 0]));
        assert_eq!(text, "(1) 6 x 7? = 42");
    }

    #[test]
    fn test_multiple_block_heading_plus_options() {
        let questions = vec![multiple("Which planet is red?", &["Mars", "Venus", "Pluto"])];
        let blocks = build_blocks(&questions);

        assert_eq!(blocks[0].lines.len(), 4);
        let LegendLine::Heading { text } = &blocks[0].lines[0] else {
            panic!("expected heading");
        };
        assert_eq!(text, "Q1. Which planet is red?");
        let LegendLine::Entry { text, .. } = &blocks[0].lines[1] else {
            panic!("expected entry");
        };
        assert_eq!(text, "a) Mars");
    }

    #[test]
    fn test_colorless_option_skipped() {
        let mut question = multiple("q", &["one", "two"]);
        if let QuestionKind::Multiple {
            options,
            option_colors,
            ..
        } = &mut question.kind
        {
            option_colors.remove(&options[1].id);
        }
        let blocks = build_blocks(&[question]);
        // Heading plus only the colored option.
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_colorless_single_keeps_text() {
        let questions = vec![Question::single("pending", "7", None)];
        let blocks = build_blocks(&questions);
        let LegendLine::Entry { swatch, text } = &blocks[0].lines[0] else {
            panic!("expected entry");
        };
        assert_eq!(*swatch, None);
        assert!(text.contains("pending"));
    }

    #[test]
    fn test_height_grows_with_narrow_columns() {
        let config = LayoutConfig::default();
        let long_text = "a rather long question that will definitely wrap when squeezed";
        let questions = vec![Question::single(long_text, "1", Some(red()))];
        let blocks = build_blocks(&questions);

        let wide = blocks[0].height(160.0, &config);
        let narrow = blocks[0].height(30.0, &config);
        assert!(narrow > wide);
        // One unwrapped entry is exactly one line.
        assert!((wide - config.line_height).abs() < f32::EPSILON);
    }
}
