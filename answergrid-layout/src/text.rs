//! Text measurement and wrapping for legend lines.
//!
//! Widths are estimated from display columns at a fixed average glyph
//! aspect, which is what the fit-or-defer pagination needs: a stable,
//! font-file-independent measure that errs on the generous side.

use unicode_width::UnicodeWidthStr;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

/// Average glyph width as a fraction of the font size.
const GLYPH_ASPECT: f32 = 0.5;

/// Estimated rendered width of `text` at `font_pt`, in millimetres.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_width(text: &str, font_pt: f32) -> f32 {
    UnicodeWidthStr::width(text) as f32 * font_pt * PT_TO_MM * GLYPH_ASPECT
}

/// Greedily wrap `text` into lines no wider than `max_width` millimetres.
///
/// Words longer than a full line are hard-split so no line ever exceeds the
/// budget. Always returns at least one (possibly empty) line, because a
/// legend line occupies vertical space even while its text is still blank.
#[must_use]
pub fn wrap_text(text: &str, max_width: f32, font_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            place_word(word, max_width, font_pt, &mut lines, &mut current);
        } else {
            let candidate = format!("{current} {word}");
            if text_width(&candidate, font_pt) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                place_word(word, max_width, font_pt, &mut lines, &mut current);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Start a fresh line with `word`, hard-splitting it when it alone exceeds
/// the budget.
fn place_word(
    word: &str,
    max_width: f32,
    font_pt: f32,
    lines: &mut Vec<String>,
    current: &mut String,
) {
    if text_width(word, font_pt) <= max_width {
        current.push_str(word);
        return;
    }
    let mut chunk = String::new();
    for ch in word.chars() {
        let mut candidate = chunk.clone();
        candidate.push(ch);
        if !chunk.is_empty() && text_width(&candidate, font_pt) > max_width {
            lines.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        } else {
            chunk = candidate;
        }
    }
    *current = chunk;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_font() {
        let narrow = text_width("hello", 8.0);
        let wide = text_width("hello", 16.0);
        assert!(wide > narrow * 1.9 && wide < narrow * 2.1);
    }

    #[test]
    fn test_wrap_empty_is_one_blank_line() {
        assert_eq!(wrap_text("", 50.0, 10.0), vec![String::new()]);
        assert_eq!(wrap_text("   ", 50.0, 10.0), vec![String::new()]);
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let lines = wrap_text("one two", 100.0, 10.0);
        assert_eq!(lines, vec!["one two".to_string()]);
    }

    #[test]
    fn test_wrap_splits_on_words() {
        let text = "alpha beta gamma delta epsilon zeta";
        let max = text_width("alpha beta", 10.0) + 0.1;
        let lines = wrap_text(text, max, 10.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= max, "line too wide: {line}");
        }
        // No word lost or duplicated.
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_hard_splits_long_words() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 20.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 20.0);
        }
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let lines = wrap_text("a   b\t c", 100.0, 10.0);
        assert_eq!(lines, vec!["a b c".to_string()]);
    }
}
