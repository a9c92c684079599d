//! Text Measurement
//!
//! Utilities for measuring text blocks in CSS pixels.
//!
//! The headless document has no font engine, so text is measured on a
//! fixed grid: every display column is [`GLYPH_WIDTH`] pixels wide and every
//! line is [`LINE_HEIGHT`] pixels tall. Column widths come from
//! `unicode-width` (CJK and most emoji take two columns).

use unicode_width::UnicodeWidthStr;

/// Width of one display column, in pixels.
pub const GLYPH_WIDTH: f32 = 8.0;

/// Height of one line of text, in pixels.
pub const LINE_HEIGHT: f32 = 20.0;

/// Display width of a string in columns.
pub fn string_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Width of the longest line, in pixels.
pub fn measure_text_width(text: &str) -> f32 {
    text.lines().map(string_width).max().unwrap_or(0) as f32 * GLYPH_WIDTH
}

/// Number of lines `text` occupies when greedily word-wrapped to
/// `max_columns`. Words wider than a line are broken across lines.
pub fn wrapped_line_count(text: &str, max_columns: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    let max_columns = max_columns.max(1);

    text.split('\n')
        .map(|paragraph| {
            let mut lines = 1;
            let mut current = 0;
            for word in paragraph.split_whitespace() {
                let width = string_width(word);
                let needed = if current == 0 { width } else { current + 1 + width };

                if needed <= max_columns {
                    current = needed;
                    continue;
                }
                if current > 0 {
                    lines += 1;
                }
                // Long word: hard-break it, remainder stays on the last line
                lines += width.saturating_sub(1) / max_columns;
                current = match width % max_columns {
                    0 => max_columns,
                    rest => rest,
                };
            }
            lines
        })
        .sum()
}

/// Height of `text` wrapped to `available_width` pixels.
pub fn measure_text_height(text: &str, available_width: f32) -> f32 {
    let columns = (available_width / GLYPH_WIDTH).floor().max(1.0) as usize;
    wrapped_line_count(text, columns) as f32 * LINE_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_unicode() {
        assert_eq!(string_width("abc"), 3);
        assert_eq!(string_width("日本"), 4);
    }

    #[test]
    fn test_wrapped_line_count() {
        assert_eq!(wrapped_line_count("", 10), 0);
        assert_eq!(wrapped_line_count("hello", 10), 1);
        assert_eq!(wrapped_line_count("hello world", 11), 1);
        assert_eq!(wrapped_line_count("hello world", 10), 2);
        assert_eq!(wrapped_line_count("a\nb\nc", 10), 3);
    }

    #[test]
    fn test_long_word_breaks() {
        // 25 columns into 10-column lines: 10 + 10 + 5
        assert_eq!(wrapped_line_count(&"x".repeat(25), 10), 3);
        assert_eq!(wrapped_line_count(&"x".repeat(20), 10), 2);
        assert_eq!(wrapped_line_count(&format!("ab {}", "x".repeat(20)), 10), 3);
    }

    #[test]
    fn test_measure_text_height_tracks_width() {
        let text = "one two three four five six";
        let wide = measure_text_height(text, 1000.0);
        let narrow = measure_text_height(text, 80.0);
        assert_eq!(wide, LINE_HEIGHT);
        assert!(narrow > wide);
    }
}
