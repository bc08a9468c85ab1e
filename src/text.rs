// Fixed-width text layout for the prompt lines.
// Visual: a centered title and a centered, word-wrapped paragraph above the viewfinder.

/// Glyph cell of the bitmap font, unscaled.
pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;
/// Glyph width plus one pixel of spacing.
pub const GLYPH_ADVANCE: i32 = 6;

/// Size of the bitmap font at a given integer scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextMetrics {
    pub scale: i32,
}

impl TextMetrics {
    pub fn new(scale: i32) -> Self {
        Self { scale: scale.max(1) }
    }

    /// Scale that makes the 7 px glyph about `text_size × density` px tall.
    pub fn for_size(text_size: f32, density: f32) -> Self {
        Self::new((text_size * density / GLYPH_HEIGHT as f32).round() as i32)
    }

    pub fn advance(&self) -> i32 {
        GLYPH_ADVANCE * self.scale
    }

    pub fn line_height(&self) -> i32 {
        GLYPH_HEIGHT * self.scale
    }

    pub fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance()
    }

    /// Characters that fit on a line `width` px wide (at least one).
    pub fn chars_per_line(&self, width: i32) -> usize {
        (width / self.advance()).max(1) as usize
    }
}

/// One line of text ready to draw, top-left anchored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Greedy word wrap. Explicit newlines start a new line; words longer than a
/// whole line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-split words that could never fit.
            while word.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }
        lines.push(line);
    }
    lines
}

/// Left x that centers `text` on `center_x`.
pub fn centered_x(text: &str, center_x: i32, metrics: TextMetrics) -> i32 {
    center_x - metrics.text_width(text) / 2
}

/// Lay out a wrapped paragraph inside a `width`-wide column starting at
/// (`left`, `top`), each line centered, lines `line_spacing` line-heights apart.
pub fn layout_block(
    text: &str,
    left: i32,
    top: i32,
    width: i32,
    metrics: TextMetrics,
    line_spacing: f32,
) -> Vec<PlacedLine> {
    let step = (metrics.line_height() as f32 * line_spacing).round() as i32;
    let center = left + width / 2;
    wrap(text, metrics.chars_per_line(width))
        .into_iter()
        .enumerate()
        .map(|(i, line)| PlacedLine {
            x: centered_x(&line, center, metrics),
            y: top + i as i32 * step,
            text: line,
        })
        .collect()
}
