use materia_core::{Font, LineBreakMode, Size, StyledText, TextContainer, TextLayout, Vec2};
use unicode_segmentation::UnicodeSegmentation;

/// Deterministic fixed-advance layout: every character is
/// `font_size * advance_ratio` wide, lines are `font_size * line_height_ratio`
/// tall unless a paragraph style says otherwise.
///
/// Good enough for headless hosts and for tests that need stable geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxTextLayout {
    pub advance_ratio: f32,
    pub line_height_ratio: f32,
}

impl Default for ApproxTextLayout {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Glyph {
    pub start: usize,
    pub x: f32,
    pub advance: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Line {
    pub start: usize,
    pub glyphs: Vec<Glyph>,
    pub width: f32,
}

impl ApproxTextLayout {
    fn advance_of(&self, text: &StyledText, byte: usize) -> f32 {
        let size = text
            .attributes_at(byte)
            .and_then(|a| a.font.as_ref())
            .map(|f| f.size)
            .unwrap_or(Font::BODY_SIZE);
        let kern = text.attributes_at(byte).and_then(|a| a.kern).unwrap_or(0.0);
        size * self.advance_ratio + kern
    }

    pub fn line_height(&self, text: &StyledText) -> f32 {
        let attrs = text.attributes_at(0);
        if let Some(p) = attrs.and_then(|a| a.paragraph) {
            return p.line_height();
        }
        let size = attrs
            .and_then(|a| a.font.as_ref())
            .map(|f| f.size)
            .unwrap_or(Font::BODY_SIZE);
        size * self.line_height_ratio
    }

    pub(crate) fn lines(&self, text: &StyledText, max_width: f32, mode: LineBreakMode) -> Vec<Line> {
        let wrap = max_width.is_finite() && max_width > 0.0 && mode != LineBreakMode::Clip;
        let s = text.as_str();
        let mut done: Vec<Line> = Vec::new();
        let mut line = Line::default();

        for (seg_start, segment) in s.split_word_bound_indices() {
            if segment == "\n" || segment == "\r\n" {
                let next = Line {
                    start: seg_start + segment.len(),
                    ..Line::default()
                };
                done.push(std::mem::replace(&mut line, next));
                continue;
            }
            let seg_width: f32 = segment
                .char_indices()
                .map(|(i, _)| self.advance_of(text, seg_start + i))
                .sum();
            let is_space = segment.chars().all(char::is_whitespace);

            let breaks_by_word = mode == LineBreakMode::WordWrap
                && wrap
                && !is_space
                && !line.glyphs.is_empty()
                && line.width + seg_width > max_width;
            if breaks_by_word {
                let next = Line {
                    start: seg_start,
                    ..Line::default()
                };
                done.push(std::mem::replace(&mut line, next));
            }

            for (i, _) in segment.char_indices() {
                let at = seg_start + i;
                let advance = self.advance_of(text, at);
                let overflow = wrap
                    && !is_space
                    && !line.glyphs.is_empty()
                    && line.width + advance > max_width;
                // A single word longer than the container falls back to
                // character wrapping in word mode too.
                if overflow && (mode == LineBreakMode::CharWrap || seg_width > max_width) {
                    let next = Line {
                        start: at,
                        ..Line::default()
                    };
                    done.push(std::mem::replace(&mut line, next));
                }
                line.glyphs.push(Glyph {
                    start: at,
                    x: line.width,
                    advance,
                });
                line.width += advance;
            }
        }
        done.push(line);
        done
    }
}

impl TextLayout for ApproxTextLayout {
    fn measure(&self, text: &StyledText, max_width: f32) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines = self.lines(text, max_width, LineBreakMode::WordWrap);
        let width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        Size::new(width, lines.len() as f32 * self.line_height(text))
    }

    fn character_index(
        &self,
        text: &StyledText,
        container: &TextContainer,
        point: Vec2,
    ) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        let mut lines = self.lines(text, container.size.width, container.line_break);
        if container.max_lines > 0 {
            lines.truncate(container.max_lines);
        }
        let line_h = self.line_height(text);
        let row = if point.y <= 0.0 {
            0
        } else {
            ((point.y / line_h) as usize).min(lines.len() - 1)
        };
        let line = &lines[row];
        let Some(last) = line.glyphs.last() else {
            return Some(line.start.min(text.len().saturating_sub(1)));
        };
        let glyph = line
            .glyphs
            .iter()
            .find(|g| point.x < g.x + g.advance)
            .unwrap_or(last);
        Some(glyph.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use materia_core::TextAttributes;

    fn body(text: &str) -> StyledText {
        StyledText::new(text, TextAttributes::new().font(Font::system(10.0)))
    }

    #[test]
    fn single_line_measure() {
        let layout = ApproxTextLayout::default();
        let size = layout.measure(&body("hello"), f32::INFINITY);
        assert!((size.width - 30.0).abs() < 1e-4);
        assert!((size.height - 13.0).abs() < 1e-4);
    }

    #[test]
    fn word_wrap_breaks_between_words() {
        let layout = ApproxTextLayout::default();
        // each char is 6 wide; "hello world" is 66, wrap at 40
        let lines = layout.lines(&body("hello world"), 40.0, LineBreakMode::WordWrap);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 6);
        let size = layout.measure(&body("hello world"), 40.0);
        assert!((size.height - 26.0).abs() < 1e-4);
    }

    #[test]
    fn long_word_falls_back_to_char_wrap() {
        let layout = ApproxTextLayout::default();
        let lines = layout.lines(&body("abcdefghij"), 30.0, LineBreakMode::WordWrap);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 5);
    }

    #[test]
    fn hit_test_maps_points_to_bytes() {
        let layout = ApproxTextLayout::default();
        let text = body("Click here for more");
        let container = TextContainer::new(Size::new(500.0, 100.0));
        // 'h' of "here" starts at x = 36
        assert_eq!(
            layout.character_index(&text, &container, Vec2::new(37.0, 5.0)),
            Some(6)
        );
        assert_eq!(
            layout.character_index(&text, &container, Vec2::new(1.0, 5.0)),
            Some(0)
        );
        // past the end of the line resolves to the last character
        assert_eq!(
            layout.character_index(&text, &container, Vec2::new(400.0, 5.0)),
            Some(18)
        );
        assert_eq!(
            layout.character_index(&StyledText::plain(""), &container, Vec2::default()),
            None
        );
    }

    #[test]
    fn max_lines_clamps_rows() {
        let layout = ApproxTextLayout::default();
        let text = body("hello world");
        let container = TextContainer::new(Size::new(40.0, 100.0)).max_lines(1);
        assert_eq!(
            layout.character_index(&text, &container, Vec2::new(1.0, 20.0)),
            Some(0)
        );
    }
}
