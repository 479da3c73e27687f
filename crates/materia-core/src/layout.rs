use crate::{Size, StyledText, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineBreakMode {
    #[default]
    WordWrap,
    CharWrap,
    Clip,
}

/// The box text is laid out into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextContainer {
    pub size: Size,
    pub line_break: LineBreakMode,
    /// `0` means unlimited.
    pub max_lines: usize,
}

impl TextContainer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            line_break: LineBreakMode::WordWrap,
            max_lines: 0,
        }
    }

    pub fn max_lines(mut self, n: usize) -> Self {
        self.max_lines = n;
        self
    }

    pub fn line_break(mut self, mode: LineBreakMode) -> Self {
        self.line_break = mode;
        self
    }
}

/// Host text layout capability.
///
/// Widgets never do glyph math themselves; they ask the platform.
pub trait TextLayout {
    /// Bounding size of `text` wrapped at `max_width`.
    fn measure(&self, text: &StyledText, max_width: f32) -> Size;

    /// Byte index of the character under `point` (container-local
    /// coordinates). Points past the end of a line resolve to the nearest
    /// character on that line. `None` only for empty text.
    fn character_index(
        &self,
        text: &StyledText,
        container: &TextContainer,
        point: Vec2,
    ) -> Option<usize>;
}
