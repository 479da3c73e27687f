//! The editable primitive embedded in a field.
//!
//! Hosts usually wrap their own platform control in [`FormattableInput`];
//! [`PlainInput`] is the in-crate implementation used headless and in tests.
//! It keeps caret and selection on grapheme boundaries but does not apply
//! format masks.

use std::collections::BTreeMap;
use std::ops::Range;
use std::rc::Rc;

use materia_core::{StyledText, TextAttributes};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextComponentMode {
    /// Single line, fixed height.
    #[default]
    TextField,
    /// Multi line, grows up to the scrolling limit.
    TextView,
}

/// Which of several candidate formats counts as current.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatSelectionStrategy {
    /// First format with enough slots for the text; the last one otherwise.
    #[default]
    FirstThatFits,
    /// Always the first format.
    Fixed,
}

/// Characters a format placeholder symbol accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CharacterClass {
    Digits,
    Letters,
    Alphanumerics,
    OneOf(String),
}

impl CharacterClass {
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            CharacterClass::Digits => ch.is_ascii_digit(),
            CharacterClass::Letters => ch.is_alphabetic(),
            CharacterClass::Alphanumerics => ch.is_alphanumeric(),
            CharacterClass::OneOf(set) => set.contains(ch),
        }
    }
}

pub type FormatSymbols = BTreeMap<char, CharacterClass>;

/// `d` digits, `w` letters, `*` letters or digits.
pub fn default_format_symbols() -> FormatSymbols {
    BTreeMap::from([
        ('d', CharacterClass::Digits),
        ('w', CharacterClass::Letters),
        ('*', CharacterClass::Alphanumerics),
    ])
}

/// Contract of the editable primitive a field embeds.
pub trait FormattableInput {
    fn mode(&self) -> TextComponentMode;

    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
    fn styled_text(&self) -> &StyledText;
    fn set_styled_text(&mut self, text: StyledText);
    fn typing_attributes(&self) -> &TextAttributes;
    fn set_typing_attributes(&mut self, attributes: TextAttributes);

    fn formats(&self) -> &[String];
    fn set_formats(&mut self, formats: Vec<String>);
    fn format_selection_strategy(&self) -> FormatSelectionStrategy;
    fn set_format_selection_strategy(&mut self, strategy: FormatSelectionStrategy);
    fn current_format(&self) -> Option<&str>;
    fn format_symbols(&self) -> &FormatSymbols;
    fn set_format_symbols(&mut self, symbols: FormatSymbols);
    /// Text as displayed, format literals included.
    fn formatted_text(&self) -> String;

    fn is_first_responder(&self) -> bool;
    fn become_first_responder(&mut self) -> bool;
    fn resign_first_responder(&mut self) -> bool;

    /// Byte offset of the caret.
    fn caret(&self) -> usize;
    fn caret_at_end(&self) -> bool {
        self.caret() >= self.text().len()
    }
    fn scroll_offset(&self) -> f32;
    /// Scroll so the bottom line of `content_height` is inside `viewport_height`.
    fn scroll_to_end(&mut self, content_height: f32, viewport_height: f32);
}

/// Builds the primitive for a component mode. Called again on every mode swap.
pub type InputFactory = Rc<dyn Fn(TextComponentMode) -> Box<dyn FormattableInput>>;

pub fn plain_input_factory() -> InputFactory {
    Rc::new(|mode| Box::new(PlainInput::new(mode)) as Box<dyn FormattableInput>)
}

#[derive(Clone, Debug)]
pub struct PlainInput {
    mode: TextComponentMode,
    styled: StyledText,
    typing: TextAttributes,
    pub selection: Range<usize>,
    formats: Vec<String>,
    strategy: FormatSelectionStrategy,
    symbols: FormatSymbols,
    focused: bool,
    scroll_offset: f32,
}

impl PlainInput {
    pub fn new(mode: TextComponentMode) -> Self {
        Self {
            mode,
            styled: StyledText::default(),
            typing: TextAttributes::default(),
            selection: 0..0,
            formats: Vec::new(),
            strategy: FormatSelectionStrategy::default(),
            symbols: default_format_symbols(),
            focused: false,
            scroll_offset: 0.0,
        }
    }

    fn replace(&mut self, range: Range<usize>, replacement: &str) {
        let mut text = self.styled.as_str().to_owned();
        let start = clamp_to_char_boundary(&text, range.start);
        let end = clamp_to_char_boundary(&text, range.end).max(start);
        text.replace_range(start..end, replacement);
        let caret = start + replacement.len();
        self.styled = StyledText::new(text, self.typing.clone());
        self.selection = caret..caret;
    }

    pub fn insert_text(&mut self, text: &str) {
        self.replace(self.selection.clone(), text);
    }

    pub fn delete_backward(&mut self) {
        if self.selection.is_empty() {
            let pos = self.selection.start.min(self.text().len());
            if pos > 0 {
                let prev = prev_grapheme_boundary(self.text(), pos);
                self.replace(prev..pos, "");
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text().len());
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                pos = prev_grapheme_boundary(self.text(), pos);
            }
        } else {
            for _ in 0..delta as usize {
                pos = next_grapheme_boundary(self.text(), pos);
            }
        }
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
    }

    /// Number of slots in `format`: characters that are format symbols.
    fn slots(&self, format: &str) -> usize {
        format.chars().filter(|c| self.symbols.contains_key(c)).count()
    }
}

impl FormattableInput for PlainInput {
    fn mode(&self) -> TextComponentMode {
        self.mode
    }

    fn text(&self) -> &str {
        self.styled.as_str()
    }

    fn set_text(&mut self, text: &str) {
        if text == self.text() {
            return;
        }
        self.styled = StyledText::new(text, self.typing.clone());
        let end = self.styled.len();
        self.selection = end..end;
    }

    fn styled_text(&self) -> &StyledText {
        &self.styled
    }

    fn set_styled_text(&mut self, text: StyledText) {
        let keep_caret = text.as_str() == self.text();
        self.styled = text;
        if !keep_caret {
            let end = self.styled.len();
            self.selection = end..end;
        }
    }

    fn typing_attributes(&self) -> &TextAttributes {
        &self.typing
    }

    fn set_typing_attributes(&mut self, attributes: TextAttributes) {
        self.typing = attributes;
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn set_formats(&mut self, formats: Vec<String>) {
        self.formats = formats;
    }

    fn format_selection_strategy(&self) -> FormatSelectionStrategy {
        self.strategy
    }

    fn set_format_selection_strategy(&mut self, strategy: FormatSelectionStrategy) {
        self.strategy = strategy;
    }

    fn current_format(&self) -> Option<&str> {
        match self.strategy {
            FormatSelectionStrategy::Fixed => self.formats.first().map(String::as_str),
            FormatSelectionStrategy::FirstThatFits => {
                let needed = self.text().chars().count();
                self.formats
                    .iter()
                    .find(|f| self.slots(f) >= needed)
                    .or(self.formats.last())
                    .map(String::as_str)
            }
        }
    }

    fn format_symbols(&self) -> &FormatSymbols {
        &self.symbols
    }

    fn set_format_symbols(&mut self, symbols: FormatSymbols) {
        self.symbols = symbols;
    }

    fn formatted_text(&self) -> String {
        self.text().to_owned()
    }

    fn is_first_responder(&self) -> bool {
        self.focused
    }

    fn become_first_responder(&mut self) -> bool {
        self.focused = true;
        true
    }

    fn resign_first_responder(&mut self) -> bool {
        self.focused = false;
        true
    }

    fn caret(&self) -> usize {
        self.selection.end
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn scroll_to_end(&mut self, content_height: f32, viewport_height: f32) {
        self.scroll_offset = (content_height - viewport_height).max(0.0);
    }
}

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .find(|&i| i > byte)
        .unwrap_or(text.len())
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    let mut j = i.min(s.len());
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_selection() {
        let mut input = PlainInput::new(TextComponentMode::TextField);
        input.insert_text("Hello World");
        input.selection = 0..5;
        input.insert_text("Hi");
        assert_eq!(input.text(), "Hi World");
        assert_eq!(input.selection, 2..2);
    }

    #[test]
    fn grapheme_delete_and_move() {
        let mut input = PlainInput::new(TextComponentMode::TextView);
        input.insert_text("A👍🏽B");
        input.move_cursor(-1, false);
        assert_eq!(input.caret(), "A👍🏽".len());
        input.delete_backward();
        assert_eq!(input.text(), "AB");
        assert_eq!(input.caret(), 1);
        assert!(!input.caret_at_end());
    }

    #[test]
    fn edits_use_typing_attributes() {
        let mut input = PlainInput::new(TextComponentMode::TextField);
        let attrs = TextAttributes::new().kern(1.5);
        input.set_typing_attributes(attrs.clone());
        input.insert_text("abc");
        assert_eq!(input.styled_text().attributes_at(1), Some(&attrs));
    }

    #[test]
    fn current_format_follows_strategy() {
        let mut input = PlainInput::new(TextComponentMode::TextField);
        assert_eq!(input.current_format(), None);
        input.set_formats(vec!["ddd".into(), "ddddd ₽".into()]);
        input.set_text("12");
        assert_eq!(input.current_format(), Some("ddd"));
        input.set_text("1234");
        assert_eq!(input.current_format(), Some("ddddd ₽"));
        input.set_text("1234567");
        assert_eq!(input.current_format(), Some("ddddd ₽"));
        input.set_format_selection_strategy(FormatSelectionStrategy::Fixed);
        assert_eq!(input.current_format(), Some("ddd"));
    }

    #[test]
    fn default_symbols() {
        let symbols = default_format_symbols();
        assert!(symbols[&'d'].accepts('7'));
        assert!(!symbols[&'d'].accepts('x'));
        assert!(symbols[&'w'].accepts('x'));
        assert!(symbols[&'*'].accepts('7'));
        assert!(CharacterClass::OneOf("+-".into()).accepts('+'));
    }

    #[test]
    fn scroll_to_end_never_negative() {
        let mut input = PlainInput::new(TextComponentMode::TextView);
        input.scroll_to_end(10.0, 40.0);
        assert_eq!(input.scroll_offset(), 0.0);
        input.scroll_to_end(100.0, 40.0);
        assert_eq!(input.scroll_offset(), 60.0);
    }
}
