//! Styled ("attributed") text: a plain string plus contiguous attribute runs.
//!
//! Ranges are byte ranges into the string. Every mutation keeps the runs
//! sorted, non-empty and covering the whole string, so two `StyledText`
//! values compare equal exactly when they render the same.

use std::ops::Range;

use bitflags::bitflags;

use crate::Color;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontTraits: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const MONOSPACE = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub traits: FontTraits,
}

impl Font {
    pub const SYSTEM_FAMILY: &'static str = ".SystemUI";
    pub const BODY_SIZE: f32 = 16.0;
    pub const CAPTION_SIZE: f32 = 12.0;

    pub fn system(size: f32) -> Self {
        Self::named(Self::SYSTEM_FAMILY, size)
    }

    pub fn named(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            traits: FontTraits::empty(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.traits |= FontTraits::BOLD;
        self
    }

    /// Family name usable for font lookup. Private system names carry a
    /// leading dot that font databases don't know about.
    pub fn resolved_family(&self) -> &str {
        self.family.strip_prefix('.').unwrap_or(&self.family)
    }

    pub fn is_system(&self) -> bool {
        self.family == Self::SYSTEM_FAMILY
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(Self::BODY_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub min_line_height: f32,
    pub line_spacing: f32,
}

impl ParagraphStyle {
    pub fn line_height(&self) -> f32 {
        self.min_line_height + self.line_spacing
    }
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            min_line_height: 16.0,
            line_spacing: 4.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextAttributes {
    pub font: Option<Font>,
    pub color: Option<Color>,
    pub kern: Option<f32>,
    pub paragraph: Option<ParagraphStyle>,
    pub underline: bool,
}

impl TextAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn kern(mut self, kern: f32) -> Self {
        self.kern = Some(kern);
        self
    }

    pub fn paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = Some(paragraph);
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Overlays every attribute `other` sets on top of `self`.
    pub fn merge(&mut self, other: &TextAttributes) {
        if let Some(font) = &other.font {
            self.font = Some(font.clone());
        }
        if let Some(color) = other.color {
            self.color = Some(color);
        }
        if let Some(kern) = other.kern {
            self.kern = Some(kern);
        }
        if let Some(paragraph) = other.paragraph {
            self.paragraph = Some(paragraph);
        }
        self.underline |= other.underline;
    }

    pub fn merged(mut self, other: &TextAttributes) -> Self {
        self.merge(other);
        self
    }

    pub fn font_or(&self, fallback_size: f32) -> Font {
        match &self.font {
            Some(font) => font.clone(),
            None => {
                log::debug!("attributes carry no font, falling back to system {fallback_size}");
                Font::system(fallback_size)
            }
        }
    }

    pub fn paragraph_or_default(&self) -> ParagraphStyle {
        self.paragraph.unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub range: Range<usize>,
    pub attributes: TextAttributes,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    text: String,
    runs: Vec<TextRun>,
}

impl StyledText {
    pub fn new(text: impl Into<String>, attributes: TextAttributes) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun {
                range: 0..text.len(),
                attributes,
            }]
        };
        Self { text, runs }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextAttributes::default())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Attributes in effect at byte `index`; `None` for empty text or an
    /// out-of-range index.
    pub fn attributes_at(&self, index: usize) -> Option<&TextAttributes> {
        self.runs
            .iter()
            .find(|r| r.range.contains(&index))
            .map(|r| &r.attributes)
    }

    /// Font of the first run, if any.
    pub fn primary_font(&self) -> Option<&Font> {
        self.runs.first().and_then(|r| r.attributes.font.as_ref())
    }

    /// Byte range of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        self.text.find(needle).map(|start| start..start + needle.len())
    }

    pub fn add_attributes(&mut self, range: Range<usize>, attributes: &TextAttributes) {
        let start = floor_char_boundary(&self.text, range.start.min(self.text.len()));
        let end = floor_char_boundary(&self.text, range.end.min(self.text.len()));
        if start >= end {
            return;
        }
        self.split_at(start);
        self.split_at(end);
        for run in &mut self.runs {
            if run.range.start >= start && run.range.end <= end {
                run.attributes.merge(attributes);
            }
        }
        self.coalesce();
    }

    pub fn set_color(&mut self, range: Range<usize>, color: Color) {
        self.add_attributes(range, &TextAttributes::new().color(color));
    }

    /// Gives every run without a font the `font` passed in.
    pub fn with_default_font(mut self, font: &Font) -> Self {
        for run in &mut self.runs {
            if run.attributes.font.is_none() {
                run.attributes.font = Some(font.clone());
            }
        }
        self
    }

    fn split_at(&mut self, pos: usize) {
        let Some(i) = self
            .runs
            .iter()
            .position(|r| r.range.start < pos && pos < r.range.end)
        else {
            return;
        };
        let run = &mut self.runs[i];
        let tail = TextRun {
            range: pos..run.range.end,
            attributes: run.attributes.clone(),
        };
        run.range.end = pos;
        self.runs.insert(i + 1, tail);
    }

    fn coalesce(&mut self) {
        let mut out: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match out.last_mut() {
                Some(prev) if prev.attributes == run.attributes => {
                    prev.range.end = run.range.end;
                }
                _ => out.push(run),
            }
        }
        self.runs = out;
    }
}

impl From<&str> for StyledText {
    fn from(s: &str) -> Self {
        StyledText::plain(s)
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_attributes_splits_and_restores_runs() {
        let base = TextAttributes::new().color(Color::BLACK);
        let mut t = StyledText::new("Click here for more", base.clone());
        let range = t.find("here").unwrap();
        assert_eq!(range, 6..10);

        t.set_color(range.clone(), Color::LINK);
        assert_eq!(t.runs().len(), 3);
        assert_eq!(t.attributes_at(7).unwrap().color, Some(Color::LINK));
        assert_eq!(t.attributes_at(0).unwrap().color, Some(Color::BLACK));

        t.set_color(range, Color::BLACK);
        assert_eq!(t, StyledText::new("Click here for more", base));
    }

    #[test]
    fn empty_text_has_no_attributes() {
        let t = StyledText::new("", TextAttributes::new().color(Color::WHITE));
        assert!(t.attributes_at(0).is_none());
        assert!(t.runs().is_empty());
    }

    #[test]
    fn default_font_only_fills_gaps() {
        let mut t = StyledText::plain("ab");
        t.add_attributes(0..1, &TextAttributes::new().font(Font::system(20.0)));
        let t = t.with_default_font(&Font::system(16.0));
        assert_eq!(t.attributes_at(0).unwrap().font.as_ref().unwrap().size, 20.0);
        assert_eq!(t.attributes_at(1).unwrap().font.as_ref().unwrap().size, 16.0);
    }

    #[test]
    fn system_family_drops_private_prefix() {
        assert_eq!(Font::system(12.0).resolved_family(), "SystemUI");
        assert_eq!(Font::named("Inter", 12.0).resolved_family(), "Inter");
    }
}
