use ahash::AHashMap;
use cosmic_text::{
    Attrs, Buffer, Color as CtColor, Family, FontSystem, Metrics, Shaping, Style, Weight, Wrap,
};
use materia_core::{
    Font, FontTraits, LineBreakMode, Size, StyledText, TextAttributes, TextContainer, TextLayout,
    Vec2,
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

const MEASURE_CACHE_LIMIT: usize = 512;

/// Everything about a run that changes its shaped size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct RunKey {
    start: usize,
    end: usize,
    family: String,
    traits: FontTraits,
    size_bits: u32,
    kern_bits: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    width_bits: u32,
    line_h_bits: u32,
    runs: Vec<RunKey>,
}

impl MeasureKey {
    fn new(text: &StyledText, max_width: f32) -> Self {
        let primary = text.primary_font().cloned().unwrap_or_default();
        let runs = text
            .runs()
            .iter()
            .map(|run| {
                let font = run.attributes.font.as_ref().unwrap_or(&primary);
                RunKey {
                    start: run.range.start,
                    end: run.range.end,
                    family: font.family.clone(),
                    traits: font.traits,
                    size_bits: font.size.to_bits(),
                    kern_bits: run.attributes.kern.map(f32::to_bits),
                }
            })
            .collect();
        Self {
            text: text.as_str().to_owned(),
            width_bits: max_width.to_bits(),
            line_h_bits: line_height_of(text, &primary).to_bits(),
            runs,
        }
    }
}

struct Engine {
    fs: FontSystem,
    measured: AHashMap<MeasureKey, Size>,
}

static ENGINE: OnceCell<Mutex<Engine>> = OnceCell::new();

fn engine() -> &'static Mutex<Engine> {
    ENGINE.get_or_init(|| {
        log::debug!("materia-text: loading system fonts");
        Mutex::new(Engine {
            fs: FontSystem::new(),
            measured: AHashMap::new(),
        })
    })
}

fn family_of(font: &Font) -> Family<'_> {
    if font.traits.contains(FontTraits::MONOSPACE) {
        Family::Monospace
    } else if font.is_system() {
        Family::SansSerif
    } else {
        Family::Name(font.resolved_family())
    }
}

fn attrs_of<'a>(attrs: &'a TextAttributes, fallback: &'a Font) -> Attrs<'a> {
    let font = attrs.font.as_ref().unwrap_or(fallback);
    let mut out = Attrs::new().family(family_of(font));
    if font.traits.contains(FontTraits::BOLD) {
        out = out.weight(Weight::BOLD);
    }
    if font.traits.contains(FontTraits::ITALIC) {
        out = out.style(Style::Italic);
    }
    if let Some(c) = attrs.color {
        out = out.color(CtColor::rgba(c.0, c.1, c.2, c.3));
    }
    out
}

fn line_height_of(text: &StyledText, font: &Font) -> f32 {
    text.attributes_at(0)
        .and_then(|a| a.paragraph)
        .map(|p| p.line_height())
        .unwrap_or(font.size * 1.3)
}

/// Byte offset at which every hard line of `text` starts, in the order
/// cosmic-text numbers its buffer lines.
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn shape(fs: &mut FontSystem, text: &StyledText, width: Option<f32>, wrap: Wrap) -> Buffer {
    let font = text.primary_font().cloned().unwrap_or_default();
    let metrics = Metrics::new(font.size, line_height_of(text, &font));
    let mut buf = Buffer::new(fs, metrics);
    {
        let mut b = buf.borrow_with(fs);
        b.set_wrap(wrap);
        b.set_size(width, None);
        let default = Attrs::new().family(family_of(&font));
        let empty = TextAttributes::default();
        let spans: Vec<(&str, Attrs<'_>)> = if text.runs().is_empty() {
            vec![(text.as_str(), attrs_of(&empty, &font))]
        } else {
            text.runs()
                .iter()
                .map(|run| (&text.as_str()[run.range.clone()], attrs_of(&run.attributes, &font)))
                .collect()
        };
        b.set_rich_text(spans, &default, Shaping::Advanced, None);
        b.shape_until_scroll(true);
    }
    buf
}

/// Text layout backed by cosmic-text and the system font database.
///
/// The font system is process wide and loaded on first use.
#[derive(Clone, Copy, Debug, Default)]
pub struct CosmicTextLayout;

impl CosmicTextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Forget every cached measurement.
    pub fn clear_cache(&self) {
        engine().lock().measured.clear();
    }
}

fn wrap_of(mode: LineBreakMode) -> Wrap {
    match mode {
        LineBreakMode::WordWrap => Wrap::WordOrGlyph,
        LineBreakMode::CharWrap => Wrap::Glyph,
        LineBreakMode::Clip => Wrap::None,
    }
}

impl TextLayout for CosmicTextLayout {
    fn measure(&self, text: &StyledText, max_width: f32) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let key = MeasureKey::new(text, max_width);

        let mut eng = engine().lock();
        if let Some(size) = eng.measured.get(&key) {
            return *size;
        }

        let width = max_width.is_finite().then_some(max_width);
        let buf = shape(&mut eng.fs, text, width, Wrap::WordOrGlyph);
        let mut w: f32 = 0.0;
        let mut h: f32 = 0.0;
        for run in buf.layout_runs() {
            w = w.max(run.line_w);
            h = h.max(run.line_top + run.line_height);
        }
        let size = Size::new(w, h);

        if eng.measured.len() >= MEASURE_CACHE_LIMIT {
            log::debug!("materia-text: measure cache full, clearing");
            eng.measured.clear();
        }
        eng.measured.insert(key, size);
        size
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
        let mut eng = engine().lock();
        let width = container.size.width.is_finite().then_some(container.size.width);
        let buf = shape(&mut eng.fs, text, width, wrap_of(container.line_break));
        let starts = line_starts(text.as_str());

        let mut runs: Vec<_> = buf.layout_runs().collect();
        if container.max_lines > 0 {
            runs.truncate(container.max_lines);
        }
        let run = runs
            .iter()
            .find(|r| point.y < r.line_top + r.line_height)
            .or(runs.last())?;

        let base = starts.get(run.line_i).copied().unwrap_or(0);
        let glyph = run
            .glyphs
            .iter()
            .find(|g| point.x < g.x + g.w)
            .or(run.glyphs.last())?;
        Some((base + glyph.start).min(text.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts_follow_hard_breaks() {
        assert_eq!(line_starts("ab\ncd\n"), vec![0, 3, 6]);
        assert_eq!(line_starts(""), vec![0]);
    }

    fn sample(font: Font) -> StyledText {
        StyledText::new("Wide WWWW text", TextAttributes::new().font(font))
    }

    #[test]
    fn measure_key_tells_fonts_apart() {
        let sans = Font::system(16.0);
        let mut mono = Font::system(16.0);
        mono.traits |= FontTraits::MONOSPACE;
        let bold = Font::system(16.0).bold();

        let base = MeasureKey::new(&sample(sans.clone()), 200.0);
        assert_eq!(base, MeasureKey::new(&sample(sans.clone()), 200.0));
        assert_ne!(base, MeasureKey::new(&sample(mono), 200.0));
        assert_ne!(base, MeasureKey::new(&sample(bold), 200.0));
        assert_ne!(base, MeasureKey::new(&sample(Font::named("Serif", 16.0)), 200.0));

        let kerned = StyledText::new(
            "Wide WWWW text",
            TextAttributes::new().font(sans).kern(1.5),
        );
        assert_ne!(base, MeasureKey::new(&kerned, 200.0));
    }

    #[test]
    fn cached_size_matches_fresh_measurement() {
        let layout = CosmicTextLayout::new();
        let mut mono = Font::system(16.0);
        mono.traits |= FontTraits::MONOSPACE;

        let mono_cached = {
            layout.measure(&sample(mono.clone()), f32::INFINITY);
            layout.measure(&sample(Font::system(16.0)), f32::INFINITY);
            layout.measure(&sample(mono.clone()), f32::INFINITY)
        };
        layout.clear_cache();
        let mono_fresh = layout.measure(&sample(mono), f32::INFINITY);
        assert_eq!(mono_cached, mono_fresh);
    }
}
