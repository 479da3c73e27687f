//! Rich-text label with tappable sub-ranges.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use materia_core::{
    AnimatedValue, AnimationSpec, Color, Font, LineBreakMode, Rect, Role, Scene, SceneNode,
    Semantics, StyledText, TextContainer, TextLayout, Transform, Vec2,
};
use web_time::Duration;

/// A tappable fragment of a [`ClickableText`] title. Its attributes (taken at
/// the first character) are applied to the matching range of the title.
#[derive(Clone)]
pub struct Link {
    pub text: StyledText,
    pub highlight_color: Option<Color>,
    pub action: Rc<dyn Fn()>,
}

impl Link {
    pub fn new(
        text: impl Into<StyledText>,
        highlight_color: Option<Color>,
        action: impl Fn() + 'static,
    ) -> Self {
        Self {
            text: text.into(),
            highlight_color,
            action: Rc::new(action),
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("text", &self.text.as_str())
            .field("highlight_color", &self.highlight_color)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClickableText {
    pub title: StyledText,
    pub links: Vec<Link>,
}

impl ClickableText {
    pub fn new(title: impl Into<StyledText>, links: Vec<Link>) -> Self {
        Self {
            title: title.into(),
            links,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchResponse {
    /// The label consumed the event.
    Handled,
    /// Not on a link; the host should run its default handling.
    PassThrough,
}

pub struct ClickableLabel {
    clickable_text: Option<ClickableText>,
    handlers: BTreeMap<(usize, usize), Link>,
    backup: Option<StyledText>,
    displayed: StyledText,
    fading_from: Option<StyledText>,
    crossfade: AnimatedValue<f32>,
    pressed: bool,
    interactive: bool,
    pub bounds: Rect,
    /// Font for runs that carry none.
    pub font: Font,
    pub line_break: LineBreakMode,
    /// 0 means unlimited.
    pub max_lines: usize,
    pub identifier: Option<String>,
    layout: Rc<dyn TextLayout>,
}

impl fmt::Debug for ClickableLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickableLabel")
            .field("displayed", &self.displayed.as_str())
            .field("links", &self.handlers.keys().collect::<Vec<_>>())
            .field("pressed", &self.pressed)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl ClickableLabel {
    pub const CROSSFADE: Duration = Duration::from_millis(150);

    pub fn new(layout: Rc<dyn TextLayout>) -> Self {
        Self {
            clickable_text: None,
            handlers: BTreeMap::new(),
            backup: None,
            displayed: StyledText::default(),
            fading_from: None,
            crossfade: AnimatedValue::new(1.0, AnimationSpec::linear(Self::CROSSFADE)),
            pressed: false,
            interactive: false,
            bounds: Rect::default(),
            font: Font::system(Font::BODY_SIZE),
            line_break: LineBreakMode::WordWrap,
            max_lines: 0,
            identifier: None,
            layout,
        }
    }

    pub fn with_text(layout: Rc<dyn TextLayout>, item: ClickableText) -> Self {
        let mut label = Self::new(layout);
        label.set_clickable_text(Some(item));
        label
    }

    pub fn clickable_text(&self) -> Option<&ClickableText> {
        self.clickable_text.as_ref()
    }

    /// Replace the content. Link ranges are recomputed from scratch and any
    /// gesture in flight is dropped.
    pub fn set_clickable_text(&mut self, item: Option<ClickableText>) {
        self.clickable_text = item;
        self.pressed = false;
        self.backup = None;
        self.fading_from = None;
        self.crossfade.snap_to(1.0);
        self.update_appearance();
    }

    fn update_appearance(&mut self) {
        self.handlers.clear();
        let Some(item) = &self.clickable_text else {
            self.displayed = StyledText::default();
            self.interactive = false;
            return;
        };
        self.interactive = !item.links.is_empty();
        self.line_break = LineBreakMode::WordWrap;
        self.max_lines = 0;

        let mut displayed = item.title.clone();
        for link in &item.links {
            let Some(range) = displayed.find(link.text.as_str()) else {
                log::warn!(
                    "link {:?} does not occur in {:?}; skipped",
                    link.text.as_str(),
                    displayed.as_str()
                );
                continue;
            };
            if let Some(attrs) = link.text.attributes_at(0) {
                displayed.add_attributes(range.clone(), attrs);
            }
            self.handlers.insert((range.start, range.end), link.clone());
        }
        self.displayed = displayed;
    }

    /// What the label shows right now (highlight included).
    pub fn displayed_text(&self) -> &StyledText {
        &self.displayed
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn link_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.handlers.keys().map(|&(s, e)| s..e)
    }

    /// Byte index of the character under `point` (label coordinates).
    pub fn character_index(&self, point: Vec2) -> Option<usize> {
        let text = self.displayed.clone().with_default_font(&self.font);
        let container = TextContainer::new(self.bounds.size())
            .line_break(self.line_break)
            .max_lines(self.max_lines);
        self.layout.character_index(&text, &container, point)
    }

    pub fn link_range_at(&self, point: Vec2) -> Option<Range<usize>> {
        let index = self.character_index(point)?;
        self.handlers
            .keys()
            .find(|&&(start, end)| start <= index && index < end)
            .map(|&(start, end)| start..end)
    }

    fn crossfade_to(&mut self, text: StyledText) {
        self.fading_from = Some(std::mem::replace(&mut self.displayed, text));
        self.crossfade.snap_to(0.0);
        self.crossfade.set_target(1.0);
    }

    pub fn touch_began(&mut self, point: Vec2) -> TouchResponse {
        self.backup = Some(self.displayed.clone());
        let Some(range) = self.link_range_at(point) else {
            return TouchResponse::PassThrough;
        };
        let mut highlighted = self.displayed.clone();
        if let Some(color) = self
            .handlers
            .get(&(range.start, range.end))
            .and_then(|l| l.highlight_color)
        {
            highlighted.set_color(range, color);
        }
        self.crossfade_to(highlighted);
        self.pressed = true;
        TouchResponse::Handled
    }

    /// Restores the pre-press text and fires the link under `point`, which
    /// need not be the link that was pressed.
    pub fn touch_ended(&mut self, point: Vec2) -> TouchResponse {
        if !std::mem::take(&mut self.pressed) {
            return TouchResponse::PassThrough;
        }
        if let Some(backup) = self.backup.take() {
            self.crossfade_to(backup);
        }
        let action = self
            .link_range_at(point)
            .and_then(|r| self.handlers.get(&(r.start, r.end)))
            .map(|l| l.action.clone());
        match action {
            Some(action) => {
                action();
                TouchResponse::Handled
            }
            None => TouchResponse::PassThrough,
        }
    }

    pub fn touch_cancelled(&mut self) {
        if !std::mem::take(&mut self.pressed) {
            return;
        }
        if let Some(backup) = self.backup.take() {
            self.crossfade_to(backup);
        }
    }

    /// Step the crossfade; `true` while still running.
    pub fn advance(&mut self) -> bool {
        let running = self.crossfade.update();
        if !running {
            self.fading_from = None;
        }
        running
    }

    pub fn crossfade_progress(&self) -> f32 {
        *self.crossfade.get()
    }

    /// Height of the wrapped text at `width`.
    pub fn measure_height(&self, width: f32) -> f32 {
        if self.displayed.is_empty() {
            return 0.0;
        }
        let text = self.displayed.clone().with_default_font(&self.font);
        self.layout.measure(&text, width).height
    }

    pub fn paint(&self, scene: &mut Scene, alpha: f32) {
        let p = self.crossfade_progress();
        if let Some(previous) = &self.fading_from
            && p < 1.0
        {
            scene.push(SceneNode::Text {
                rect: self.bounds,
                text: previous.clone().with_default_font(&self.font),
                alpha: alpha * (1.0 - p),
                transform: Transform::identity(),
            });
        }
        scene.push(SceneNode::Text {
            rect: self.bounds,
            text: self.displayed.clone().with_default_font(&self.font),
            alpha: alpha * p,
            transform: Transform::identity(),
        });
    }

    pub fn semantics(&self) -> Semantics {
        let role = if self.interactive { Role::Link } else { Role::Text };
        let mut s = Semantics::new(role).label(self.displayed.as_str());
        if let Some(id) = &self.identifier {
            s = s.identifier(id.clone());
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use materia_core::{TestClock, TextAttributes};
    use materia_text::ApproxTextLayout;
    use std::cell::Cell;

    const RED: Color = Color(255, 0, 0, 255);

    fn label_with(links: Vec<Link>) -> ClickableLabel {
        let mut label = ClickableLabel::with_text(
            Rc::new(ApproxTextLayout::default()),
            ClickableText::new("Click here for more", links),
        );
        // 6pt per character
        label.font = Font::system(10.0);
        label.bounds = Rect::new(0.0, 0.0, 300.0, 20.0);
        label
    }

    fn counting_link(text: &str, hits: &Rc<Cell<u32>>) -> Link {
        let hits = hits.clone();
        Link::new(
            StyledText::new(text, TextAttributes::new().color(Color::LINK)),
            Some(RED),
            move || hits.set(hits.get() + 1),
        )
    }

    #[test]
    fn tap_on_link_highlights_then_fires_once() {
        let hits = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &hits)]);
        assert!(label.is_interactive());
        assert_eq!(label.link_ranges().collect::<Vec<_>>(), vec![6..10]);
        assert_eq!(
            label.displayed_text().attributes_at(6).and_then(|a| a.color),
            Some(Color::LINK)
        );

        let on_here = Vec2::new(37.0, 5.0);
        assert_eq!(label.touch_began(on_here), TouchResponse::Handled);
        assert_eq!(
            label.displayed_text().attributes_at(7).and_then(|a| a.color),
            Some(RED)
        );
        assert_eq!(label.touch_ended(on_here), TouchResponse::Handled);
        assert_eq!(hits.get(), 1);
        assert_eq!(
            label.displayed_text().attributes_at(7).and_then(|a| a.color),
            Some(Color::LINK)
        );
    }

    #[test]
    fn press_outside_passes_through() {
        let hits = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &hits)]);
        let on_click = Vec2::new(1.0, 5.0);
        assert_eq!(label.touch_began(on_click), TouchResponse::PassThrough);
        assert_eq!(label.touch_ended(on_click), TouchResponse::PassThrough);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn cancel_restores_exact_text_without_action() {
        let hits = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &hits)]);
        let before = label.displayed_text().clone();
        label.touch_began(Vec2::new(37.0, 5.0));
        assert_ne!(label.displayed_text(), &before);
        label.touch_cancelled();
        assert_eq!(label.displayed_text(), &before);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn release_is_looked_up_independently_of_press() {
        let here = Rc::new(Cell::new(0));
        let more = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &here), counting_link("more", &more)]);
        label.touch_began(Vec2::new(37.0, 5.0));
        // 'm' of "more" starts at 15 * 6 = 90
        assert_eq!(label.touch_ended(Vec2::new(92.0, 5.0)), TouchResponse::Handled);
        assert_eq!((here.get(), more.get()), (0, 1));

        label.touch_began(Vec2::new(37.0, 5.0));
        assert_eq!(label.touch_ended(Vec2::new(1.0, 5.0)), TouchResponse::PassThrough);
        assert_eq!((here.get(), more.get()), (0, 1));
    }

    #[test]
    fn missing_link_is_skipped() {
        let hits = Rc::new(Cell::new(0));
        let label = label_with(vec![counting_link("nowhere", &hits)]);
        assert_eq!(label.link_ranges().count(), 0);
        assert_eq!(label.displayed_text().as_str(), "Click here for more");
    }

    #[test]
    fn same_range_last_link_wins() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &first), counting_link("here", &second)]);
        label.touch_began(Vec2::new(37.0, 5.0));
        label.touch_ended(Vec2::new(37.0, 5.0));
        assert_eq!((first.get(), second.get()), (0, 1));
    }

    #[test]
    fn release_without_press_does_nothing() {
        let hits = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &hits)]);
        assert_eq!(label.touch_ended(Vec2::new(37.0, 5.0)), TouchResponse::PassThrough);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn crossfade_runs_for_its_duration() {
        let clock = TestClock::install();
        let hits = Rc::new(Cell::new(0));
        let mut label = label_with(vec![counting_link("here", &hits)]);
        label.touch_began(Vec2::new(37.0, 5.0));
        assert_eq!(label.crossfade_progress(), 0.0);

        let mut scene = Scene::default();
        label.paint(&mut scene, 1.0);
        assert_eq!(scene.nodes.len(), 2);

        clock.advance(Duration::from_millis(75));
        assert!(label.advance());
        assert!((label.crossfade_progress() - 0.5).abs() < 0.01);
        clock.advance(Duration::from_millis(100));
        assert!(!label.advance());
        assert_eq!(label.crossfade_progress(), 1.0);

        let mut scene = Scene::default();
        label.paint(&mut scene, 1.0);
        assert_eq!(scene.nodes.len(), 1);
    }

    #[test]
    fn plain_label_is_not_interactive() {
        let label = ClickableLabel::with_text(
            Rc::new(ApproxTextLayout::default()),
            ClickableText::new("Just text", vec![]),
        );
        assert!(!label.is_interactive());
        assert_eq!(label.semantics().role, Role::Text);
        assert!(label.measure_height(500.0) > 0.0);
    }
}
