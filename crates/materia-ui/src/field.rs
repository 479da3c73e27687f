//! Floating-label text field.
//!
//! [`FloatingLabelField`] owns its [`TextInputViewModel`] and a shared
//! [`FieldView`]. The view is bound to the model as an observer, so every
//! model setter (whether called by the app or by the field itself in
//! response to input) re-renders title, placeholder, underline and help.
//!
//! Hosts forward the embedded input's notifications through
//! [`FloatingLabelField::input_did_change`] and friends, and call
//! [`FloatingLabelField::advance`] once per frame while it returns `true`.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};

use materia_core::{
    AnimatedValue, AnimationSpec, Color, Easing, Font, Interpolate, Rect, Role, Scene, SceneNode,
    Semantics, Size, StyledText, TextLayout, Transform, Vec2,
};
use materia_text::CosmicTextLayout;
use web_time::Duration;

use crate::choreography::{LabelInputs, label_targets};
use crate::clickable::{ClickableLabel, ClickableText, Link, TouchResponse};
use crate::input::{FormattableInput, InputFactory, TextComponentMode, plain_input_factory};
use crate::layout::{FieldFrames, FieldMetrics, layout_field};
use crate::validation::ErrorState;
use crate::view_model::{
    ButtonInfo, PlaceholderKind, TextInputObserver, TextInputViewModel, ViewModelEvent,
};

/// Timings and spacings of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    pub width: f32,
    pub placeholder_animation: Duration,
    pub line_animation: Duration,
    /// Gap between the title and the input.
    pub title_gap: f32,
    /// Distance from the input's bottom edge to the underline's bottom edge.
    pub line_gap: f32,
    /// Gap between the underline and the help label.
    pub help_gap: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            placeholder_animation: Duration::from_millis(150),
            line_animation: Duration::from_millis(100),
            title_gap: 3.0,
            line_gap: 6.0,
            help_gap: 8.0,
        }
    }
}

/// App-side callbacks of a field. All methods have no-op defaults.
pub trait FieldDelegate {
    fn did_change(&self, _view_model: &TextInputViewModel) {}
    fn did_begin_editing(&self, _view_model: &TextInputViewModel) {}
    fn did_end_editing(&self, _view_model: &TextInputViewModel) {}
    fn should_change_text(
        &self,
        _view_model: &TextInputViewModel,
        _range: Range<usize>,
        _replacement: &str,
    ) -> bool {
        true
    }
    fn state_did_change(&self, _view_model: &TextInputViewModel, _state: &ErrorState) {}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldAccessibility {
    pub label: String,
    pub identifier: String,
    pub button_identifier: String,
    pub help_identifier: String,
    pub value: String,
}

/// Everything a field currently shows, for tests and inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    pub text: String,
    pub mode: TextComponentMode,
    pub error_state: ErrorState,
    pub is_first_responder: bool,
    pub title: String,
    pub title_alpha: f32,
    pub title_transform: Transform,
    pub placeholder: String,
    pub placeholder_alpha: f32,
    pub placeholder_transform: Transform,
    pub help_text: String,
    pub help_link_ranges: Vec<Range<usize>>,
    pub line_color: Color,
    pub line_thickness: f32,
    pub input_height: f32,
    pub frames: FieldFrames,
}

struct FieldState {
    config: FieldConfig,
    layout: Rc<dyn TextLayout>,
    factory: InputFactory,
    input: Box<dyn FormattableInput>,
    should_update: bool,
    had_input: bool,
    title_text: StyledText,
    placeholder_text: StyledText,
    help: ClickableLabel,
    title_alpha: AnimatedValue<f32>,
    placeholder_alpha: AnimatedValue<f32>,
    title_transform: AnimatedValue<Transform>,
    placeholder_transform: AnimatedValue<Transform>,
    line_color: AnimatedValue<Color>,
    line_thickness: AnimatedValue<f32>,
    background: Color,
    input_height: f32,
    frames: FieldFrames,
    has_button: bool,
    button_image: Option<String>,
    accessibility: FieldAccessibility,
    /// Error state the delegate last heard about.
    reported_error: ErrorState,
}

/// The rendering half of a field; bound to the view model as its observer.
pub struct FieldView {
    state: RefCell<FieldState>,
    delegate: RefCell<Option<Weak<dyn FieldDelegate>>>,
}

impl fmt::Debug for FieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("FieldView")
            .field("frames", &st.frames)
            .field("had_input", &st.had_input)
            .finish_non_exhaustive()
    }
}

/// Retarget only when the destination moved; a settled or running value
/// is left alone otherwise.
fn retarget<T: Interpolate + Clone + PartialEq>(
    value: &mut AnimatedValue<T>,
    target: T,
    spec: AnimationSpec,
) {
    if *value.target() != target {
        value.animate_to(target, spec);
    }
}

impl FieldState {
    fn new(config: FieldConfig, layout: Rc<dyn TextLayout>, factory: InputFactory) -> Self {
        let input = factory(TextComponentMode::default());
        let instant = AnimationSpec::instant();
        Self {
            config,
            help: ClickableLabel::new(layout.clone()),
            layout,
            factory,
            input,
            should_update: true,
            had_input: false,
            title_text: StyledText::default(),
            placeholder_text: StyledText::default(),
            title_alpha: AnimatedValue::new(0.0, instant),
            placeholder_alpha: AnimatedValue::new(1.0, instant),
            title_transform: AnimatedValue::new(Transform::identity(), instant),
            placeholder_transform: AnimatedValue::new(Transform::identity(), instant),
            line_color: AnimatedValue::new(Color::TRANSPARENT, instant),
            line_thickness: AnimatedValue::new(1.0, instant),
            background: Color::TRANSPARENT,
            input_height: 0.0,
            frames: FieldFrames::default(),
            has_button: false,
            button_image: None,
            accessibility: FieldAccessibility::default(),
            reported_error: ErrorState::Normal,
        }
    }

    fn placeholder_frame(&self) -> Rect {
        let input = self.frames.input;
        let size = if self.placeholder_text.is_empty() {
            Size::ZERO
        } else {
            self.layout
                .measure(&self.placeholder_text, self.input_width())
        };
        Rect::new(input.x, input.y, size.width.min(input.w.max(0.0)), size.height)
    }

    fn input_width(&self) -> f32 {
        if self.frames.input.w > 0.0 {
            self.frames.input.w
        } else if self.has_button {
            self.config.width - crate::layout::BUTTON_SIZE + crate::layout::BUTTON_OVERHANG
        } else {
            self.config.width
        }
    }

    fn relayout(&mut self) {
        let title = if self.title_text.is_empty() {
            Size::ZERO
        } else {
            self.layout.measure(&self.title_text, self.config.width)
        };
        let metrics = FieldMetrics {
            width: self.config.width,
            title,
            input_height: self.input_height,
            line_thickness: *self.line_thickness.target(),
            help_height: self.help.measure_height(self.config.width),
            has_button: self.has_button,
            title_gap: self.config.title_gap,
            line_gap: self.config.line_gap,
            help_gap: self.config.help_gap,
        };
        match layout_field(&metrics) {
            Ok(frames) => {
                self.frames = frames;
                self.help.bounds = Rect::new(0.0, 0.0, frames.help.w, frames.help.h);
            }
            Err(e) => log::warn!("field layout failed, keeping previous frames: {e}"),
        }
    }

    fn update_accessibility_ids(&mut self, vm: &TextInputViewModel) {
        let label = vm.placeholder().text.clone();
        let kind = match self.input.mode() {
            TextComponentMode::TextField => "tf",
            TextComponentMode::TextView => "tv",
        };
        let identifier = format!("{kind}_{label}");
        self.accessibility.button_identifier = format!("{identifier}_button");
        self.accessibility.help_identifier = format!("{identifier}_help");
        self.help.identifier = Some(self.accessibility.help_identifier.clone());
        self.accessibility.identifier = identifier;
        self.accessibility.label = label;
    }

    fn update_accessibility_value(&mut self, vm: &TextInputViewModel) {
        self.accessibility.value = vm.text().to_owned();
    }

    /// Push model style and text into the input without echoing back.
    fn update_attributed_text(&mut self, vm: &TextInputViewModel) {
        self.should_update = false;
        let attrs = vm.style().text_attributes.clone();
        self.input.set_typing_attributes(attrs.clone());
        let restyled = StyledText::new(self.input.text(), attrs);
        self.input.set_styled_text(restyled);
        self.should_update = true;

        if self.input.text() != vm.text() {
            self.input.set_text(vm.text());
        }
    }

    fn update_height(&mut self, vm: &TextInputViewModel) {
        let style = vm.style();
        let text = if self.input.current_format().is_none() {
            self.input.styled_text().clone()
        } else {
            StyledText::new(vm.text(), style.text_attributes.clone())
        };
        let text = if !text.is_empty() {
            text
        } else if !self.placeholder_text.is_empty() {
            self.placeholder_text.clone()
        } else {
            StyledText::new(" ", style.text_attributes.clone())
        };

        let paragraph = match style.text_attributes.paragraph {
            Some(p) => p,
            None => {
                log::debug!("text attributes carry no paragraph style, using defaults");
                style.text_attributes.paragraph_or_default()
            }
        };
        let line_h = paragraph.line_height();
        let measured = self.layout.measure(&text, self.input_width()).height;
        self.input_height = match vm.text_component_mode() {
            TextComponentMode::TextField => line_h,
            TextComponentMode::TextView => {
                let max_lines = vm.max_lines_without_scrolling as f32;
                measured.min(line_h * max_lines - line_h / 6.0).max(line_h)
            }
        };
        self.relayout();

        if self.input.caret_at_end() {
            self.input.scroll_to_end(measured, self.input_height);
        }
    }

    fn help_changed(&mut self, vm: &TextInputViewModel) {
        let display = vm.help_display();
        let visual = vm.visual_state();
        let title = StyledText::new(display.text, visual.help_text_attributes.clone());
        let links = match display.link_text {
            Some(link_text) => {
                let link_color = visual.link_text_attributes.color.unwrap_or(Color::LINK);
                let action = display.link_action.unwrap_or_else(|| Rc::new(|| {}));
                vec![Link {
                    text: StyledText::new(link_text, visual.link_text_attributes.clone()),
                    highlight_color: Some(link_color.with_alpha(128)),
                    action,
                }]
            }
            None => Vec::new(),
        };
        self.help.font = visual.help_text_attributes.font_or(Font::CAPTION_SIZE);
        self.help
            .set_clickable_text(Some(ClickableText::new(title, links)));
        self.relayout();
    }

    fn change_text_states(&mut self, vm: &TextInputViewModel) {
        self.help_changed(vm);

        let placeholder = vm.placeholder();
        let visual = vm.visual_state().clone();
        self.title_text = StyledText::new(&placeholder.text, visual.title_text_attributes.clone());
        self.background = visual.background_color;
        self.relayout();

        let is_empty = self.input.formatted_text().is_empty() && vm.text().is_empty();
        let targets = label_targets(&LabelInputs {
            kind: placeholder.kind,
            is_active: vm.is_active(),
            is_empty,
            title_frame: self.frames.title,
            placeholder_frame: self.placeholder_frame(),
            title_font_size: visual.title_text_attributes.font_or(Font::CAPTION_SIZE).size,
            body_font_size: vm.style().placeholder_attributes.font_or(Font::BODY_SIZE).size,
        });

        let label_spec = if self.had_input && targets.animate_placeholder {
            AnimationSpec::tween(self.config.placeholder_animation, Easing::EaseInOut)
        } else {
            AnimationSpec::instant()
        };
        retarget(&mut self.title_alpha, targets.title_alpha, label_spec);
        retarget(&mut self.placeholder_alpha, targets.placeholder_alpha, label_spec);
        retarget(&mut self.title_transform, targets.title_transform, label_spec);
        retarget(
            &mut self.placeholder_transform,
            targets.placeholder_transform,
            label_spec,
        );

        let line_spec = if self.had_input {
            AnimationSpec::tween(self.config.line_animation, Easing::EaseInOut)
        } else {
            AnimationSpec::instant()
        };
        retarget(&mut self.line_color, visual.line_color, line_spec);
        retarget(&mut self.line_thickness, visual.line_height, line_spec);
        self.relayout();

        self.update_accessibility_value(vm);
    }

    fn sync_focus(&mut self, vm: &TextInputViewModel) {
        if vm.is_active() && !self.input.is_first_responder() {
            self.input.become_first_responder();
        } else if !vm.is_active() && self.input.is_first_responder() {
            self.input.resign_first_responder();
        }
    }

    fn state_changed(&mut self, vm: &TextInputViewModel) {
        self.update_height(vm);
        self.change_text_states(vm);
        self.sync_focus(vm);
    }

    fn placeholder_changed(&mut self, vm: &TextInputViewModel, style_changed: bool) {
        if style_changed {
            self.placeholder_text = StyledText::new(
                &vm.placeholder().text,
                vm.style().placeholder_attributes.clone(),
            );
            self.update_accessibility_ids(vm);
        }
        self.state_changed(vm);
    }

    fn style_changed(&mut self, vm: &TextInputViewModel) {
        self.update_attributed_text(vm);
        self.placeholder_changed(vm, true);
    }

    fn text_changed(&mut self, vm: &TextInputViewModel) {
        self.update_accessibility_value(vm);
        if self.should_update {
            self.update_attributed_text(vm);
        }
        self.update_height(vm);
        self.placeholder_changed(vm, false);
    }

    fn right_button_changed(&mut self, info: Option<&ButtonInfo>) {
        self.has_button = info.is_some();
        self.button_image = info.map(|b| b.image_name.clone());
        self.relayout();
    }

    /// Recreate the input for the model's mode and carry text, formats and
    /// symbols over.
    fn replace_input(&mut self, vm: &TextInputViewModel) {
        let was_focused = self.input.is_first_responder();
        let mut input = (self.factory)(vm.text_component_mode());
        input.set_format_symbols(vm.format_symbols().clone());
        input.set_formats(vm.formats().to_vec());
        input.set_format_selection_strategy(vm.format_selection_strategy());
        input.set_typing_attributes(vm.style().text_attributes.clone());
        input.set_text(vm.text());
        if was_focused {
            input.become_first_responder();
        }
        log::debug!("field input replaced for {:?}", vm.text_component_mode());
        self.input = input;
        self.update_attributed_text(vm);
        self.update_height(vm);
    }

    fn advance(&mut self) -> bool {
        let mut running = false;
        running |= self.title_alpha.update();
        running |= self.placeholder_alpha.update();
        running |= self.title_transform.update();
        running |= self.placeholder_transform.update();
        running |= self.line_color.update();
        running |= self.line_thickness.update();
        running |= self.help.advance();
        running
    }

    fn is_animating(&self) -> bool {
        self.title_alpha.is_animating()
            || self.placeholder_alpha.is_animating()
            || self.title_transform.is_animating()
            || self.placeholder_transform.is_animating()
            || self.line_color.is_animating()
            || self.line_thickness.is_animating()
    }
}

impl FieldView {
    fn delegate(&self) -> Option<Rc<dyn FieldDelegate>> {
        self.delegate.borrow().as_ref().and_then(Weak::upgrade)
    }
}

impl TextInputObserver for FieldView {
    fn view_model_changed(&self, vm: &TextInputViewModel, event: ViewModelEvent) {
        let error_changed = {
            let mut st = self.state.borrow_mut();
            match event {
                ViewModelEvent::TextChanged => st.text_changed(vm),
                ViewModelEvent::HelpChanged => st.help_changed(vm),
                ViewModelEvent::StateChanged { .. } => st.state_changed(vm),
                ViewModelEvent::PlaceholderChanged { .. } => st.placeholder_changed(vm, true),
                ViewModelEvent::StyleChanged => st.style_changed(vm),
                ViewModelEvent::FormatsChanged => {
                    st.input.set_formats(vm.formats().to_vec());
                    st.input
                        .set_format_selection_strategy(vm.format_selection_strategy());
                }
                ViewModelEvent::FormatSymbolsChanged => {
                    st.input.set_format_symbols(vm.format_symbols().clone());
                }
                ViewModelEvent::TextComponentModeChanged => {
                    st.replace_input(vm);
                    st.style_changed(vm);
                }
                ViewModelEvent::RightButtonChanged => {
                    st.right_button_changed(vm.right_button_info());
                    st.update_accessibility_ids(vm);
                }
            }
            let changed = matches!(event, ViewModelEvent::StateChanged { .. })
                && st.reported_error != *vm.error_state();
            if changed {
                st.reported_error = vm.error_state().clone();
            }
            changed
        };
        if error_changed && let Some(delegate) = self.delegate() {
            delegate.state_did_change(vm, vm.error_state());
        }
    }
}

pub struct FloatingLabelField {
    vm: TextInputViewModel,
    view: Rc<FieldView>,
}

impl fmt::Debug for FloatingLabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingLabelField")
            .field("vm", &self.vm)
            .field("view", &self.view)
            .finish()
    }
}

impl FloatingLabelField {
    /// A field laid out with the system fonts.
    pub fn new(vm: TextInputViewModel) -> Self {
        Self::with_layout(vm, Rc::new(CosmicTextLayout::new()))
    }

    pub fn with_layout(vm: TextInputViewModel, layout: Rc<dyn TextLayout>) -> Self {
        Self::with_parts(vm, layout, FieldConfig::default(), plain_input_factory())
    }

    pub fn with_parts(
        vm: TextInputViewModel,
        layout: Rc<dyn TextLayout>,
        config: FieldConfig,
        factory: InputFactory,
    ) -> Self {
        let view = Rc::new(FieldView {
            state: RefCell::new(FieldState::new(config, layout, factory)),
            delegate: RefCell::new(None),
        });
        let mut field = Self { vm, view };
        field.attach();
        field
    }

    fn weak_view(&self) -> Weak<dyn TextInputObserver> {
        let view: Rc<dyn TextInputObserver> = self.view.clone();
        Rc::downgrade(&view)
    }

    fn attach(&mut self) {
        self.vm.bind_view(self.weak_view());
        {
            let mut st = self.view.state.borrow_mut();
            st.replace_input(&self.vm);
            st.style_changed(&self.vm);
            st.right_button_changed(self.vm.right_button_info());
            st.update_accessibility_ids(&self.vm);
            st.reported_error = self.vm.error_state().clone();
        }
        self.vm.validate_input();
    }

    pub fn view_model(&self) -> &TextInputViewModel {
        &self.vm
    }

    /// Mutate the model; the field re-renders through its observer binding.
    pub fn view_model_mut(&mut self) -> &mut TextInputViewModel {
        &mut self.vm
    }

    /// Swap in another model and return the previous one, unbound.
    pub fn set_view_model(&mut self, vm: TextInputViewModel) -> TextInputViewModel {
        let mut old = std::mem::replace(&mut self.vm, vm);
        old.unbind_view();
        self.attach();
        old
    }

    pub fn set_delegate(&self, delegate: Option<Weak<dyn FieldDelegate>>) {
        *self.view.delegate.borrow_mut() = delegate;
    }

    pub fn config(&self) -> FieldConfig {
        self.view.state.borrow().config
    }

    pub fn set_width(&self, width: f32) {
        let mut st = self.view.state.borrow_mut();
        st.config.width = width;
        st.frames.input.w = 0.0;
        st.update_height(&self.vm);
    }

    /// Run `f` against the embedded input. Call [`Self::input_did_change`]
    /// afterwards if `f` edited the text.
    pub fn with_input<R>(&self, f: impl FnOnce(&mut dyn FormattableInput) -> R) -> R {
        let mut st = self.view.state.borrow_mut();
        f(st.input.as_mut())
    }

    // ---- notifications from the embedded input ----

    pub fn input_did_change(&mut self) {
        let text = {
            let st = self.view.state.borrow();
            if !st.should_update || st.input.text() == self.vm.text() {
                return;
            }
            st.input.text().to_owned()
        };
        self.view.state.borrow_mut().should_update = false;
        self.vm.set_text(text);
        if let Some(delegate) = self.view.delegate() {
            delegate.did_change(&self.vm);
        }
        self.view.state.borrow_mut().should_update = true;
    }

    pub fn should_change_text(&self, range: Range<usize>, replacement: &str) -> bool {
        if let Some(delegate) = self.view.delegate()
            && !delegate.should_change_text(&self.vm, range.clone(), replacement)
        {
            return false;
        }
        self.vm.should_change_text(range, replacement)
    }

    pub fn input_did_begin_editing(&mut self) {
        self.view.state.borrow_mut().had_input = true;
        self.vm.set_active(true);
        self.vm.did_begin_editing();
        if let Some(delegate) = self.view.delegate() {
            delegate.did_begin_editing(&self.vm);
        }
    }

    pub fn input_did_end_editing(&mut self) {
        self.vm.set_active(false);
        self.vm.did_end_editing();
        if let Some(delegate) = self.view.delegate() {
            delegate.did_end_editing(&self.vm);
        }
    }

    // ---- conveniences that play the host's part ----

    /// Edit the input as a keystroke would: ask first, apply, then notify.
    pub fn replace_text(&mut self, range: Range<usize>, replacement: &str) -> bool {
        if !self.should_change_text(range.clone(), replacement) {
            return false;
        }
        self.with_input(|input| {
            let mut text = input.text().to_owned();
            let end = range.end.min(text.len());
            let start = range.start.min(end);
            if text.is_char_boundary(start) && text.is_char_boundary(end) {
                text.replace_range(start..end, replacement);
                input.set_text(&text);
            } else {
                log::warn!("edit range {start}..{end} splits a character; ignored");
            }
        });
        self.input_did_change();
        true
    }

    /// Append at the end of the current text.
    pub fn type_text(&mut self, text: &str) -> bool {
        let end = self.with_input(|input| input.text().len());
        self.replace_text(end..end, text)
    }

    pub fn focus(&mut self) -> bool {
        let became = self.with_input(|input| input.become_first_responder());
        if became {
            self.input_did_begin_editing();
        }
        became
    }

    pub fn blur(&mut self) -> bool {
        let resigned = self.with_input(|input| input.resign_first_responder());
        if resigned {
            self.input_did_end_editing();
        }
        resigned
    }

    pub fn validate(&mut self) -> bool {
        self.vm.validate()
    }

    /// Fire the trailing button's action, if there is one.
    pub fn tap_right_button(&self) -> bool {
        match self.vm.right_button_info().and_then(|b| b.action.clone()) {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    // ---- help label gestures, in field coordinates ----

    fn help_local(&self, point: Vec2) -> Vec2 {
        self.view.state.borrow().frames.help.to_local(point)
    }

    pub fn help_touch_began(&self, point: Vec2) -> TouchResponse {
        let local = self.help_local(point);
        self.view.state.borrow_mut().help.touch_began(local)
    }

    pub fn help_touch_ended(&self, point: Vec2) -> TouchResponse {
        let local = self.help_local(point);
        self.view.state.borrow_mut().help.touch_ended(local)
    }

    pub fn help_touch_cancelled(&self) {
        self.view.state.borrow_mut().help.touch_cancelled();
    }

    // ---- frame driving and output ----

    /// Step running animations; `true` while any is still running.
    pub fn advance(&self) -> bool {
        self.view.state.borrow_mut().advance()
    }

    pub fn is_animating(&self) -> bool {
        self.view.state.borrow().is_animating()
    }

    pub fn frames(&self) -> FieldFrames {
        self.view.state.borrow().frames
    }

    pub fn accessibility(&self) -> FieldAccessibility {
        self.view.state.borrow().accessibility.clone()
    }

    pub fn semantics(&self) -> Vec<Semantics> {
        let st = self.view.state.borrow();
        let a = &st.accessibility;
        let role = match st.input.mode() {
            TextComponentMode::TextField => Role::TextField,
            TextComponentMode::TextView => Role::TextArea,
        };
        let mut input = Semantics::new(role)
            .label(a.label.clone())
            .identifier(a.identifier.clone())
            .value(a.value.clone());
        input.focused = st.input.is_first_responder();
        let mut out = vec![input];
        if st.has_button {
            out.push(Semantics::new(Role::Button).identifier(a.button_identifier.clone()));
        }
        out.push(st.help.semantics());
        out
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        let st = self.view.state.borrow();
        FieldSnapshot {
            text: self.vm.text().to_owned(),
            mode: st.input.mode(),
            error_state: self.vm.error_state().clone(),
            is_first_responder: st.input.is_first_responder(),
            title: st.title_text.as_str().to_owned(),
            title_alpha: *st.title_alpha.get(),
            title_transform: *st.title_transform.get(),
            placeholder: st.placeholder_text.as_str().to_owned(),
            placeholder_alpha: *st.placeholder_alpha.get(),
            placeholder_transform: *st.placeholder_transform.get(),
            help_text: st.help.displayed_text().as_str().to_owned(),
            help_link_ranges: st.help.link_ranges().collect(),
            line_color: *st.line_color.get(),
            line_thickness: *st.line_thickness.get(),
            input_height: st.input_height,
            frames: st.frames,
        }
    }

    /// Paint list in field coordinates.
    pub fn scene(&self) -> Scene {
        let st = self.view.state.borrow();
        let mut scene = Scene::default();
        scene.push(SceneNode::Rect {
            rect: Rect::new(0.0, 0.0, st.frames.size.width, st.frames.size.height),
            color: st.background,
        });
        scene.push(SceneNode::Text {
            rect: st.frames.input,
            text: st.input.styled_text().clone(),
            alpha: 1.0,
            transform: Transform::identity(),
        });
        scene.push(SceneNode::Text {
            rect: st.frames.title,
            text: st.title_text.clone(),
            alpha: *st.title_alpha.get(),
            transform: *st.title_transform.get(),
        });
        scene.push(SceneNode::Text {
            rect: st.placeholder_frame(),
            text: st.placeholder_text.clone(),
            alpha: *st.placeholder_alpha.get(),
            transform: *st.placeholder_transform.get(),
        });
        let line = st.frames.line;
        let thickness = *st.line_thickness.get();
        scene.push(SceneNode::Rect {
            rect: Rect::new(line.x, line.max_y() - thickness, line.w, thickness),
            color: *st.line_color.get(),
        });
        if let (Some(frame), Some(image)) = (st.frames.button, &st.button_image) {
            scene.push(SceneNode::Image {
                rect: frame,
                name: image.clone(),
            });
        }
        let mut help = Scene::default();
        st.help.paint(&mut help, 1.0);
        let origin = st.frames.help.origin();
        for node in help.nodes {
            if let SceneNode::Text {
                rect,
                text,
                alpha,
                transform,
            } = node
            {
                scene.push(SceneNode::Text {
                    rect: Rect::new(rect.x + origin.x, rect.y + origin.y, rect.w, rect.h),
                    text,
                    alpha,
                    transform,
                });
            }
        }
        scene
    }
}
