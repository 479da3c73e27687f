//! Single source of truth for a floating-label field.
//!
//! Every mutation goes through a setter, and every setter that changes
//! something tells the bound view first and then each live delegate, in
//! registration order, before returning.

use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};

use materia_core::{Color, ObserverKey, Observers};

use crate::input::{
    FormatSelectionStrategy, FormatSymbols, TextComponentMode, default_format_symbols,
};
use crate::style::{Style, VisualState};
use crate::validation::{ErrorState, LinkAction, ValidationOutcome, Validator};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Sits in the input while it is empty, disappears otherwise.
    #[default]
    Normal,
    /// Floats up into the title position once the field is active or filled.
    Animated,
    /// Always shown as the title; never inside the input.
    AlwaysOnTop,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub text: String,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Clone, Default)]
pub struct HelpInfo {
    pub text: String,
    pub link_text: Option<String>,
    pub link_action: Option<LinkAction>,
}

impl HelpInfo {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for HelpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpInfo")
            .field("text", &self.text)
            .field("link_text", &self.link_text)
            .finish_non_exhaustive()
    }
}

/// Trailing button of a field.
#[derive(Clone)]
pub struct ButtonInfo {
    pub image_name: String,
    pub action: Option<Rc<dyn Fn()>>,
}

impl ButtonInfo {
    pub fn new(image_name: impl Into<String>, action: Option<Rc<dyn Fn()>>) -> Self {
        Self {
            image_name: image_name.into(),
            action,
        }
    }
}

impl fmt::Debug for ButtonInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonInfo")
            .field("image_name", &self.image_name)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// What the help label should currently show.
#[derive(Clone)]
pub struct HelpDisplay {
    pub text: String,
    pub link_text: Option<String>,
    pub link_action: Option<LinkAction>,
}

impl fmt::Debug for HelpDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpDisplay")
            .field("text", &self.text)
            .field("link_text", &self.link_text)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewModelEvent {
    TextChanged,
    HelpChanged,
    StateChanged { placeholder_type_changed: bool },
    PlaceholderChanged { type_changed: bool },
    StyleChanged,
    FormatsChanged,
    FormatSymbolsChanged,
    TextComponentModeChanged,
    RightButtonChanged,
}

/// Receives every change of a view model. Implemented by the bound view and
/// by any number of passive delegates.
pub trait TextInputObserver {
    fn view_model_changed(&self, view_model: &TextInputViewModel, event: ViewModelEvent);
}

#[derive(Clone, Default)]
pub struct Hooks {
    pub on_text_change: Option<Rc<dyn Fn(&str)>>,
    pub on_state_change: Option<Rc<dyn Fn(&ErrorState)>>,
    /// Asked before the input applies an edit; `false` rejects it.
    pub should_change_text: Option<Rc<dyn Fn(Range<usize>, &str) -> bool>>,
    pub on_begin_editing: Option<Rc<dyn Fn()>>,
    pub on_end_editing: Option<Rc<dyn Fn()>>,
}

pub struct TextInputViewModel {
    text: String,
    help_info: HelpInfo,
    error_state: ErrorState,
    error_link_action: Option<LinkAction>,
    is_active: bool,
    placeholder: Placeholder,
    base_style: Style,
    style: Style,
    text_component_mode: TextComponentMode,
    formats: Vec<String>,
    format_selection_strategy: FormatSelectionStrategy,
    format_symbols: FormatSymbols,
    right_button_info: Option<ButtonInfo>,
    pub max_lines_without_scrolling: usize,
    pub input_validator: Option<Validator>,
    pub action_validator: Validator,
    use_tint_color_for_active_line: bool,
    use_tint_color_for_active_title: bool,
    tint_color: Option<Color>,
    /// Result of the last input validation.
    pub was_input_valid: bool,
    /// Result of the last `validate()`.
    pub was_action_valid: bool,
    pub hooks: Hooks,
    observers: Observers<dyn TextInputObserver>,
}

impl Default for TextInputViewModel {
    fn default() -> Self {
        TextInputViewModelBuilder::default().build()
    }
}

impl fmt::Debug for TextInputViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputViewModel")
            .field("text", &self.text)
            .field("error_state", &self.error_state)
            .field("is_active", &self.is_active)
            .field("placeholder", &self.placeholder)
            .field("mode", &self.text_component_mode)
            .finish_non_exhaustive()
    }
}

impl TextInputViewModel {
    pub fn builder() -> TextInputViewModelBuilder {
        TextInputViewModelBuilder::default()
    }

    fn notify(&self, event: ViewModelEvent) {
        for observer in self.observers.live() {
            observer.view_model_changed(self, event);
        }
    }

    // ---- observers ----

    /// Bind the view that renders this model, replacing any previous one.
    pub fn bind_view(&mut self, view: Weak<dyn TextInputObserver>) {
        self.observers.bind(view);
    }

    pub fn unbind_view(&mut self) {
        self.observers.unbind();
    }

    pub fn is_bound_to(&self, view: &Weak<dyn TextInputObserver>) -> bool {
        self.observers.is_bound_to(view)
    }

    /// Registers a delegate. Slots of delegates that were dropped are
    /// released first.
    pub fn add_delegate(&mut self, delegate: Weak<dyn TextInputObserver>) -> ObserverKey {
        self.observers.prune();
        self.observers.subscribe(delegate)
    }

    pub fn delegate_count(&self) -> usize {
        self.observers.subscriber_count()
    }

    pub fn remove_delegate(&mut self, key: ObserverKey) -> bool {
        self.observers.unsubscribe(key)
    }

    // ---- text ----

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        let was_empty = self.text.is_empty();
        self.text = text;

        if let Some(validator) = self.input_validator.clone() {
            let outcome = validator(&self.text);
            self.apply_outcome(&outcome);
        }
        self.was_input_valid = !self.error_state.is_error();

        if self.placeholder.kind != PlaceholderKind::AlwaysOnTop
            && was_empty != self.text.is_empty()
        {
            self.notify(ViewModelEvent::StateChanged {
                placeholder_type_changed: true,
            });
        }
        self.notify(ViewModelEvent::TextChanged);
        if let Some(hook) = self.hooks.on_text_change.clone() {
            hook(&self.text);
        }
    }

    // ---- validation ----

    /// Run the action validator against the current text.
    pub fn validate(&mut self) -> bool {
        let outcome = (self.action_validator)(&self.text);
        self.apply_outcome(&outcome);
        self.was_action_valid = !self.error_state.is_error();
        self.notify(ViewModelEvent::StateChanged {
            placeholder_type_changed: false,
        });
        self.was_action_valid
    }

    /// Re-run the input validator (if any) against the current text.
    pub fn validate_input(&mut self) -> bool {
        if let Some(validator) = self.input_validator.clone() {
            let outcome = validator(&self.text);
            self.apply_outcome(&outcome);
        }
        self.was_input_valid = !self.error_state.is_error();
        self.was_input_valid
    }

    fn apply_outcome(&mut self, outcome: &ValidationOutcome) {
        self.error_link_action = match outcome {
            ValidationOutcome::Invalid { link_action, .. } => link_action.clone(),
            ValidationOutcome::Valid => None,
        };
        self.set_error_state(ErrorState::from(outcome));
    }

    pub fn set_input_validator(&mut self, validator: Option<Validator>) {
        self.input_validator = validator;
    }

    pub fn set_action_validator(&mut self, validator: impl Fn(&str) -> ValidationOutcome + 'static) {
        self.action_validator = Rc::new(validator);
    }

    // ---- state ----

    pub fn error_state(&self) -> &ErrorState {
        &self.error_state
    }

    /// Action of the link carried by the current error, if any.
    pub fn error_link_action(&self) -> Option<&LinkAction> {
        self.error_link_action.as_ref()
    }

    pub fn set_error_state(&mut self, state: ErrorState) {
        if state == self.error_state {
            return;
        }
        log::debug!("text input error state {:?} -> {:?}", self.error_state, state);
        if !matches!(state, ErrorState::LinkError { .. }) {
            self.error_link_action = None;
        }
        self.error_state = state;
        self.notify(ViewModelEvent::StateChanged {
            placeholder_type_changed: false,
        });
        if let Some(hook) = self.hooks.on_state_change.clone() {
            hook(&self.error_state);
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, active: bool) {
        log::debug!("text input active = {active}");
        self.is_active = active;
        self.notify(ViewModelEvent::StateChanged {
            placeholder_type_changed: false,
        });
    }

    // ---- help ----

    pub fn help_info(&self) -> &HelpInfo {
        &self.help_info
    }

    pub fn set_help(&mut self, help: HelpInfo) {
        self.help_info = help;
        self.notify(ViewModelEvent::HelpChanged);
    }

    /// Replace the help text, dropping any help link.
    pub fn update_help(&mut self, text: impl Into<String>) {
        self.set_help(HelpInfo::text(text));
    }

    /// Replace help info and error state together.
    pub fn update_help_with(
        &mut self,
        error_state: ErrorState,
        text: impl Into<String>,
        link_text: Option<String>,
        link_action: Option<LinkAction>,
    ) {
        let is_link_error = matches!(error_state, ErrorState::LinkError { .. });
        self.set_help(HelpInfo {
            text: text.into(),
            link_text,
            link_action: link_action.clone(),
        });
        if is_link_error {
            self.error_link_action = link_action;
        }
        let changed = error_state != self.error_state;
        self.set_error_state(error_state);
        // An unchanged link error still needs the new action shown.
        if is_link_error && !changed {
            self.notify(ViewModelEvent::HelpChanged);
        }
    }

    /// Help text unless the error state carries a message, which wins.
    pub fn help_display(&self) -> HelpDisplay {
        match &self.error_state {
            ErrorState::Normal => HelpDisplay {
                text: self.help_info.text.clone(),
                link_text: self.help_info.link_text.clone(),
                link_action: self.help_info.link_action.clone(),
            },
            ErrorState::Error { message } => HelpDisplay {
                text: message.clone(),
                link_text: None,
                link_action: None,
            },
            ErrorState::LinkError { message, link_text } => HelpDisplay {
                text: message.clone(),
                link_text: Some(link_text.clone()),
                link_action: self.error_link_action.clone(),
            },
        }
    }

    // ---- placeholder ----

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: Placeholder) {
        if placeholder == self.placeholder {
            return;
        }
        let type_changed = placeholder.kind != self.placeholder.kind;
        self.placeholder = placeholder;
        self.notify(ViewModelEvent::PlaceholderChanged { type_changed });
    }

    // ---- style ----

    /// Style with tint overrides applied.
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        if style == self.base_style {
            return;
        }
        self.base_style = style;
        self.restyle();
    }

    pub fn visual_state(&self) -> &VisualState {
        self.style
            .visual_state(self.is_active, self.error_state.is_error())
    }

    pub fn tint_color(&self) -> Option<Color> {
        self.tint_color
    }

    pub fn set_tint_color(&mut self, tint: Option<Color>) {
        self.tint_color = tint;
        self.restyle();
    }

    pub fn set_use_tint_color_for_active_line(&mut self, on: bool) {
        self.use_tint_color_for_active_line = on;
        self.restyle();
    }

    pub fn set_use_tint_color_for_active_title(&mut self, on: bool) {
        self.use_tint_color_for_active_title = on;
        self.restyle();
    }

    fn restyle(&mut self) {
        self.style = self.effective_style();
        self.notify(ViewModelEvent::StyleChanged);
    }

    fn effective_style(&self) -> Style {
        match self.tint_color {
            Some(tint) => self.base_style.clone().tinted(
                tint,
                self.use_tint_color_for_active_line,
                self.use_tint_color_for_active_title,
            ),
            None => self.base_style.clone(),
        }
    }

    // ---- component ----

    pub fn text_component_mode(&self) -> TextComponentMode {
        self.text_component_mode
    }

    pub fn set_text_component_mode(&mut self, mode: TextComponentMode) {
        if mode == self.text_component_mode {
            return;
        }
        self.text_component_mode = mode;
        self.notify(ViewModelEvent::TextComponentModeChanged);
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn set_formats(&mut self, formats: Vec<String>) {
        self.formats = formats;
        self.notify(ViewModelEvent::FormatsChanged);
    }

    pub fn format_selection_strategy(&self) -> FormatSelectionStrategy {
        self.format_selection_strategy
    }

    pub fn set_format_selection_strategy(&mut self, strategy: FormatSelectionStrategy) {
        self.format_selection_strategy = strategy;
        self.notify(ViewModelEvent::FormatsChanged);
    }

    pub fn format_symbols(&self) -> &FormatSymbols {
        &self.format_symbols
    }

    pub fn set_format_symbols(&mut self, symbols: FormatSymbols) {
        self.format_symbols = symbols;
        self.notify(ViewModelEvent::FormatSymbolsChanged);
    }

    pub fn right_button_info(&self) -> Option<&ButtonInfo> {
        self.right_button_info.as_ref()
    }

    pub fn set_right_button_info(&mut self, info: Option<ButtonInfo>) {
        self.right_button_info = info;
        self.notify(ViewModelEvent::RightButtonChanged);
    }

    // ---- editing hooks ----

    pub fn should_change_text(&self, range: Range<usize>, replacement: &str) -> bool {
        match &self.hooks.should_change_text {
            Some(hook) => hook(range, replacement),
            None => true,
        }
    }

    pub fn did_begin_editing(&self) {
        if let Some(hook) = &self.hooks.on_begin_editing {
            hook();
        }
    }

    pub fn did_end_editing(&self) {
        if let Some(hook) = &self.hooks.on_end_editing {
            hook();
        }
    }
}

pub struct TextInputViewModelBuilder {
    text: String,
    help: HelpInfo,
    style: Option<Style>,
    mode: TextComponentMode,
    placeholder: Placeholder,
    input_validator: Option<Validator>,
    action_validator: Option<Validator>,
    formats: Vec<String>,
    format_selection_strategy: FormatSelectionStrategy,
    format_symbols: FormatSymbols,
    right_button: Option<ButtonInfo>,
    max_lines_without_scrolling: usize,
    tint_color: Option<Color>,
}

impl Default for TextInputViewModelBuilder {
    fn default() -> Self {
        Self {
            text: String::new(),
            help: HelpInfo::default(),
            style: None,
            mode: TextComponentMode::default(),
            placeholder: Placeholder::default(),
            input_validator: None,
            action_validator: None,
            formats: Vec::new(),
            format_selection_strategy: FormatSelectionStrategy::default(),
            format_symbols: default_format_symbols(),
            right_button: None,
            max_lines_without_scrolling: 3,
            tint_color: None,
        }
    }
}

impl TextInputViewModelBuilder {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = HelpInfo::text(help);
        self
    }

    pub fn help_info(mut self, help: HelpInfo) -> Self {
        self.help = help;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn mode(mut self, mode: TextComponentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn input_validator(mut self, f: impl Fn(&str) -> ValidationOutcome + 'static) -> Self {
        self.input_validator = Some(Rc::new(f));
        self
    }

    pub fn action_validator(mut self, f: impl Fn(&str) -> ValidationOutcome + 'static) -> Self {
        self.action_validator = Some(Rc::new(f));
        self
    }

    pub fn formats(mut self, formats: Vec<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn format_selection_strategy(mut self, strategy: FormatSelectionStrategy) -> Self {
        self.format_selection_strategy = strategy;
        self
    }

    pub fn format_symbols(mut self, symbols: FormatSymbols) -> Self {
        self.format_symbols = symbols;
        self
    }

    pub fn right_button(mut self, info: ButtonInfo) -> Self {
        self.right_button = Some(info);
        self
    }

    pub fn max_lines_without_scrolling(mut self, lines: usize) -> Self {
        self.max_lines_without_scrolling = lines.max(1);
        self
    }

    pub fn tint_color(mut self, tint: Color) -> Self {
        self.tint_color = Some(tint);
        self
    }

    pub fn build(self) -> TextInputViewModel {
        let base_style = self.style.unwrap_or_default();
        let mut vm = TextInputViewModel {
            text: self.text,
            help_info: self.help,
            error_state: ErrorState::Normal,
            error_link_action: None,
            is_active: false,
            placeholder: self.placeholder,
            style: base_style.clone(),
            base_style,
            text_component_mode: self.mode,
            formats: self.formats,
            format_selection_strategy: self.format_selection_strategy,
            format_symbols: self.format_symbols,
            right_button_info: self.right_button,
            max_lines_without_scrolling: self.max_lines_without_scrolling,
            input_validator: self.input_validator,
            action_validator: self
                .action_validator
                .unwrap_or_else(|| Rc::new(|_: &str| ValidationOutcome::Valid)),
            use_tint_color_for_active_line: true,
            use_tint_color_for_active_title: true,
            tint_color: self.tint_color,
            was_input_valid: true,
            was_action_valid: false,
            hooks: Hooks::default(),
            observers: Observers::new(),
        };
        vm.style = vm.effective_style();
        vm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recorder {
        name: &'static str,
        events: RefCell<Vec<ViewModelEvent>>,
        log: Option<Rc<RefCell<Vec<&'static str>>>>,
    }

    impl TextInputObserver for Recorder {
        fn view_model_changed(&self, _vm: &TextInputViewModel, event: ViewModelEvent) {
            self.events.borrow_mut().push(event);
            if let Some(log) = &self.log {
                log.borrow_mut().push(self.name);
            }
        }
    }

    fn too_long(text: &str) -> ValidationOutcome {
        if text.chars().count() > 5 {
            ValidationOutcome::invalid("Too long")
        } else {
            ValidationOutcome::Valid
        }
    }

    fn observed(vm: &mut TextInputViewModel) -> Rc<Recorder> {
        let rec = Rc::new(Recorder::default());
        let weak: Weak<dyn TextInputObserver> = Rc::downgrade(&rec) as Weak<dyn TextInputObserver>;
        vm.add_delegate(weak);
        rec
    }

    #[test]
    fn input_validator_drives_error_state() {
        let mut vm = TextInputViewModel::builder().input_validator(too_long).build();
        vm.set_text("123456");
        assert_eq!(
            vm.error_state(),
            &ErrorState::Error {
                message: "Too long".into()
            }
        );
        assert!(!vm.was_input_valid);

        vm.set_text("123");
        assert_eq!(vm.error_state(), &ErrorState::Normal);
        assert!(vm.was_input_valid);
    }

    #[test]
    fn setting_same_text_is_silent() {
        let mut vm = TextInputViewModel::builder().text("abc").build();
        let rec = observed(&mut vm);
        vm.set_text("abc");
        assert!(rec.events.borrow().is_empty());
    }

    #[test]
    fn emptiness_flip_reports_placeholder_type_change() {
        let mut vm = TextInputViewModel::builder().build();
        let rec = observed(&mut vm);
        vm.set_text("a");
        vm.set_text("ab");
        assert_eq!(
            *rec.events.borrow(),
            vec![
                ViewModelEvent::StateChanged {
                    placeholder_type_changed: true
                },
                ViewModelEvent::TextChanged,
                ViewModelEvent::TextChanged,
            ]
        );
    }

    #[test]
    fn always_on_top_skips_emptiness_state_change() {
        let mut vm = TextInputViewModel::builder()
            .placeholder(Placeholder::new(PlaceholderKind::AlwaysOnTop, "Name"))
            .build();
        let rec = observed(&mut vm);
        vm.set_text("a");
        assert_eq!(*rec.events.borrow(), vec![ViewModelEvent::TextChanged]);
    }

    #[test]
    fn validate_uses_action_validator() {
        let mut vm = TextInputViewModel::builder()
            .text("x")
            .action_validator(|t| {
                if t == "ok" {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::invalid("Nope")
                }
            })
            .build();
        let rec = observed(&mut vm);
        assert!(!vm.validate());
        assert!(!vm.was_action_valid);
        assert!(vm.error_state().is_error());
        assert_eq!(
            rec.events.borrow().last(),
            Some(&ViewModelEvent::StateChanged {
                placeholder_type_changed: false
            })
        );

        vm.set_text("ok");
        assert!(vm.validate());
        assert!(vm.was_action_valid);
    }

    #[test]
    fn validate_ignores_last_input_result() {
        let mut vm = TextInputViewModel::builder()
            .input_validator(too_long)
            .action_validator(|t| {
                if t.contains('@') {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::invalid("Missing @")
                }
            })
            .build();

        vm.set_text("123456");
        assert!(!vm.was_input_valid);
        assert!(!vm.validate());
        assert_eq!(
            vm.error_state(),
            &ErrorState::Error {
                message: "Missing @".into()
            }
        );

        // input says too long, action says fine: validate() trusts the action validator
        vm.set_text("1234@6");
        assert_eq!(
            vm.error_state(),
            &ErrorState::Error {
                message: "Too long".into()
            }
        );
        assert!(vm.validate());
        assert_eq!(vm.error_state(), &ErrorState::Normal);
        assert!(vm.was_action_valid);
        assert!(!vm.was_input_valid);

        vm.set_text("12");
        assert_eq!(vm.error_state(), &ErrorState::Normal);
        assert!(!vm.validate());
        assert!(!vm.was_action_valid);
    }

    #[test]
    fn update_help_replaces_text_and_link() {
        let mut vm = TextInputViewModel::builder()
            .help_info(HelpInfo {
                text: "See docs".into(),
                link_text: Some("docs".into()),
                link_action: Some(Rc::new(|| {})),
            })
            .build();
        let rec = observed(&mut vm);
        vm.update_help("Plain help");
        assert_eq!(*rec.events.borrow(), vec![ViewModelEvent::HelpChanged]);
        let shown = vm.help_display();
        assert_eq!(shown.text, "Plain help");
        assert_eq!(shown.link_text, None);
        assert!(shown.link_action.is_none());
    }

    #[test]
    fn update_help_with_link_error_carries_its_action() {
        let fired = Rc::new(Cell::new(0));
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        let link_error = ErrorState::LinkError {
            message: "Taken. Recover".into(),
            link_text: "Recover".into(),
        };

        let counter = fired.clone();
        vm.update_help_with(
            link_error.clone(),
            "Taken. Recover",
            Some("Recover".into()),
            Some(Rc::new(move || counter.set(counter.get() + 1))),
        );
        assert_eq!(vm.error_state(), &link_error);
        let shown = vm.help_display();
        assert_eq!(shown.link_text.as_deref(), Some("Recover"));
        (shown.link_action.expect("link error keeps its action"))();
        assert_eq!(fired.get(), 1);

        // same state, new action: still announced and swapped in
        let counter = fired.clone();
        rec.events.borrow_mut().clear();
        vm.update_help_with(
            link_error,
            "Taken. Recover",
            Some("Recover".into()),
            Some(Rc::new(move || counter.set(counter.get() + 10))),
        );
        assert_eq!(
            *rec.events.borrow(),
            vec![ViewModelEvent::HelpChanged, ViewModelEvent::HelpChanged]
        );
        (vm.help_display().link_action.expect("replaced action"))();
        assert_eq!(fired.get(), 11);

        vm.update_help_with(ErrorState::Normal, "All good", None, None);
        assert!(vm.error_link_action().is_none());
        assert_eq!(vm.help_display().text, "All good");
    }

    #[test]
    fn error_state_notifies_only_on_change() {
        let calls = Rc::new(Cell::new(0));
        let mut vm = TextInputViewModel::builder().build();
        let counter = calls.clone();
        vm.hooks.on_state_change = Some(Rc::new(move |_| counter.set(counter.get() + 1)));
        let rec = observed(&mut vm);

        vm.set_error_state(ErrorState::Error {
            message: "bad".into(),
        });
        vm.set_error_state(ErrorState::Error {
            message: "bad".into(),
        });
        assert_eq!(rec.events.borrow().len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn set_active_always_notifies() {
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        vm.set_active(false);
        vm.set_active(false);
        assert_eq!(rec.events.borrow().len(), 2);
    }

    #[test]
    fn bound_view_hears_first_and_rebinding_replaces() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = |name| {
            Rc::new(Recorder {
                name,
                log: Some(log.clone()),
                ..Recorder::default()
            })
        };
        let (first, second, delegate) = (make("first"), make("second"), make("delegate"));
        let mut vm = TextInputViewModel::default();
        vm.add_delegate(Rc::downgrade(&delegate) as Weak<dyn TextInputObserver>);
        vm.bind_view(Rc::downgrade(&first) as Weak<dyn TextInputObserver>);
        vm.bind_view(Rc::downgrade(&second) as Weak<dyn TextInputObserver>);

        vm.update_help("hi");
        assert_eq!(*log.borrow(), vec!["second", "delegate"]);
        assert!(first.events.borrow().is_empty());
    }

    #[test]
    fn dropped_delegate_is_skipped() {
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        drop(rec);
        vm.set_text("still fine");
        assert_eq!(vm.text(), "still fine");
    }

    #[test]
    fn adding_a_delegate_releases_dropped_ones() {
        let mut vm = TextInputViewModel::default();
        for _ in 0..3 {
            drop(observed(&mut vm));
        }
        let kept = observed(&mut vm);
        assert_eq!(vm.delegate_count(), 1);

        vm.set_text("x");
        assert!(kept.events.borrow().contains(&ViewModelEvent::TextChanged));
    }

    #[test]
    fn error_message_replaces_help() {
        let mut vm = TextInputViewModel::builder().help("Up to 5 digits").build();
        assert_eq!(vm.help_display().text, "Up to 5 digits");

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        vm.set_input_validator(Some(Rc::new(move |_: &str| {
            let flag = flag.clone();
            ValidationOutcome::invalid_with_link("Taken", "Recover", move || flag.set(true))
        })));
        vm.set_text("me");
        let shown = vm.help_display();
        assert_eq!(shown.text, "Taken");
        assert_eq!(shown.link_text.as_deref(), Some("Recover"));
        if let Some(action) = shown.link_action {
            action();
        }
        assert!(fired.get());
    }

    #[test]
    fn placeholder_change_reports_type_change() {
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        vm.set_placeholder(Placeholder::new(PlaceholderKind::Normal, "A"));
        vm.set_placeholder(Placeholder::new(PlaceholderKind::Animated, "A"));
        vm.set_placeholder(Placeholder::new(PlaceholderKind::Animated, "A"));
        assert_eq!(
            *rec.events.borrow(),
            vec![
                ViewModelEvent::PlaceholderChanged {
                    type_changed: false
                },
                ViewModelEvent::PlaceholderChanged { type_changed: true },
            ]
        );
    }

    #[test]
    fn tint_recolors_active_line() {
        let tint = Color::from_hex("#00FF00");
        let mut vm = TextInputViewModel::builder().tint_color(tint).build();
        vm.set_active(true);
        assert_eq!(vm.visual_state().line_color, tint);

        vm.set_use_tint_color_for_active_line(false);
        assert_ne!(vm.visual_state().line_color, tint);
        assert_eq!(vm.visual_state().title_text_attributes.color, Some(tint));
    }

    #[test]
    fn unchanged_style_is_silent() {
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        vm.set_style(Style::default());
        assert!(rec.events.borrow().is_empty());
        let mut style = Style::default();
        style.normal_inactive.line_height = 3.0;
        vm.set_style(style);
        assert_eq!(*rec.events.borrow(), vec![ViewModelEvent::StyleChanged]);
    }

    #[test]
    fn mode_change_notifies_once() {
        let mut vm = TextInputViewModel::default();
        let rec = observed(&mut vm);
        vm.set_text_component_mode(TextComponentMode::TextView);
        vm.set_text_component_mode(TextComponentMode::TextView);
        assert_eq!(
            *rec.events.borrow(),
            vec![ViewModelEvent::TextComponentModeChanged]
        );
    }
}
