//! Text input widgets.
//!
//! - [`TextInputViewModel`]: the model of one field. Setters notify the bound
//!   view and any delegates.
//! - [`FloatingLabelField`]: renders a model with a title that floats above
//!   the input, an underline, a help/error label and an optional trailing
//!   button.
//! - [`ClickableLabel`]: rich text with tappable link substrings, used for
//!   the field's help line and usable on its own.
//!
//! ```rust
//! use std::rc::Rc;
//! use materia_text::ApproxTextLayout;
//! use materia_ui::*;
//!
//! let vm = TextInputViewModel::builder()
//!     .placeholder(Placeholder::new(PlaceholderKind::Animated, "Name"))
//!     .help("As on your passport")
//!     .build();
//! let mut field = FloatingLabelField::with_layout(vm, Rc::new(ApproxTextLayout::default()));
//!
//! field.focus();
//! field.type_text("Ada");
//! assert_eq!(field.view_model().text(), "Ada");
//! assert_eq!(field.snapshot().help_text, "As on your passport");
//! ```

pub mod choreography;
pub mod clickable;
pub mod field;
pub mod input;
pub mod layout;
pub mod style;
pub mod validation;
pub mod view_model;

pub use choreography::{LabelInputs, LabelTargets, label_targets};
pub use clickable::{ClickableLabel, ClickableText, Link, TouchResponse};
pub use field::{
    FieldAccessibility, FieldConfig, FieldDelegate, FieldSnapshot, FieldView, FloatingLabelField,
};
pub use input::{
    CharacterClass, FormatSelectionStrategy, FormatSymbols, FormattableInput, InputFactory,
    PlainInput, TextComponentMode, default_format_symbols, plain_input_factory,
};
pub use layout::{FieldFrames, FieldMetrics, LayoutError, layout_field};
pub use style::{Style, VisualState};
pub use validation::{ErrorState, LinkAction, ValidationOutcome, Validator};
pub use view_model::{
    ButtonInfo, HelpDisplay, HelpInfo, Hooks, Placeholder, PlaceholderKind, TextInputObserver,
    TextInputViewModel, TextInputViewModelBuilder, ViewModelEvent,
};
