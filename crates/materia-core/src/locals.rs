//! # Theming
//!
//! Widgets read their default colors from a thread‑local `Theme`. Override it
//! for a block of code with `with_theme`:
//!
//! ```rust
//! use materia_core::*;
//!
//! let light = Theme {
//!     surface: Color::WHITE,
//!     on_surface: Color::from_hex("#222222"),
//!     primary: Color::from_hex("#0061A4"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     assert_eq!(theme().surface, Color::WHITE);
//! });
//! ```

use std::cell::RefCell;

use crate::Color;

thread_local! {
    static THEMES: RefCell<Vec<Theme>> = const { RefCell::new(Vec::new()) };
}

/// Pops the pushed theme even if the scoped closure unwinds.
struct PopOnDrop;

impl Drop for PopOnDrop {
    fn drop(&mut self) {
        THEMES.with(|t| {
            t.borrow_mut().pop();
        });
    }
}

/// Color roles the text input widgets draw from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Field background.
    pub surface: Color,
    /// Input text color.
    pub on_surface: Color,
    /// Placeholder and inactive title color.
    pub on_surface_variant: Color,
    /// Active line and title color.
    pub primary: Color,
    /// Inactive underline.
    pub outline: Color,
    /// Error line, title and message color.
    pub error: Color,
    /// Tappable text.
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color::TRANSPARENT,
            on_surface: Color::from_hex("#222222"),
            on_surface_variant: Color::from_hex("#8A8A8E"),
            primary: Color::from_hex("#34AF82"),
            outline: Color::from_hex("#C8C8CC"),
            error: Color::from_hex("#ae3636"),
            link: Color::LINK,
        }
    }
}

/// Run `f` with `theme` as the current theme; nested calls shadow outer ones.
pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    THEMES.with(|t| t.borrow_mut().push(theme));
    let _pop = PopOnDrop;
    f()
}

/// The innermost theme installed with [`with_theme`], else the default.
pub fn theme() -> Theme {
    THEMES.with(|t| t.borrow().last().copied().unwrap_or_default())
}
