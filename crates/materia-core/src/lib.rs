//! # Core types for materia widgets
//!
//! Everything in here is host‑agnostic plain data plus a few small runtime
//! pieces the widgets in `materia-ui` share:
//!
//! - geometry (`Vec2`, `Size`, `Rect`, `Transform`) and `Color`,
//! - `StyledText`: a string with attribute runs,
//! - `TextLayout`: the host text layout capability, as a trait,
//! - `AnimatedValue` driven by a per‑thread `Clock`,
//! - `Observers`: weak observer registry used by view models,
//! - `Theme` locals, `Semantics` and the `Scene` paint list.
//!
//! ## Animations
//!
//! Widgets never spawn timers. They retarget `AnimatedValue`s and the host
//! calls their `advance()` once per frame:
//!
//! ```rust
//! use materia_core::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::install();
//! let mut alpha = AnimatedValue::new(0.0f32, AnimationSpec::linear(Duration::from_millis(100)));
//! alpha.set_target(1.0);
//! clock.advance(Duration::from_millis(50));
//! alpha.update();
//! assert!((*alpha.get() - 0.5).abs() < 0.01);
//! ```
//!
//! All of it is single‑threaded: `Rc`, `RefCell` and thread‑locals, driven
//! from the host's UI loop.

pub mod animation;
pub mod color;
pub mod geometry;
pub mod layout;
pub mod locals;
pub mod observer;
pub mod scene;
pub mod semantics;
pub mod text;

pub use animation::*;
pub use color::*;
pub use geometry::*;
pub use layout::*;
pub use locals::*;
pub use observer::*;
pub use scene::*;
pub use semantics::*;
pub use text::*;
