//! Text layout backends implementing [`materia_core::TextLayout`].
//!
//! [`CosmicTextLayout`] shapes with cosmic-text against the system fonts.
//! [`ApproxTextLayout`] uses fixed advances and never touches a font file,
//! which keeps headless runs and tests reproducible.

mod approx;
mod cosmic;

pub use approx::ApproxTextLayout;
pub use cosmic::CosmicTextLayout;
