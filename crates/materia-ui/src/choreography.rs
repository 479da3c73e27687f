//! Where the title and the floating placeholder should end up for a given
//! field state. Pure; the field animates toward whatever this returns.

use materia_core::{Rect, Transform};

use crate::view_model::PlaceholderKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelInputs {
    pub kind: PlaceholderKind,
    pub is_active: bool,
    /// Both the model text and the formatted input text are empty.
    pub is_empty: bool,
    pub title_frame: Rect,
    pub placeholder_frame: Rect,
    pub title_font_size: f32,
    pub body_font_size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelTargets {
    pub title_alpha: f32,
    pub placeholder_alpha: f32,
    pub title_transform: Transform,
    pub placeholder_transform: Transform,
    /// `false` when the change should apply without a placeholder animation.
    pub animate_placeholder: bool,
}

pub fn label_targets(inputs: &LabelInputs) -> LabelTargets {
    let visible = |on: bool| if on { 1.0 } else { 0.0 };
    match inputs.kind {
        PlaceholderKind::Normal => LabelTargets {
            title_alpha: 0.0,
            placeholder_alpha: visible(inputs.is_empty),
            title_transform: Transform::identity(),
            placeholder_transform: Transform::identity(),
            animate_placeholder: false,
        },
        PlaceholderKind::Animated if inputs.is_active || !inputs.is_empty => {
            let scale = if inputs.body_font_size > 0.0 {
                inputs.title_font_size / inputs.body_font_size
            } else {
                1.0
            };
            LabelTargets {
                title_alpha: 1.0,
                placeholder_alpha: 0.0,
                title_transform: Transform::identity(),
                placeholder_transform: Transform::scale_onto(
                    inputs.placeholder_frame,
                    inputs.title_frame.origin(),
                    scale,
                ),
                animate_placeholder: true,
            }
        }
        PlaceholderKind::Animated => {
            // Nothing to collapse onto before the title has been laid out.
            let title_transform = if inputs.title_frame.w > 0.0 {
                Transform::between(inputs.title_frame, inputs.placeholder_frame)
            } else {
                Transform::identity()
            };
            LabelTargets {
                title_alpha: 0.0,
                placeholder_alpha: 1.0,
                title_transform,
                placeholder_transform: Transform::identity(),
                animate_placeholder: true,
            }
        }
        PlaceholderKind::AlwaysOnTop => LabelTargets {
            title_alpha: 1.0,
            placeholder_alpha: 0.0,
            title_transform: Transform::identity(),
            placeholder_transform: Transform::identity(),
            animate_placeholder: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(kind: PlaceholderKind, is_active: bool, is_empty: bool) -> LabelInputs {
        LabelInputs {
            kind,
            is_active,
            is_empty,
            title_frame: Rect::new(0.0, 0.0, 60.0, 15.0),
            placeholder_frame: Rect::new(0.0, 18.0, 80.0, 20.0),
            title_font_size: 12.0,
            body_font_size: 16.0,
        }
    }

    #[test]
    fn normal_placeholder_tracks_emptiness() {
        for active in [false, true] {
            for empty in [false, true] {
                let t = label_targets(&inputs(PlaceholderKind::Normal, active, empty));
                assert_eq!(t.placeholder_alpha > 0.0, empty);
                assert_eq!(t.title_alpha, 0.0);
                assert!(t.placeholder_transform.is_identity());
                assert!(!t.animate_placeholder);
            }
        }
    }

    #[test]
    fn always_on_top_keeps_title() {
        for active in [false, true] {
            for empty in [false, true] {
                let t = label_targets(&inputs(PlaceholderKind::AlwaysOnTop, active, empty));
                assert_eq!(t.title_alpha, 1.0);
                assert_eq!(t.placeholder_alpha, 0.0);
            }
        }
    }

    #[test]
    fn animated_placeholder_lands_on_title_origin() {
        let i = inputs(PlaceholderKind::Animated, true, true);
        let t = label_targets(&i);
        assert_eq!(t.title_alpha, 1.0);
        assert_eq!(t.placeholder_alpha, 0.0);
        let moved = t.placeholder_transform.apply_to_rect(i.placeholder_frame);
        assert!(moved.x.abs() < 1e-4);
        assert!(moved.y.abs() < 1e-4);
        assert!((moved.w - 60.0).abs() < 1e-4);
    }

    #[test]
    fn animated_title_collapses_onto_placeholder_when_idle() {
        let i = inputs(PlaceholderKind::Animated, false, true);
        let t = label_targets(&i);
        assert_eq!(t.placeholder_alpha, 1.0);
        assert_eq!(t.title_alpha, 0.0);
        let collapsed = t.title_transform.apply_to_rect(i.title_frame);
        assert!((collapsed.y - i.placeholder_frame.y).abs() < 1e-4);
        assert!((collapsed.h - i.placeholder_frame.h).abs() < 1e-4);

        let unlaid = LabelInputs {
            title_frame: Rect::default(),
            ..i
        };
        assert!(label_targets(&unlaid).title_transform.is_identity());
    }
}
