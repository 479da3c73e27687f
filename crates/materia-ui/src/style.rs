use materia_core::{Color, Font, ParagraphStyle, TextAttributes, Theme, theme};

/// Look of the field for one (active × error) combination.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualState {
    pub help_text_attributes: TextAttributes,
    pub title_text_attributes: TextAttributes,
    pub link_text_attributes: TextAttributes,
    pub background_color: Color,
    pub line_color: Color,
    pub line_height: f32,
}

impl VisualState {
    fn themed(theme: &Theme, accent: Color, line_height: f32) -> Self {
        let caption = Font::system(Font::CAPTION_SIZE);
        Self {
            help_text_attributes: TextAttributes::new()
                .font(caption.clone())
                .color(if accent == theme.error {
                    theme.error
                } else {
                    theme.on_surface_variant
                }),
            title_text_attributes: TextAttributes::new().font(caption.clone()).color(accent),
            link_text_attributes: TextAttributes::new()
                .font(caption)
                .color(theme.link)
                .underlined(),
            background_color: Color::TRANSPARENT,
            line_color: accent,
            line_height,
        }
    }
}

/// Four visual states plus the attributes shared by all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub normal_active: VisualState,
    pub normal_inactive: VisualState,
    pub error_active: VisualState,
    pub error_inactive: VisualState,
    /// Attributes of the editable text.
    pub text_attributes: TextAttributes,
    /// Attributes of the floating placeholder while it sits in the input.
    pub placeholder_attributes: TextAttributes,
}

impl Style {
    pub fn from_theme(theme: &Theme) -> Self {
        let body = Font::system(Font::BODY_SIZE);
        Self {
            normal_active: VisualState::themed(theme, theme.primary, 2.0),
            normal_inactive: VisualState::themed(theme, theme.outline, 1.0),
            error_active: VisualState::themed(theme, theme.error, 2.0),
            error_inactive: VisualState::themed(theme, theme.error, 1.0),
            text_attributes: TextAttributes::new()
                .font(body.clone())
                .color(theme.on_surface)
                .paragraph(ParagraphStyle::default()),
            placeholder_attributes: TextAttributes::new()
                .font(body)
                .color(theme.on_surface_variant)
                .paragraph(ParagraphStyle::default()),
        }
    }

    pub fn visual_state(&self, is_active: bool, is_error: bool) -> &VisualState {
        match (is_active, is_error) {
            (true, false) => &self.normal_active,
            (false, false) => &self.normal_inactive,
            (true, true) => &self.error_active,
            (false, true) => &self.error_inactive,
        }
    }

    pub fn visual_state_mut(&mut self, is_active: bool, is_error: bool) -> &mut VisualState {
        match (is_active, is_error) {
            (true, false) => &mut self.normal_active,
            (false, false) => &mut self.normal_inactive,
            (true, true) => &mut self.error_active,
            (false, true) => &mut self.error_inactive,
        }
    }

    /// Recolor the active non-error title and/or line with `tint`.
    pub(crate) fn tinted(mut self, tint: Color, line: bool, title: bool) -> Self {
        if line {
            self.normal_active.line_color = tint;
        }
        if title {
            self.normal_active.title_text_attributes.color = Some(tint);
        }
        self
    }
}

impl Default for Style {
    /// Built from the theme currently in scope.
    fn default() -> Self {
        Self::from_theme(&theme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_state_round_trip_touches_only_one_state() {
        let original = Style::default();
        let mut style = original.clone();
        let red = Color::from_hex("#FF0000");
        style.visual_state_mut(true, true).line_color = red;

        assert_eq!(style.visual_state(true, true).line_color, red);
        assert_eq!(style.normal_active, original.normal_active);
        assert_eq!(style.normal_inactive, original.normal_inactive);
        assert_eq!(style.error_inactive, original.error_inactive);
    }

    #[test]
    fn selector_covers_all_four_states() {
        let style = Style::default();
        assert_eq!(style.visual_state(true, false).line_height, 2.0);
        assert_eq!(style.visual_state(false, false).line_height, 1.0);
        assert_eq!(
            style.visual_state(false, true).line_color,
            Theme::default().error
        );
    }

    #[test]
    fn tint_overrides_active_title_and_line() {
        let tint = Color::from_hex("#123456");
        let style = Style::default().tinted(tint, true, true);
        assert_eq!(style.normal_active.line_color, tint);
        assert_eq!(style.normal_active.title_text_attributes.color, Some(tint));
        assert_ne!(style.error_active.line_color, tint);
    }
}
