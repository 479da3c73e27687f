use std::fmt;
use std::rc::Rc;

/// Callback attached to a tappable link inside help or error text.
pub type LinkAction = Rc<dyn Fn()>;

/// Validator run against the whole current text.
pub type Validator = Rc<dyn Fn(&str) -> ValidationOutcome>;

/// What a validator says about a piece of text.
#[derive(Clone)]
pub enum ValidationOutcome {
    Valid,
    Invalid {
        message: String,
        link_text: Option<String>,
        link_action: Option<LinkAction>,
    },
}

impl ValidationOutcome {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            link_text: None,
            link_action: None,
        }
    }

    pub fn invalid_with_link(
        message: impl Into<String>,
        link_text: impl Into<String>,
        link_action: impl Fn() + 'static,
    ) -> Self {
        Self::Invalid {
            message: message.into(),
            link_text: Some(link_text.into()),
            link_action: Some(Rc::new(link_action)),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Debug for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("Valid"),
            Self::Invalid {
                message,
                link_text,
                link_action,
            } => f
                .debug_struct("Invalid")
                .field("message", message)
                .field("link_text", link_text)
                .field("has_action", &link_action.is_some())
                .finish(),
        }
    }
}

/// Error part of the field state. Compared structurally; link actions are
/// not part of the state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ErrorState {
    #[default]
    Normal,
    Error {
        message: String,
    },
    LinkError {
        message: String,
        link_text: String,
    },
}

impl ErrorState {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Normal => None,
            Self::Error { message } | Self::LinkError { message, .. } => Some(message),
        }
    }

    pub fn link_text(&self) -> Option<&str> {
        match self {
            Self::LinkError { link_text, .. } => Some(link_text),
            _ => None,
        }
    }
}

impl From<&ValidationOutcome> for ErrorState {
    fn from(outcome: &ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => ErrorState::Normal,
            ValidationOutcome::Invalid {
                message,
                link_text: Some(link_text),
                ..
            } => ErrorState::LinkError {
                message: message.clone(),
                link_text: link_text.clone(),
            },
            ValidationOutcome::Invalid { message, .. } => ErrorState::Error {
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_to_error_state() {
        assert_eq!(ErrorState::from(&ValidationOutcome::Valid), ErrorState::Normal);
        assert_eq!(
            ErrorState::from(&ValidationOutcome::invalid("too long")),
            ErrorState::Error {
                message: "too long".into()
            }
        );
        let linked = ValidationOutcome::invalid_with_link("taken", "Recover", || {});
        let state = ErrorState::from(&linked);
        assert!(state.is_error());
        assert_eq!(state.message(), Some("taken"));
        assert_eq!(state.link_text(), Some("Recover"));
    }

    #[test]
    fn normal_has_no_message() {
        assert!(!ErrorState::Normal.is_error());
        assert_eq!(ErrorState::Normal.message(), None);
    }
}
