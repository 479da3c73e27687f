use crate::{Color, Rect, StyledText, Transform};

/// Flat paint list a widget hands to the host renderer.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        rect: Rect,
        text: StyledText,
        alpha: f32,
        transform: Transform,
    },
    Image {
        rect: Rect,
        name: String,
    },
}

impl Scene {
    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Text nodes that would actually show up.
    pub fn visible_text(&self) -> impl Iterator<Item = &StyledText> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Text { text, alpha, .. } if *alpha > 0.0 && !text.is_empty() => Some(text),
            _ => None,
        })
    }
}
