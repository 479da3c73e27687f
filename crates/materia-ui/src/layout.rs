use materia_core::{Rect, Size};
use taffy::NodeId;
use taffy::geometry::{Rect as Edges, Size as TaffySize};
use taffy::prelude::{AvailableSpace, Position, TaffyTree, auto, length, percent};
use taffy::style::{FlexDirection, Style as Node};

/// Width of the trailing button; it also overhangs the field by `BUTTON_OVERHANG`.
pub const BUTTON_SIZE: f32 = 40.0;
pub const BUTTON_OVERHANG: f32 = 8.0;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("field width must be positive and finite, got {0}")]
    InvalidWidth(f32),
    #[error(transparent)]
    Taffy(#[from] taffy::TaffyError),
}

/// Measured sizes a field feeds into its layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldMetrics {
    pub width: f32,
    pub title: Size,
    pub input_height: f32,
    pub line_thickness: f32,
    pub help_height: f32,
    pub has_button: bool,
    pub title_gap: f32,
    pub line_gap: f32,
    pub help_gap: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldFrames {
    pub title: Rect,
    pub input: Rect,
    pub button: Option<Rect>,
    pub line: Rect,
    pub help: Rect,
    pub size: Size,
}

fn frame(tree: &TaffyTree<()>, node: NodeId, dx: f32, dy: f32) -> Result<Rect, LayoutError> {
    let l = tree.layout(node)?;
    Ok(Rect::new(
        l.location.x + dx,
        l.location.y + dy,
        l.size.width,
        l.size.height,
    ))
}

/// Column of title, input row, underline and help; the button is pinned to
/// the input row's trailing edge.
pub fn layout_field(m: &FieldMetrics) -> Result<FieldFrames, LayoutError> {
    if !(m.width.is_finite() && m.width > 0.0) {
        return Err(LayoutError::InvalidWidth(m.width));
    }
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let title = tree.new_leaf(Node {
        size: TaffySize {
            width: length(m.title.width.min(m.width)),
            height: length(m.title.height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let input = tree.new_leaf(Node {
        flex_grow: 1.0,
        flex_shrink: 1.0,
        flex_basis: length(0.0),
        size: TaffySize {
            width: auto(),
            height: percent(1.0),
        },
        margin: Edges {
            left: length(0.0),
            right: length(if m.has_button {
                BUTTON_SIZE - BUTTON_OVERHANG
            } else {
                0.0
            }),
            top: length(0.0),
            bottom: length(0.0),
        },
        ..Default::default()
    })?;

    let mut row_children = vec![input];
    let button = if m.has_button {
        let node = tree.new_leaf(Node {
            position: Position::Absolute,
            size: TaffySize {
                width: length(BUTTON_SIZE),
                height: length(BUTTON_SIZE),
            },
            inset: Edges {
                left: auto(),
                right: length(-BUTTON_OVERHANG),
                top: length((m.input_height - BUTTON_SIZE) / 2.0),
                bottom: auto(),
            },
            ..Default::default()
        })?;
        row_children.push(node);
        Some(node)
    } else {
        None
    };

    let row = tree.new_with_children(
        Node {
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            size: TaffySize {
                width: percent(1.0),
                height: length(m.input_height),
            },
            margin: Edges {
                left: length(0.0),
                right: length(0.0),
                top: length(m.title_gap),
                bottom: length(0.0),
            },
            ..Default::default()
        },
        &row_children,
    )?;

    // The underline's bottom edge sits `line_gap` below the input.
    let line = tree.new_leaf(Node {
        flex_shrink: 0.0,
        size: TaffySize {
            width: percent(1.0),
            height: length(m.line_thickness),
        },
        margin: Edges {
            left: length(0.0),
            right: length(0.0),
            top: length(m.line_gap - m.line_thickness),
            bottom: length(0.0),
        },
        ..Default::default()
    })?;

    let help = tree.new_leaf(Node {
        flex_shrink: 0.0,
        size: TaffySize {
            width: percent(1.0),
            height: length(m.help_height),
        },
        margin: Edges {
            left: length(0.0),
            right: length(0.0),
            top: length(m.help_gap),
            bottom: length(0.0),
        },
        ..Default::default()
    })?;

    let root = tree.new_with_children(
        Node {
            flex_direction: FlexDirection::Column,
            size: TaffySize {
                width: length(m.width),
                height: auto(),
            },
            ..Default::default()
        },
        &[title, row, line, help],
    )?;

    tree.compute_layout(
        root,
        TaffySize {
            width: AvailableSpace::Definite(m.width),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let row_frame = frame(&tree, row, 0.0, 0.0)?;
    let root_layout = tree.layout(root)?;
    Ok(FieldFrames {
        title: frame(&tree, title, 0.0, 0.0)?,
        input: frame(&tree, input, row_frame.x, row_frame.y)?,
        button: match button {
            Some(node) => Some(frame(&tree, node, row_frame.x, row_frame.y)?),
            None => None,
        },
        line: frame(&tree, line, 0.0, 0.0)?,
        help: frame(&tree, help, 0.0, 0.0)?,
        size: Size::new(root_layout.size.width, root_layout.size.height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(has_button: bool) -> FieldMetrics {
        FieldMetrics {
            width: 300.0,
            title: Size::new(80.0, 15.0),
            input_height: 20.0,
            line_thickness: 1.0,
            help_height: 16.0,
            has_button,
            title_gap: 3.0,
            line_gap: 6.0,
            help_gap: 8.0,
        }
    }

    #[test]
    fn input_spans_full_width_without_button() {
        let f = layout_field(&metrics(false)).expect("layout");
        assert_eq!(f.button, None);
        assert!((f.input.w - 300.0).abs() < 0.5);
        assert!((f.input.y - 18.0).abs() < 0.5);
        assert!((f.line.max_y() - (f.input.max_y() + 6.0)).abs() < 0.5);
        assert!((f.help.y - (f.line.max_y() + 8.0)).abs() < 0.5);
    }

    #[test]
    fn button_narrows_input_and_overhangs() {
        let f = layout_field(&metrics(true)).expect("layout");
        let button = f.button.expect("button frame");
        assert!((f.input.w - 268.0).abs() < 0.5);
        assert!((button.x - f.input.max_x()).abs() < 0.5);
        assert!((button.max_x() - 308.0).abs() < 0.5);
        assert!((button.mid_y() - f.input.mid_y()).abs() < 0.5);
    }

    #[test]
    fn rejects_degenerate_width() {
        let mut m = metrics(false);
        m.width = 0.0;
        assert!(matches!(layout_field(&m), Err(LayoutError::InvalidWidth(_))));
    }
}
