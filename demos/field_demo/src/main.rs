use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, ensure};
use materia_core::{Color, Font, Rect, Scene, SceneNode, StyledText, TextAttributes, Vec2};
use materia_text::ApproxTextLayout;
use materia_ui::*;

fn print_state(step: &str, field: &FloatingLabelField) {
    let s = field.snapshot();
    println!(
        "{step:<16} text={:?} title_alpha={:.2} placeholder_alpha={:.2} help={:?} line={:?}@{:.1}",
        s.text, s.title_alpha, s.placeholder_alpha, s.help_text, s.line_color, s.line_thickness
    );
}

/// Steps animations until they settle, the way a host would each frame.
fn settle(field: &FloatingLabelField) {
    let mut frames = 0;
    while field.advance() && frames < 120 {
        std::thread::sleep(std::time::Duration::from_millis(16));
        frames += 1;
    }
    log::debug!("settled after {frames} frames");
}

fn print_scene(scene: Scene) {
    for node in scene.nodes {
        match node {
            SceneNode::Rect { rect, color } => println!("  rect  {rect:?} {color:?}"),
            SceneNode::Text {
                rect, text, alpha, ..
            } => println!("  text  {:?} alpha={alpha:.2} at {rect:?}", text.as_str()),
            SceneNode::Image { rect, name } => println!("  image {name} at {rect:?}"),
        }
    }
}

fn label_session() -> anyhow::Result<()> {
    let opened = Rc::new(Cell::new(0));
    let hits = opened.clone();
    let link = Link::new(
        StyledText::new("more", TextAttributes::new().color(Color::LINK).underlined()),
        Some(Color::LINK.with_alpha(128)),
        move || hits.set(hits.get() + 1),
    );
    let mut label = ClickableLabel::with_text(
        Rc::new(ApproxTextLayout::default()),
        ClickableText::new("Click here for more", vec![link]),
    );
    label.font = Font::system(10.0);
    label.bounds = Rect::new(0.0, 0.0, 200.0, label.measure_height(200.0));

    // 10pt glyphs are 6 wide: "more" starts at x = 90
    let on_link = Vec2::new(92.0, 5.0);
    ensure!(label.touch_began(on_link) == TouchResponse::Handled);
    label.touch_ended(on_link);
    ensure!(opened.get() == 1, "link action should fire once");

    let outside = Vec2::new(10.0, 5.0);
    ensure!(label.touch_began(outside) == TouchResponse::PassThrough);

    println!("label:");
    let mut scene = Scene::default();
    label.paint(&mut scene, 1.0);
    print_scene(scene);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    label_session()?;

    let recovered = Rc::new(Cell::new(false));
    let flag = recovered.clone();
    let vm = TextInputViewModel::builder()
        .placeholder(Placeholder::new(PlaceholderKind::Animated, "Username"))
        .help("Up to 12 characters")
        .input_validator(|text| {
            if text.chars().count() > 12 {
                ValidationOutcome::invalid("Too long")
            } else {
                ValidationOutcome::Valid
            }
        })
        .action_validator(move |text| {
            if text == "ada" {
                let flag = flag.clone();
                ValidationOutcome::invalid_with_link("Already taken. Recover", "Recover", move || {
                    flag.set(true)
                })
            } else {
                ValidationOutcome::Valid
            }
        })
        .right_button(ButtonInfo::new("clear", None))
        .build();

    let mut field = FloatingLabelField::with_layout(vm, Rc::new(ApproxTextLayout::default()));
    print_state("initial", &field);

    field.focus();
    settle(&field);
    print_state("focused", &field);

    field.type_text("ada");
    print_state("typed", &field);

    ensure!(!field.validate(), "expected the name to be taken");
    print_state("validated", &field);

    let snapshot = field.snapshot();
    let link = snapshot
        .help_link_ranges
        .first()
        .cloned()
        .context("help line should carry a link")?;
    // caption glyphs are 12 * 0.6 wide with the fixed-advance layout
    let help = snapshot.frames.help;
    let point = Vec2::new(help.x + 7.2 * (link.start as f32 + 0.5), help.y + 4.0);
    field.help_touch_began(point);
    field.help_touch_ended(point);
    settle(&field);
    ensure!(recovered.get(), "tapping the link should run its action");

    field.type_text("_lovelace_the_first");
    print_state("too long", &field);

    field.blur();
    settle(&field);
    print_state("blurred", &field);

    let a = field.accessibility();
    println!("accessibility: {} / {} / {}", a.identifier, a.button_identifier, a.help_identifier);

    println!("field:");
    print_scene(field.scene());
    Ok(())
}
