//! End-to-end scene tests: TOML in, solved frames and activated descriptors out.

use std::path::Path;

use anchor_layout::layout::Rect;
use anchor_layout::{layout_scene, Scene, SceneError};

const PHONE: &str = r#"
[[view]]
id = "root"
frame = { x = 0, y = 0, width = 390, height = 844 }
safe_area = { top = 47, bottom = 34 }

[[view]]
id = "header"
parent = "root"
to_parent = { inset_region = true, top = 0, leading = 0, trailing = 0, height = 56, fallback_top = 20 }

[[view]]
id = "body"
parent = "root"
to_sibling = [{ sibling = "header", below = 8, leading = 0, trailing = 0 }]
size = { height = 200 }
"#;

fn assert_frame(actual: Option<Rect>, expected: Rect) {
    let actual = actual.expect("view missing from layout");
    assert!(
        actual.approx_eq(&expected, 0.001),
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_phone_descriptors() {
    let layout = layout_scene(PHONE).unwrap();
    insta::assert_snapshot!(layout.render_descriptors(), @r"
    header.top == root.inset.top
    header.leading == root.inset.leading
    root.inset.trailing == header.trailing
    header.height == 56
    body.leading == header.leading
    header.trailing == body.trailing
    body.top == header.bottom + 8
    body.height == 200
    ");
}

#[test]
fn test_phone_frames() {
    let layout = layout_scene(PHONE).unwrap();
    assert_eq!(layout.frames().len(), 3);
    assert_frame(layout.frame("root"), Rect::new(0.0, 0.0, 390.0, 844.0));
    assert_frame(layout.frame("header"), Rect::new(0.0, 47.0, 390.0, 56.0));
    assert_frame(layout.frame("body"), Rect::new(0.0, 111.0, 390.0, 200.0));
}

#[test]
fn test_unavailable_inset_region_uses_fallback() {
    let mut scene = Scene::from_str(PHONE).unwrap();
    scene.config.inset_region_available = false;
    let layout = scene.layout().unwrap();

    insta::assert_snapshot!(layout.render_descriptors(), @r"
    header.top == root.top + 20
    header.leading == root.leading
    root.trailing == header.trailing
    header.height == 56
    body.leading == header.leading
    header.trailing == body.trailing
    body.top == header.bottom + 8
    body.height == 200
    ");
    assert_frame(layout.frame("header"), Rect::new(0.0, 20.0, 390.0, 56.0));
    assert_frame(layout.frame("body"), Rect::new(0.0, 84.0, 390.0, 200.0));
}

#[test]
fn test_config_section_disables_inset_region() {
    let source = format!("[config]\ninset_region_available = false\n{}", PHONE);
    let layout = layout_scene(&source).unwrap();
    assert_frame(layout.frame("header"), Rect::new(0.0, 20.0, 390.0, 56.0));
}

#[test]
fn test_default_safe_area_applies_to_every_view() {
    let layout = layout_scene(
        r#"
[config]
default_safe_area = { top = 10, leading = 5 }

[[view]]
id = "root"
frame = { x = 0, y = 0, width = 200, height = 100 }

[[view]]
id = "content"
parent = "root"
fill = { inset_region = true }
"#,
    )
    .unwrap();
    assert_frame(layout.frame("content"), Rect::new(5.0, 10.0, 195.0, 90.0));
}

#[test]
fn test_render_tree_lists_views_under_roots() {
    let layout = layout_scene(PHONE).unwrap();
    let names: Vec<String> = layout
        .render_tree()
        .lines()
        .map(|line| line.split(']').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["[root", "  [header", "  [body"]);
}

#[test]
fn test_unknown_parent_message() {
    let source = r#"
[[view]]
id = "header"

[[view]]
id = "body"
parent = "haeder"
"#;
    let err = Scene::from_str(source).unwrap_err();
    insta::assert_snapshot!(err.format(source, "scene.toml"), @r"
    Error: unknown view 'haeder' referenced by 'body'
    Did you mean: header?
    ");
}

#[test]
fn test_toml_error_has_span() {
    let source = "[[view]]\nid = \"a\"\nframe = { x = \"wide\" }\n";
    let err = Scene::from_str(source).unwrap_err();
    assert!(matches!(err, SceneError::Toml(_)));
    assert!(err.span().is_some());
    assert!(err.format(source, "scene.toml").contains("scene.toml"));
}

#[test]
fn test_missing_file() {
    let err = Scene::from_file(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(matches!(err, SceneError::Io(_)));
}

#[test]
fn test_misspelled_sibling_slot_is_reported() {
    let source = r#"
[[view]]
id = "a"
size = { height = 10 }

[[view]]
id = "b"
to_sibling = [{ sibling = "a", belwo = 8 }]
"#;
    let err = layout_scene(source).unwrap_err();
    assert!(matches!(err, SceneError::Toml(_)), "{:?}", err);
    assert!(err.format(source, "scene.toml").contains("belwo"));
}
