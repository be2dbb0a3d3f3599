//! Anchor Layout - declarative anchoring of rectangular views
//!
//! Describe how a view relates to its parent, a sibling or itself with a
//! sparse set of named offsets; the resolvers turn that description into
//! solver constraints and activate them.
//!
//! # Example
//!
//! ```rust
//! use anchor_layout::layout::{
//!     constrain_to_parent, constrain_to_sibling, LayoutEngine, NodeId, ParentConstraints, Rect,
//!     SiblingConstraints,
//! };
//!
//! let mut engine = LayoutEngine::default();
//! let root = NodeId::new("root");
//! let header = NodeId::new("header");
//! let body = NodeId::new("body");
//!
//! engine.set_frame(&root, Rect::new(0.0, 0.0, 320.0, 480.0)).unwrap();
//! constrain_to_parent(
//!     &mut engine,
//!     &header,
//!     &root,
//!     &ParentConstraints::new()
//!         .with_top(0.0)
//!         .with_leading(0.0)
//!         .with_trailing(0.0)
//!         .with_height(44.0),
//! )
//! .unwrap();
//! let leading = ParentConstraints::new().with_leading(0.0);
//! constrain_to_parent(&mut engine, &body, &root, &leading).unwrap();
//! constrain_to_sibling(
//!     &mut engine,
//!     &body,
//!     &header,
//!     &SiblingConstraints::new().with_below(8.0).with_height(100.0).with_width(200.0),
//! )
//! .unwrap();
//!
//! let frames = engine.solve();
//! let body_frame = frames.get(&body).unwrap();
//! assert!((body_frame.y - 52.0).abs() < 0.001);
//! ```

pub mod error;
pub mod layout;
pub mod scene;

pub use error::SceneError;
pub use layout::{
    ConstraintDescriptor, EngineConfig, LayoutEngine, NodeId, ParentConstraints, SelfConstraints,
    SiblingConstraints, SolverError,
};
pub use scene::{Scene, SceneLayout};

/// Lay out a TOML scene with its own configuration
///
/// # Example
///
/// ```rust
/// use anchor_layout::layout_scene;
///
/// let layout = layout_scene(r#"
///     [[view]]
///     id = "root"
///     frame = { x = 0, y = 0, width = 100, height = 100 }
///
///     [[view]]
///     id = "dot"
///     parent = "root"
///     center_in = { height = 10, width = 10 }
/// "#).unwrap();
///
/// let dot = layout.frame("dot").unwrap();
/// assert!((dot.x - 45.0).abs() < 0.001);
/// ```
pub fn layout_scene(source: &str) -> Result<SceneLayout, SceneError> {
    Scene::from_str(source)?.layout()
}
