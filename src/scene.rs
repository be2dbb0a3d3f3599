//! TOML scene descriptions
//!
//! A scene lists views in order. Each view may pin its own frame (roots),
//! carry safe-area insets, name a parent, and request any of the resolver
//! relationships. Applying a scene replays those requests against a
//! [`LayoutEngine`] in file order.
//!
//! ```toml
//! [config]
//! inset_region_available = true
//!
//! [[view]]
//! id = "root"
//! frame = { x = 0, y = 0, width = 390, height = 844 }
//! safe_area = { top = 47, bottom = 34 }
//!
//! [[view]]
//! id = "header"
//! parent = "root"
//! to_parent = { inset_region = true, top = 0, leading = 0, trailing = 0, height = 56 }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;

use crate::error::SceneError;
use crate::layout::{
    add_constrained_subview, constrain_self, constrain_to_center_in, constrain_to_fill,
    constrain_to_parent, constrain_to_sibling, find_similar, ConstraintDescriptor, EngineConfig,
    FrameMap, Insets, LayoutEngine, NodeId, ParentConstraints, Rect, SelfConstraints,
    SiblingConstraints, ViewHierarchy,
};

/// A complete scene: engine configuration plus views in application order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default, rename = "view")]
    pub views: Vec<ViewSpec>,
}

/// One `[[view]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub id: NodeId,
    /// Suggested frame, usually only for roots
    pub frame: Option<Rect>,
    /// Safe-area insets shaping the view's inset region
    pub safe_area: Option<Insets>,
    /// Parent to attach under; required by `to_parent`, `fill` and `center_in`
    pub parent: Option<NodeId>,
    pub to_parent: Option<ParentConstraints>,
    pub fill: Option<FillRule>,
    pub center_in: Option<CenterRule>,
    #[serde(default)]
    pub to_sibling: Vec<SiblingRule>,
    pub size: Option<SelfConstraints>,
}

/// `fill = { inset_region = true }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillRule {
    pub inset_region: bool,
}

/// `center_in = { height = 40, width = 40 }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CenterRule {
    pub height: Option<f64>,
    pub width: Option<f64>,
}

/// `to_sibling = [{ sibling = "header", below = 8 }]`
///
/// Spells out every sibling slot next to `sibling` so that misspelled keys
/// are rejected instead of ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiblingRule {
    pub sibling: NodeId,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub leading: Option<f64>,
    pub trailing: Option<f64>,
    pub above: Option<f64>,
    pub below: Option<f64>,
    pub before: Option<f64>,
    pub behind: Option<f64>,
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub equal_height: Option<f64>,
    pub equal_width: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
}

impl SiblingRule {
    /// The requested slots, without the sibling name
    pub fn constraints(&self) -> SiblingConstraints {
        SiblingConstraints {
            top: self.top,
            bottom: self.bottom,
            leading: self.leading,
            trailing: self.trailing,
            above: self.above,
            below: self.below,
            before: self.before,
            behind: self.behind,
            center_x: self.center_x,
            center_y: self.center_y,
            equal_height: self.equal_height,
            equal_width: self.equal_width,
            height: self.height,
            width: self.width,
        }
    }
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let scene: Scene = toml::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check ids are unique, references resolve, parent rules have a parent
    /// and no view is its own ancestor
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut declared = HashSet::new();
        for view in &self.views {
            if !declared.insert(view.id.as_str()) {
                return Err(SceneError::DuplicateView {
                    id: view.id.to_string(),
                });
            }
        }

        let check = |name: &NodeId, referenced_by: &NodeId| {
            if declared.contains(name.as_str()) {
                return Ok(());
            }
            Err(SceneError::UnknownView {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
                suggestions: find_similar(declared.iter().copied(), name.as_str(), 2),
            })
        };

        for view in &self.views {
            if let Some(parent) = &view.parent {
                check(parent, &view.id)?;
            }
            for rule in &view.to_sibling {
                check(&rule.sibling, &view.id)?;
            }
            if view.parent.is_none() {
                let rule = if view.to_parent.is_some() {
                    Some("to_parent")
                } else if view.fill.is_some() {
                    Some("fill")
                } else if view.center_in.is_some() {
                    Some("center_in")
                } else {
                    None
                };
                if let Some(rule) = rule {
                    return Err(SceneError::MissingParent {
                        view: view.id.to_string(),
                        rule,
                    });
                }
            }
        }

        self.check_parent_cycles()
    }

    /// Reject views that end up above themselves when following `parent`
    fn check_parent_cycles(&self) -> Result<(), SceneError> {
        let parents: HashMap<&NodeId, &NodeId> = self
            .views
            .iter()
            .filter_map(|view| view.parent.as_ref().map(|parent| (&view.id, parent)))
            .collect();

        for view in &self.views {
            let mut current = parents.get(&view.id).copied();
            // A chain longer than the number of views must repeat a view
            for _ in 0..self.views.len() {
                let Some(ancestor) = current else {
                    break;
                };
                if ancestor == &view.id {
                    return Err(SceneError::ParentCycle {
                        view: view.id.to_string(),
                    });
                }
                current = parents.get(ancestor).copied();
            }
        }
        Ok(())
    }

    /// Replay every view's requests against `engine`, in file order
    pub fn apply(&self, engine: &mut LayoutEngine) -> Result<(), SceneError> {
        for view in &self.views {
            self.apply_view(view, engine)?;
        }
        Ok(())
    }

    fn apply_view(&self, view: &ViewSpec, engine: &mut LayoutEngine) -> Result<(), SceneError> {
        let id = &view.id;
        engine.add_view(id);

        if let Some(insets) = view.safe_area {
            engine.set_safe_area_insets(id, insets)?;
        }
        if let Some(frame) = view.frame {
            engine.set_frame(id, frame)?;
        }

        if let Some(parent) = &view.parent {
            add_constrained_subview(engine, parent, id);
            if let Some(constraints) = &view.to_parent {
                constrain_to_parent(engine, id, parent, constraints)?;
            }
            if let Some(fill) = &view.fill {
                constrain_to_fill(engine, id, parent, fill.inset_region)?;
            }
            if let Some(center) = &view.center_in {
                constrain_to_center_in(engine, id, parent, center.height, center.width)?;
            }
        }

        for rule in &view.to_sibling {
            constrain_to_sibling(engine, id, &rule.sibling, &rule.constraints())?;
        }
        if let Some(size) = &view.size {
            constrain_self(engine, id, size)?;
        }

        tracing::debug!(view = %id, "applied scene view");
        Ok(())
    }

    /// Lay the scene out in a fresh engine and solve it
    pub fn layout(&self) -> Result<SceneLayout, SceneError> {
        let mut engine = LayoutEngine::new(self.config.clone());
        self.apply(&mut engine)?;
        let frames = engine.solve();
        Ok(SceneLayout {
            descriptors: engine.active_constraints().cloned().collect(),
            tree: engine.tree().clone(),
            frames,
        })
    }
}

/// The solved result of a scene
#[derive(Debug, Clone)]
pub struct SceneLayout {
    frames: FrameMap,
    descriptors: Vec<ConstraintDescriptor>,
    tree: ViewHierarchy,
}

impl SceneLayout {
    pub fn frames(&self) -> &FrameMap {
        &self.frames
    }

    pub fn frame(&self, name: &str) -> Option<Rect> {
        self.frames.get_by_name(name)
    }

    /// Every activated descriptor in activation order
    pub fn descriptors(&self) -> &[ConstraintDescriptor] {
        &self.descriptors
    }

    /// Indented view tree with one frame per line
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        for root in self.tree.roots() {
            self.render_node(root, 0, &mut out);
        }
        out
    }

    fn render_node(&self, id: &NodeId, depth: usize, out: &mut String) {
        let frame = self.frames.get(id).unwrap_or_default();
        let _ = writeln!(out, "{}[{}] {}", "  ".repeat(depth), id, frame);
        for child in self.tree.children(id) {
            self.render_node(child, depth + 1, out);
        }
    }

    /// One descriptor per line
    pub fn render_descriptors(&self) -> String {
        let mut out = String::new();
        for descriptor in &self.descriptors {
            let _ = writeln!(out, "{}", descriptor);
        }
        out
    }
}
