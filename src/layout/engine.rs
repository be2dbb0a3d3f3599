//! Layout engine: a view hierarchy and a solver behind the resolver traits
//!
//! `LayoutEngine` is the concrete host the resolvers run against. It keeps
//! the tree and the solver in step (safe-area insets live in both) and turns
//! the solver's variables back into frames.

use super::config::EngineConfig;
use super::descriptor::ConstraintDescriptor;
use super::host::{ConstraintActivator, InsetCapability, ViewTree};
use super::solver::{ConstraintSolver, SolverError};
use super::tree::ViewHierarchy;
use super::types::{Insets, NodeId, Rect};

/// Solved frames in node insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMap {
    frames: Vec<(NodeId, Rect)>,
}

impl FrameMap {
    pub fn get(&self, id: &NodeId) -> Option<Rect> {
        self.frames
            .iter()
            .find(|(node, _)| node == id)
            .map(|(_, rect)| *rect)
    }

    /// Frame lookup by plain name
    pub fn get_by_name(&self, name: &str) -> Option<Rect> {
        self.frames
            .iter()
            .find(|(node, _)| node.as_str() == name)
            .map(|(_, rect)| *rect)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Rect)> {
        self.frames.iter().map(|(node, rect)| (node, rect))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Owns the view tree and the solver and exposes them to the resolvers
pub struct LayoutEngine {
    tree: ViewHierarchy,
    solver: ConstraintSolver,
    config: EngineConfig,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tree: ViewHierarchy::with_default_insets(config.default_safe_area),
            solver: ConstraintSolver::with_default_insets(config.default_safe_area),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree(&self) -> &ViewHierarchy {
        &self.tree
    }

    /// Register a view. Its safe-area insets start at the configured default.
    pub fn add_view(&mut self, id: &NodeId) {
        self.tree.insert(id);
    }

    /// Suggest a frame for a view, usually a root
    pub fn set_frame(&mut self, id: &NodeId, frame: Rect) -> Result<(), SolverError> {
        self.add_view(id);
        self.solver.suggest_frame(id, frame)
    }

    /// Change the safe-area insets that shape a view's inset region
    pub fn set_safe_area_insets(&mut self, id: &NodeId, insets: Insets) -> Result<(), SolverError> {
        self.tree.set_safe_area_insets(id, insets);
        self.solver.set_insets(id, insets)
    }

    /// Solve and return the frame of every registered view
    pub fn solve(&mut self) -> FrameMap {
        self.solver.solve();
        let frames = self
            .tree
            .ids()
            .iter()
            .map(|id| (id.clone(), self.solver.frame(id)))
            .collect();
        FrameMap { frames }
    }

    /// Frame of a view as of the last solve
    pub fn frame(&self, id: &NodeId) -> Rect {
        self.solver.frame(id)
    }

    /// Inset region of a view as of the last solve
    pub fn inset_frame(&self, id: &NodeId) -> Rect {
        self.solver.inset_frame(id)
    }

    /// Every installed descriptor in activation order
    pub fn active_constraints(&self) -> impl Iterator<Item = &ConstraintDescriptor> {
        self.solver.active_constraints()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ViewTree for LayoutEngine {
    fn attach(&mut self, node: &NodeId, parent: &NodeId) {
        self.tree.attach(node, parent);
    }

    fn disable_auto_constraints(&mut self, node: &NodeId) {
        self.tree.disable_auto_constraints(node);
    }
}

impl ConstraintActivator for LayoutEngine {
    type Error = SolverError;

    fn activate(&mut self, descriptors: &[ConstraintDescriptor]) -> Result<(), Self::Error> {
        self.solver.activate(descriptors)
    }
}

impl InsetCapability for LayoutEngine {
    fn inset_region_available(&self) -> bool {
        self.config.inset_region_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolver::{
        constrain_self, constrain_to_fill, constrain_to_parent, ParentConstraints, SelfConstraints,
    };

    fn id(name: &str) -> NodeId {
        NodeId::new(name)
    }

    fn assert_frame(actual: Option<Rect>, expected: Rect) {
        let actual = actual.expect("frame should exist");
        assert!(
            actual.approx_eq(&expected, 0.001),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn engine_with_root(config: EngineConfig) -> LayoutEngine {
        let mut engine = LayoutEngine::new(config);
        engine
            .set_frame(&id("root"), Rect::new(0.0, 0.0, 400.0, 800.0))
            .unwrap();
        engine
            .set_safe_area_insets(&id("root"), Insets::new(40.0, 30.0, 10.0, 10.0))
            .unwrap();
        engine
    }

    #[test]
    fn test_fill_inset_region() {
        let mut engine = engine_with_root(EngineConfig::default());
        constrain_to_fill(&mut engine, &id("content"), &id("root"), true).unwrap();
        let frames = engine.solve();

        assert_frame(frames.get(&id("content")), Rect::new(10.0, 40.0, 380.0, 730.0));
        assert_eq!(engine.tree().parent(&id("content")), Some(&id("root")));
        assert!(!engine.tree().translates_auto_constraints(&id("content")));
    }

    #[test]
    fn test_fill_falls_back_to_frame() {
        let mut engine = engine_with_root(EngineConfig::default().with_inset_region(false));
        constrain_to_fill(&mut engine, &id("content"), &id("root"), true).unwrap();
        let frames = engine.solve();

        assert_frame(frames.get(&id("content")), Rect::new(0.0, 0.0, 400.0, 800.0));
    }

    #[test]
    fn test_conflict_is_returned_unchanged() {
        let mut engine = engine_with_root(EngineConfig::default());
        constrain_self(
            &mut engine,
            &id("root"),
            &SelfConstraints::new().with_width(400.0),
        )
        .unwrap();
        constrain_self(&mut engine, &id("box"), &SelfConstraints::new().with_width(50.0)).unwrap();

        let err = constrain_to_parent(
            &mut engine,
            &id("box"),
            &id("root"),
            &ParentConstraints::new().with_equal_width(1.0),
        )
        .unwrap_err();

        assert!(matches!(err, SolverError::Unsatisfiable { .. }));
        assert_eq!(engine.active_constraints().count(), 2);
    }

    #[test]
    fn test_default_safe_area_applies_to_new_views() {
        let config =
            EngineConfig::default().with_default_safe_area(Insets::new(20.0, 0.0, 0.0, 0.0));
        let mut engine = LayoutEngine::new(config);
        engine
            .set_frame(&id("root"), Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        constrain_to_fill(&mut engine, &id("content"), &id("root"), true).unwrap();
        let frames = engine.solve();

        assert_frame(frames.get(&id("content")), Rect::new(0.0, 20.0, 100.0, 80.0));
        assert_eq!(
            engine.tree().safe_area_insets(&id("root")),
            engine.config().default_safe_area
        );
    }

    #[test]
    fn test_frame_map_lookup() {
        let mut engine = engine_with_root(EngineConfig::default());
        let frames = engine.solve();
        assert_eq!(frames.len(), 1);
        assert!(!frames.is_empty());
        assert_frame(frames.get_by_name("root"), Rect::new(0.0, 0.0, 400.0, 800.0));
        assert_eq!(frames.get_by_name("missing"), None);
        assert_frame(Some(engine.inset_frame(&id("root"))), Rect::new(10.0, 40.0, 380.0, 730.0));
    }
}
