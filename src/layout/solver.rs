//! Constraint solver integration for anchor descriptors
//!
//! This module provides a wrapper around the kasuari Cassowary constraint solver,
//! translating constraint descriptors into the solver's format and extracting
//! solved frames.

use std::collections::{HashMap, HashSet};

use kasuari::{
    Constraint as KasuariConstraint, Expression, Solver as KasuariSolver, Strength,
    Variable as KasuariVariable, WeightedRelation::*,
};
use thiserror::Error;

use super::descriptor::{ConstraintDescriptor, Relation};
use super::host::ConstraintActivator;
use super::types::{Anchor, AnchorRef, Insets, NodeId, Rect, Region};

// ============================================================================
// Variables
// ============================================================================

/// Base properties stored in the solver; every anchor is derived from these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    X,
    Y,
    Width,
    Height,
}

/// A variable in the constraint system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub node: NodeId,
    pub region: Region,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(node: NodeId, region: Region, property: LayoutProperty) -> Self {
        Self {
            node,
            region,
            property,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint {constraint}: {reason}")]
    Unsatisfiable { constraint: String, reason: String },

    #[error("duplicate constraint {constraint}")]
    Duplicate { constraint: String },

    #[error("internal solver error: {0}")]
    Internal(String),
}

// ============================================================================
// ConstraintSolver
// ============================================================================

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Maps our variables to kasuari variables
    variables: HashMap<LayoutVariable, KasuariVariable>,
    /// Latest solved value of every variable that has changed
    values: HashMap<KasuariVariable, f64>,
    /// Installed descriptors in activation order
    active: Vec<(ConstraintDescriptor, KasuariConstraint)>,
    /// Constraints tying each inset region to its frame
    guides: HashMap<NodeId, Vec<KasuariConstraint>>,
    insets: HashMap<NodeId, Insets>,
    default_insets: Insets,
    edits: HashSet<KasuariVariable>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
            values: HashMap::new(),
            active: Vec::new(),
            guides: HashMap::new(),
            insets: HashMap::new(),
            default_insets: Insets::zero(),
            edits: HashSet::new(),
        }
    }

    /// Create a solver whose nodes default to the given safe-area insets
    pub fn with_default_insets(insets: Insets) -> Self {
        Self {
            default_insets: insets,
            ..Self::new()
        }
    }

    fn insets_of(&self, node: &NodeId) -> Insets {
        self.insets.get(node).copied().unwrap_or(self.default_insets)
    }

    /// Get or create a kasuari variable for a base property
    fn get_or_create_var(
        &mut self,
        node: &NodeId,
        region: Region,
        property: LayoutProperty,
    ) -> Result<KasuariVariable, SolverError> {
        let var = LayoutVariable::new(node.clone(), region, property);
        if let Some(&kvar) = self.variables.get(&var) {
            return Ok(kvar);
        }
        let kvar = KasuariVariable::new();
        self.variables.insert(var, kvar);
        if region == Region::Inset && !self.guides.contains_key(node) {
            self.install_guides(node)?;
        }
        Ok(kvar)
    }

    /// Create a kasuari expression for an anchor
    ///
    /// Edges and centers are derived from the rectangle's origin and size.
    fn get_expression(&mut self, anchor: &AnchorRef) -> Result<Expression, SolverError> {
        let node = &anchor.node;
        let region = anchor.region;
        let expr: Expression = match anchor.anchor {
            Anchor::Leading => self.get_or_create_var(node, region, LayoutProperty::X)?.into(),
            Anchor::Top => self.get_or_create_var(node, region, LayoutProperty::Y)?.into(),
            Anchor::Width => self
                .get_or_create_var(node, region, LayoutProperty::Width)?
                .into(),
            Anchor::Height => self
                .get_or_create_var(node, region, LayoutProperty::Height)?
                .into(),
            Anchor::Trailing => {
                let x = self.get_or_create_var(node, region, LayoutProperty::X)?;
                let width = self.get_or_create_var(node, region, LayoutProperty::Width)?;
                Expression::from(x) + width
            }
            Anchor::Bottom => {
                let y = self.get_or_create_var(node, region, LayoutProperty::Y)?;
                let height = self.get_or_create_var(node, region, LayoutProperty::Height)?;
                Expression::from(y) + height
            }
            Anchor::CenterX => {
                // center_x = x + width / 2
                let x = self.get_or_create_var(node, region, LayoutProperty::X)?;
                let width = self.get_or_create_var(node, region, LayoutProperty::Width)?;
                Expression::from(x) + width * 0.5
            }
            Anchor::CenterY => {
                // center_y = y + height / 2
                let y = self.get_or_create_var(node, region, LayoutProperty::Y)?;
                let height = self.get_or_create_var(node, region, LayoutProperty::Height)?;
                Expression::from(y) + height * 0.5
            }
        };
        Ok(expr)
    }

    /// Tie the inset region of `node` to its frame using the node's insets
    fn install_guides(&mut self, node: &NodeId) -> Result<(), SolverError> {
        // Mark as installed before creating variables so the inset lookups
        // below do not recurse.
        self.guides.insert(node.clone(), Vec::new());

        let insets = self.insets_of(node);
        let mut pairs = Vec::with_capacity(4);
        for property in [
            LayoutProperty::X,
            LayoutProperty::Y,
            LayoutProperty::Width,
            LayoutProperty::Height,
        ] {
            let outer = self.get_or_create_var(node, Region::Frame, property)?;
            let inner = self.get_or_create_var(node, Region::Inset, property)?;
            pairs.push((property, outer, inner));
        }

        let mut constraints = Vec::with_capacity(4);
        for (property, outer, inner) in pairs {
            let offset = match property {
                LayoutProperty::X => Expression::from(outer) + insets.leading,
                LayoutProperty::Y => Expression::from(outer) + insets.top,
                LayoutProperty::Width => {
                    Expression::from(outer) - (insets.leading + insets.trailing)
                }
                LayoutProperty::Height => Expression::from(outer) - (insets.top + insets.bottom),
            };
            let constraint = Expression::from(inner) | EQ(Strength::REQUIRED) | offset;
            self.solver.add_constraint(constraint.clone()).map_err(|e| {
                self.convert_kasuari_error(e, &format!("{}.inset guide {:?}", node, property))
            })?;
            constraints.push(constraint);
        }

        self.guides.insert(node.clone(), constraints);
        Ok(())
    }

    /// Set the safe-area insets of `node`, replacing any existing guides
    pub fn set_insets(&mut self, node: &NodeId, insets: Insets) -> Result<(), SolverError> {
        self.insets.insert(node.clone(), insets);
        let Some(existing) = self.guides.remove(node) else {
            return Ok(());
        };
        for constraint in &existing {
            self.solver.remove_constraint(constraint).map_err(|e| {
                SolverError::Internal(format!("failed to remove inset guide: {:?}", e))
            })?;
        }
        self.install_guides(node)
    }

    /// Installed descriptors in activation order
    pub fn active_constraints(&self) -> impl Iterator<Item = &ConstraintDescriptor> {
        self.active.iter().map(|(descriptor, _)| descriptor)
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Activation
// ============================================================================

impl ConstraintSolver {
    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(&self, e: kasuari::AddConstraintError, desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                constraint: desc.to_string(),
                reason: "conflicts with existing constraints".to_string(),
            },
            kasuari::AddConstraintError::DuplicateConstraint => SolverError::Duplicate {
                constraint: desc.to_string(),
            },
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{} while adding {}", msg, desc))
            }
        }
    }

    /// Translate a descriptor into a kasuari constraint
    fn build_constraint(
        &mut self,
        descriptor: &ConstraintDescriptor,
    ) -> Result<KasuariConstraint, SolverError> {
        let first = self.get_expression(&descriptor.first)?;
        let relation = match descriptor.relation {
            Relation::Equal => EQ(Strength::REQUIRED),
        };
        let constraint = match &descriptor.second {
            Some(second) => {
                let second = self.get_expression(second)?;
                first | relation | second * descriptor.multiplier + descriptor.constant
            }
            None => first | relation | descriptor.constant,
        };
        Ok(constraint)
    }

    /// Add a single descriptor to the solver
    pub fn add_descriptor(&mut self, descriptor: &ConstraintDescriptor) -> Result<(), SolverError> {
        let constraint = self.build_constraint(descriptor)?;
        self.solver
            .add_constraint(constraint.clone())
            .map_err(|e| self.convert_kasuari_error(e, &descriptor.to_string()))?;
        self.active.push((descriptor.clone(), constraint));
        Ok(())
    }

    /// Add every descriptor, or none of them
    pub fn add_descriptors(
        &mut self,
        descriptors: &[ConstraintDescriptor],
    ) -> Result<(), SolverError> {
        let installed = self.active.len();
        for descriptor in descriptors {
            if let Err(err) = self.add_descriptor(descriptor) {
                tracing::warn!(
                    constraint = %descriptor,
                    error = %err,
                    "rolling back constraint batch"
                );
                self.rollback(installed);
                return Err(err);
            }
        }
        tracing::debug!(
            count = descriptors.len(),
            total = self.active.len(),
            "activated constraints"
        );
        Ok(())
    }

    fn rollback(&mut self, keep: usize) {
        for (descriptor, constraint) in self.active.drain(keep..).rev() {
            if let Err(e) = self.solver.remove_constraint(&constraint) {
                tracing::error!(
                    constraint = %descriptor,
                    error = ?e,
                    "failed to roll back constraint"
                );
            }
        }
    }
}

impl ConstraintActivator for ConstraintSolver {
    type Error = SolverError;

    fn activate(&mut self, descriptors: &[ConstraintDescriptor]) -> Result<(), Self::Error> {
        self.add_descriptors(descriptors)
    }
}

// ============================================================================
// Suggestions and solving
// ============================================================================

impl ConstraintSolver {
    /// Add an edit variable with suggested value (for anchoring the system)
    pub fn suggest_value(
        &mut self,
        node: &NodeId,
        property: LayoutProperty,
        value: f64,
    ) -> Result<(), SolverError> {
        let kvar = self.get_or_create_var(node, Region::Frame, property)?;
        if !self.edits.contains(&kvar) {
            self.solver
                .add_edit_variable(kvar, Strength::STRONG)
                .map_err(|e| SolverError::Internal(format!("failed to add edit variable: {}", e)))?;
            self.edits.insert(kvar);
        }
        self.solver
            .suggest_value(kvar, value)
            .map_err(|e| SolverError::Internal(format!("failed to suggest value: {}", e)))?;
        Ok(())
    }

    /// Suggest the full frame of a node (typically a root)
    pub fn suggest_frame(&mut self, node: &NodeId, frame: Rect) -> Result<(), SolverError> {
        self.suggest_value(node, LayoutProperty::X, frame.x)?;
        self.suggest_value(node, LayoutProperty::Y, frame.y)?;
        self.suggest_value(node, LayoutProperty::Width, frame.width)?;
        self.suggest_value(node, LayoutProperty::Height, frame.height)
    }

    /// Pull the latest changes out of the solver
    pub fn solve(&mut self) {
        let changes = self.solver.fetch_changes();
        for (kvar, value) in changes {
            self.values.insert(*kvar, *value);
        }
    }

    /// Solved value of a variable; variables the solver never touched are 0
    pub fn value(&self, node: &NodeId, region: Region, property: LayoutProperty) -> f64 {
        self.variables
            .get(&LayoutVariable::new(node.clone(), region, property))
            .and_then(|kvar| self.values.get(kvar))
            .copied()
            .unwrap_or(0.0)
    }

    fn rect(&self, node: &NodeId, region: Region) -> Rect {
        Rect::new(
            self.value(node, region, LayoutProperty::X),
            self.value(node, region, LayoutProperty::Y),
            self.value(node, region, LayoutProperty::Width),
            self.value(node, region, LayoutProperty::Height),
        )
    }

    /// Solved frame of a node
    pub fn frame(&self, node: &NodeId) -> Rect {
        self.rect(node, Region::Frame)
    }

    /// Solved frame shrunk by the node's insets
    pub fn inset_frame(&self, node: &NodeId) -> Rect {
        self.frame(node).inset_by(&self.insets_of(node))
    }
}
