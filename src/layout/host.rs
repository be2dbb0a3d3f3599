//! Collaborator interfaces the resolvers drive
//!
//! The resolvers never own nodes or constraints. They talk to a host through
//! three small traits: the view tree (attachment and the auto-constraint
//! flag), the constraint activator (installs descriptors in a solver) and the
//! inset-region capability check.

use std::convert::Infallible;

use super::descriptor::ConstraintDescriptor;
use super::types::NodeId;

/// Parent/child attachment of view nodes
pub trait ViewTree {
    /// Remove `node` from its current parent (if any) and insert it under `parent`
    fn attach(&mut self, node: &NodeId, parent: &NodeId);

    /// Mark `node` as manually positioned. Idempotent.
    fn disable_auto_constraints(&mut self, node: &NodeId);
}

/// Installs descriptors into a constraint solver
pub trait ConstraintActivator {
    type Error;

    /// Install every descriptor of the batch, or none of them
    fn activate(&mut self, descriptors: &[ConstraintDescriptor]) -> Result<(), Self::Error>;
}

/// Whether the reference node's inset region anchors can be used
pub trait InsetCapability {
    fn inset_region_available(&self) -> bool;
}

impl InsetCapability for bool {
    fn inset_region_available(&self) -> bool {
        *self
    }
}

/// Everything a resolver needs from its environment
pub trait LayoutHost: ViewTree + ConstraintActivator + InsetCapability {}

impl<T: ViewTree + ConstraintActivator + InsetCapability> LayoutHost for T {}

/// A host that records calls instead of solving
///
/// Useful for dry runs: every activation batch is kept in order and
/// activation never fails.
#[derive(Debug, Clone, Default)]
pub struct DescriptorLog {
    /// Whether inset region anchors are reported as available
    pub inset_region_available: bool,
    /// `(node, parent)` pairs in attachment order
    pub attachments: Vec<(NodeId, NodeId)>,
    /// Nodes marked as manually positioned, in call order
    pub manual: Vec<NodeId>,
    /// Activated batches, in call order
    pub batches: Vec<Vec<ConstraintDescriptor>>,
}

impl DescriptorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that reports inset region support
    pub fn with_inset_region(available: bool) -> Self {
        Self {
            inset_region_available: available,
            ..Self::default()
        }
    }

    /// All recorded descriptors, flattened across batches
    pub fn descriptors(&self) -> Vec<ConstraintDescriptor> {
        self.batches.iter().flatten().cloned().collect()
    }

    /// True if `node` was marked as manually positioned at least once
    pub fn is_manual(&self, node: &NodeId) -> bool {
        self.manual.contains(node)
    }
}

impl ViewTree for DescriptorLog {
    fn attach(&mut self, node: &NodeId, parent: &NodeId) {
        self.attachments.push((node.clone(), parent.clone()));
    }

    fn disable_auto_constraints(&mut self, node: &NodeId) {
        self.manual.push(node.clone());
    }
}

impl ConstraintActivator for DescriptorLog {
    type Error = Infallible;

    fn activate(&mut self, descriptors: &[ConstraintDescriptor]) -> Result<(), Self::Error> {
        self.batches.push(descriptors.to_vec());
        Ok(())
    }
}

impl InsetCapability for DescriptorLog {
    fn inset_region_available(&self) -> bool {
        self.inset_region_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Anchor;

    #[test]
    fn test_bool_capability() {
        assert!(true.inset_region_available());
        assert!(!false.inset_region_available());
    }

    #[test]
    fn test_log_records_batches_in_order() {
        let mut log = DescriptorLog::new();
        let a = NodeId::new("a");
        let first = ConstraintDescriptor::fixed(a.anchor(Anchor::Width), 10.0);
        let second = ConstraintDescriptor::fixed(a.anchor(Anchor::Height), 20.0);

        log.activate(&[first.clone()]).unwrap();
        log.activate(&[]).unwrap();
        log.activate(&[second.clone()]).unwrap();

        assert_eq!(log.batches.len(), 3);
        assert_eq!(log.descriptors(), vec![first, second]);
    }

    #[test]
    fn test_log_tracks_tree_calls() {
        let mut log = DescriptorLog::with_inset_region(true);
        let child = NodeId::new("child");
        let root = NodeId::new("root");

        log.disable_auto_constraints(&child);
        log.attach(&child, &root);

        assert!(log.inset_region_available());
        assert!(log.is_manual(&child));
        assert!(!log.is_manual(&root));
        assert_eq!(log.attachments, vec![(child, root)]);
    }
}
