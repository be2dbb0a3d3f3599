//! Constraint resolution: sparse edge/size requests to solver descriptors
//!
//! Three resolvers share one descriptor vocabulary:
//!
//! - self: fixed sizes and aspect ratios on a single node
//! - parent: edges, centers and sizes against an ancestor, optionally against
//!   the ancestor's inset region
//! - sibling: edges, centers, sizes and directional spacing against a
//!   co-equal node
//!
//! Each resolver comes in two forms. `resolve_*` is pure and only builds the
//! descriptor list. `constrain_*` drives a [`LayoutHost`]: it updates the
//! tree, activates the descriptors and returns everything it activated.
//! Solver failures come back unchanged as the host's error type.
//!
//! No request is validated. Conflicting values (say `height` together with
//! `equal_height`) are the solver's problem at activation time.

use serde::Deserialize;

use super::descriptor::ConstraintDescriptor;
use super::host::{ConstraintActivator, LayoutHost, ViewTree};
use super::types::{Anchor, NodeId};

macro_rules! optional_setters {
    ($ty:ident { $($field:ident => $setter:ident),* $(,)? }) => {
        impl $ty {
            $(
                #[doc = concat!("Request `", stringify!($field), "`")]
                pub fn $setter(mut self, value: f64) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*
        }
    };
}

/// Size and aspect constraints on a single node
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelfConstraints {
    /// Fixed height
    pub height: Option<f64>,
    /// Fixed width
    pub width: Option<f64>,
    /// `width == height * value`
    pub aspect_height: Option<f64>,
    /// `height == width * value`
    pub aspect_width: Option<f64>,
}

optional_setters!(SelfConstraints {
    height => with_height,
    width => with_width,
    aspect_height => with_aspect_height,
    aspect_width => with_aspect_width,
});

impl SelfConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    fn sizes(height: Option<f64>, width: Option<f64>) -> Self {
        Self {
            height,
            width,
            ..Self::default()
        }
    }
}

/// Constraints relating a node to its parent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParentConstraints {
    /// Use the parent's inset region for edges and sizes when available
    pub inset_region: bool,
    /// `target.top == parent.top + value`
    pub top: Option<f64>,
    /// `parent.bottom == target.bottom + value`
    pub bottom: Option<f64>,
    /// `target.leading == parent.leading + value`
    pub leading: Option<f64>,
    /// `parent.trailing == target.trailing + value`
    pub trailing: Option<f64>,
    /// `target.center_x == parent.center_x + value`
    pub center_x: Option<f64>,
    /// `target.center_y == parent.center_y + value`
    pub center_y: Option<f64>,
    /// `target.height == parent.height * value`
    pub equal_height: Option<f64>,
    /// `target.width == parent.width * value`
    pub equal_width: Option<f64>,
    /// Fixed height, applied through the self resolver
    pub height: Option<f64>,
    /// Fixed width, applied through the self resolver
    pub width: Option<f64>,
    /// Extra top offset used only when the inset region is not used
    pub fallback_top: Option<f64>,
    /// Extra bottom offset used only when the inset region is not used
    pub fallback_bottom: Option<f64>,
}

optional_setters!(ParentConstraints {
    top => with_top,
    bottom => with_bottom,
    leading => with_leading,
    trailing => with_trailing,
    center_x => with_center_x,
    center_y => with_center_y,
    equal_height => with_equal_height,
    equal_width => with_equal_width,
    height => with_height,
    width => with_width,
    fallback_top => with_fallback_top,
    fallback_bottom => with_fallback_bottom,
});

impl ParentConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin all four edges to the parent
    pub fn fill(inset_region: bool) -> Self {
        Self::new()
            .with_inset_region(inset_region)
            .with_top(0.0)
            .with_bottom(0.0)
            .with_leading(0.0)
            .with_trailing(0.0)
    }

    /// Center in the parent with optional fixed sizes
    pub fn center_in(height: Option<f64>, width: Option<f64>) -> Self {
        Self {
            center_x: Some(0.0),
            center_y: Some(0.0),
            height,
            width,
            ..Self::default()
        }
    }

    /// Request the parent's inset region
    pub fn with_inset_region(mut self, inset_region: bool) -> Self {
        self.inset_region = inset_region;
        self
    }
}

/// Constraints relating a node to a sibling
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiblingConstraints {
    /// `target.top == sibling.top + value`
    pub top: Option<f64>,
    /// `sibling.bottom == target.bottom + value`
    pub bottom: Option<f64>,
    /// `target.leading == sibling.leading + value`
    pub leading: Option<f64>,
    /// `sibling.trailing == target.trailing + value`
    pub trailing: Option<f64>,
    /// Place the target above the sibling: `sibling.top == target.bottom + value`
    pub above: Option<f64>,
    /// Place the target below the sibling: `target.top == sibling.bottom + value`
    pub below: Option<f64>,
    /// Place the target before the sibling: `sibling.leading == target.trailing + value`
    pub before: Option<f64>,
    /// Place the target behind the sibling: `target.leading == sibling.trailing + value`
    pub behind: Option<f64>,
    /// `target.center_x == sibling.center_x + value`
    pub center_x: Option<f64>,
    /// `target.center_y == sibling.center_y + value`
    pub center_y: Option<f64>,
    /// `target.height == sibling.height * value`
    pub equal_height: Option<f64>,
    /// `target.width == sibling.width * value`
    pub equal_width: Option<f64>,
    /// Fixed height, applied through the self resolver
    pub height: Option<f64>,
    /// Fixed width, applied through the self resolver
    pub width: Option<f64>,
}

optional_setters!(SiblingConstraints {
    top => with_top,
    bottom => with_bottom,
    leading => with_leading,
    trailing => with_trailing,
    above => with_above,
    below => with_below,
    before => with_before,
    behind => with_behind,
    center_x => with_center_x,
    center_y => with_center_y,
    equal_height => with_equal_height,
    equal_width => with_equal_width,
    height => with_height,
    width => with_width,
});

impl SiblingConstraints {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Pure resolution
// ============================================================================

/// Build the descriptors for fixed sizes and aspect ratios of `node`
pub fn resolve_self(node: &NodeId, constraints: &SelfConstraints) -> Vec<ConstraintDescriptor> {
    let width = node.anchor(Anchor::Width);
    let height = node.anchor(Anchor::Height);
    let mut descriptors = Vec::new();

    if let Some(value) = constraints.width {
        descriptors.push(ConstraintDescriptor::fixed(width.clone(), value));
    }
    if let Some(value) = constraints.height {
        descriptors.push(ConstraintDescriptor::fixed(height.clone(), value));
    }
    if let Some(aspect) = constraints.aspect_height {
        descriptors.push(ConstraintDescriptor::scaled(
            width.clone(),
            height.clone(),
            aspect,
        ));
    }
    if let Some(aspect) = constraints.aspect_width {
        descriptors.push(ConstraintDescriptor::scaled(height, width, aspect));
    }

    descriptors
}

/// Build the edge, center and size descriptors relating `target` to `parent`
///
/// `inset_available` is the host's inset-region capability. Edges and sizes
/// use the parent's inset region only when both it and
/// `constraints.inset_region` are true. Otherwise the plain frame is used and
/// the top/bottom constants absorb `fallback_top`/`fallback_bottom`.
/// Leading, trailing, centers and sizes never take a fallback offset.
///
/// `height` and `width` are not included; they belong to the self resolver.
pub fn resolve_parent(
    target: &NodeId,
    parent: &NodeId,
    constraints: &ParentConstraints,
    inset_available: bool,
) -> Vec<ConstraintDescriptor> {
    let use_inset = constraints.inset_region && inset_available;
    let boundary = |anchor| {
        if use_inset {
            parent.inset_anchor(anchor)
        } else {
            parent.anchor(anchor)
        }
    };
    let compensate = |value: f64, fallback: Option<f64>| {
        if use_inset {
            value
        } else {
            value + fallback.unwrap_or(0.0)
        }
    };

    let mut descriptors = Vec::new();

    if let Some(top) = constraints.top {
        descriptors.push(ConstraintDescriptor::offset(
            target.anchor(Anchor::Top),
            boundary(Anchor::Top),
            compensate(top, constraints.fallback_top),
        ));
    }
    if let Some(bottom) = constraints.bottom {
        descriptors.push(ConstraintDescriptor::offset(
            boundary(Anchor::Bottom),
            target.anchor(Anchor::Bottom),
            compensate(bottom, constraints.fallback_bottom),
        ));
    }
    if let Some(leading) = constraints.leading {
        descriptors.push(ConstraintDescriptor::offset(
            target.anchor(Anchor::Leading),
            boundary(Anchor::Leading),
            leading,
        ));
    }
    if let Some(trailing) = constraints.trailing {
        descriptors.push(ConstraintDescriptor::offset(
            boundary(Anchor::Trailing),
            target.anchor(Anchor::Trailing),
            trailing,
        ));
    }
    if let Some(center_x) = constraints.center_x {
        descriptors.push(ConstraintDescriptor::offset(
            target.anchor(Anchor::CenterX),
            parent.anchor(Anchor::CenterX),
            center_x,
        ));
    }
    if let Some(center_y) = constraints.center_y {
        descriptors.push(ConstraintDescriptor::offset(
            target.anchor(Anchor::CenterY),
            parent.anchor(Anchor::CenterY),
            center_y,
        ));
    }
    if let Some(multiplier) = constraints.equal_height {
        descriptors.push(ConstraintDescriptor::scaled(
            target.anchor(Anchor::Height),
            boundary(Anchor::Height),
            multiplier,
        ));
    }
    if let Some(multiplier) = constraints.equal_width {
        descriptors.push(ConstraintDescriptor::scaled(
            target.anchor(Anchor::Width),
            boundary(Anchor::Width),
            multiplier,
        ));
    }

    descriptors
}

/// Build the descriptors relating `target` to `sibling`
///
/// `height` and `width` are not included; they belong to the self resolver.
pub fn resolve_sibling(
    target: &NodeId,
    sibling: &NodeId,
    constraints: &SiblingConstraints,
) -> Vec<ConstraintDescriptor> {
    // (requested value, first anchor, second anchor), first == second + value
    let offsets = [
        (constraints.top, target.anchor(Anchor::Top), sibling.anchor(Anchor::Top)),
        (constraints.bottom, sibling.anchor(Anchor::Bottom), target.anchor(Anchor::Bottom)),
        (constraints.leading, target.anchor(Anchor::Leading), sibling.anchor(Anchor::Leading)),
        (constraints.trailing, sibling.anchor(Anchor::Trailing), target.anchor(Anchor::Trailing)),
        (constraints.above, sibling.anchor(Anchor::Top), target.anchor(Anchor::Bottom)),
        (constraints.below, target.anchor(Anchor::Top), sibling.anchor(Anchor::Bottom)),
        (constraints.before, sibling.anchor(Anchor::Leading), target.anchor(Anchor::Trailing)),
        (constraints.behind, target.anchor(Anchor::Leading), sibling.anchor(Anchor::Trailing)),
        (constraints.center_x, target.anchor(Anchor::CenterX), sibling.anchor(Anchor::CenterX)),
        (constraints.center_y, target.anchor(Anchor::CenterY), sibling.anchor(Anchor::CenterY)),
    ];

    let mut descriptors: Vec<ConstraintDescriptor> = offsets
        .into_iter()
        .filter_map(|(value, first, second)| {
            value.map(|constant| ConstraintDescriptor::offset(first, second, constant))
        })
        .collect();

    if let Some(multiplier) = constraints.equal_height {
        descriptors.push(ConstraintDescriptor::scaled(
            target.anchor(Anchor::Height),
            sibling.anchor(Anchor::Height),
            multiplier,
        ));
    }
    if let Some(multiplier) = constraints.equal_width {
        descriptors.push(ConstraintDescriptor::scaled(
            target.anchor(Anchor::Width),
            sibling.anchor(Anchor::Width),
            multiplier,
        ));
    }

    descriptors
}

// ============================================================================
// Host-driven operations
// ============================================================================

/// Mark `subview` as manually positioned and move it under `parent`
pub fn add_constrained_subview<H: ViewTree + ?Sized>(
    host: &mut H,
    parent: &NodeId,
    subview: &NodeId,
) {
    host.disable_auto_constraints(subview);
    host.attach(subview, parent);
}

/// Apply fixed sizes and aspect ratios to `node`
pub fn constrain_self<H>(
    host: &mut H,
    node: &NodeId,
    constraints: &SelfConstraints,
) -> Result<Vec<ConstraintDescriptor>, H::Error>
where
    H: ViewTree + ConstraintActivator + ?Sized,
{
    host.disable_auto_constraints(node);
    let descriptors = resolve_self(node, constraints);
    tracing::debug!(node = %node, count = descriptors.len(), "resolved self constraints");
    host.activate(&descriptors)?;
    Ok(descriptors)
}

/// Attach `target` under `parent` and constrain it against the parent
pub fn constrain_to_parent<H: LayoutHost + ?Sized>(
    host: &mut H,
    target: &NodeId,
    parent: &NodeId,
    constraints: &ParentConstraints,
) -> Result<Vec<ConstraintDescriptor>, H::Error> {
    add_constrained_subview(host, parent, target);

    let inset_available = host.inset_region_available();
    if constraints.inset_region && !inset_available {
        tracing::debug!(
            target = %target,
            parent = %parent,
            "inset region unavailable, using parent frame with fallback offsets"
        );
    }

    let mut descriptors = resolve_parent(target, parent, constraints, inset_available);
    tracing::debug!(
        target = %target,
        parent = %parent,
        count = descriptors.len(),
        "resolved parent constraints"
    );
    host.activate(&descriptors)?;

    let sizes = SelfConstraints::sizes(constraints.height, constraints.width);
    descriptors.extend(constrain_self(host, target, &sizes)?);
    Ok(descriptors)
}

/// Pin all four edges of `target` to `parent` (or to its inset region)
pub fn constrain_to_fill<H: LayoutHost + ?Sized>(
    host: &mut H,
    target: &NodeId,
    parent: &NodeId,
    inset_region: bool,
) -> Result<Vec<ConstraintDescriptor>, H::Error> {
    constrain_to_parent(host, target, parent, &ParentConstraints::fill(inset_region))
}

/// Center `target` in `parent` with optional fixed sizes
pub fn constrain_to_center_in<H: LayoutHost + ?Sized>(
    host: &mut H,
    target: &NodeId,
    parent: &NodeId,
    height: Option<f64>,
    width: Option<f64>,
) -> Result<Vec<ConstraintDescriptor>, H::Error> {
    constrain_to_parent(host, target, parent, &ParentConstraints::center_in(height, width))
}

/// Constrain `target` against `sibling`
///
/// Both nodes are expected to share a parent already; neither is attached
/// nor detached here.
pub fn constrain_to_sibling<H>(
    host: &mut H,
    target: &NodeId,
    sibling: &NodeId,
    constraints: &SiblingConstraints,
) -> Result<Vec<ConstraintDescriptor>, H::Error>
where
    H: ViewTree + ConstraintActivator + ?Sized,
{
    host.disable_auto_constraints(target);
    host.disable_auto_constraints(sibling);

    let mut descriptors = resolve_sibling(target, sibling, constraints);
    tracing::debug!(
        target = %target,
        sibling = %sibling,
        count = descriptors.len(),
        "resolved sibling constraints"
    );
    host.activate(&descriptors)?;

    let sizes = SelfConstraints::sizes(constraints.height, constraints.width);
    descriptors.extend(constrain_self(host, target, &sizes)?);
    Ok(descriptors)
}
