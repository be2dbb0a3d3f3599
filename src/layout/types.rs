//! Core types for anchoring views: node handles, anchors and rectangles

use std::fmt;

use serde::Deserialize;

/// Opaque handle to a view node in the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Anchor on the node's own frame
    pub fn anchor(&self, anchor: Anchor) -> AnchorRef {
        AnchorRef {
            node: self.clone(),
            region: Region::Frame,
            anchor,
        }
    }

    /// Anchor on the node's inset (safe area) region
    pub fn inset_anchor(&self, anchor: Anchor) -> AnchorRef {
        AnchorRef {
            node: self.clone(),
            region: Region::Inset,
            anchor,
        }
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Edges, center axes and dimensions usable as constraint endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterX,
    CenterY,
    Height,
    Width,
}

impl Anchor {
    pub fn name(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Leading => "leading",
            Anchor::Trailing => "trailing",
            Anchor::CenterX => "center_x",
            Anchor::CenterY => "center_y",
            Anchor::Height => "height",
            Anchor::Width => "width",
        }
    }
}

/// Which rectangle of a node an anchor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The node's own frame
    Frame,
    /// The node's inset region (frame shrunk by its safe-area insets)
    Inset,
}

/// A concrete constraint endpoint: one anchor of one region of one node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorRef {
    pub node: NodeId,
    pub region: Region,
    pub anchor: Anchor,
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Region::Frame => write!(f, "{}.{}", self.node, self.anchor.name()),
            Region::Inset => write!(f, "{}.inset.{}", self.node, self.anchor.name()),
        }
    }
}

/// A solved or suggested rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Trailing edge x-coordinate
    pub fn trailing(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }

    /// Shrink the rectangle by the given insets
    pub fn inset_by(&self, insets: &Insets) -> Rect {
        Rect::new(
            self.x + insets.leading,
            self.y + insets.top,
            self.width - insets.leading - insets.trailing,
            self.height - insets.top - insets.bottom,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={:.1} y={:.1} w={:.1} h={:.1}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Distances from each edge of a frame to its inset region
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
    pub leading: f64,
    pub trailing: f64,
}

impl Insets {
    pub fn new(top: f64, bottom: f64, leading: f64, trailing: f64) -> Self {
        Self {
            top,
            bottom,
            leading,
            trailing,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}
