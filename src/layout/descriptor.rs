//! Constraint descriptors handed to the solver

use std::fmt;

use super::types::AnchorRef;

/// Relation between the two sides of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
}

impl Relation {
    fn symbol(self) -> &'static str {
        match self {
            Relation::Equal => "==",
        }
    }
}

/// A resolved constraint: `first == second * multiplier + constant`
///
/// With no `second` anchor the descriptor pins `first` to `constant` and the
/// multiplier is always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDescriptor {
    pub first: AnchorRef,
    pub relation: Relation,
    pub second: Option<AnchorRef>,
    pub multiplier: f64,
    pub constant: f64,
}

impl ConstraintDescriptor {
    /// `first == value`
    pub fn fixed(first: AnchorRef, value: f64) -> Self {
        Self {
            first,
            relation: Relation::Equal,
            second: None,
            multiplier: 1.0,
            constant: value,
        }
    }

    /// `first == second + constant`
    pub fn offset(first: AnchorRef, second: AnchorRef, constant: f64) -> Self {
        Self {
            first,
            relation: Relation::Equal,
            second: Some(second),
            multiplier: 1.0,
            constant,
        }
    }

    /// `first == second * multiplier`
    pub fn scaled(first: AnchorRef, second: AnchorRef, multiplier: f64) -> Self {
        Self {
            first,
            relation: Relation::Equal,
            second: Some(second),
            multiplier,
            constant: 0.0,
        }
    }

    /// True if either side of the descriptor is the given anchor
    pub fn references(&self, anchor: &AnchorRef) -> bool {
        &self.first == anchor || self.second.as_ref() == Some(anchor)
    }
}

impl fmt::Display for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.first, self.relation.symbol())?;
        let Some(second) = &self.second else {
            return write!(f, "{}", self.constant);
        };
        write!(f, "{}", second)?;
        if self.multiplier != 1.0 {
            write!(f, " * {}", self.multiplier)?;
        }
        if self.constant > 0.0 {
            write!(f, " + {}", self.constant)?;
        } else if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)?;
        }
        Ok(())
    }
}
