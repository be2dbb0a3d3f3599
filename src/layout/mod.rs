//! Anchor layout: resolving sparse view relationships into solver constraints
//!
//! The resolvers in [`resolver`] are the heart of this module. They produce
//! [`ConstraintDescriptor`]s and drive any [`LayoutHost`]; [`LayoutEngine`]
//! is the bundled host backed by an in-memory tree and the kasuari solver.

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod host;
pub mod resolver;
pub mod solver;
pub mod tree;
pub mod types;

pub use config::EngineConfig;
pub use descriptor::{ConstraintDescriptor, Relation};
pub use engine::{FrameMap, LayoutEngine};
pub use host::{ConstraintActivator, DescriptorLog, InsetCapability, LayoutHost, ViewTree};
pub use resolver::{
    add_constrained_subview, constrain_self, constrain_to_center_in, constrain_to_fill,
    constrain_to_parent, constrain_to_sibling, resolve_parent, resolve_self, resolve_sibling,
    ParentConstraints, SelfConstraints, SiblingConstraints,
};
pub use solver::{ConstraintSolver, SolverError};
pub use tree::ViewHierarchy;
pub use types::*;

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Find up to three known names within `max_distance` edits of `target`
pub fn find_similar<'a, I>(known: I, target: &str, max_distance: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates: Vec<(&str, usize)> = known
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by(|(a_name, a_dist), (b_name, b_dist)| {
        a_dist.cmp(b_dist).then_with(|| a_name.cmp(b_name))
    });
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}
