//! Depth-adaptive candidate traversal.
//!
//! The traversal is driven by the observed text length profile. At each node
//! the child keys are ranked by `|observed - key|`, ties by ascending key.
//!
//! - Below `min_search_depth` only the closest child is followed; the node's
//!   own candidates are never considered and there is no backtracking.
//! - From `min_search_depth` on every child is explored in rank order, then
//!   the node's own candidates are yielded last.
//! - Once the profile is exhausted the node's candidates are yielded in
//!   insertion order and nothing below it is visited.
//!
//! [`CandidateWalk`] is lazy so a consumer can stop as soon as a title
//! resolves without the remaining branches ever being ranked.

use std::slice;

use crate::config::SearchConfig;
use crate::tree::{LengthNode, Title};

/// Traversal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub min_search_depth: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_search_depth: 10,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            min_search_depth: config.min_search_depth,
        }
    }
}

/// Child keys of `node` ordered by closeness to `observed`.
pub fn ranked_children(node: &LengthNode, observed: usize) -> Vec<(usize, &LengthNode)> {
    let mut ranked: Vec<_> = node
        .children()
        .iter()
        .map(|(&length, child)| (length, child))
        .collect();
    // BTreeMap iteration is ascending, so a stable sort breaks ties by key.
    ranked.sort_by_key(|(length, _)| length.abs_diff(observed));
    ranked
}

enum Step<'t, 'p> {
    Visit {
        node: &'t LengthNode,
        depth: usize,
        rest: &'p [usize],
    },
    Yield(&'t [Title]),
}

/// Lazy iterator over candidate titles in traversal order.
pub struct CandidateWalk<'t, 'p> {
    options: SearchOptions,
    stack: Vec<Step<'t, 'p>>,
    current: slice::Iter<'t, Title>,
}

impl<'t, 'p> CandidateWalk<'t, 'p> {
    pub fn new(root: &'t LengthNode, profile: &'p [usize], options: SearchOptions) -> Self {
        Self {
            options,
            stack: vec![Step::Visit {
                node: root,
                depth: 0,
                rest: profile,
            }],
            current: <&[Title]>::default().iter(),
        }
    }

    fn expand(&mut self, node: &'t LengthNode, depth: usize, rest: &'p [usize]) {
        let Some((&observed, tail)) = rest.split_first() else {
            if node.has_titles() {
                self.stack.push(Step::Yield(node.titles()));
            }
            return;
        };

        let ranked = ranked_children(node, observed);

        if depth < self.options.min_search_depth {
            if let Some(&(_, child)) = ranked.first() {
                self.stack.push(Step::Visit {
                    node: child,
                    depth: depth + 1,
                    rest: tail,
                });
            }
            return;
        }

        // Pushed first so it pops after every child subtree.
        if node.has_titles() {
            self.stack.push(Step::Yield(node.titles()));
        }
        for &(_, child) in ranked.iter().rev() {
            self.stack.push(Step::Visit {
                node: child,
                depth: depth + 1,
                rest: tail,
            });
        }
    }
}

impl<'t, 'p> Iterator for CandidateWalk<'t, 'p> {
    type Item = &'t Title;

    fn next(&mut self) -> Option<&'t Title> {
        loop {
            if let Some(title) = self.current.next() {
                return Some(title);
            }
            match self.stack.pop()? {
                Step::Yield(titles) => self.current = titles.iter(),
                Step::Visit { node, depth, rest } => self.expand(node, depth, rest),
            }
        }
    }
}

/// Collect every candidate the traversal would propose, in order.
pub fn search<'t>(
    root: &'t LengthNode,
    profile: &[usize],
    options: SearchOptions,
) -> Vec<&'t Title> {
    CandidateWalk::new(root, profile, options).collect()
}
