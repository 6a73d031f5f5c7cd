//! Length-keyed prefix tree.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use super::normalize::{split_words, word_length};

/// A candidate title, stored as its words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title {
    words: Vec<String>,
}

impl Title {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Build a title from raw text, splitting on whitespace and punctuation.
    pub fn from_raw(raw: &str) -> Self {
        Self::new(split_words(raw))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Character length of every word, in order.
    pub fn lengths(&self) -> Vec<usize> {
        self.words.iter().map(|w| word_length(w)).collect()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for Title {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A tree node keyed by word length.
///
/// Children are keyed by the length of the next word. A node carries a
/// candidate list when at least one corpus text ended its (truncated) length
/// sequence here. Storage order of children carries no meaning; the
/// traversal imposes its own ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthNode {
    pub(crate) children: BTreeMap<usize, LengthNode>,
    pub(crate) titles: Option<Vec<Title>>,
}

impl LengthNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &BTreeMap<usize, LengthNode> {
        &self.children
    }

    pub fn child(&self, length: usize) -> Option<&LengthNode> {
        self.children.get(&length)
    }

    /// Candidate titles attached to this node (empty when there are none).
    pub fn titles(&self) -> &[Title] {
        self.titles.as_deref().unwrap_or(&[])
    }

    pub fn has_titles(&self) -> bool {
        self.titles.is_some()
    }

    /// No children and no candidates.
    pub fn is_dead_end(&self) -> bool {
        self.children.is_empty() && self.titles.is_none()
    }

    /// Insert `title` at the end of `path`, creating missing nodes.
    ///
    /// Titles ending on an existing candidate list are appended; duplicates
    /// are kept.
    pub fn insert(&mut self, path: &[usize], title: Title) {
        let mut node = self;
        for &length in path {
            node = node.children.entry(length).or_default();
        }
        node.titles.get_or_insert_with(Vec::new).push(title);
    }

    /// Merge another tree into this one.
    ///
    /// Shared keys merge recursively, keys present on one side only are
    /// moved over, and candidate lists are concatenated (self first).
    pub fn merge(&mut self, other: LengthNode) {
        for (length, child) in other.children {
            match self.children.entry(length) {
                Entry::Vacant(slot) => {
                    slot.insert(child);
                }
                Entry::Occupied(mut slot) => slot.get_mut().merge(child),
            }
        }

        if let Some(titles) = other.titles {
            self.titles.get_or_insert_with(Vec::new).extend(titles);
        }
    }

    /// Node reached by following `path` exactly.
    pub fn descend(&self, path: &[usize]) -> Option<&LengthNode> {
        path.iter()
            .try_fold(self, |node, length| node.children.get(length))
    }

    /// Candidate list at the end of `path`, if the path exists and ends on one.
    pub fn candidates_at(&self, path: &[usize]) -> Option<&[Title]> {
        self.descend(path).and_then(|node| node.titles.as_deref())
    }

    /// Structural statistics for logging.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if let Some(titles) = &node.titles {
                stats.leaves += 1;
                stats.titles += titles.len();
            }
            stack.extend(node.children.values().map(|child| (child, depth + 1)));
        }
        stats
    }
}

/// Shape summary of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    /// Nodes holding a candidate list.
    pub leaves: usize,
    pub titles: usize,
    pub max_depth: usize,
}

/// The index: a root node plus the depth bound paths were truncated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthTree {
    root: LengthNode,
    max_depth: usize,
}

impl LengthTree {
    pub fn new(max_depth: usize) -> Self {
        Self::from_root(LengthNode::new(), max_depth)
    }

    pub fn from_root(root: LengthNode, max_depth: usize) -> Self {
        Self { root, max_depth }
    }

    pub fn root(&self) -> &LengthNode {
        &self.root
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Insert `title` under `lengths`, truncated to `max_depth`.
    pub fn insert(&mut self, lengths: &[usize], title: Title) {
        let depth = lengths.len().min(self.max_depth);
        self.root.insert(&lengths[..depth], title);
    }

    /// Combine two independently built trees.
    pub fn merge(mut self, other: LengthTree) -> LengthTree {
        self.max_depth = self.max_depth.max(other.max_depth);
        self.root.merge(other.root);
        self
    }

    pub fn stats(&self) -> TreeStats {
        self.root.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn title(raw: &str) -> Title {
        Title::from_raw(raw)
    }

    /// Every (path, sorted candidate list) pair in the tree.
    fn leaf_sets(node: &LengthNode) -> BTreeSet<(Vec<usize>, Vec<Title>)> {
        let mut out = BTreeSet::new();
        let mut stack = vec![(node, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            if let Some(titles) = &node.titles {
                let mut sorted = titles.clone();
                sorted.sort();
                out.insert((path.clone(), sorted));
            }
            for (length, child) in &node.children {
                let mut next = path.clone();
                next.push(*length);
                stack.push((child, next));
            }
        }
        out
    }

    #[test]
    fn test_title_from_raw() {
        let t = title("Le Petit Prince");
        assert_eq!(t.word_count(), 3);
        assert_eq!(t.lengths(), vec![2, 5, 6]);
        assert_eq!(t.to_string(), "Le Petit Prince");
    }

    #[test]
    fn test_title_serializes_as_word_list() {
        let json = serde_json::to_string(&title("Le Petit Prince")).unwrap();
        assert_eq!(json, r#"["Le","Petit","Prince"]"#);
    }

    #[test]
    fn test_insert_creates_path() {
        let mut root = LengthNode::new();
        root.insert(&[3, 4], title("Le Petit Prince"));

        assert!(!root.has_titles());
        let leaf = root.descend(&[3, 4]).unwrap();
        assert!(leaf.children().is_empty());
        assert_eq!(leaf.titles(), &[title("Le Petit Prince")]);
        assert!(root.descend(&[4]).is_none());
    }

    #[test]
    fn test_insert_appends_duplicates() {
        let mut root = LengthNode::new();
        root.insert(&[1, 2], title("A"));
        root.insert(&[1, 2], title("B"));
        root.insert(&[1, 2], title("A"));

        assert_eq!(
            root.candidates_at(&[1, 2]).unwrap(),
            &[title("A"), title("B"), title("A")]
        );
    }

    #[test]
    fn test_insert_empty_path_lands_on_root() {
        let mut root = LengthNode::new();
        root.insert(&[], title("Empty"));
        assert_eq!(root.titles(), &[title("Empty")]);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_node_can_hold_children_and_titles() {
        let mut root = LengthNode::new();
        root.insert(&[5], title("Short"));
        root.insert(&[5, 2], title("Longer"));

        let node = root.child(5).unwrap();
        assert_eq!(node.titles(), &[title("Short")]);
        assert!(node.child(2).is_some());
    }

    #[test]
    fn test_tree_insert_truncates_to_max_depth() {
        let mut tree = LengthTree::new(3);
        tree.insert(&[1, 2, 3, 4, 5], title("One"));
        tree.insert(&[1, 2, 3, 9], title("Two"));

        assert_eq!(
            tree.root().candidates_at(&[1, 2, 3]).unwrap(),
            &[title("One"), title("Two")]
        );
        assert!(tree.root().descend(&[1, 2, 3, 4]).is_none());
    }

    #[test]
    fn test_merge_disjoint_and_shared() {
        let mut a = LengthNode::new();
        a.insert(&[3, 4], title("A"));
        a.insert(&[2], title("Only A"));

        let mut b = LengthNode::new();
        b.insert(&[3, 4], title("B"));
        b.insert(&[3, 1], title("Only B"));

        a.merge(b);

        assert_eq!(a.candidates_at(&[3, 4]).unwrap(), &[title("A"), title("B")]);
        assert_eq!(a.candidates_at(&[2]).unwrap(), &[title("Only A")]);
        assert_eq!(a.candidates_at(&[3, 1]).unwrap(), &[title("Only B")]);
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let mut a = LengthNode::new();
        a.insert(&[1], title("Same"));
        let mut b = LengthNode::new();
        b.insert(&[1], title("Same"));

        a.merge(b);
        assert_eq!(a.candidates_at(&[1]).unwrap().len(), 2);
    }

    #[test]
    fn test_merge_is_associative_as_sets() {
        let mut a = LengthNode::new();
        a.insert(&[1, 2], title("a1"));
        a.insert(&[3], title("a2"));
        let mut b = LengthNode::new();
        b.insert(&[1, 2], title("b1"));
        b.insert(&[1], title("b2"));
        let mut c = LengthNode::new();
        c.insert(&[3], title("c1"));
        c.insert(&[1, 2, 7], title("c2"));

        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut bc = b.clone();
        bc.merge(c.clone());
        let mut right = a.clone();
        right.merge(bc);

        let mut swapped = c;
        swapped.merge(b);
        swapped.merge(a);

        assert_eq!(leaf_sets(&left), leaf_sets(&right));
        assert_eq!(leaf_sets(&left), leaf_sets(&swapped));
    }

    #[test]
    fn test_tree_merge_takes_larger_depth() {
        let a = LengthTree::new(5);
        let b = LengthTree::new(20);
        assert_eq!(a.merge(b).max_depth(), 20);
    }

    #[test]
    fn test_stats() {
        let mut root = LengthNode::new();
        root.insert(&[3, 4], title("A"));
        root.insert(&[3, 4], title("B"));
        root.insert(&[3], title("C"));
        root.insert(&[1, 1, 1], title("D"));

        let stats = root.stats();
        assert_eq!(stats.nodes, 6);
        assert_eq!(stats.leaves, 3);
        assert_eq!(stats.titles, 4);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_dead_end() {
        assert!(LengthNode::new().is_dead_end());
        let mut root = LengthNode::new();
        root.insert(&[], title("X"));
        assert!(!root.is_dead_end());
    }
}
