use std::fmt;

use crate::navigate::Matches;
use crate::{naive, ukkonen, Error};

/// The termination sentinel appended to every indexed text. It is reserved:
/// input containing it is rejected by the constructors.
pub const SENTINEL: u8 = b'$';

/// Edge end marker meaning "the current end of the text so far". Every leaf
/// edge carries it during construction; the final fix-up pass replaces it
/// with the concrete text length.
pub(crate) const OPEN_END: u32 = u32::MAX;

/// A handle to a node in the tree's arena.
///
/// Handles are plain indices: they are only meaningful for the tree that
/// produced them, and the arena owns all nodes. Child edges and suffix links
/// are stored as handles too, so the tree never forms an ownership cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

pub(crate) const ROOT: NodeId = NodeId(0);

impl NodeId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A node in the arena: root, internal branching point or leaf.
///
/// `start..end` is the label of the edge into this node (byte offsets into
/// the text). Leaves carry the starting position of the suffix they
/// represent in `pos`; that is also how leaves are recognized.
pub(crate) struct Node {
    pub(crate) start: u32,
    pub(crate) end: u32,
    pub(crate) children: Vec<(u8, NodeId)>,
    pub(crate) suffix_link: Option<NodeId>,
    pub(crate) pos: Option<u32>,
}

impl Node {
    pub(crate) fn root() -> Node {
        Node {
            start: 0,
            end: 0,
            children: Vec::new(),
            suffix_link: None,
            pos: None,
        }
    }

    pub(crate) fn internal(start: u32, end: u32) -> Node {
        Node {
            start,
            end,
            children: Vec::new(),
            suffix_link: None,
            pos: None,
        }
    }

    pub(crate) fn leaf(start: u32, end: u32, pos: u32) -> Node {
        Node {
            start,
            end,
            children: Vec::new(),
            suffix_link: None,
            pos: Some(pos),
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.pos.is_some()
    }

    /// The edge end, with open ends standing in for `open_as`.
    #[inline]
    pub(crate) fn edge_end(&self, open_as: u32) -> u32 {
        if self.end == OPEN_END {
            open_as
        } else {
            self.end
        }
    }

    pub(crate) fn child(&self, first: u8) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&first, |&(b, _)| b)
            .ok()
            .map(|i| self.children[i].1)
    }

    /// Inserts a child edge keyed by its first byte. Sibling edges must not
    /// share a first byte; a duplicate means the builder is corrupt.
    pub(crate) fn add_child(&mut self, first: u8, id: NodeId) -> Result<(), Error> {
        match self.children.binary_search_by_key(&first, |&(b, _)| b) {
            Ok(_) => Err(Error::invariant("two sibling edges share a first byte")),
            Err(i) => {
                self.children.insert(i, (first, id));
                Ok(())
            }
        }
    }

    /// Redirects an existing child edge to a different node (used when a
    /// split interposes a new internal node).
    pub(crate) fn set_child(&mut self, first: u8, id: NodeId) -> Result<(), Error> {
        match self.children.binary_search_by_key(&first, |&(b, _)| b) {
            Ok(i) => {
                self.children[i].1 = id;
                Ok(())
            }
            Err(_) => Err(Error::invariant("redirected a child edge that does not exist")),
        }
    }
}

/// A suffix tree over a text, built once and read-only thereafter.
///
/// The tree indexes the text at byte granularity and stores all nodes in a
/// single arena, so queries may run concurrently from multiple threads.
pub struct SuffixTree {
    text: String, // input + sentinel
    nodes: Vec<Node>,
    leaf_counts: Vec<u32>,
}

impl SuffixTree {
    /// Builds the suffix tree of `text` with Ukkonen's online algorithm in
    /// O(n) time and space.
    ///
    /// Fails with `Error::InvalidInput` if `text` is empty or already
    /// contains the reserved sentinel byte `$`.
    pub fn new<S: Into<String>>(text: S) -> Result<SuffixTree, Error> {
        let text = appended(text.into())?;
        let nodes = ukkonen::build(&text)?;
        Ok(SuffixTree::assemble(text, nodes))
    }

    /// Builds the same tree by naive O(n²) repeated suffix insertion.
    ///
    /// This is the reference oracle for cross-checking the linear builder;
    /// it is deliberately simple rather than fast.
    #[doc(hidden)]
    pub fn new_naive<S: Into<String>>(text: S) -> Result<SuffixTree, Error> {
        let text = appended(text.into())?;
        let nodes = naive::build(&text)?;
        Ok(SuffixTree::assemble(text, nodes))
    }

    fn assemble(text: String, nodes: Vec<Node>) -> SuffixTree {
        let leaf_counts = leaf_counts(&nodes);
        SuffixTree {
            text,
            nodes,
            leaf_counts,
        }
    }

    /// The indexed text, without the sentinel.
    pub fn text(&self) -> &str {
        &self.text[..self.text.len() - 1]
    }

    /// Length of the indexed text in bytes, without the sentinel.
    pub fn len(&self) -> usize {
        self.text.len() - 1
    }

    /// The text plus its sentinel, as bytes. Edge labels index into this.
    pub(crate) fn full(&self) -> &[u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    /// The root node handle.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The label of the edge into `id`, as bytes into the text. The label of
    /// an edge ending at a leaf includes the `$` sentinel; the root's label
    /// is empty.
    pub fn label(&self, id: NodeId) -> &[u8] {
        let node = self.node(id);
        &self.full()[node.start as usize..node.end as usize]
    }

    /// For a leaf, the starting offset of the suffix it represents.
    pub fn suffix_pos(&self, id: NodeId) -> Option<usize> {
        self.node(id).pos.map(|p| p as usize)
    }

    /// The children of `id`, ordered by the first byte of their edges.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            it: self.node(id).children.iter(),
        }
    }

    /// All nodes below (and including) `id`, in preorder. Lexicographic by
    /// edge label, since children are kept sorted.
    pub fn preorder(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![id],
        }
    }

    /// Number of leaves in the tree: one per suffix of `text + '$'`, so
    /// always `len() + 1`.
    pub fn leaf_count(&self) -> usize {
        self.leaf_counts[ROOT.idx()] as usize
    }

    /// Number of leaves at or below `id`.
    pub fn leaf_count_at(&self, id: NodeId) -> usize {
        self.leaf_counts[id.idx()] as usize
    }

    /// Sum over all internal nodes of edge length × leaf descendants.
    ///
    /// This equals the summed length of each suffix's longest prefix that
    /// also occurs as a prefix of another suffix, computed in one pass over
    /// the tree instead of comparing all suffix pairs.
    pub fn shared_prefix_total(&self) -> u64 {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_leaf())
            .map(|(i, n)| u64::from(n.end - n.start) * u64::from(self.leaf_counts[i]))
            .sum()
    }

    /// Does `pattern` occur in the text? The empty pattern always matches.
    pub fn is_match(&self, pattern: &str) -> bool {
        self.matches(pattern).next().is_some()
    }

    /// All starting offsets of `pattern` in the text, lazily.
    ///
    /// An absent pattern yields an empty iterator; re-invoking re-walks the
    /// tree from the root. The empty pattern yields every suffix position.
    pub fn matches(&self, pattern: &str) -> Matches<'_> {
        Matches::new(self, pattern)
    }

    /// Renders the tree in GraphViz dot format: boxes are leaves labeled
    /// with their suffix position, dashed silver edges are suffix links.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph tree {\n");
        out.push_str("node [shape=circle];\n");
        for id in self.preorder(ROOT) {
            let node = self.node(id);
            match node.pos {
                Some(pos) => {
                    out.push_str(&format!("node{} [label=\"{}\", shape=box]\n", id.0, pos))
                }
                None => out.push_str(&format!("node{} [label=\"\"]\n", id.0)),
            }
            for child in self.children(id) {
                out.push_str(&format!(
                    "node{} -> node{} [label=\"{}\"]\n",
                    id.0,
                    child.0,
                    dot_label(self.label(child)),
                ));
            }
            if let Some(link) = node.suffix_link {
                if link != ROOT {
                    out.push_str(&format!(
                        "node{} -> node{} [style=\"dashed\", constraint=false, color=silver]\n",
                        id.0, link.0,
                    ));
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

/// Validates the raw input and appends the sentinel.
fn appended(mut text: String) -> Result<String, Error> {
    if text.is_empty() {
        return Err(Error::invalid("text is empty"));
    }
    if text.as_bytes().contains(&SENTINEL) {
        return Err(Error::invalid(format!(
            "text contains the reserved sentinel {:?}",
            SENTINEL as char,
        )));
    }
    // The arena indexes nodes with u32 and a build allocates at most 2n
    // nodes, so bound the text well inside u32 range.
    if text.len() as u64 > u64::from(u32::MAX / 2 - 1) {
        return Err(Error::ArenaExhausted);
    }
    text.push(SENTINEL as char);
    Ok(text)
}

/// Counts leaf descendants for every node in one explicit-stack post-order
/// pass over the finished arena.
fn leaf_counts(nodes: &[Node]) -> Vec<u32> {
    let mut counts = vec![0u32; nodes.len()];
    let mut stack = vec![(ROOT, false)];
    while let Some((id, ready)) = stack.pop() {
        let node = &nodes[id.idx()];
        if node.is_leaf() {
            counts[id.idx()] = 1;
        } else if ready {
            counts[id.idx()] = node.children.iter().map(|&(_, c)| counts[c.idx()]).sum();
        } else {
            stack.push((id, true));
            for &(_, c) in &node.children {
                stack.push((c, false));
            }
        }
    }
    counts
}

fn dot_label(label: &[u8]) -> String {
    String::from_utf8_lossy(label)
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// An iterator over the children of a node, in edge-label order.
pub struct Children<'t> {
    it: std::slice::Iter<'t, (u8, NodeId)>,
}

impl<'t> Iterator for Children<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.it.next().map(|&(_, id)| id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'t> DoubleEndedIterator for Children<'t> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.it.next_back().map(|&(_, id)| id)
    }
}

impl<'t> ExactSizeIterator for Children<'t> {}

/// A preorder traversal of a subtree, with an explicit stack so that deep
/// or skewed trees cannot overflow the call stack.
pub struct Preorder<'t> {
    tree: &'t SuffixTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).rev());
        Some(id)
    }
}

impl fmt::Debug for SuffixTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n-----------------------------------------")?;
        writeln!(f, "SUFFIX TREE")?;
        writeln!(f, "text: {}", self.text())?;
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if id == ROOT {
                writeln!(f, "ROOT")?;
            } else {
                let indent = "  ".repeat(depth);
                writeln!(f, "{}{}", indent, String::from_utf8_lossy(self.label(id)))?;
            }
            for child in self.children(id).rev() {
                stack.push((child, depth + 1));
            }
        }
        writeln!(f, "-----------------------------------------")
    }
}
