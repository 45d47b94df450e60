//! Query-side tree walking: locating a pattern's locus and enumerating the
//! occurrences below it.

use crate::tree::{NodeId, SuffixTree, ROOT, SENTINEL};

/// Walks down from the root matching `pattern` byte for byte against edge
/// labels. Returns the node whose subtree holds every occurrence: the child
/// whose edge the pattern ended inside (or at the end of), or the root for
/// the empty pattern. `None` means the pattern does not occur.
pub(crate) fn locate(tree: &SuffixTree, pattern: &[u8]) -> Option<NodeId> {
    if pattern.is_empty() {
        return Some(ROOT);
    }
    let text = tree.full();
    let mut node = ROOT;
    let mut k = 0;
    loop {
        // Leaves have no children, so falling off the tree mid-pattern
        // lands here and reports absence.
        let child = tree.node(node).child(pattern[k])?;
        let (start, end) = {
            let c = tree.node(child);
            (c.start as usize, c.end as usize)
        };
        let mut m = start;
        while m < end && k < pattern.len() {
            if text[m] != pattern[k] {
                return None;
            }
            m += 1;
            k += 1;
        }
        if k == pattern.len() {
            return Some(child);
        }
        node = child;
    }
}

/// A lazy iterator over the starting offsets of a pattern in the text.
///
/// Traverses the subtree under the pattern's locus with an explicit stack
/// (deep, skewed trees must not overflow the call stack), yielding the
/// stored position of every leaf. The sentinel-only leaf is skipped: its
/// position is past the end of the indexed text and never a real occurrence.
pub struct Matches<'t> {
    tree: &'t SuffixTree,
    stack: Vec<NodeId>,
}

impl<'t> Matches<'t> {
    pub(crate) fn new(tree: &'t SuffixTree, pattern: &str) -> Matches<'t> {
        let pattern = pattern.as_bytes();
        // The sentinel is not part of the indexed text, so patterns
        // containing it can never occur.
        let stack = if pattern.contains(&SENTINEL) {
            Vec::new()
        } else {
            locate(tree, pattern).into_iter().collect()
        };
        Matches { tree, stack }
    }
}

impl<'t> Iterator for Matches<'t> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(id) = self.stack.pop() {
            match self.tree.suffix_pos(id) {
                Some(pos) if pos < self.tree.len() => return Some(pos),
                Some(_) => {} // sentinel-only leaf
                None => self.stack.extend(self.tree.children(id)),
            }
        }
        None
    }
}
