//! Ukkonen's online suffix tree construction.
//!
//! One phase per text byte. All leaf edges stay "open" (their end tracks the
//! current phase) so that rule 1 extensions are free; the active point plus
//! the `remainder` counter locate the suffixes that still need explicit
//! work, and suffix links let each of those be reached in amortized O(1).
//! After the sentinel phase a single pass writes the concrete end into every
//! open edge.

use crate::tree::{Node, NodeId, OPEN_END, ROOT};
use crate::Error;

/// Builds the node arena for `text`, which must already carry the sentinel
/// as its last byte.
pub(crate) fn build(text: &str) -> Result<Vec<Node>, Error> {
    let mut builder = Builder::new(text.as_bytes());
    for phase in 0..text.len() as u32 {
        builder.extend(phase)?;
    }
    builder.finish(text.len() as u32)
}

struct Builder<'s> {
    text: &'s [u8],
    nodes: Vec<Node>,
    active_node: NodeId,
    /// Offset into the text of the first byte of the active edge. Only
    /// meaningful while `active_length > 0`.
    active_edge: u32,
    active_length: u32,
    /// How many suffixes still need an explicit extension this phase.
    remainder: u32,
    /// Internal node created (or revisited) earlier in the current phase
    /// whose suffix link is still unresolved.
    pending_link: Option<NodeId>,
}

impl<'s> Builder<'s> {
    fn new(text: &'s [u8]) -> Builder<'s> {
        Builder {
            text,
            nodes: vec![Node::root()],
            active_node: ROOT,
            active_edge: 0,
            active_length: 0,
            remainder: 0,
            pending_link: None,
        }
    }

    /// Runs one phase: conceptually appends `text[phase]` to every open leaf
    /// edge (free) and then extends the remaining suffixes explicitly until
    /// rule 3 ends the phase or none remain.
    fn extend(&mut self, phase: u32) -> Result<(), Error> {
        let c = self.text[phase as usize];
        self.pending_link = None;
        self.remainder += 1;

        while self.remainder > 0 {
            if self.active_length == 0 {
                self.active_edge = phase;
            }
            let first = self.text[self.active_edge as usize];

            match self.node(self.active_node).child(first) {
                None => {
                    // Rule 2 at a node boundary: attach a fresh leaf. The
                    // active node also resolves any pending suffix link.
                    let leaf = self.new_leaf(phase)?;
                    self.nodes[self.active_node.idx()].add_child(first, leaf)?;
                    self.chain_suffix_link(self.active_node)?;
                }
                Some(next) => {
                    // Skip/count: jump across whole edges instead of
                    // comparing byte by byte. This is what keeps the whole
                    // construction linear.
                    if self.walk_down(next, phase) {
                        continue;
                    }
                    let probe = self.node(next).start + self.active_length;
                    if self.text[probe as usize] == c {
                        // Rule 3: the suffix is already present implicitly.
                        // Record the link target and end the phase early.
                        self.active_length += 1;
                        self.chain_suffix_link(self.active_node)?;
                        break;
                    }
                    // Rule 2 mid-edge: split and hang a new leaf off the
                    // split point.
                    let split = self.split_edge(next, first, probe, phase)?;
                    self.chain_suffix_link(split)?;
                }
            }

            self.remainder -= 1;

            // Advance to the next (shorter) suffix needing extension.
            if self.active_node == ROOT && self.active_length > 0 {
                self.active_length -= 1;
                self.active_edge = phase + 1 - self.remainder;
            } else {
                self.active_node = self
                    .node(self.active_node)
                    .suffix_link
                    .unwrap_or(ROOT);
            }
        }
        Ok(())
    }

    /// Fixes every open edge end to the final text length. The sentinel
    /// guarantees the last phase leaves no suffix unextended.
    fn finish(mut self, full_len: u32) -> Result<Vec<Node>, Error> {
        if self.remainder != 0 {
            return Err(Error::invariant(
                "suffixes left unextended after the sentinel phase",
            ));
        }
        for node in &mut self.nodes {
            if node.end == OPEN_END {
                node.end = full_len;
            }
        }
        Ok(self.nodes)
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    /// If the active point sits at or past the end of `next`'s edge, move
    /// into `next` and retry from there.
    fn walk_down(&mut self, next: NodeId, phase: u32) -> bool {
        let node = self.node(next);
        let len = node.edge_end(phase + 1) - node.start;
        if self.active_length >= len {
            self.active_edge += len;
            self.active_length -= len;
            self.active_node = next;
            true
        } else {
            false
        }
    }

    /// Splits the edge into `next` at `probe`, attaching the old node and a
    /// new leaf under a new internal node that takes its place.
    fn split_edge(
        &mut self,
        next: NodeId,
        first: u8,
        probe: u32,
        phase: u32,
    ) -> Result<NodeId, Error> {
        let start = self.node(next).start;
        let split = self.push(Node::internal(start, probe))?;
        self.nodes[next.idx()].start = probe;
        let leaf = self.new_leaf(phase)?;
        self.nodes[split.idx()].add_child(self.text[probe as usize], next)?;
        self.nodes[split.idx()].add_child(self.text[phase as usize], leaf)?;
        self.nodes[self.active_node.idx()].set_child(first, split)?;
        Ok(split)
    }

    /// Allocates the leaf for the suffix currently being extended. Its edge
    /// end stays open until `finish`.
    fn new_leaf(&mut self, phase: u32) -> Result<NodeId, Error> {
        let pos = (phase + 1)
            .checked_sub(self.remainder)
            .ok_or(Error::InvariantViolation(
                "active point arithmetic underflow",
            ))?;
        self.push(Node::leaf(phase, OPEN_END, pos))
    }

    /// Resolves the pending suffix link against `target` and, unless the
    /// target is the root, makes `target` the new pending node.
    ///
    /// Every internal node gets its link by the end of the extension after
    /// its creation. A pending node may already hold a link when it was
    /// recorded at a node boundary; that link must agree with `target`, and
    /// a disagreement means the build is corrupt.
    fn chain_suffix_link(&mut self, target: NodeId) -> Result<(), Error> {
        if let Some(prev) = self.pending_link.take() {
            let node = &mut self.nodes[prev.idx()];
            match node.suffix_link {
                None => node.suffix_link = Some(target),
                Some(existing) if existing == target => {}
                Some(_) => {
                    return Err(Error::invariant(
                        "internal node would receive a second suffix link",
                    ))
                }
            }
        }
        if target != ROOT {
            self.pending_link = Some(target);
        }
        Ok(())
    }

    fn push(&mut self, node: Node) -> Result<NodeId, Error> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| Error::ArenaExhausted)?;
        if id == OPEN_END {
            return Err(Error::ArenaExhausted);
        }
        self.nodes.push(node);
        Ok(NodeId(id))
    }
}
