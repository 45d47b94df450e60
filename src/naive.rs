//! Naive O(n²) suffix tree construction, kept as the reference oracle for
//! the linear builder. Each suffix is inserted by walking down from the
//! root byte by byte and splitting the first edge that disagrees. No suffix
//! links, no open ends, nothing clever; it only has to be obviously right.

use crate::tree::{Node, NodeId, ROOT};
use crate::Error;

/// Builds the node arena for `text` (sentinel included) by repeated
/// insertion. Produces the same tree shape as the Ukkonen builder, since
/// child tables are kept sorted in both.
pub(crate) fn build(text: &str) -> Result<Vec<Node>, Error> {
    let text = text.as_bytes();
    let mut nodes = vec![Node::root()];
    for i in 0..text.len() as u32 {
        add_suffix(&mut nodes, text, i)?;
    }
    Ok(nodes)
}

fn add_suffix(nodes: &mut Vec<Node>, text: &[u8], suffix: u32) -> Result<(), Error> {
    let n = text.len() as u32;
    let mut node = ROOT;
    let mut k = suffix; // next unmatched text position
    loop {
        let child = nodes[node.idx()].child(text[k as usize]);
        let child = match child {
            None => {
                let leaf = push(nodes, Node::leaf(k, n, suffix))?;
                nodes[node.idx()].add_child(text[k as usize], leaf)?;
                return Ok(());
            }
            Some(child) => child,
        };

        let (start, end) = {
            let c = &nodes[child.idx()];
            (c.start, c.end)
        };
        let mut m = 0;
        while start + m < end && k < n && text[(start + m) as usize] == text[k as usize] {
            m += 1;
            k += 1;
        }

        if start + m == end {
            // Whole edge matched; keep walking. The unique sentinel
            // guarantees the suffix cannot run out before a mismatch.
            node = child;
            continue;
        }

        // Mismatch mid-edge: interpose an internal node at the split point
        // and attach the rest of the suffix as a fresh leaf.
        let split = push(nodes, Node::internal(start, start + m))?;
        nodes[child.idx()].start = start + m;
        nodes[split.idx()].add_child(text[(start + m) as usize], child)?;
        let leaf = push(nodes, Node::leaf(k, n, suffix))?;
        nodes[split.idx()].add_child(text[k as usize], leaf)?;
        nodes[node.idx()].set_child(text[start as usize], split)?;
        return Ok(());
    }
}

fn push(nodes: &mut Vec<Node>, node: Node) -> Result<NodeId, Error> {
    let id = u32::try_from(nodes.len()).map_err(|_| Error::ArenaExhausted)?;
    nodes.push(node);
    Ok(NodeId(id))
}
