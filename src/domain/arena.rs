//! Arena-backed storage for the region tree.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::region::Region;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct RegionNode {
    /// Region payload for this node
    pub region: Region,
    /// Index of the parent node, None for the root. Non-owning: used
    /// only for upward (ancestry) queries, never for destruction.
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree for the region hierarchy.
///
/// Ownership flows root-to-leaves through the arena, so parent links
/// cannot form reference cycles. Child order is insertion order here;
/// the sorted-by-id presentation contract lives one layer up.
#[derive(Debug, Default)]
pub struct RegionArena {
    arena: Arena<RegionNode>,
    root: Option<Index>,
}

impl RegionArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as the root when `parent` is None).
    /// The parent back-reference is assigned immediately, so no node is
    /// ever observable with a dangling parent link.
    #[instrument(level = "trace", skip(self, region))]
    pub fn insert_node(&mut self, region: Region, parent: Option<Index>) -> Index {
        let node = RegionNode {
            region,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                parent_node.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get(&self, idx: Index) -> Option<&RegionNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut RegionNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Remove the subtree rooted at `idx` and return the removed regions
    /// in pre-order (the subtree root first). The root of the whole tree
    /// cannot be removed this way; callers enforce that.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> Vec<Region> {
        // Detach from the parent's child list first
        if let Some(parent_idx) = self.arena.get(idx).and_then(|n| n.parent) {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != idx);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children.iter().rev());
                removed.push(node.region);
            }
        }
        removed
    }

    /// Pre-order traversal, children left-to-right in insertion order.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Longest root-to-leaf chain, counted in nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        match self.root {
            Some(root) => self.subtree_depth(root),
            None => 0,
        }
    }

    fn subtree_depth(&self, node_idx: Index) -> usize {
        match self.get(node_idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.subtree_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }
}

pub struct PreOrderIter<'a> {
    arena: &'a RegionArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(arena: &'a RegionArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a RegionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}
