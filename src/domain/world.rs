//! The world: a named document owning the whole region tree.
//!
//! Single source of truth for structural queries and mutation. Every
//! mutation validates its preconditions before touching the arena, so a
//! rejected mutation leaves the tree byte-for-byte unchanged. An id index
//! turns lookups into O(1) and ancestry queries into O(depth); the index
//! is rebuilt only on construction and updated incrementally afterwards.

use std::collections::HashMap;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::RegionArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::region::{is_valid_id, Region, RegionType};

#[derive(Debug)]
pub struct World {
    name: String,
    arena: RegionArena,
    /// id -> arena index, covering every region including the root
    index: HashMap<String, Index>,
}

impl World {
    /// Name used when a world is created without a usable one.
    pub const DEFAULT_NAME: &'static str = "World";

    /// Fresh world whose root region is the world itself (id = name,
    /// kind = World). This is the `reset` lifecycle entry; it has no
    /// failure mode: a blank name falls back to [`World::DEFAULT_NAME`]
    /// so the root id is never empty and the encoded document always
    /// passes validation on reload.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            Self::DEFAULT_NAME.to_string()
        } else {
            name
        };
        let mut arena = RegionArena::new();
        let root = Region::new(name.clone(), name.clone(), RegionType::World);
        let root_idx = arena.insert_node(root, None);
        let mut index = HashMap::new();
        index.insert(name.clone(), root_idx);
        Self { name, arena, index }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Region {
        let root_idx = self.arena.root().expect("a world always has a root region");
        &self
            .arena
            .get(root_idx)
            .expect("root index is always live")
            .region
    }

    /// Total number of regions, root included.
    pub fn region_count(&self) -> usize {
        self.arena.len()
    }

    /// Longest root-to-leaf chain, counted in regions.
    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    /// Pre-order traversal over all regions, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.arena.iter().map(|(_, node)| &node.region)
    }

    // -----------------------------------------------------------------------
    // Query surface (what a tree view needs to stay in sync)
    // -----------------------------------------------------------------------

    pub fn has_region(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<&Region> {
        let idx = *self.index.get(id)?;
        self.arena.get(idx).map(|node| &node.region)
    }

    /// Chain of regions from the root down to `id`, root first, target
    /// last. Walks the parent back-references upward from the id index,
    /// so the cost is O(depth), not a tree search from the root.
    #[instrument(level = "trace", skip(self))]
    pub fn path_from_root(&self, id: &str) -> Option<Vec<&Region>> {
        let mut idx = *self.index.get(id)?;
        let mut path = Vec::new();
        loop {
            let node = self.arena.get(idx)?;
            path.push(&node.region);
            match node.parent {
                Some(parent) => idx = parent,
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }

    /// Direct children of `id`, ascending by id. This is the only child
    /// ordering consumers may depend on; insertion order carries no
    /// meaning.
    pub fn children_sorted(&self, id: &str) -> Option<Vec<&Region>> {
        let idx = *self.index.get(id)?;
        let node = self.arena.get(idx)?;
        Some(
            node.children
                .iter()
                .filter_map(|&child| self.arena.get(child))
                .map(|child| &child.region)
                .sorted_by(|a, b| a.id.cmp(&b.id))
                .collect(),
        )
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Attach `region` under the region with id `parent_id`.
    ///
    /// Checks id syntax, tree-wide uniqueness, a non-empty name and the
    /// schema nesting rule before inserting.
    #[instrument(level = "debug", skip(self, region), fields(id = %region.id))]
    pub fn add_region(&mut self, parent_id: &str, region: Region) -> DomainResult<()> {
        if region.id.is_empty() {
            return Err(DomainError::EmptyId);
        }
        if !is_valid_id(&region.id) {
            return Err(DomainError::InvalidId(region.id));
        }
        if region.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if self.index.contains_key(&region.id) {
            return Err(DomainError::DuplicateId(region.id));
        }
        let parent_idx = *self
            .index
            .get(parent_id)
            .ok_or_else(|| DomainError::RegionNotFound(parent_id.to_string()))?;
        let parent_kind = self
            .arena
            .get(parent_idx)
            .map(|node| node.region.kind)
            .ok_or_else(|| DomainError::RegionNotFound(parent_id.to_string()))?;
        if !parent_kind.may_contain(region.kind) {
            return Err(DomainError::IllegalNesting {
                parent_id: parent_id.to_string(),
                parent_kind,
                child_id: region.id,
                child_kind: region.kind,
            });
        }

        let id = region.id.clone();
        let idx = self.arena.insert_node(region, Some(parent_idx));
        self.index.insert(id, idx);
        self.assert_consistent();
        Ok(())
    }

    /// Remove the region with id `id` and its entire subtree. Returns the
    /// removed region. The root cannot be removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_region(&mut self, id: &str) -> DomainResult<Region> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| DomainError::RegionNotFound(id.to_string()))?;
        if Some(idx) == self.arena.root() {
            return Err(DomainError::RootImmutable);
        }

        let mut removed = self.arena.remove_subtree(idx);
        for region in &removed {
            self.index.remove(&region.id);
        }
        debug!(count = removed.len(), "removed subtree");
        self.assert_consistent();
        Ok(removed.swap_remove(0))
    }

    /// Change the display name of a region. The root is renamed through
    /// [`World::rename_world`].
    pub fn rename_region(&mut self, id: &str, name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        let idx = self.non_root_index(id)?;
        if let Some(node) = self.arena.get_mut(idx) {
            node.region.name = name.to_string();
        }
        Ok(())
    }

    /// Re-identify a region. Uniqueness is re-checked before anything
    /// changes, and the id index follows the rename.
    #[instrument(level = "debug", skip(self))]
    pub fn change_region_id(&mut self, id: &str, new_id: &str) -> DomainResult<()> {
        let idx = self.non_root_index(id)?;
        if new_id == id {
            return Ok(());
        }
        if new_id.is_empty() {
            return Err(DomainError::EmptyId);
        }
        if !is_valid_id(new_id) {
            return Err(DomainError::InvalidId(new_id.to_string()));
        }
        if self.index.contains_key(new_id) {
            return Err(DomainError::DuplicateId(new_id.to_string()));
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.region.id = new_id.to_string();
        }
        self.index.remove(id);
        self.index.insert(new_id.to_string(), idx);
        self.assert_consistent();
        Ok(())
    }

    /// Reclassify a region. The nesting rule is re-checked against both
    /// the parent and every direct child.
    pub fn set_region_kind(&mut self, id: &str, kind: RegionType) -> DomainResult<()> {
        let idx = self.non_root_index(id)?;
        let node = self
            .arena
            .get(idx)
            .ok_or_else(|| DomainError::RegionNotFound(id.to_string()))?;

        let parent_idx = node.parent.expect("non-root regions always have a parent");
        if let Some(parent) = self.arena.get(parent_idx) {
            if !parent.region.kind.may_contain(kind) {
                return Err(DomainError::IllegalNesting {
                    parent_id: parent.region.id.clone(),
                    parent_kind: parent.region.kind,
                    child_id: id.to_string(),
                    child_kind: kind,
                });
            }
        }
        for &child_idx in &node.children {
            if let Some(child) = self.arena.get(child_idx) {
                if !kind.may_contain(child.region.kind) {
                    return Err(DomainError::IllegalNesting {
                        parent_id: id.to_string(),
                        parent_kind: kind,
                        child_id: child.region.id.clone(),
                        child_kind: child.region.kind,
                    });
                }
            }
        }

        if let Some(node) = self.arena.get_mut(idx) {
            node.region.kind = kind;
        }
        Ok(())
    }

    /// Set or clear a region's capital.
    pub fn set_capital(&mut self, id: &str, capital: Option<String>) -> DomainResult<()> {
        let idx = self.non_root_index(id)?;
        if let Some(node) = self.arena.get_mut(idx) {
            node.region.capital = capital;
        }
        Ok(())
    }

    /// Rename the document. The root region mirrors the world name as its
    /// id, so uniqueness against existing region ids is re-checked.
    #[instrument(level = "debug", skip(self))]
    pub fn rename_world(&mut self, name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if name == self.name {
            return Ok(());
        }
        if self.index.contains_key(name) {
            return Err(DomainError::DuplicateId(name.to_string()));
        }
        let root_idx = self.arena.root().expect("a world always has a root region");
        if let Some(root) = self.arena.get_mut(root_idx) {
            root.region.id = name.to_string();
            root.region.name = name.to_string();
        }
        self.index.remove(&self.name);
        self.index.insert(name.to_string(), root_idx);
        self.name = name.to_string();
        self.assert_consistent();
        Ok(())
    }

    /// Resolve a non-root region id to its arena index.
    fn non_root_index(&self, id: &str) -> DomainResult<Index> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| DomainError::RegionNotFound(id.to_string()))?;
        if Some(idx) == self.arena.root() {
            return Err(DomainError::RootImmutable);
        }
        Ok(idx)
    }

    /// The id index and the arena must agree after every mutation; a
    /// mismatch is a bug in this module, not a recoverable condition.
    fn assert_consistent(&self) {
        debug_assert_eq!(
            self.index.len(),
            self.arena.len(),
            "id index and region arena disagree"
        );
    }
}
