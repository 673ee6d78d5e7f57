use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{FileData, LessonData, ModuleData, QuestionData};
use crate::domain::error::{DomainError, DomainResult, NodeKind};
use crate::domain::ids::NodeId;

/// Data payload for draft tree nodes.
#[derive(Debug, Clone)]
pub enum NodePayload {
    Module(ModuleData),
    Lesson(LessonData),
    Question(QuestionData),
    File(FileData),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Module(_) => NodeKind::Module,
            NodePayload::Lesson(_) => NodeKind::Lesson,
            NodePayload::Question(_) => NodeKind::Question,
            NodePayload::File(_) => NodeKind::File,
        }
    }
}

/// Tree node in the arena-based draft structure.
#[derive(Debug, Clone)]
pub struct DraftNode {
    /// Stable id, unique across the whole draft
    pub id: NodeId,
    pub payload: NodePayload,
    /// Index of parent node in the arena, None for modules
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

impl fmt::Display for DraftNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.payload.kind(), self.id)
    }
}

/// Arena-based forest holding every module and its descendants.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The id index maps stable node ids to arena slots, so edits address nodes
/// by id instead of walking the tree.
#[derive(Debug, Clone, Default)]
pub struct DraftArena {
    arena: Arena<DraftNode>,
    /// Top-level nodes (modules) in insertion order
    roots: Vec<Index>,
    ids: HashMap<NodeId, Index>,
}

impl DraftArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`, or as a new root when `parent` is None.
    ///
    /// Fails without touching the arena if the id is already taken or the
    /// parent slot is stale.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert_node(
        &mut self,
        id: NodeId,
        payload: NodePayload,
        parent: Option<Index>,
    ) -> DomainResult<Index> {
        if self.ids.contains_key(&id) {
            return Err(DomainError::DuplicateId(id));
        }
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return Err(DomainError::NotFound {
                    kind: payload.kind(),
                    id,
                });
            }
        }

        let node = DraftNode {
            id: id.clone(),
            payload,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.ids.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        Ok(node_idx)
    }

    /// Remove a node and every descendant. Returns how many nodes were dropped.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        let Some(parent) = self.arena.get(idx).map(|n| n.parent) else {
            return 0;
        };
        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.retain(|&c| c != idx),
            None => self.roots.retain(|&r| r != idx),
        }

        let doomed: Vec<Index> = self.iter_postorder_from(idx).map(|(i, _)| i).collect();
        for node_idx in &doomed {
            if let Some(node) = self.arena.remove(*node_idx) {
                self.ids.remove(&node.id);
            }
        }
        doomed.len()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&DraftNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut DraftNode> {
        self.arena.get_mut(idx)
    }

    pub fn lookup(&self, id: &NodeId) -> Option<Index> {
        self.ids.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains_key(id)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order over all modules and their descendants, siblings left to right.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.roots.iter().rev().copied().collect())
    }

    pub fn iter_postorder_from(&self, idx: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, idx)
    }

    /// Longest root-to-leaf chain; 0 for an empty arena.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a DraftArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a DraftArena, stack: Vec<Index>) -> Self {
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a DraftNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a DraftArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a DraftArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a DraftNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> NodePayload {
        NodePayload::Module(ModuleData::default())
    }

    fn lesson() -> NodePayload {
        NodePayload::Lesson(LessonData::default())
    }

    #[test]
    fn given_nested_nodes_when_iterating_then_preorder_left_to_right() {
        let mut arena = DraftArena::new();
        let m1 = arena.insert_node("m1".into(), module(), None).unwrap();
        arena.insert_node("l1".into(), lesson(), Some(m1)).unwrap();
        arena.insert_node("l2".into(), lesson(), Some(m1)).unwrap();
        arena.insert_node("m2".into(), module(), None).unwrap();

        let order: Vec<&str> = arena.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(order, vec!["m1", "l1", "l2", "m2"]);
        assert_eq!(arena.depth(), 2);
    }

    #[test]
    fn given_taken_id_when_inserting_then_rejected_and_unchanged() {
        let mut arena = DraftArena::new();
        arena.insert_node("x".into(), module(), None).unwrap();
        let err = arena.insert_node("x".into(), module(), None).unwrap_err();
        assert_eq!(err, DomainError::DuplicateId("x".into()));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.roots().len(), 1);
    }

    #[test]
    fn given_subtree_when_removing_then_all_descendants_unindexed() {
        let mut arena = DraftArena::new();
        let m1 = arena.insert_node("m1".into(), module(), None).unwrap();
        let l1 = arena.insert_node("l1".into(), lesson(), Some(m1)).unwrap();
        arena
            .insert_node("l1-child".into(), lesson(), Some(l1))
            .unwrap();
        arena.insert_node("m2".into(), module(), None).unwrap();

        let removed = arena.remove_subtree(m1);

        assert_eq!(removed, 3);
        assert!(!arena.contains(&"m1".into()));
        assert!(!arena.contains(&"l1".into()));
        assert!(!arena.contains(&"l1-child".into()));
        assert!(arena.contains(&"m2".into()));
        assert_eq!(arena.roots().len(), 1);
    }

    #[test]
    fn given_empty_arena_when_measuring_then_zero_depth() {
        let arena = DraftArena::new();
        assert_eq!(arena.depth(), 0);
        assert!(arena.is_empty());
    }
}
