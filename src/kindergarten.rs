//! Grouped child space: several independently reconciled regions sharing one
//! parent container without wrapper nodes.
//!
//! A [`Kindergarten`] owns the parent and an ordered list of groups. Each
//! group claims a contiguous run of the parent's children; its offset is the
//! number of children claimed by the groups registered before it.
use crate::types::Instruction;
use indexmap::IndexSet;
use std::hash::Hash;

/// The child-list primitives a parent must expose to host groups.
///
/// Inserting or appending a node that is already a child moves it, and
/// inserting a node before itself leaves the list unchanged.
pub trait ChildContainer {
    type Node: Clone + Eq + Hash;

    fn child_count(&self) -> usize;
    fn child_at(&self, index: usize) -> Option<Self::Node>;
    fn insert_child_before(&mut self, node: Self::Node, reference: Option<&Self::Node>);
    fn append_child(&mut self, node: Self::Node);
    fn remove_child(&mut self, node: &Self::Node);
}

impl<N: Clone + Eq + Hash> ChildContainer for Vec<N> {
    type Node = N;

    fn child_count(&self) -> usize {
        self.len()
    }

    fn child_at(&self, index: usize) -> Option<N> {
        self.get(index).cloned()
    }

    fn insert_child_before(&mut self, node: N, reference: Option<&N>) {
        let Some(reference) = reference else {
            self.append_child(node);
            return;
        };
        if *reference == node {
            return;
        }
        self.remove_child(&node);
        match self.iter().position(|child| child == reference) {
            Some(index) => self.insert(index, node),
            None => {
                log::warn!("ChildContainer: reference node is not a child, appending");
                self.push(node);
            }
        }
    }

    fn append_child(&mut self, node: N) {
        self.remove_child(&node);
        self.push(node);
    }

    fn remove_child(&mut self, node: &N) {
        if let Some(index) = self.iter().position(|child| child == node) {
            self.remove(index);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

pub struct Kindergarten<C: ChildContainer> {
    parent: C,
    groups: Vec<IndexSet<C::Node>>,
}

impl<C: ChildContainer> Kindergarten<C> {
    pub fn new(parent: C) -> Self {
        Kindergarten {
            parent,
            groups: Vec::new(),
        }
    }

    pub fn parent(&self) -> &C {
        &self.parent
    }

    pub fn into_parent(self) -> C {
        self.parent
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Register an empty group after all existing ones.
    pub fn new_group(&mut self) -> GroupId {
        self.groups.push(IndexSet::new());
        GroupId(self.groups.len() - 1)
    }

    /// Children claimed by every group registered before `group`.
    pub fn offset_of(&self, group: GroupId) -> usize {
        self.groups[..group.0].iter().map(IndexSet::len).sum()
    }

    pub fn group(&mut self, id: GroupId) -> Group<'_, C> {
        assert!(id.0 < self.groups.len(), "{id:?} does not belong to this kindergarten");
        Group {
            kindergarten: self,
            id,
        }
    }
}

/// Positional access to one group; indices are relative to the group start.
pub struct Group<'a, C: ChildContainer> {
    kindergarten: &'a mut Kindergarten<C>,
    id: GroupId,
}

impl<'a, C: ChildContainer> Group<'a, C> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.members().len()
    }

    pub fn offset(&self) -> usize {
        self.kindergarten.offset_of(self.id)
    }

    pub fn contains(&self, node: &C::Node) -> bool {
        self.members().contains(node)
    }

    /// The group's children in parent order.
    pub fn children(&self) -> Vec<C::Node> {
        let offset = self.offset();
        (offset..offset + self.size())
            .filter_map(|index| self.kindergarten.parent.child_at(index))
            .collect()
    }

    /// Place `node` at `at_index` within the group. Negative indices count
    /// from the end: `-1` lands after the group's last child.
    pub fn ensure_node(&mut self, node: C::Node, at_index: isize) {
        let index = if at_index < 0 {
            let resolved = self.size() as isize + 1 + at_index;
            debug_assert!(resolved >= 0, "index {at_index} reaches before the group start");
            resolved.max(0) as usize
        } else {
            at_index as usize
        };
        self.insert_at(node, index);
    }

    /// Remove `node` if this group owns it. Returns whether anything happened.
    pub fn remove_node(&mut self, node: &C::Node) -> bool {
        if !self.members_mut().swap_remove(node) {
            return false;
        }
        self.kindergarten.parent.remove_child(node);
        log::trace!("Kindergarten: {:?} removed a node", self.id);
        true
    }

    pub fn remove_node_at(&mut self, pos: usize) -> Option<C::Node> {
        let absolute = self.offset() + pos;
        let Some(node) = self.kindergarten.parent.child_at(absolute) else {
            log::warn!(
                "Kindergarten: {:?} has no child at {} (absolute {})",
                self.id,
                pos,
                absolute
            );
            return None;
        };
        self.remove_node(&node).then_some(node)
    }

    /// Move the child at group index `from` so it ends up at group index `to`.
    pub fn move_node(&mut self, from: usize, to: usize) {
        let offset = self.offset();
        let parent = &mut self.kindergarten.parent;
        let Some(node) = parent.child_at(offset + from) else {
            log::warn!("Kindergarten: {:?} has no child at {} to move", self.id, from);
            return;
        };
        // The source slot is still occupied while the reference is looked up.
        let destination = offset + to + usize::from(to > from);
        log::trace!(
            "Kindergarten: {:?} move {} -> {} (absolute {} -> {})",
            self.id,
            from,
            to,
            offset + from,
            destination
        );
        match parent.child_at(destination) {
            Some(reference) => parent.insert_child_before(node, Some(&reference)),
            None => parent.append_child(node),
        }
    }

    /// Replay a diff produced against this group's previous contents.
    pub fn apply<T, M>(&mut self, instructions: &[Instruction<T>], mut create: M)
    where
        M: FnMut(&T) -> C::Node,
    {
        for instruction in instructions {
            match instruction {
                Instruction::Added { item, pos } => {
                    let node = create(item);
                    self.insert_at(node, *pos);
                }
                Instruction::Removed { pos, .. } => {
                    self.remove_node_at(*pos);
                }
                Instruction::Moved { pos, from_pos, .. } => self.move_node(*from_pos, *pos),
            }
        }
    }

    fn insert_at(&mut self, node: C::Node, index: usize) {
        let size = self.size();
        let index = if index > size {
            log::warn!(
                "Kindergarten: {:?} asked to place a node at {} but holds {}, appending",
                self.id,
                index,
                size
            );
            size
        } else {
            index
        };
        let absolute = self.offset() + index;
        let parent = &mut self.kindergarten.parent;
        log::trace!(
            "Kindergarten: {:?} ensure node at {} (absolute {} of {})",
            self.id,
            index,
            absolute,
            parent.child_count()
        );
        match parent.child_at(absolute) {
            Some(reference) => parent.insert_child_before(node.clone(), Some(&reference)),
            None => parent.append_child(node.clone()),
        }
        self.members_mut().insert(node);
    }

    fn members(&self) -> &IndexSet<C::Node> {
        &self.kindergarten.groups[self.id.0]
    }

    fn members_mut(&mut self) -> &mut IndexSet<C::Node> {
        &mut self.kindergarten.groups[self.id.0]
    }
}
