//! A keyed list rendered into one group of a shared parent.
use crate::diff_engine::compare_with;
use crate::errors::ReconcilerError;
use crate::keyed_sequence::{KeyFn, KeyedSequence};
use crate::kindergarten::{ChildContainer, GroupId, Kindergarten};
use crate::types::{CompareOptions, Instruction};

/// Owns the previous generation of a list and the group it renders into.
/// Each `update` diffs the new items against it and replays the result.
pub struct ListRegion<T> {
    group: GroupId,
    items: KeyedSequence<T>,
    options: CompareOptions,
}

impl<T: Clone> ListRegion<T> {
    pub fn new<C: ChildContainer>(kindergarten: &mut Kindergarten<C>, key_fn: KeyFn<T>) -> Self {
        Self::with_options(kindergarten, key_fn, CompareOptions::default())
    }

    pub fn with_options<C: ChildContainer>(
        kindergarten: &mut Kindergarten<C>,
        key_fn: KeyFn<T>,
        options: CompareOptions,
    ) -> Self {
        ListRegion {
            group: kindergarten.new_group(),
            items: KeyedSequence::new(key_fn),
            options,
        }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    /// The generation currently rendered.
    pub fn items(&self) -> &KeyedSequence<T> {
        &self.items
    }

    /// Render `items`, creating nodes for new keys with `create` and
    /// reporting surviving keys to `on_match(new_item, old_item)`.
    pub fn update<C, I, M, U>(
        &mut self,
        kindergarten: &mut Kindergarten<C>,
        items: I,
        create: M,
        on_match: U,
    ) -> Result<Vec<Instruction<T>>, ReconcilerError>
    where
        C: ChildContainer,
        I: IntoIterator<Item = T>,
        M: FnMut(&T) -> C::Node,
        U: FnMut(&T, &T),
    {
        let next = KeyedSequence::from_items(items, self.items.key_fn().clone());
        let instructions = compare_with(&mut self.items, &next, on_match, &self.options)?;
        kindergarten.group(self.group).apply(&instructions, create);
        log::debug!(
            "ListRegion: {:?} now renders {} items after {} instructions",
            self.group,
            next.len(),
            instructions.len()
        );
        self.items = next;
        Ok(instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        label: &'static str,
    }

    fn row(id: u32, label: &'static str) -> Row {
        Row { id, label }
    }

    fn by_id() -> KeyFn<Row> {
        Arc::new(|row: &Row| row.id.to_string())
    }

    #[test]
    fn first_render_adds_everything() {
        let mut kindergarten = Kindergarten::new(Vec::<u32>::new());
        let mut region = ListRegion::new(&mut kindergarten, by_id());
        let instructions = region
            .update(&mut kindergarten, vec![row(1, "a"), row(2, "b")], |r| r.id, |_, _| {})
            .unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(kindergarten.parent(), &vec![1, 2]);
    }

    #[test]
    fn region_next_to_static_siblings() {
        let mut kindergarten = Kindergarten::new(Vec::<u32>::new());
        let header = kindergarten.new_group();
        let mut region = ListRegion::new(&mut kindergarten, by_id());
        let footer = kindergarten.new_group();
        kindergarten.group(header).ensure_node(100, 0);
        kindergarten.group(footer).ensure_node(200, 0);

        region
            .update(
                &mut kindergarten,
                vec![row(1, "a"), row(2, "b"), row(3, "c")],
                |r| r.id,
                |_, _| {},
            )
            .unwrap();
        assert_eq!(kindergarten.parent(), &vec![100, 1, 2, 3, 200]);

        let mut updated = Vec::new();
        region
            .update(
                &mut kindergarten,
                vec![row(3, "c"), row(4, "d"), row(1, "A")],
                |r| r.id,
                |new, old| {
                    if new != old {
                        updated.push(new.clone());
                    }
                },
            )
            .unwrap();
        assert_eq!(kindergarten.parent(), &vec![100, 3, 4, 1, 200]);
        assert_eq!(updated, vec![row(1, "A")]);
        assert_eq!(region.items().values().map(|r| r.label).collect::<Vec<_>>(), vec!["c", "d", "A"]);
    }

    #[test]
    fn clearing_the_list_leaves_siblings() {
        let mut kindergarten = Kindergarten::new(Vec::<u32>::new());
        let mut region = ListRegion::new(&mut kindergarten, by_id());
        let footer = kindergarten.new_group();
        kindergarten.group(footer).ensure_node(200, 0);
        region
            .update(&mut kindergarten, vec![row(1, "a"), row(2, "b")], |r| r.id, |_, _| {})
            .unwrap();
        region
            .update(&mut kindergarten, Vec::new(), |r| r.id, |_, _| {})
            .unwrap();
        assert_eq!(kindergarten.parent(), &vec![200]);
        assert!(region.items().is_empty());
    }
}
