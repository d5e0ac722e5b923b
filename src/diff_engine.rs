//! Keyed list diffing: a single forward pass over the old and new
//! generations that classifies every divergence as add, remove or move.
use crate::errors::ReconcilerError;
use crate::keyed_sequence::{KeyedSequence, Link};
use crate::move_optimizer::optimize_moves;
use crate::types::{CompareOptions, Instruction};

/// Diff `old` against `new` with default options.
///
/// `old` is rewritten in place while walking so that it mirrors every
/// instruction emitted so far; on success it holds the same keys in the
/// same order as `new`. `on_match(new_item, old_item)` fires once per key
/// present in both generations, in new-list order.
pub fn compare<T, F>(
    old: &mut KeyedSequence<T>,
    new: &KeyedSequence<T>,
    on_match: F,
) -> Result<Vec<Instruction<T>>, ReconcilerError>
where
    T: Clone,
    F: FnMut(&T, &T),
{
    compare_with(old, new, on_match, &CompareOptions::default())
}

pub fn compare_with<T, F>(
    old: &mut KeyedSequence<T>,
    new: &KeyedSequence<T>,
    on_match: F,
    options: &CompareOptions,
) -> Result<Vec<Instruction<T>>, ReconcilerError>
where
    T: Clone,
    F: FnMut(&T, &T),
{
    let old_len = old.len();
    let mut engine = DiffEngine::new(old, new, on_match);
    engine.run()?;
    let raw = engine.into_instructions();
    let raw_len = raw.len();

    let instructions = if options.collapse_moves {
        optimize_moves(raw)
    } else {
        raw
    };

    log::debug!(
        "DiffEngine: compared {} old / {} new -> {} instructions ({} collapsed away)",
        old_len,
        new.len(),
        instructions.len(),
        raw_len - instructions.len()
    );
    Ok(instructions)
}

pub struct DiffEngine<'a, T, F> {
    old: &'a mut KeyedSequence<T>,
    new: &'a KeyedSequence<T>,
    on_match: F,
    instructions: Vec<Instruction<T>>,
}

impl<'a, T, F> DiffEngine<'a, T, F>
where
    T: Clone,
    F: FnMut(&T, &T),
{
    pub fn new(old: &'a mut KeyedSequence<T>, new: &'a KeyedSequence<T>, on_match: F) -> Self {
        DiffEngine {
            old,
            new,
            on_match,
            instructions: Vec::new(),
        }
    }

    pub fn into_instructions(self) -> Vec<Instruction<T>> {
        self.instructions
    }

    pub fn run(&mut self) -> Result<(), ReconcilerError> {
        let new = self.new;
        let mut old_cursor = self.old.first();
        let mut new_cursor = new.first();
        let mut new_index = 0usize;
        let mut old_index = 0usize;

        while let Link::Node(new_id) = new_cursor {
            let Some(new_node) = new.node(new_id) else {
                break;
            };

            let Link::Node(old_id) = old_cursor else {
                // Old side exhausted: everything left in `new` is appended.
                self.old.add(new_node.value.clone(), Link::EndOfList);
                self.emit(Instruction::Added {
                    item: new_node.value.clone(),
                    pos: new_index,
                });
                new_cursor = new_node.next;
                new_index += 1;
                continue;
            };

            let Some(old_node) = self.old.node(old_id) else {
                break;
            };
            let old_next = old_node.next;

            if old_node.key == new_node.key {
                (self.on_match)(new_node.value, old_node.value);
                old_cursor = old_next;
                new_cursor = new_node.next;
                old_index += 1;
                new_index += 1;
                continue;
            }

            if !new.has(old_node.key) {
                // Removal is resolved eagerly; `new` does not advance.
                if let Some(item) = self.old.remove(old_id) {
                    self.emit(Instruction::Removed {
                        item,
                        pos: new_index,
                    });
                }
                old_cursor = old_next;
                continue;
            }

            if let Some(found) = self.old.get(new_node.key) {
                let hops = self.old.distance(old_cursor, found).ok_or_else(|| {
                    ReconcilerError::UnreachableNode {
                        key: new_node.key.to_string(),
                    }
                })?;
                let Some(found_value) = self.old.value(found) else {
                    break;
                };
                (self.on_match)(new_node.value, found_value);
                let item = found_value.clone();
                self.old.move_before(found, old_cursor);
                self.emit(Instruction::Moved {
                    item: Some(item),
                    pos: new_index,
                    from_pos: old_index + hops,
                });
            } else {
                self.old.add(new_node.value.clone(), old_cursor);
                self.emit(Instruction::Added {
                    item: new_node.value.clone(),
                    pos: new_index,
                });
            }
            new_cursor = new_node.next;
            new_index += 1;
            old_index += 1;
        }

        // Trailing removals all report the same slot: each one shifts the tail left.
        while let Link::Node(old_id) = old_cursor {
            old_cursor = self.old.next(old_cursor);
            if let Some(item) = self.old.remove(old_id) {
                self.emit(Instruction::Removed {
                    item,
                    pos: old_index,
                });
            }
        }

        Ok(())
    }

    fn emit(&mut self, instruction: Instruction<T>) {
        log::trace!(
            "DiffEngine: {} pos={} ({} so far)",
            instruction.action(),
            instruction.pos(),
            self.instructions.len()
        );
        self.instructions.push(instruction);
    }
}
