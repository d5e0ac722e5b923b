#![allow(dead_code)]

use keyed_reconciler::{compare_with, CompareOptions, Instruction, KeyedSequence};
use proptest::prelude::*;
use std::sync::Arc;

pub fn sequence(keys: &[u32]) -> KeyedSequence<u32> {
    KeyedSequence::from_items(keys.iter().copied(), Arc::new(|k: &u32| k.to_string()))
}

pub fn diff(old: &[u32], new: &[u32], collapse_moves: bool) -> Vec<Instruction<u32>> {
    let mut old = sequence(old);
    compare_with(&mut old, &sequence(new), |_, _| {}, &CompareOptions { collapse_moves })
        .expect("well-formed keys never fail")
}

/// Plain array model of a replay: insert, delete, splice-move.
pub fn replay(start: &[u32], instructions: &[Instruction<u32>]) -> Vec<u32> {
    let mut list = start.to_vec();
    for instruction in instructions {
        match instruction {
            Instruction::Added { item, pos } => list.insert(*pos, *item),
            Instruction::Removed { pos, .. } => {
                list.remove(*pos);
            }
            Instruction::Moved { pos, from_pos, .. } => {
                let item = list.remove(*from_pos);
                list.insert(*pos, item);
            }
        }
    }
    list
}

/// Lists of distinct keys drawn from a small universe so old and new overlap.
pub fn unique_keys(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    Just((0u32..40).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_flat_map(move |keys| (Just(keys), 0..=max_len))
        .prop_map(|(mut keys, len)| {
            keys.truncate(len);
            keys
        })
}

#[derive(Debug, Clone)]
pub enum Mutation {
    Add { at: usize },
    Remove { at: usize },
    Move { from: usize, to: usize },
}

pub fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        any::<usize>().prop_map(|at| Mutation::Add { at }),
        any::<usize>().prop_map(|at| Mutation::Remove { at }),
        (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Mutation::Move { from, to }),
    ]
}

/// Apply mutations to `list`, minting fresh keys above `next_key`.
pub fn mutate(list: &[u32], mutations: &[Mutation], mut next_key: u32) -> Vec<u32> {
    let mut list = list.to_vec();
    for mutation in mutations {
        match *mutation {
            Mutation::Add { at } => {
                list.insert(at % (list.len() + 1), next_key);
                next_key += 1;
            }
            Mutation::Remove { at } if !list.is_empty() => {
                let at = at % list.len();
                list.remove(at);
            }
            Mutation::Move { from, to } if !list.is_empty() => {
                let item = list.remove(from % list.len());
                list.insert(to % (list.len() + 1), item);
            }
            _ => {}
        }
    }
    list
}
