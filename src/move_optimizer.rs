//! Post-pass over a diff: rotating a block forward by one slot shows up as a
//! chain of moves each shifting one entry a single position towards the
//! front. Such a chain is equivalent to moving the block's head entry to the
//! chain's tail, so it is replaced by that one move.
use crate::types::Instruction;

pub fn optimize_moves<T>(mut instructions: Vec<Instruction<T>>) -> Vec<Instruction<T>> {
    let mut run_end: Option<usize> = None;

    for i in (0..instructions.len()).rev() {
        let forward = instructions[i].is_forward_shift();
        if let Some(end) = run_end {
            if forward && instructions[i].pos() + 1 == instructions[i + 1].pos() {
                continue;
            }
            if end - i > 1 {
                collapse(&mut instructions, i + 1, end);
            }
            run_end = None;
        }
        if forward {
            run_end = Some(i);
        }
    }

    // A chain reaching index 0 only collapses past two entries.
    if let Some(end) = run_end {
        if end > 1 {
            collapse(&mut instructions, 0, end);
        }
    }

    instructions
}

fn collapse<T>(instructions: &mut Vec<Instruction<T>>, start: usize, end: usize) {
    let pos = match &instructions[end] {
        Instruction::Moved { from_pos, .. } => *from_pos,
        _ => return,
    };
    let from_pos = instructions[start].pos();
    log::trace!(
        "MoveOptimizer: collapsing {} forward moves into {} -> {}",
        end - start + 1,
        from_pos,
        pos
    );
    instructions.splice(
        start..=end,
        std::iter::once(Instruction::Moved {
            item: None,
            pos,
            from_pos,
        }),
    );
}
