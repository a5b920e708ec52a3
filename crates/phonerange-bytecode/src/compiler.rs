//! Range-tree to bytecode compilation.
//!
//! The tree is laid out as blocks. A block is a straight chain of
//! instructions starting at the root or at a branch target, and it ends
//! either in a `MAP` (whose entries jump to further blocks) or at a leaf.
//! Leaf-ended blocks that are not last get an empty-map fence so the
//! matcher cannot run into the following block.

use std::collections::{BTreeSet, HashMap, VecDeque};

use indexmap::IndexMap;
use phonerange_core::{NodeId, RangeTree};
use thiserror::Error;

use crate::opcode::{Instr, MAX_MAP_OFFSET, MapEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("cannot compile an empty tree")]
    EmptyTree,
    #[error("the empty sequence has no bytecode form")]
    MatchesEmptySequence,
    #[error("map target {offset} bytes past its table, over the {MAX_MAP_OFFSET} limit")]
    JumpOutOfRange { offset: usize },
}

/// A map entry byte awaiting the address of its target block.
struct Patch {
    at: usize,
    target: NodeId,
}

struct Block {
    bytes: Vec<u8>,
    patches: Vec<Patch>,
    /// End of the map table within `bytes`, the base its offsets count from.
    table_end: usize,
    /// The chain ended at a leaf instead of a map.
    falls_off: bool,
}

pub struct MatcherCompiler;

impl MatcherCompiler {
    pub fn compile(tree: &RangeTree) -> Result<Vec<u8>, CompileError> {
        let init = tree.initial().ok_or(CompileError::EmptyTree)?;
        if tree.can_terminate(init) {
            return Err(CompileError::MatchesEmptySequence);
        }

        let mut blocks: IndexMap<NodeId, Block> = IndexMap::new();
        let mut queue = VecDeque::from([init]);
        while let Some(head) = queue.pop_front() {
            if blocks.contains_key(&head) {
                continue;
            }
            let block = emit_block(tree, head);
            for patch in &block.patches {
                if !blocks.contains_key(&patch.target) {
                    queue.push_back(patch.target);
                }
            }
            blocks.insert(head, block);
        }

        let order = layout_order(&blocks);
        let mut starts: HashMap<NodeId, usize> = HashMap::new();
        let mut program = Vec::new();
        let last = *order.last().unwrap();
        for &head in &order {
            let block = &blocks[&head];
            starts.insert(head, program.len());
            program.extend_from_slice(&block.bytes);
            if block.falls_off && head != last {
                Instr::Map { entries: [None; 10] }.encode(&mut program);
            }
        }

        for &head in &order {
            let block = &blocks[&head];
            let base = starts[&head];
            for patch in &block.patches {
                let offset = starts[&patch.target] - (base + block.table_end);
                if offset > MAX_MAP_OFFSET {
                    return Err(CompileError::JumpOutOfRange { offset });
                }
                let byte = &mut program[base + patch.at];
                *byte = (*byte & 0x80) | (offset as u8 + 1);
            }
        }
        Ok(program)
    }
}

fn emit_block(tree: &RangeTree, head: NodeId) -> Block {
    let mut bytes = Vec::new();
    let mut patches = Vec::new();
    let mut node = head;
    loop {
        let edges = tree.edges(node);
        if edges.is_empty() {
            return Block { bytes, patches, table_end: 0, falls_off: true };
        }
        if let &[(mask, target)] = edges {
            if mask.is_all() {
                // coalesce a run of forced any-digit steps, breaking at
                // acceptance points so the terminal bit stays accurate
                let mut count = 1u8;
                let mut cur = target;
                while count < 16
                    && !tree.can_terminate(cur)
                    && let &[(m, t)] = tree.edges(cur)
                    && m.is_all()
                {
                    count += 1;
                    cur = t;
                }
                Instr::Any { count, terminal: tree.can_terminate(cur) }.encode(&mut bytes);
                node = cur;
            } else if let Some(digit) = mask.as_single() {
                Instr::Single { digit, terminal: tree.can_terminate(target) }.encode(&mut bytes);
                node = target;
            } else {
                Instr::Range { mask, terminal: tree.can_terminate(target) }.encode(&mut bytes);
                node = target;
            }
            continue;
        }

        // branching node, one table entry per present digit
        let start = bytes.len();
        let mut entries: [Option<MapEntry>; 10] = [None; 10];
        let mut pending = Vec::new();
        for &(mask, target) in edges {
            for digit in mask.digits() {
                let accept = tree.can_terminate(target);
                if tree.edges(target).is_empty() {
                    entries[digit as usize] = Some(MapEntry { accept, next: None });
                } else {
                    // placeholder offset, rewritten once blocks have addresses
                    entries[digit as usize] = Some(MapEntry { accept, next: Some(0) });
                    pending.push((digit, target));
                }
            }
        }
        Instr::Map { entries }.encode(&mut bytes);
        let table_end = bytes.len();
        let present: Vec<u8> = (0..10).filter(|&d| entries[d as usize].is_some()).collect();
        for (digit, target) in pending {
            let slot = present.iter().position(|&d| d == digit).unwrap();
            patches.push(Patch { at: start + 2 + slot, target });
        }
        return Block { bytes, patches, table_end, falls_off: false };
    }
}

/// Orders blocks so every block comes after all blocks that jump to it,
/// which keeps map offsets non-negative. Ties go to discovery order.
fn layout_order(blocks: &IndexMap<NodeId, Block>) -> Vec<NodeId> {
    let n = blocks.len();
    let mut indegree = vec![0usize; n];
    let mut refs: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, block) in blocks.values().enumerate() {
        for patch in &block.patches {
            let j = blocks.get_index_of(&patch.target).unwrap();
            refs[i].push(j);
            indegree[j] += 1;
        }
    }
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(&i) = ready.iter().next() {
        ready.remove(&i);
        order.push(*blocks.get_index(i).unwrap().0);
        for &j in &refs[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                ready.insert(j);
            }
        }
    }
    debug_assert_eq!(order.len(), n, "the block graph is acyclic");
    order
}
