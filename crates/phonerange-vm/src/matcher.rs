//! The digit-matcher interpreter.

use std::collections::HashSet;

use phonerange_bytecode::Instr;
use phonerange_core::DigitSequence;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("empty program")]
    Empty,
    #[error("undecodable instruction at {pos:#06x}")]
    InvalidInstruction { pos: usize },
    #[error("map target {target:#06x} at {pos:#06x} is not an instruction boundary")]
    InvalidJump { pos: usize, target: usize },
}

/// A verified digit-matcher program.
///
/// Construction walks the whole program once, so execution can trust
/// every opcode and every map target.
pub struct DigitMatcher {
    program: Vec<u8>,
}

impl DigitMatcher {
    pub fn new(program: Vec<u8>) -> Result<DigitMatcher, ProgramError> {
        if program.is_empty() {
            return Err(ProgramError::Empty);
        }
        let mut starts = HashSet::new();
        let mut jumps = Vec::new();
        let mut pos = 0;
        while pos < program.len() {
            starts.insert(pos);
            let Some((instr, next)) = Instr::decode(&program, pos) else {
                return Err(ProgramError::InvalidInstruction { pos });
            };
            if let Instr::Map { entries } = &instr {
                for entry in entries.iter().flatten() {
                    if let Some(off) = entry.next {
                        jumps.push((pos, next + off as usize));
                    }
                }
            }
            pos = next;
        }
        for (pos, target) in jumps {
            if !starts.contains(&target) {
                return Err(ProgramError::InvalidJump { pos, target });
            }
        }
        Ok(DigitMatcher { program })
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// True when the program accepts exactly the whole sequence.
    pub fn matches(&self, seq: &DigitSequence) -> bool {
        let digits: Vec<u8> = seq.digits().collect();
        self.matches_digits(&digits)
    }

    pub fn matches_digits(&self, digits: &[u8]) -> bool {
        self.run(digits) == Some(digits.len())
    }

    /// Length of the longest accepted prefix, if any. The empty input
    /// never matches.
    pub fn longest_match(&self, digits: &[u8]) -> Option<usize> {
        self.run(digits)
    }

    fn run(&self, digits: &[u8]) -> Option<usize> {
        let mut pos = 0;
        let mut consumed = 0;
        let mut best = None;
        while pos < self.program.len() {
            let (instr, next) =
                Instr::decode(&self.program, pos).expect("verified at construction");
            match instr {
                Instr::Single { digit, terminal } => {
                    if digits.get(consumed) != Some(&digit) {
                        return best;
                    }
                    consumed += 1;
                    if terminal {
                        best = Some(consumed);
                    }
                    pos = next;
                }
                Instr::Any { count, terminal } => {
                    for _ in 0..count {
                        match digits.get(consumed) {
                            Some(&d) if d <= 9 => consumed += 1,
                            _ => return best,
                        }
                    }
                    if terminal {
                        best = Some(consumed);
                    }
                    pos = next;
                }
                Instr::Range { mask, terminal } => {
                    match digits.get(consumed) {
                        Some(&d) if mask.contains(d) => consumed += 1,
                        _ => return best,
                    }
                    if terminal {
                        best = Some(consumed);
                    }
                    pos = next;
                }
                Instr::Map { entries } => {
                    let Some(&d) = digits.get(consumed) else { return best };
                    let Some(entry) = entries.get(d as usize).copied().flatten() else {
                        return best;
                    };
                    consumed += 1;
                    if entry.accept {
                        best = Some(consumed);
                    }
                    match entry.next {
                        Some(off) => pos = next + off as usize,
                        None => return best,
                    }
                }
            }
        }
        best
    }
}
