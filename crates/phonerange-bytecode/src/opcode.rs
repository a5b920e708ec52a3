//! The digit-matcher instruction set.
//!
//! Four instruction shapes, tag in bits 7-5 of the opcode byte and the
//! terminal flag ("the state reached after consuming accepts") in bit 4:
//!
//! - `SINGLE` `001 t dddd`: match one specific digit.
//! - `ANY`    `010 t cccc`: match c+1 arbitrary digits (1 to 16).
//! - `RANGE`  `011 t 00hh` + low byte: match one digit of a 10-bit mask.
//! - `MAP`    `100 0 00hh` + presence low byte + one entry byte per
//!   present digit, ascending. Entry bit 7 accepts after the digit;
//!   bits 6-0 are zero for "stop" or 1 + the target's offset from the
//!   end of the table. A map with no present digits (`80 00`) never
//!   matches and fences off the end of a dead-end block.

use phonerange_core::DigitMask;

pub const TAG_SINGLE: u8 = 0b0010_0000;
pub const TAG_ANY: u8 = 0b0100_0000;
pub const TAG_RANGE: u8 = 0b0110_0000;
pub const TAG_MAP: u8 = 0b1000_0000;
pub const TERMINAL_BIT: u8 = 0b0001_0000;

/// Largest encodable offset of a map target from the end of its table.
pub const MAX_MAP_OFFSET: usize = 126;

/// One branch of a `MAP` table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MapEntry {
    /// Accept after consuming this digit.
    pub accept: bool,
    /// Continuation offset from the end of the table, if any.
    pub next: Option<u8>,
}

/// A decoded instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instr {
    Single { digit: u8, terminal: bool },
    Any { count: u8, terminal: bool },
    Range { mask: DigitMask, terminal: bool },
    Map { entries: [Option<MapEntry>; 10] },
}

impl Instr {
    /// Decodes the instruction at `pos`; `None` on an invalid opcode or a
    /// truncated program. Returns the position just past the instruction,
    /// which for `MAP` is also the base its offsets are relative to.
    pub fn decode(program: &[u8], pos: usize) -> Option<(Instr, usize)> {
        let op = *program.get(pos)?;
        let terminal = op & TERMINAL_BIT != 0;
        match op >> 5 {
            0b001 => {
                let digit = op & 0x0F;
                (digit <= 9).then_some((Instr::Single { digit, terminal }, pos + 1))
            }
            0b010 => Some((Instr::Any { count: (op & 0x0F) + 1, terminal }, pos + 1)),
            0b011 => {
                if op & 0b1100 != 0 {
                    return None;
                }
                let low = *program.get(pos + 1)?;
                let mask = u16::from(op & 0b11) << 8 | u16::from(low);
                if mask == 0 {
                    return None;
                }
                Some((Instr::Range { mask: DigitMask::new(mask), terminal }, pos + 2))
            }
            0b100 => {
                if op & (TERMINAL_BIT | 0b1100) != 0 {
                    return None;
                }
                let low = *program.get(pos + 1)?;
                let presence = u16::from(op & 0b11) << 8 | u16::from(low);
                let mut entries = [None; 10];
                let mut at = pos + 2;
                for (digit, slot) in entries.iter_mut().enumerate() {
                    if presence & (1 << digit) == 0 {
                        continue;
                    }
                    let byte = *program.get(at)?;
                    at += 1;
                    *slot = Some(MapEntry {
                        accept: byte & 0x80 != 0,
                        next: (byte & 0x7F != 0).then(|| (byte & 0x7F) - 1),
                    });
                }
                Some((Instr::Map { entries }, at))
            }
            _ => None,
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Instr::Single { digit, terminal } => {
                assert!(*digit <= 9, "not a digit: {digit}");
                out.push(TAG_SINGLE | flag(*terminal) | digit);
            }
            Instr::Any { count, terminal } => {
                assert!((1..=16).contains(count), "any-run count out of range: {count}");
                out.push(TAG_ANY | flag(*terminal) | (count - 1));
            }
            Instr::Range { mask, terminal } => {
                assert!(!mask.is_empty(), "empty range mask");
                out.push(TAG_RANGE | flag(*terminal) | (mask.bits() >> 8) as u8);
                out.push(mask.bits() as u8);
            }
            Instr::Map { entries } => {
                let mut presence = 0u16;
                for (digit, entry) in entries.iter().enumerate() {
                    if entry.is_some() {
                        presence |= 1 << digit;
                    }
                }
                out.push(TAG_MAP | (presence >> 8) as u8);
                out.push(presence as u8);
                for entry in entries.iter().flatten() {
                    let next = match entry.next {
                        Some(offset) => {
                            assert!(
                                (offset as usize) <= MAX_MAP_OFFSET,
                                "map offset out of range: {offset}"
                            );
                            offset + 1
                        }
                        None => 0,
                    };
                    out.push(if entry.accept { 0x80 } else { 0 } | next);
                }
            }
        }
    }
}

fn flag(terminal: bool) -> u8 {
    if terminal { TERMINAL_BIT } else { 0 }
}
