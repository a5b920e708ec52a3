//! Bytecode form of range trees.
//!
//! [`MatcherCompiler`] flattens a [`RangeTree`](phonerange_core::RangeTree)
//! into a compact byte program for the digit matcher; [`opcode`] defines
//! the instruction encoding and [`dump`] disassembles programs for
//! inspection.

pub mod compiler;
pub mod dump;
pub mod opcode;


pub use compiler::{CompileError, MatcherCompiler};
pub use opcode::{Instr, MapEntry};
