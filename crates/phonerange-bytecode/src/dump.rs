//! Human-readable disassembly.

use std::fmt::Write;

use crate::opcode::Instr;

/// Renders a program one instruction per line, map targets as absolute
/// addresses. Stops at the first byte that does not decode.
pub fn dump(program: &[u8]) -> String {
    let mut out = String::new();
    let mut pos = 0;
    while pos < program.len() {
        let Some((instr, next)) = Instr::decode(program, pos) else {
            let _ = writeln!(out, "{pos:04x}: ?? {:02x}", program[pos]);
            break;
        };
        let _ = writeln!(out, "{pos:04x}: {}", render(&instr, next));
        pos = next;
    }
    out
}

fn render(instr: &Instr, table_end: usize) -> String {
    match instr {
        Instr::Single { digit, terminal } => format!("single {digit}{}", accept(*terminal)),
        Instr::Any { count, terminal } => format!("any {count}{}", accept(*terminal)),
        Instr::Range { mask, terminal } => format!("range {mask}{}", accept(*terminal)),
        Instr::Map { entries } => {
            let mut s = "map".to_string();
            for (digit, entry) in entries.iter().enumerate() {
                let Some(entry) = entry else { continue };
                s.push(' ');
                s.push_str(&digit.to_string());
                if entry.accept {
                    s.push('!');
                }
                if let Some(off) = entry.next {
                    let _ = write!(s, "->{:04x}", table_end + off as usize);
                }
            }
            s
        }
    }
}

fn accept(terminal: bool) -> &'static str {
    if terminal { " !" } else { "" }
}
