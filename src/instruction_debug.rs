// Instruction table and memory dumps for debugging.
// Independent of execution; only reads the table and a memory image.

use crate::cpu::instructions::build_instruction_table;
use std::fmt::Write;

const RULE: &str = "[inst-dump] =====================================================================================================";

// Renders the 16x16 opcode map with each implemented mnemonic in its cell
pub fn format_instruction_table() -> String {
    let table = build_instruction_table();
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = write!(out, "[inst-dump]    ");
    for col in 0..16 {
        let _ = write!(out, " {:>5X}", col);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);

    for row in 0..16 {
        let _ = write!(out, "[inst-dump]  {:X}0", row);
        for col in 0..16 {
            let opcode = row * 16 + col;
            match &table[opcode] {
                Some(info) => {
                    let _ = write!(out, " {:>5}", info.mnemonic);
                }
                None => {
                    let _ = write!(out, "  ----");
                }
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", RULE);
    let implemented = table.iter().filter(|x| x.is_some()).count();
    let _ = writeln!(
        out,
        "[inst-dump] implemented: {}/256 ({:.1}%)",
        implemented,
        (implemented as f64 / 256.0) * 100.0
    );
    out
}

pub fn dump_instruction_table() {
    print!("{}", format_instruction_table());
}

// Hex dump, 16 bytes per row, prefixed with the row address
pub fn format_memory(memory: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in memory.chunks(16).enumerate() {
        let _ = writeln!(out, "[mem-dump] {:#06x}: {}", row * 16, hex::encode(chunk));
    }
    out
}

pub fn dump_memory(memory: &[u8]) {
    print!("{}", format_memory(memory));
}
