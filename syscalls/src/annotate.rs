//! Finding system calls in a disassembly trace.
//!
//! The 3B2 kernel entry sequence is
//!
//! ```text
//! MOVW &0x4,%r0
//! MOVW &0x18,%r1
//! GATE
//! ```
//!
//! where the `%r1` immediate is eight times the system call number.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::table::{Lookup, SyscallNumber, SyscallTable};

/// One `GATE` found in the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallRecord {
    /// 1-based line in the trace.
    pub line_number: usize,
    /// Address at the start of the line, if there was one.
    pub address: Option<u32>,
    pub call_number: SyscallNumber,
    pub call: Lookup,
}

pub struct Annotator<'t> {
    table: &'t SyscallTable,
    line_number: usize,
    in_syscall: bool,
    call_number: Option<SyscallNumber>,
}

impl<'t> Annotator<'t> {
    pub fn new(table: &'t SyscallTable) -> Self {
        Self {
            table,
            line_number: 0,
            in_syscall: false,
            call_number: None,
        }
    }

    /// Feed in the next line of the trace.
    pub fn line(&mut self, line: &str) -> Option<SyscallRecord> {
        self.line_number += 1;

        let setup = is_setup(line);
        if setup {
            self.in_syscall = true;
        }
        if let Some(immediate) = r1_immediate(line) {
            self.call_number = Some(SyscallNumber((immediate / 8) as usize));
        }

        let mut record = None;
        if self.in_syscall && line.contains("GATE") {
            match self.call_number {
                Some(call_number) => {
                    let call = self.table.lookup(call_number);
                    if let Lookup::Unknown(_) = call {
                        warn!(
                            "Line {}: unknown syscall number {}",
                            self.line_number, call_number
                        );
                    } else {
                        debug!("Line {}: {}", self.line_number, call);
                    }
                    record = Some(SyscallRecord {
                        line_number: self.line_number,
                        address: address(line),
                        call_number,
                        call,
                    });
                }
                None => warn!(
                    "Line {}: GATE without a syscall number in %r1",
                    self.line_number
                ),
            }
        }

        if !setup {
            self.in_syscall = false;
        }
        record
    }
}

/// The operands after a `MOVW`, if this line is one.
fn movw_operands(line: &str) -> Option<&str> {
    let start = line.find("MOVW")?;
    Some(&line[start + "MOVW".len()..])
}

/// `MOVW &0x4,%r0` or any `MOVW` into `%r1`.
fn is_setup(line: &str) -> bool {
    let Some(operands) = movw_operands(line) else {
        return false;
    };
    let separated = operands.starts_with(char::is_whitespace);
    (separated && operands.trim_start().starts_with("&0x4,%r0")) || operands.contains(",%r1")
}

/// The hex immediate of `MOVW &0x<hex>,%r1`.
fn r1_immediate(line: &str) -> Option<u32> {
    let operands = movw_operands(line)?;
    if !operands.starts_with(char::is_whitespace) {
        return None;
    }
    let operands = operands.trim_start().strip_prefix("&0x")?;
    let end = operands.rfind(",%r1")?;
    let hex = &operands[..end];
    match u32::from_str_radix(hex, 16) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Can't parse %r1 immediate {hex:?}");
            None
        }
    }
}

/// Leading hex address, as in `0x40012a4c: GATE`.
fn address(line: &str) -> Option<u32> {
    let (head, _) = line.trim_start().split_once(':')?;
    let head = head.trim();
    let head = head
        .strip_prefix("0x")
        .or_else(|| head.strip_prefix("0X"))
        .unwrap_or(head);
    u32::from_str_radix(head, 16).ok()
}

/// Copy a trace to `out`, appending the system call name to each `GATE` that
/// enters the kernel. Returns everything that was found.
pub fn annotate(
    table: &SyscallTable,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<Vec<SyscallRecord>> {
    let mut annotator = Annotator::new(table);
    let mut records = Vec::new();
    for (n, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Reading line {}", n + 1))?;
        let line = line.trim();
        match annotator.line(line) {
            Some(record) => {
                writeln!(out, "{}    {}", line, record.call)?;
                records.push(record);
            }
            None => writeln!(out, "{line}")?,
        }
    }
    Ok(records)
}
