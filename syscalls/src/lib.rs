//! Annotates a WE32100 disassembly trace with the names of the System V
//! system calls it makes.

pub mod annotate;
pub mod table;
