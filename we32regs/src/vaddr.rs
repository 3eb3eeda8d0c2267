use std::fmt;

use derive_more::{From, Into};

use crate::field;

/// Bits after which the diagram draws a field separator.
const SEPARATORS: [u32; 6] = [30, 18, 17, 13, 12, 11];

const RULE: &str =
    "+-----+-----------------------------------.--+-----------.--.--+--------------------------------+";

/// A virtual address as seen by the paged MMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct PagedAddress(pub u32);

impl PagedAddress {
    /// Page descriptor cache tag.
    pub fn tag(self) -> u32 {
        field(self.0, 13, 0xF) | field(self.0, 14, 0xFFF0)
    }

    /// Page descriptor cache index.
    pub fn index(self) -> u32 {
        field(self.0, 11, 3) | field(self.0, 15, 4)
    }
}

impl fmt::Display for PagedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     Paged Virtual Address {:#010x}", self.0)?;
        writeln!(f)?;
        for i in (0..32).rev() {
            write!(f, " {i:02}")?;
        }
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        write!(f, "|")?;
        for i in (0..32).rev() {
            let bit = field(self.0, i, 1);
            if SEPARATORS.contains(&i) {
                write!(f, " {bit}|")?;
            } else if i == 0 {
                write!(f, " {bit}")?;
            } else {
                write!(f, " {bit} ")?;
            }
        }
        writeln!(f, "|")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "    TAG={:04x}    IDX={:04x}", self.tag(), self.index())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tag_and_index() {
        assert_eq!(PagedAddress(0).tag(), 0);
        assert_eq!(PagedAddress(0).index(), 0);
        // Bits 11-12 and 17 form the index.
        assert_eq!(PagedAddress(0x0000_1800).index(), 3);
        assert_eq!(PagedAddress(0x0002_0000).index(), 4);
        assert_eq!(PagedAddress(0x0002_0000).tag(), 0);
        // Bits 13-16 are the low tag nibble, bits 18-29 the rest.
        assert_eq!(PagedAddress(0x0001_E000).tag(), 0xF);
        assert_eq!(PagedAddress(0x0004_0000).tag(), 0x10);
        assert_eq!(PagedAddress(0xFFFF_FFFF).tag(), 0xFFFF);
    }

    #[test]
    fn test_diagram() {
        let text = PagedAddress(0x8000_0001).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "     Paged Virtual Address 0x80000001");
        assert!(lines[2].starts_with(" 31 30 29"));
        assert!(lines[2].ends_with(" 01 00"));
        assert_eq!(lines[3], RULE);
        assert!(lines[4].starts_with("| 1  0|"));
        assert!(lines[4].ends_with(" 0  1|"));
        assert_eq!(lines[4].len(), RULE.len());
        assert_eq!(lines[7], "    TAG=0000    IDX=0000");
    }
}
