use std::fmt;

use derive_more::{From, Into};

use crate::field;

/// An MMU segment descriptor word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct SegmentDescriptor(pub u32);

impl SegmentDescriptor {
    pub fn present(self) -> bool {
        self.flag(0)
    }
    pub fn modified(self) -> bool {
        self.flag(1)
    }
    pub fn contiguous(self) -> bool {
        self.flag(2)
    }
    pub fn cacheable(self) -> bool {
        self.flag(3)
    }
    pub fn object_trap(self) -> bool {
        self.flag(4)
    }
    pub fn referenced(self) -> bool {
        self.flag(5)
    }
    pub fn valid(self) -> bool {
        self.flag(6)
    }
    pub fn indirect(self) -> bool {
        self.flag(7)
    }

    /// Segment length in 8 byte units. The field holds the length minus one.
    pub fn max_offset(self) -> u32 {
        field(self.0, 10, 0x1FFF) + 1
    }

    pub fn access(self) -> u8 {
        field(self.0, 24, 0xFF) as u8
    }

    fn flag(self, bit: u32) -> bool {
        field(self.0, bit, 1) == 1
    }
}

impl fmt::Display for SegmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sd = *self;
        writeln!(f, "     Segment Descriptor {:#010x}", sd.0)?;
        writeln!(f)?;
        for (name, set) in [
            ("Present:    ", sd.present()),
            ("Modified:   ", sd.modified()),
            ("Contiguous: ", sd.contiguous()),
            ("Cacheable:  ", sd.cacheable()),
            ("Object Trap:", sd.object_trap()),
            ("Referenced: ", sd.referenced()),
            ("Valid:      ", sd.valid()),
            ("Indirect:   ", sd.indirect()),
        ] {
            writeln!(f, "{name} {}", u8::from(set))?;
        }
        writeln!(f, "Max Offset:  {:04x}", sd.max_offset())?;
        writeln!(f, "Access:      {:02x}", sd.access())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flags() {
        for bit in 0..8 {
            let sd = SegmentDescriptor(1 << bit);
            let flags = [
                sd.present(),
                sd.modified(),
                sd.contiguous(),
                sd.cacheable(),
                sd.object_trap(),
                sd.referenced(),
                sd.valid(),
                sd.indirect(),
            ];
            for (i, set) in flags.into_iter().enumerate() {
                assert_eq!(set, i == bit, "bit {bit} flag {i}");
            }
        }
    }

    #[test]
    fn test_fields() {
        let sd = SegmentDescriptor(0xAB00_0000 | (0x1FFF << 10));
        assert_eq!(sd.access(), 0xAB);
        assert_eq!(sd.max_offset(), 0x2000);
        assert_eq!(SegmentDescriptor(0).max_offset(), 1);
    }

    #[test]
    fn test_report() {
        // Present and modified differ, so each gets its own bit.
        let text = SegmentDescriptor(0x0500_0c01).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "     Segment Descriptor 0x05000c01");
        assert_eq!(lines[2], "Present:     1");
        assert_eq!(lines[3], "Modified:    0");
        assert_eq!(lines[10], "Max Offset:  0004");
        assert_eq!(lines[11], "Access:      05");
    }
}
