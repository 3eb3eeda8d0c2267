//! Command byte vocabularies.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSet {
    /// Hard disk controller: unit numbers in the low bits, a buffered/skew
    /// modifier in bit 3 and auxiliary commands with a zero high nibble.
    DiskController,
    /// WD style floppy controller, one command per high nibble.
    FloppyController,
}

/// What a command byte means. Every byte maps to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Aux(&'static str),
    Unit {
        name: &'static str,
        /// `[B]` (buffered) or `[S]` (skewed), if the modifier bit was set.
        modifier: Option<&'static str>,
        unit: u8,
    },
    Plain(&'static str),
    Unknown,
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandName::Aux(name) | CommandName::Plain(name) => f.write_str(name),
            CommandName::Unit {
                name,
                modifier: Some(modifier),
                unit,
            } => write!(f, "{name} {modifier} - {unit}"),
            CommandName::Unit {
                name,
                modifier: None,
                unit,
            } => write!(f, "{name} - {unit}"),
            CommandName::Unknown => f.write_str("????"),
        }
    }
}

const DISK_MODIFIER_BIT: u8 = 0x08;
const DISK_UNIT_MASK: u8 = 0x07;

/// Auxiliary commands, selected by the low nibble when the high nibble is 0.
const DISK_AUX_COMMANDS: [(u8, &str); 4] = [
    (0x1, "AUX:RESET"),
    (0x2, "AUX:CLBUF"),
    (0x4, "AUX:HRSQ"),
    (0x8, "AUX:CLCE"),
];

/// Unit commands indexed by high nibble, with the name used for the modifier
/// bit if the command has one. Entry 0 is never used (aux commands).
const DISK_UNIT_COMMANDS: [(&str, Option<&str>); 16] = [
    ("", None),
    ("Sense Int. Status", None),
    ("Specify", None),
    ("Sense Unit Status", None),
    ("Detect Error", None),
    ("Recalibrate", Some("[B]")),
    ("Seek", Some("[B]")),
    ("Format", Some("[S]")),
    ("Verify ID", Some("[S]")),
    ("Read ID", Some("[S]")),
    ("Read Diag.", None),
    ("Read Data", None),
    ("Check", None),
    ("Scan", None),
    ("Verify Data", None),
    ("Write Data", None),
];

/// Floppy commands indexed by high nibble. Step, Step In, Step Out, Read
/// Sector and Write Sector use bit 4 as a flag so they take two slots.
const FLOPPY_COMMANDS: [&str; 16] = [
    "Restore",
    "Seek",
    "Step",
    "Step",
    "Step In",
    "Step In",
    "Step Out",
    "Step Out",
    "Read Sector",
    "Read Sector",
    "Write Sector",
    "Write Sector",
    "Read Address",
    "Force Interrupt",
    "Read Track",
    "Write Track",
];

impl CommandSet {
    pub fn translate(&self, byte: u8) -> CommandName {
        let nibble = (byte >> 4) as usize;
        match self {
            CommandSet::DiskController if nibble == 0 => DISK_AUX_COMMANDS
                .iter()
                .find(|(code, _)| *code == byte & 0x0F)
                .map_or(CommandName::Unknown, |&(_, name)| CommandName::Aux(name)),
            CommandSet::DiskController => {
                let (name, modifier) = DISK_UNIT_COMMANDS[nibble];
                CommandName::Unit {
                    name,
                    modifier: modifier.filter(|_| byte & DISK_MODIFIER_BIT != 0),
                    unit: byte & DISK_UNIT_MASK,
                }
            }
            CommandSet::FloppyController => CommandName::Plain(FLOPPY_COMMANDS[nibble]),
        }
    }
}

/// Floppy Read Sector / Write Sector, which use the latched track and sector
/// registers.
pub fn is_sector_command(byte: u8) -> bool {
    matches!(byte & 0xE0, 0x80 | 0xA0)
}

#[cfg(test)]
mod test {
    use super::*;

    fn disk(byte: u8) -> String {
        CommandSet::DiskController.translate(byte).to_string()
    }

    fn floppy(byte: u8) -> String {
        CommandSet::FloppyController.translate(byte).to_string()
    }

    #[test]
    fn test_disk_commands() {
        assert_eq!(disk(0x60), "Seek - 0");
        assert_eq!(disk(0x6A), "Seek [B] - 2");
        assert_eq!(disk(0x79), "Format [S] - 1");
        // No modifier for this one, bit 3 is ignored.
        assert_eq!(disk(0x1B), "Sense Int. Status - 3");
        assert_eq!(disk(0xF7), "Write Data - 7");
        assert_eq!(disk(0x01), "AUX:RESET");
        assert_eq!(disk(0x02), "AUX:CLBUF");
        assert_eq!(disk(0x04), "AUX:HRSQ");
        assert_eq!(disk(0x08), "AUX:CLCE");
    }

    #[test]
    fn test_unknown_aux_commands() {
        for byte in [0x00, 0x03, 0x05, 0x0F] {
            assert_eq!(
                CommandSet::DiskController.translate(byte),
                CommandName::Unknown
            );
            assert_eq!(disk(byte), "????");
        }
    }

    #[test]
    fn test_every_byte_has_a_name() {
        for byte in 0..=255u8 {
            assert!(!disk(byte).is_empty());
            assert_ne!(
                CommandSet::FloppyController.translate(byte),
                CommandName::Unknown
            );
        }
    }

    #[test]
    fn test_floppy_commands() {
        assert_eq!(floppy(0x03), "Restore");
        assert_eq!(floppy(0x1F), "Seek");
        assert_eq!(floppy(0x30), "Step");
        assert_eq!(floppy(0x58), "Step In");
        assert_eq!(floppy(0x84), "Read Sector");
        assert_eq!(floppy(0x9C), "Read Sector");
        assert_eq!(floppy(0xB0), "Write Sector");
        assert_eq!(floppy(0xD0), "Force Interrupt");
        assert_eq!(floppy(0xF4), "Write Track");
    }

    #[test]
    fn test_sector_commands() {
        let sector: Vec<u8> = (0..=255u8).filter(|b| is_sector_command(*b)).collect();
        assert_eq!(sector.len(), 64);
        assert!(sector.iter().all(|b| (0x80..0xC0).contains(b)));
    }
}
