//! Bit layouts of the three traced buses.
//!
//! All three are 16 channel captures of the same kind of interface: an 8 bit
//! data bus, active low read and write strobes, an active low chip select,
//! a register select and the controller's interrupt line. They only differ
//! in which channel each signal was clipped to and in how many register
//! select lines there are.

use std::{fmt, str::FromStr};

use anyhow::bail;

use crate::command::CommandSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Hard disk controller with a single register select line (A0).
    Id,
    /// Floppy controller, four registers.
    If,
    /// Floppy controller wired on the other side of the bus buffers. Same
    /// registers as `If` but a different channel assignment.
    Iu,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Id, Variant::If, Variant::Iu];
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Id => "id",
            Variant::If => "if",
            Variant::Iu => "iu",
        })
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Variant::Id),
            "if" => Ok(Variant::If),
            "iu" => Ok(Variant::Iu),
            _ => bail!("Unknown bus variant {s:?} (expected one of id, if, iu)"),
        }
    }
}

/// A group of adjacent channels, read as `(raw >> shift) & mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub shift: u8,
    pub mask: u16,
}

impl Field {
    pub const fn bit(bit: u8) -> Self {
        Self {
            shift: bit,
            mask: 1,
        }
    }

    pub const fn new(shift: u8, mask: u16) -> Self {
        Self { shift, mask }
    }

    pub fn extract(&self, raw: u16) -> u16 {
        (raw >> self.shift) & self.mask
    }
}

/// The register a register select value points at. `CommandStatus` is one
/// address that reads as STATUS and writes as COMMAND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    CommandStatus,
    Track,
    Sector,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusLayout {
    pub read_strobe: Field,
    pub write_strobe: Field,
    /// Active low: 1 means the chip is not selected.
    pub chip_select: Field,
    pub interrupt: Field,
    pub register_select: Field,
    pub data: Field,
}

/// Everything the decoder needs to know about one of the buses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub variant: Variant,
    pub layout: BusLayout,
    /// Indexed by the register select value. Only the first
    /// `register_select.mask + 1` entries are reachable.
    pub registers: [Register; 4],
    pub commands: CommandSet,
    /// Whether track and sector register writes are latched so that sector
    /// commands can be shown with their C/H/S address.
    pub reconstruct_chs: bool,
    /// What interrupt lines are called in the output.
    pub interrupt_tag: &'static str,
}

impl ProtocolConfig {
    pub const ID: ProtocolConfig = ProtocolConfig {
        variant: Variant::Id,
        layout: BusLayout {
            read_strobe: Field::bit(0),
            write_strobe: Field::bit(1),
            chip_select: Field::bit(11),
            interrupt: Field::bit(12),
            register_select: Field::bit(2),
            data: Field::new(3, 0xFF),
        },
        registers: [
            Register::Data,
            Register::CommandStatus,
            Register::Data,
            Register::CommandStatus,
        ],
        commands: CommandSet::DiskController,
        reconstruct_chs: false,
        interrupt_tag: "INTR",
    };

    pub const IF: ProtocolConfig = ProtocolConfig {
        variant: Variant::If,
        layout: BusLayout {
            read_strobe: Field::bit(0),
            write_strobe: Field::bit(1),
            chip_select: Field::bit(12),
            interrupt: Field::bit(13),
            register_select: Field::new(2, 0x3),
            data: Field::new(4, 0xFF),
        },
        registers: FLOPPY_REGISTERS,
        commands: CommandSet::FloppyController,
        reconstruct_chs: true,
        interrupt_tag: "IRQ",
    };

    pub const IU: ProtocolConfig = ProtocolConfig {
        variant: Variant::Iu,
        layout: BusLayout {
            read_strobe: Field::bit(14),
            write_strobe: Field::bit(13),
            chip_select: Field::bit(12),
            interrupt: Field::bit(15),
            // Address lines are on channels 0-3 but only A0/A1 select a
            // controller register.
            register_select: Field::new(0, 0x3),
            data: Field::new(4, 0xFF),
        },
        registers: FLOPPY_REGISTERS,
        commands: CommandSet::FloppyController,
        reconstruct_chs: true,
        interrupt_tag: "IRQ",
    };

    pub fn for_variant(variant: Variant) -> &'static ProtocolConfig {
        match variant {
            Variant::Id => &Self::ID,
            Variant::If => &Self::IF,
            Variant::Iu => &Self::IU,
        }
    }

    pub fn register(&self, raw: u16) -> Register {
        let select = self.layout.register_select.extract(raw) as usize;
        self.registers[select & 0x3]
    }

    pub fn data(&self, raw: u16) -> u8 {
        self.layout.data.extract(raw) as u8
    }
}

const FLOPPY_REGISTERS: [Register; 4] = [
    Register::CommandStatus,
    Register::Track,
    Register::Sector,
    Register::Data,
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_variant_names() {
        for variant in Variant::ALL {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
            assert_eq!(ProtocolConfig::for_variant(variant).variant, variant);
        }
        assert_eq!("IU".parse::<Variant>().unwrap(), Variant::Iu);
        assert!("ide".parse::<Variant>().is_err());
    }

    #[test]
    fn test_id_layout() {
        let config = &ProtocolConfig::ID;
        // A0 set, data 0x60.
        let raw = (0x60 << 3) | 0x4;
        assert_eq!(config.register(raw), Register::CommandStatus);
        assert_eq!(config.data(raw), 0x60);
        assert_eq!(config.register(0x60 << 3), Register::Data);
        // The chip select isn't part of the data byte.
        assert_eq!(config.data(0x0800 | (0xFF << 3)), 0xFF);
    }

    #[test]
    fn test_floppy_layouts() {
        for (select, register) in FLOPPY_REGISTERS.into_iter().enumerate() {
            let select = select as u16;
            assert_eq!(ProtocolConfig::IF.register((0xA5 << 4) | (select << 2)), register);
            assert_eq!(ProtocolConfig::IU.register((0xA5 << 4) | select), register);
            // IU's upper address lines don't select anything.
            assert_eq!(ProtocolConfig::IU.register((0xA5 << 4) | 0xC | select), register);
        }
        assert_eq!(ProtocolConfig::IF.data(0xFFFF), 0xFF);
        assert_eq!(ProtocolConfig::IU.data(0x0A50), 0xA5);
    }
}
