use std::{
    fmt,
    io::{self, Write},
};

use rust_decimal::Decimal;

use crate::{command::CommandName, protocol::ProtocolConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Read => "READ",
            Direction::Write => "WRITE",
        })
    }
}

/// The register or buffer a transaction accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Command,
    Status,
    Data,
    Track,
    Sector,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Command => "COMMAND",
            Region::Status => "STATUS",
            Region::Data => "DATA",
            Region::Track => "TRACK",
            Region::Sector => "SECTOR",
        })
    }
}

/// Cylinder/head/sector address of a floppy sector command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chs {
    pub cylinder: u8,
    pub head: u8,
    pub sector: u8,
}

impl fmt::Display for Chs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cylinder, self.head, self.sector)
    }
}

/// One completed bus cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEvent {
    pub timestamp: Decimal,
    pub direction: Direction,
    pub region: Region,
    pub data: u8,
    /// Only set for writes to the command register.
    pub command: Option<CommandName>,
    pub chs: Option<Chs>,
}

/// A rising edge on the interrupt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptEvent {
    pub timestamp: Decimal,
    /// Time since the last command byte was written, in milliseconds, with
    /// trailing zeros removed.
    pub delta_ms: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Transaction(TransactionEvent),
    Interrupt(InterruptEvent),
}

/// Renders events as tab separated lines.
pub struct TransactionLogger<'a> {
    config: &'a ProtocolConfig,
}

impl<'a> TransactionLogger<'a> {
    pub fn new(config: &'a ProtocolConfig) -> Self {
        Self { config }
    }

    pub fn line(&self, event: &Event) -> String {
        match event {
            Event::Transaction(t) => {
                let mut line = format!(
                    "{}:\t{}\t{}\t{:02x}",
                    t.timestamp, t.direction, t.region, t.data
                );
                if let Some(command) = &t.command {
                    line += &format!("\t{command}");
                    if let Some(chs) = &t.chs {
                        line += &format!(" {chs}");
                    }
                }
                line
            }
            Event::Interrupt(i) => format!(
                "{}:\t{}\t\t\tDELTA={} ms",
                i.timestamp, self.config.interrupt_tag, i.delta_ms
            ),
        }
    }

    pub fn write(&self, out: &mut impl Write, event: &Event) -> io::Result<()> {
        writeln!(out, "{}", self.line(event))
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    fn ts(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_plain_transaction() {
        let event = Event::Transaction(TransactionEvent {
            timestamp: ts("0.000125"),
            direction: Direction::Read,
            region: Region::Status,
            data: 0x0A,
            command: None,
            chs: None,
        });
        assert_eq!(
            TransactionLogger::new(&ProtocolConfig::ID).line(&event),
            "0.000125:\tREAD\tSTATUS\t0a"
        );
    }

    #[test]
    fn test_command_with_chs() {
        let event = Event::Transaction(TransactionEvent {
            timestamp: ts("2.5"),
            direction: Direction::Write,
            region: Region::Command,
            data: 0x84,
            command: Some(CommandName::Plain("Read Sector")),
            chs: Some(Chs {
                cylinder: 5,
                head: 0,
                sector: 3,
            }),
        });
        let mut out = Vec::new();
        TransactionLogger::new(&ProtocolConfig::IF)
            .write(&mut out, &event)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2.5:\tWRITE\tCOMMAND\t84\tRead Sector 5/0/3\n"
        );
    }

    #[test]
    fn test_interrupt_tags() {
        let event = Event::Interrupt(InterruptEvent {
            timestamp: ts("1.250"),
            delta_ms: ts("150"),
        });
        assert_eq!(
            TransactionLogger::new(&ProtocolConfig::IU).line(&event),
            "1.250:\tIRQ\t\t\tDELTA=150 ms"
        );
        assert_eq!(
            TransactionLogger::new(&ProtocolConfig::ID).line(&event),
            "1.250:\tINTR\t\t\tDELTA=150 ms"
        );
    }
}
