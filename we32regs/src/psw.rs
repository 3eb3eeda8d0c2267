use std::fmt;

use derive_more::{Display, From, Into};

use crate::field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExceptionType {
    #[display(fmt = "On Reset Exception")]
    Reset,
    #[display(fmt = "On Process Exception")]
    Process,
    #[display(fmt = "On Stack Exception")]
    Stack,
    #[display(fmt = "On Normal Exception")]
    Normal,
}

impl ExceptionType {
    fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Reset,
            1 => Self::Process,
            2 => Self::Stack,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExecutionLevel {
    Kernel,
    Executive,
    Supervisor,
    User,
}

impl ExecutionLevel {
    fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Kernel,
            1 => Self::Executive,
            2 => Self::Supervisor,
            _ => Self::User,
        }
    }
}

/// The WE32100 processor status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct Psw(pub u32);

impl Psw {
    pub fn exception_type(self) -> ExceptionType {
        ExceptionType::from_bits(field(self.0, 0, 3))
    }
    pub fn trace_mask(self) -> bool {
        self.flag(2)
    }
    /// Internal state code.
    pub fn isc(self) -> u8 {
        field(self.0, 3, 0xF) as u8
    }
    pub fn initial(self) -> bool {
        self.flag(7)
    }
    pub fn register(self) -> bool {
        self.flag(8)
    }
    pub fn previous_mode(self) -> ExecutionLevel {
        ExecutionLevel::from_bits(field(self.0, 9, 3))
    }
    pub fn current_mode(self) -> ExecutionLevel {
        ExecutionLevel::from_bits(field(self.0, 11, 3))
    }
    /// Interrupt priority level.
    pub fn ipl(self) -> u8 {
        field(self.0, 13, 0xF) as u8
    }
    pub fn trace_enable(self) -> bool {
        self.flag(17)
    }
    pub fn carry(self) -> bool {
        self.flag(18)
    }
    pub fn overflow(self) -> bool {
        self.flag(19)
    }
    pub fn zero(self) -> bool {
        self.flag(20)
    }
    pub fn negative(self) -> bool {
        self.flag(21)
    }
    pub fn overflow_enable(self) -> bool {
        self.flag(22)
    }
    pub fn cache_disable(self) -> bool {
        self.flag(23)
    }
    pub fn quick_interrupt_enable(self) -> bool {
        self.flag(24)
    }
    pub fn cache_flush_disable(self) -> bool {
        self.flag(25)
    }

    fn flag(self, bit: u32) -> bool {
        field(self.0, bit, 1) == 1
    }
}

impl fmt::Display for Psw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let psw = *self;
        let bit = |set: bool| u8::from(set);
        writeln!(f, "PSW: {:#x}", psw.0)?;
        writeln!(f)?;
        let et = psw.exception_type();
        writeln!(f, "ET:\t{}\t({et})", et as u8)?;
        writeln!(f, "TM:\t{}", bit(psw.trace_mask()))?;
        writeln!(f, "ISC:\t{:04b}b", psw.isc())?;
        writeln!(f, "I:\t{}", bit(psw.initial()))?;
        writeln!(f, "R:\t{}", bit(psw.register()))?;
        let pm = psw.previous_mode();
        writeln!(f, "PM:\t{}\t({pm})", pm as u8)?;
        let cm = psw.current_mode();
        writeln!(f, "CM:\t{}\t({cm})", cm as u8)?;
        writeln!(f, "IPL:\t{:04b}b", psw.ipl())?;
        for (name, set) in [
            ("TE", psw.trace_enable()),
            ("C Flag", psw.carry()),
            ("V Flag", psw.overflow()),
            ("Z Flag", psw.zero()),
            ("N Flag", psw.negative()),
            ("OE", psw.overflow_enable()),
            ("CD", psw.cache_disable()),
            ("QIE", psw.quick_interrupt_enable()),
            ("CFD", psw.cache_flush_disable()),
        ] {
            writeln!(f, "{name}:\t{}", bit(set))?;
        }
        Ok(())
    }
}
