use derive_more::{Display, From};
use rust_decimal::Decimal;

/// Which part of a capture row couldn't be parsed.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[display(fmt = "missing field")]
    MissingField,
    #[display(fmt = "invalid timestamp")]
    Timestamp,
    #[display(fmt = "invalid hex value")]
    Value,
}

/// A row of the capture was malformed. The whole decode depends on seeing
/// every sample so there is no attempt to recover from this.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "{}: {:?}", kind, text)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub text: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl std::error::Error for ParseError {}

/// The decoder reached a state that a well formed capture can't produce.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum DecodeInvariantError {
    /// A strobe rising edge was captured but neither strobe was asserted
    /// during the cycle that just ended.
    #[display(
        fmt = "impossible state at {}: captured edge with neither read nor write asserted (raw {:04x})",
        timestamp,
        raw
    )]
    NoDirection { timestamp: Decimal, raw: u16 },
    /// The interrupt latency doesn't fit in a `Decimal`.
    #[display(fmt = "interrupt delta at {} is out of range", timestamp)]
    DeltaOverflow { timestamp: Decimal },
}

impl std::error::Error for DecodeInvariantError {}

/// Anything that can stop a decode run.
#[derive(Debug, Display, From, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Parse(ParseError),
    Invariant(DecodeInvariantError),
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Parse(e) => Some(e),
            DecodeError::Invariant(e) => Some(e),
        }
    }
}
