//! The edge triggered bus decoder.
//!
//! Each sample is the state of the bus after some channel changed. A bus
//! cycle ends on the rising edge of the read or write strobe, and that is
//! where the data bus is valid, so those are the samples that turn into
//! transactions. Everything else just updates the remembered line levels.

use log::{debug, trace};
use rust_decimal::Decimal;

use crate::{
    command::is_sector_command,
    error::DecodeInvariantError,
    event::{Chs, Direction, Event, InterruptEvent, Region, TransactionEvent},
    protocol::{BusLayout, ProtocolConfig, Register},
    sample::Sample,
};

/// Everything remembered between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderState {
    /// Strobes are active low, so 0 means the strobe was asserted.
    pub last_read_strobe: u8,
    pub last_write_strobe: u8,
    pub last_interrupt: u8,
    pub last_command_timestamp: Decimal,
    /// Last value written to the track (or data) register. Floppy buses only.
    pub latched_track: u8,
    /// Last value written to the sector register. Floppy buses only.
    pub latched_sector: u8,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            last_read_strobe: 1,
            last_write_strobe: 1,
            last_interrupt: 0,
            last_command_timestamp: Decimal::ZERO,
            latched_track: 0,
            latched_sector: 0,
        }
    }
}

/// Levels of the control lines in one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLines {
    pub read_strobe: u8,
    pub write_strobe: u8,
    pub chip_select: u8,
    pub interrupt: u8,
}

impl ControlLines {
    pub fn read(raw: u16, layout: &BusLayout) -> Self {
        Self {
            read_strobe: layout.read_strobe.extract(raw) as u8,
            write_strobe: layout.write_strobe.extract(raw) as u8,
            chip_select: layout.chip_select.extract(raw) as u8,
            interrupt: layout.interrupt.extract(raw) as u8,
        }
    }
}

/// Decide whether a sample should be skipped. The order of these rules
/// matters: each one overrides the ones before it.
pub fn edge_filter(state: &DecoderState, lines: &ControlLines) -> bool {
    let (last_r, last_w) = (state.last_read_strobe, state.last_write_strobe);
    let (r, w) = (lines.read_strobe, lines.write_strobe);

    let mut skip = false;

    // Something other than a strobe changed.
    if last_r == r && last_w == w {
        skip = true;
    }

    // Falling edge. This starts a cycle but the data isn't valid yet.
    if (last_r == 1 && r == 0) || (last_w == 1 && w == 0) {
        skip = true;
    }

    // Rising edge; the end of a cycle.
    if (last_r == 0 && r == 1) || (last_w == 0 && w == 1) {
        skip = false;
    }

    // Some other chip on the bus.
    if lines.chip_select == 1 {
        skip = true;
    }

    skip
}

/// Result of feeding one sample to the decoder. At most one of `transaction`
/// and `interrupt` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DecoderState,
    pub transaction: Option<TransactionEvent>,
    pub interrupt: Option<InterruptEvent>,
}

impl Transition {
    pub fn event(self) -> Option<Event> {
        match (self.transaction, self.interrupt) {
            (_, Some(interrupt)) => Some(Event::Interrupt(interrupt)),
            (Some(transaction), None) => Some(Event::Transaction(transaction)),
            (None, None) => None,
        }
    }
}

/// Advance the decoder by one sample.
pub fn step(
    state: DecoderState,
    sample: &Sample,
    config: &ProtocolConfig,
) -> Result<Transition, DecodeInvariantError> {
    let lines = ControlLines::read(sample.raw, &config.layout);
    let mut skip = edge_filter(&state, &lines);
    let mut next = state;

    // Interrupts are reported on their own, even if no strobe moved.
    let mut interrupt = None;
    if lines.interrupt == 1 && state.last_interrupt == 0 {
        let delta_ms = sample
            .timestamp
            .checked_sub(state.last_command_timestamp)
            .and_then(|d| d.checked_mul(Decimal::ONE_THOUSAND))
            .ok_or(DecodeInvariantError::DeltaOverflow {
                timestamp: sample.timestamp,
            })?
            .normalize();
        trace!("{}: interrupt, {} ms after last command", sample.timestamp, delta_ms);
        interrupt = Some(InterruptEvent {
            timestamp: sample.timestamp,
            delta_ms,
        });
        skip = true;
    }

    let transaction = if skip {
        None
    } else {
        Some(decode_transaction(&mut next, sample, config)?)
    };

    next.last_read_strobe = lines.read_strobe;
    next.last_write_strobe = lines.write_strobe;
    next.last_interrupt = lines.interrupt;

    Ok(Transition {
        state: next,
        transaction,
        interrupt,
    })
}

/// Decode a captured sample. `state` still holds the strobe levels from
/// before this sample, which tell us which kind of cycle just ended.
fn decode_transaction(
    state: &mut DecoderState,
    sample: &Sample,
    config: &ProtocolConfig,
) -> Result<TransactionEvent, DecodeInvariantError> {
    let direction = if state.last_read_strobe == 0 {
        Direction::Read
    } else if state.last_write_strobe == 0 {
        Direction::Write
    } else {
        return Err(DecodeInvariantError::NoDirection {
            timestamp: sample.timestamp,
            raw: sample.raw,
        });
    };

    let region = match (config.register(sample.raw), direction) {
        (Register::CommandStatus, Direction::Read) => Region::Status,
        (Register::CommandStatus, Direction::Write) => Region::Command,
        (Register::Track, _) => Region::Track,
        (Register::Sector, _) => Region::Sector,
        (Register::Data, _) => Region::Data,
    };

    let data = config.data(sample.raw);

    if config.reconstruct_chs && direction == Direction::Write {
        match region {
            Region::Sector => state.latched_sector = data,
            // Seek takes its destination track from the data register.
            Region::Track | Region::Data => state.latched_track = data,
            Region::Command | Region::Status => {}
        }
    }

    let mut command = None;
    let mut chs = None;
    if region == Region::Command {
        command = Some(config.commands.translate(data));
        state.last_command_timestamp = sample.timestamp;
        if config.reconstruct_chs && is_sector_command(data) {
            chs = Some(Chs {
                cylinder: state.latched_track,
                head: (data >> 1) & 1,
                sector: state.latched_sector,
            });
        }
    }

    trace!("{}: {} {} {:02x}", sample.timestamp, direction, region, data);

    Ok(TransactionEvent {
        timestamp: sample.timestamp,
        direction,
        region,
        data,
        command,
        chs,
    })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub samples: u64,
    pub transactions: u64,
    pub interrupts: u64,
}

/// Runs `step` over a sequence of samples, keeping the state between them.
pub struct Decoder<'a> {
    config: &'a ProtocolConfig,
    state: DecoderState,
    stats: DecodeStats,
}

impl<'a> Decoder<'a> {
    pub fn new(config: &'a ProtocolConfig) -> Self {
        Self {
            config,
            state: DecoderState::default(),
            stats: DecodeStats::default(),
        }
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Feed in one sample, possibly getting an event out.
    pub fn push(&mut self, sample: &Sample) -> Result<Option<Event>, DecodeInvariantError> {
        let transition = step(self.state, sample, self.config)?;
        self.state = transition.state;
        self.stats.samples += 1;
        let event = transition.event();
        match &event {
            Some(Event::Transaction(_)) => self.stats.transactions += 1,
            Some(Event::Interrupt(_)) => self.stats.interrupts += 1,
            None => {}
        }
        Ok(event)
    }

    /// Lazily decode a fallible stream of samples. The first error ends the
    /// stream.
    pub fn decode<I, E>(&mut self, samples: I) -> Events<'_, 'a, I::IntoIter>
    where
        I: IntoIterator<Item = Result<Sample, E>>,
        E: From<DecodeInvariantError>,
    {
        Events {
            decoder: self,
            samples: samples.into_iter(),
            done: false,
        }
    }
}

/// Iterator returned by [`Decoder::decode`].
pub struct Events<'d, 'a, I> {
    decoder: &'d mut Decoder<'a>,
    samples: I,
    done: bool,
}

impl<'d, 'a, I, E> Iterator for Events<'d, 'a, I>
where
    I: Iterator<Item = Result<Sample, E>>,
    E: From<DecodeInvariantError>,
{
    type Item = Result<Event, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // Keep pulling samples until one of them produces something.
        loop {
            let sample = match self.samples.next() {
                Some(Ok(sample)) => sample,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    let stats = self.decoder.stats();
                    debug!(
                        "Decoded {} samples: {} transactions, {} interrupts",
                        stats.samples, stats.transactions, stats.interrupts
                    );
                    return None;
                }
            };
            match self.decoder.push(&sample) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

/// Decode a complete in-memory capture.
pub fn decode_all(
    config: &ProtocolConfig,
    samples: impl IntoIterator<Item = Sample>,
) -> Result<Vec<Event>, DecodeInvariantError> {
    let mut decoder = Decoder::new(config);
    decoder
        .decode(samples.into_iter().map(Ok::<_, DecodeInvariantError>))
        .collect()
}
