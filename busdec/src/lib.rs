//! Decoder for logic analyser captures of disk controller buses.
//!
//! A capture is a list of `(time, 16 bit bus value)` rows. The decoder picks
//! out the completed read and write cycles, works out which register they
//! touched, names command bytes and reports how long the controller took to
//! raise its interrupt after each command.
//!
//! ```no_run
//! use busdec::{capture::CaptureReader, decoder::Decoder, event::TransactionLogger};
//! use busdec::protocol::ProtocolConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = &ProtocolConfig::IF;
//! let logger = TransactionLogger::new(config);
//! let mut decoder = Decoder::new(config);
//! for event in decoder.decode(CaptureReader::open("capture.csv".as_ref())?.samples()) {
//!     println!("{}", logger.line(&event?));
//! }
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod command;
pub mod decoder;
pub mod error;
pub mod event;
pub mod protocol;
pub mod sample;
