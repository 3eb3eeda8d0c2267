#![no_main]

use busdec::{
    capture::parse_row,
    decoder::Decoder,
    error::DecodeError,
    event::TransactionLogger,
    protocol::{ProtocolConfig, Variant},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let samples: Vec<_> = text
        .lines()
        .filter_map(|line| parse_row(line).map_err(DecodeError::from).transpose())
        .collect();
    for variant in Variant::ALL {
        let config = ProtocolConfig::for_variant(variant);
        let logger = TransactionLogger::new(config);
        let mut decoder = Decoder::new(config);
        for event in decoder.decode(samples.iter().cloned()) {
            match event {
                Ok(event) => {
                    assert!(!logger.line(&event).is_empty());
                }
                Err(_) => break,
            }
        }
    }
});
