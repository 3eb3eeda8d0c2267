//! Bit-field decoders for WE32100 control words: MMU segment descriptors,
//! paged virtual addresses and the processor status word.

use anyhow::{bail, Context, Result};

pub mod psw;
pub mod segment;
pub mod vaddr;

/// Parse a 32 bit hex word as typed on the command line, with or without a
/// `0x` prefix.
pub fn parse_word(text: &str) -> Result<u32> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        bail!("No hex digits in {text:?}");
    }
    u32::from_str_radix(digits, 16).with_context(|| format!("Parsing {text:?} as a 32 bit hex word"))
}

fn field(word: u32, shift: u32, mask: u32) -> u32 {
    (word >> shift) & mask
}

/// Shared driver for the binaries: exactly one hex word argument, or print
/// `usage` and exit 1.
pub fn word_from_args(usage: &str) -> Result<u32> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [word] = args.as_slice() else {
        eprintln!("{usage}");
        std::process::exit(1);
    };
    let word = parse_word(word)?;
    log::debug!("Decoding {word:#010x}");
    Ok(word)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_word() {
        assert_eq!(parse_word("0x8000ffff").unwrap(), 0x8000_FFFF);
        assert_eq!(parse_word("DEADBEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_word(" 1f ").unwrap(), 0x1F);
        for text in ["", "0x", "xyz", "123456789", "-1"] {
            assert!(parse_word(text).is_err(), "{text:?}");
        }
    }
}
