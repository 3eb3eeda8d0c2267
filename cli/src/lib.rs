//! Shared driver for the `parse-*-commands` binaries. Each binary decodes one
//! bus variant and takes a single capture file argument.

use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use busdec::{
    capture::CaptureReader,
    decoder::Decoder,
    event::TransactionLogger,
    protocol::{ProtocolConfig, Variant},
};
use log::info;

pub fn usage(variant: Variant) -> String {
    format!("Usage: parse-{variant}-commands <file>")
}

/// Pick the capture path out of the arguments (not including the program
/// name). Anything but exactly one argument is a usage error.
pub fn capture_path(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let args: Vec<String> = args.into_iter().collect();
    match args.as_slice() {
        [path] => Some(PathBuf::from(path)),
        _ => None,
    }
}

/// Decode `path` and write the transaction log to `out`.
pub fn run(variant: Variant, path: &Path, out: &mut impl Write) -> Result<()> {
    let config = ProtocolConfig::for_variant(variant);
    let logger = TransactionLogger::new(config);
    let mut decoder = Decoder::new(config);

    info!("Decoding {} as the {} bus", path.display(), variant);

    for event in decoder.decode(CaptureReader::open(path)?.samples()) {
        logger.write(out, &event?).context("Writing output")?;
    }
    out.flush().context("Writing output")?;

    let stats = decoder.stats();
    info!(
        "{} samples, {} transactions, {} interrupts",
        stats.samples, stats.transactions, stats.interrupts
    );
    Ok(())
}

/// Entry point for the binaries.
pub fn main(variant: Variant) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(path) = capture_path(std::env::args().skip(1)) else {
        eprintln!("{}", usage(variant));
        std::process::exit(1);
    };

    let mut out = BufWriter::new(io::stdout().lock());
    run(variant, &path, &mut out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_path(name: &str) -> PathBuf {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../samples")).join(name)
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arguments() {
        assert_eq!(capture_path(args(&["a.csv"])), Some(PathBuf::from("a.csv")));
        assert_eq!(capture_path(args(&[])), None);
        assert_eq!(capture_path(args(&["a.csv", "b.csv"])), None);
        assert_eq!(usage(Variant::Iu), "Usage: parse-iu-commands <file>");
    }

    #[test]
    fn test_run() {
        let mut out = Vec::new();
        run(Variant::Id, &sample_path("id-seek.csv"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("0.000010:\tWRITE\tDATA\t1f\n"));
        assert!(text.ends_with("0.001600:\tWRITE\tCOMMAND\t01\tAUX:RESET\n"));
    }

    #[test]
    fn test_run_stops_on_bad_row() {
        let dir = std::env::temp_dir().join(format!("busdec-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.csv");
        std::fs::write(&path, "0.1,0002\n0.2,0003\n0.3,zz\n0.4,0001\n").unwrap();

        let mut out = Vec::new();
        let err = run(Variant::If, &path, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("row 3"), "{err:#}");
        // Everything before the bad row was still written.
        assert_eq!(String::from_utf8(out).unwrap(), "0.2:\tREAD\tSTATUS\t00\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
