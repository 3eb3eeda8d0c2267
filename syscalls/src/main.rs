use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use log::info;
use syscalls::{annotate::annotate, table::SyscallTable};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path] = args.as_slice() else {
        eprintln!("Usage: syscalls <logfile>");
        std::process::exit(1);
    };
    let path = PathBuf::from(path);

    let file = File::open(&path).with_context(|| format!("Opening {}", path.display()))?;
    let table = SyscallTable::svr3();
    let mut out = BufWriter::new(io::stdout().lock());
    let records = annotate(&table, BufReader::new(file), &mut out)
        .with_context(|| format!("Annotating {}", path.display()))?;
    out.flush()?;

    info!("Found {} system calls", records.len());
    Ok(())
}
