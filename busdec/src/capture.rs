//! Reading samples from logic analyser CSV exports.
//!
//! Each row is `<time in seconds>,<bus value in hex>`. Saleae Logic puts a
//! column header on the first row, which is skipped. Files ending in `.gz`
//! are decompressed on the fly.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};

use crate::{
    error::{ParseError, ParseErrorKind},
    sample::{parse_timestamp, parse_value, Sample},
};

pub struct CaptureReader {
    path: PathBuf,
    reader: Box<dyn BufRead>,
}

impl CaptureReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Opening capture {}", path.display()))?;
        let gzipped = path.extension().map_or(false, |ext| ext == "gz");
        info!(
            "Reading {}capture {}",
            if gzipped { "gzip compressed " } else { "" },
            path.display()
        );
        let reader: Box<dyn BufRead> = if gzipped {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self {
            path: path.to_owned(),
            reader,
        })
    }

    /// Read from something that isn't a file. `name` is only used in error
    /// messages.
    pub fn from_reader(name: impl Into<PathBuf>, reader: impl BufRead + 'static) -> Self {
        Self {
            path: name.into(),
            reader: Box::new(reader),
        }
    }

    /// The samples in file order. Reading stops being useful after the first
    /// error since the decoder can't skip samples.
    pub fn samples(self) -> Samples {
        Samples {
            path: self.path,
            lines: self.reader.lines(),
            row: 0,
            seen_data: false,
        }
    }
}

pub struct Samples {
    path: PathBuf,
    lines: io::Lines<Box<dyn BufRead>>,
    /// 1-based number of the last row read.
    row: usize,
    seen_data: bool,
}

impl Iterator for Samples {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(e).with_context(|| {
                        format!("Reading {} row {}", self.path.display(), self.row + 1)
                    }))
                }
            };
            self.row += 1;

            let first = !self.seen_data;
            match parse_row(&line) {
                Ok(None) => continue,
                Ok(Some(sample)) => {
                    self.seen_data = true;
                    return Some(Ok(sample));
                }
                Err(e) if first && e.kind == ParseErrorKind::Timestamp && is_header(&line) => {
                    info!("Skipping header row: {}", line.trim());
                    self.seen_data = true;
                    continue;
                }
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e).context(format!(
                        "{} row {}",
                        self.path.display(),
                        self.row
                    ))))
                }
            }
        }
    }
}

impl Drop for Samples {
    fn drop(&mut self) {
        debug!("Read {} rows from {}", self.row, self.path.display());
    }
}

/// A header row has no bus value in its second column. A row with a good
/// value and a bad timestamp is a corrupt sample, not a header.
fn is_header(line: &str) -> bool {
    let mut fields = line.split(',').map(|f| f.trim().trim_matches('"'));
    fields.next();
    fields.next().map_or(true, |value| parse_value(value).is_err())
}

/// Parse one CSV row. Blank rows give `None`.
pub fn parse_row(line: &str) -> Result<Option<Sample>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let mut fields = line.split(',').map(|f| f.trim().trim_matches('"'));
    // The timestamp is checked first so that a header row is always reported
    // as a timestamp error.
    let timestamp = parse_timestamp(fields.next().unwrap_or_default())?;
    let value = fields
        .next()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingField, line))?;
    Ok(Some(Sample {
        timestamp,
        raw: parse_value(value)?,
    }))
}
