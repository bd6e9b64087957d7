//! Reading the header and the most recent row of an append-only CSV log.
//!
//! Logs grow by one row per second for as long as the monitor runs, so the
//! last row is found by scanning backwards from the end instead of reading the
//! whole file.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{MonitorError, MonitorResult};

const TAIL_CHUNK: u64 = 8 * 1024;

/// Header and last data row of a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastRow {
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

impl LastRow {
    /// Raw value of the named column.
    pub fn get(&self, column: &str) -> MonitorResult<&str> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| MonitorError::MissingColumn {
                column: column.to_string(),
            })?;
        self.values
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| MonitorError::MissingValue {
                column: column.to_string(),
            })
    }

    /// Named column parsed as a decimal number.
    pub fn number(&self, column: &str) -> MonitorResult<f64> {
        let raw = self.get(column)?;
        raw.trim().parse::<f64>().map_err(|_| MonitorError::Parse {
            column: column.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Read the header line and the last non-empty line of `path`.
pub fn read_last_row(path: &Path) -> MonitorResult<LastRow> {
    let read_err = |e: std::io::Error| MonitorError::Read {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::open(path).map_err(read_err)?;

    let mut header = Vec::new();
    BufReader::new(&mut file)
        .read_until(b'\n', &mut header)
        .map_err(read_err)?;
    if trim_line(&header).is_empty() {
        return Err(MonitorError::Empty {
            path: path.to_path_buf(),
        });
    }
    let header_len = header.len() as u64;

    let last = last_line(&mut file, header_len).map_err(read_err)?;
    let Some(last) = last else {
        return Err(MonitorError::Empty {
            path: path.to_path_buf(),
        });
    };

    Ok(LastRow {
        columns: parse_record(trim_line(&header))?,
        values: parse_record(&last)?,
    })
}

/// Last non-empty line after byte offset `start`, without its line ending.
fn last_line(file: &mut File, start: u64) -> std::io::Result<Option<Vec<u8>>> {
    let end = file.seek(SeekFrom::End(0))?;
    if end <= start {
        return Ok(None);
    }

    let mut tail: Vec<u8> = Vec::new();
    let mut pos = end;
    loop {
        let from = pos.saturating_sub(TAIL_CHUNK).max(start);
        let mut chunk = vec![0u8; (pos - from) as usize];
        file.seek(SeekFrom::Start(from))?;
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&tail);
        tail = chunk;
        pos = from;

        let body = trim_line(&tail);
        if let Some(nl) = body.iter().rposition(|&b| b == b'\n') {
            return Ok(Some(trim_line(&body[nl + 1..]).to_vec()));
        }
        if pos == start {
            return Ok(if body.is_empty() {
                None
            } else {
                Some(body.to_vec())
            });
        }
    }
}

fn trim_line(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && matches!(bytes[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &bytes[..end]
}

fn parse_record(line: &[u8]) -> MonitorResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line);
    let mut record = csv::ByteRecord::new();
    if !reader.read_byte_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(|f| decode(f).trim().to_string()).collect())
}

/// UTF-8, falling back to Latin-1 (the monitor writes `°` as a single byte
/// on some Windows code pages).
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
