//! Line-oriented record framing shared by the loader and the writer.
//!
//! A record is a header line `<bodyCount> <time>`, then `bodyCount` body
//! lines `<mass> <x> <y> <vx> <vy>`, then one line of pairwise distances in
//! canonical (i, j), i < j order. Blank lines between records are skipped.
//!
//! ```text
//! 2 0
//! 1.5e29 0 0 0 0
//! 5.9e24 2.5e9 0 0 64000
//! 2500000000
//! ```
//!
//! A one-body record has no pairs, so its distances line is empty and is not
//! required on input.

use std::io::{BufRead, Write};

use crate::error::{SimError, SimResult};
use crate::simulation::states::checked_pair_count;

const MAX_PREALLOC: usize = 1024;

/// One body line as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRecord {
    pub mass: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// A full header/bodies/distances triple
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: f64,
    pub bodies: Vec<BodyRecord>,
    pub distances: Vec<f64>,
}

/// Forward-only reader producing one `Record` per triple
///
/// Stops after the first error; a malformed stream is never resynchronized.
pub struct RecordReader<R> {
    input: R,
    line_no: usize,
    buf: String,
    failed: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line_no: 0,
            buf: String::new(),
            failed: false,
        }
    }

    /// Line number of the last line read, 1-based
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Next non-blank line, trimmed; `None` at end of stream
    fn next_line(&mut self) -> SimResult<Option<&str>> {
        loop {
            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !self.buf.trim().is_empty() {
                return Ok(Some(self.buf.trim()));
            }
        }
    }

    fn require_line(&mut self, what: &str) -> SimResult<&str> {
        let line_no = self.line_no;
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(SimError::format(
                line_no,
                format!("unexpected end of stream, expected {what}"),
            )),
        }
    }

    fn read_record(&mut self) -> SimResult<Option<Record>> {
        let header = match self.next_line()? {
            None => return Ok(None),
            Some(line) => parse_header(line),
        };
        let (count, time) = header.map_err(|m| SimError::format(self.line_no, m))?;

        let expected = checked_pair_count(count).ok_or_else(|| {
            SimError::format(self.line_no, format!("body count {count} is too large"))
        })?;

        // the count is untrusted, so grow with the lines actually present
        let mut bodies = Vec::with_capacity(count.min(MAX_PREALLOC));
        for i in 0..count {
            let line = self.require_line(&format!("body line {} of {}", i + 1, count))?;
            let body = parse_body(line).map_err(|m| SimError::format(self.line_no, m))?;
            bodies.push(body);
        }

        let distances = if expected == 0 {
            Vec::new()
        } else {
            let line = self.require_line("distances line")?;
            let fields = parse_floats(line).map_err(|m| SimError::format(self.line_no, m))?;
            if fields.len() != expected {
                return Err(SimError::format(
                    self.line_no,
                    format!(
                        "expected {expected} distances for {count} bodies, found {} fields",
                        fields.len()
                    ),
                ));
            }
            fields
        };

        Ok(Some(Record {
            time,
            bodies,
            distances,
        }))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = SimResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn parse_header(line: &str) -> Result<(usize, f64), String> {
    let fields: Vec<&str> = line.split_ascii_whitespace().collect();
    if fields.len() != 2 {
        return Err(format!("header needs `<bodyCount> <time>`, found {} fields", fields.len()));
    }
    let count: usize = fields[0]
        .parse()
        .map_err(|_| format!("body count `{}` is not a non-negative integer", fields[0]))?;
    if count == 0 {
        return Err("body count must be positive".to_string());
    }
    let time = parse_float(fields[1])?;
    Ok((count, time))
}

fn parse_body(line: &str) -> Result<BodyRecord, String> {
    let fields = parse_floats(line)?;
    match fields[..] {
        [mass, x, y, vx, vy] => Ok(BodyRecord { mass, x, y, vx, vy }),
        _ => Err(format!(
            "body line needs `<mass> <x> <y> <vx> <vy>`, found {} fields",
            fields.len()
        )),
    }
}

fn parse_floats(line: &str) -> Result<Vec<f64>, String> {
    line.split_ascii_whitespace().map(parse_float).collect()
}

fn parse_float(token: &str) -> Result<f64, String> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("`{token}` is not a finite number")),
        Err(_) => Err(format!("`{token}` is not a number")),
    }
}

/// Write one record; floats use the shortest representation that parses back exactly
pub fn write_record<W: Write>(out: &mut W, record: &Record) -> SimResult<()> {
    writeln!(out, "{} {}", record.bodies.len(), record.time)?;
    for b in &record.bodies {
        writeln!(out, "{} {} {} {} {}", b.mass, b.x, b.y, b.vx, b.vy)?;
    }
    let mut first = true;
    for d in &record.distances {
        if !first {
            out.write_all(b" ")?;
        }
        write!(out, "{d}")?;
        first = false;
    }
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str) -> Vec<SimResult<Record>> {
        RecordReader::new(Cursor::new(text.to_string())).collect()
    }

    #[test]
    fn reads_consecutive_records_with_blank_lines() {
        let text = "2 0\n1 0 0 0 0\n1 3 4 0 0\n5\n\n\n2 1.5\n1 0 0 0 0\n1 0 1 0 0\n1\n";
        let recs: Vec<Record> = read_all(text).into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].time, 0.0);
        assert_eq!(recs[0].bodies[1].x, 3.0);
        assert_eq!(recs[0].distances, vec![5.0]);
        assert_eq!(recs[1].time, 1.5);
    }

    #[test]
    fn missing_distances_line_is_an_error() {
        let recs = read_all("2 0\n1 0 0 0 0\n1 3 4 0 0\n");
        assert_eq!(recs.len(), 1);
        assert!(matches!(recs[0], Err(SimError::Format { .. })));
    }

    #[test]
    fn body_count_mismatch_is_an_error() {
        // header says three bodies, the third slot gets the distances line
        let recs = read_all("3 0\n1 0 0 0 0\n1 3 4 0 0\n5\n");
        assert!(matches!(recs[0], Err(SimError::Format { line: 4, .. })));
    }

    #[test]
    fn wrong_distance_count_is_an_error() {
        let recs = read_all("3 0\n1 0 0 0 0\n1 1 0 0 0\n1 2 0 0 0\n1 2\n");
        assert!(matches!(recs[0], Err(SimError::Format { line: 5, .. })));
    }

    #[test]
    fn non_numeric_token_is_an_error() {
        let recs = read_all("1 0\n1 0 zero 0 0\n");
        assert!(matches!(recs[0], Err(SimError::Format { line: 2, .. })));
    }

    #[test]
    fn zero_body_header_is_an_error() {
        let recs = read_all("0 0\n");
        assert!(matches!(recs[0], Err(SimError::Format { line: 1, .. })));
    }

    #[test]
    fn huge_body_count_is_an_error() {
        let recs = read_all("99999999999999999 0\n1 0 0 0 0\n");
        assert_eq!(recs.len(), 1);
        assert!(matches!(recs[0], Err(SimError::Format { .. })));

        let recs = read_all(&format!("{} 0\n1 0 0 0 0\n", usize::MAX));
        assert!(matches!(recs[0], Err(SimError::Format { line: 1, .. })));
    }

    #[test]
    fn non_finite_tokens_are_errors() {
        for text in [
            "2 NaN\n1 0 0 0 0\n1 1 0 0 0\n1\n",
            "2 inf\n1 0 0 0 0\n1 1 0 0 0\n1\n",
            "2 0\n1 NaN 0 0 0\n1 1 0 0 0\n1\n",
            "2 0\n1 0 0 -infinity 0\n1 1 0 0 0\n1\n",
            "2 0\n1 0 0 0 0\n1 1 0 0 0\nnan\n",
        ] {
            let recs = read_all(text);
            assert_eq!(recs.len(), 1);
            assert!(matches!(recs[0], Err(SimError::Format { .. })), "accepted {:?}", text);
        }
    }

    #[test]
    fn reader_stops_after_first_error() {
        let recs = read_all("2 x\n1 0 0 0 0\n1 1 0 0 0\n1\n1 0\n1 0 0 0 0\n");
        assert_eq!(recs.len(), 1, "reader must not resynchronize");
    }

    #[test]
    fn single_body_record_needs_no_distances() {
        let recs = read_all("1 0\n2 0 0 0 0\n\n1 1\n2 0 0 0 0\n");
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.as_ref().unwrap().distances.is_empty()));
    }

    #[test]
    fn written_record_parses_back_exactly() {
        let rec = Record {
            time: 12.5,
            bodies: vec![
                BodyRecord { mass: 1.59128e29, x: 0.1, y: -0.2, vx: 1.0 / 3.0, vy: 0.0 },
                BodyRecord { mass: 5.972e24, x: 2591111127.56519, y: 0.0, vx: 0.0, vy: 64000.25 },
            ],
            distances: vec![2591111127.4651],
        };
        let mut buf = Vec::new();
        write_record(&mut buf, &rec).unwrap();

        let back = read_all(std::str::from_utf8(&buf).unwrap());
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].as_ref().unwrap(), &rec);
    }
}
