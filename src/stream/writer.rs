//! Serialize the system into trajectory records
//!
//! Bodies are written in list order with their physical masses, followed by
//! the canonical pair distances, so every record in a run lines up with the
//! first one.

use std::io::Write;

use super::codec::{write_record, BodyRecord, Record};
use crate::error::SimResult;
use crate::simulation::states::System;

/// Snapshot of `sys` labelled with `time`
pub fn to_record(sys: &System, time: f64) -> Record {
    Record {
        time,
        bodies: sys
            .bodies
            .iter()
            .map(|b| BodyRecord {
                mass: b.m * sys.mass_scale,
                x: b.x.x,
                y: b.x.y,
                vx: b.v.x,
                vy: b.v.y,
            })
            .collect(),
        distances: sys.pair_distances(),
    }
}

/// Record writer that owns the output stream for the run
pub struct TrajectoryWriter<W: Write> {
    out: W,
    records: usize,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, records: 0 }
    }

    pub fn write(&mut self, sys: &System, time: f64) -> SimResult<()> {
        write_record(&mut self.out, &to_record(sys, time))?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> SimResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
