//! Build the initial system from the first record of an input stream
//!
//! Masses are normalized by the smallest mass so that force terms stay near
//! unit scale; the gravitational constant absorbs the scale instead.

use std::io::BufRead;

use tracing::debug;

use super::codec::{Record, RecordReader};
use crate::error::{SimError, SimResult};
use crate::simulation::states::{Body, NVec2, System};

/// Loaded initial state plus the effective gravitational constant
#[derive(Debug, Clone)]
pub struct InitialConditions {
    pub system: System,
    pub g_eff: f64,
}

/// Consume exactly one record from `input`
pub fn load_initial<R: BufRead>(input: R, g_base: f64) -> SimResult<InitialConditions> {
    let mut reader = RecordReader::new(input);
    let record = match reader.next() {
        Some(rec) => rec?,
        None => return Err(SimError::format(reader.line_no(), "empty input, no initial record")),
    };
    from_record(&record, g_base)
}

/// Normalize a parsed record into a runnable system
pub fn from_record(record: &Record, g_base: f64) -> SimResult<InitialConditions> {
    if !record.time.is_finite() {
        return Err(SimError::value(format!("start time {} is not finite", record.time)));
    }
    for (i, b) in record.bodies.iter().enumerate() {
        if !(b.mass.is_finite() && b.mass > 0.0) {
            return Err(SimError::value(format!("body {i} has non-positive mass {}", b.mass)));
        }
        if ![b.x, b.y, b.vx, b.vy].iter().all(|c| c.is_finite()) {
            return Err(SimError::value(format!("body {i} has a non-finite position or velocity")));
        }
    }

    let min_mass = record
        .bodies
        .iter()
        .map(|b| b.mass)
        .fold(f64::INFINITY, f64::min);
    if !min_mass.is_finite() {
        return Err(SimError::value("record has no bodies"));
    }

    let bodies = record
        .bodies
        .iter()
        .map(|b| Body::new(b.mass / min_mass, NVec2::new(b.x, b.y), NVec2::new(b.vx, b.vy)))
        .collect();

    let g_eff = g_base * min_mass;
    debug!(bodies = record.bodies.len(), min_mass, g_eff, "loaded initial record");

    Ok(InitialConditions {
        system: System {
            bodies,
            t: record.time,
            mass_scale: min_mass,
        },
        g_eff,
    })
}
