//! Build and run a simulation from an initial record and run settings
//!
//! A `Scenario` bundles the runtime parameters with the system state. Its
//! `run` method performs the half-step bootstrap, then steps over the
//! half-open interval `[start, end)` and hands every record whose time is a
//! multiple of the output interval to a [`TrajectoryWriter`].

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::configuration::config::RunSettings;
use crate::error::{SimError, SimResult};
use crate::simulation::diagnostics::Diagnostics;
use crate::simulation::integrator::leapfrog_step;
use crate::simulation::params::{is_multiple_of, Parameters};
use crate::simulation::states::System;
use crate::stream::loader::{load_initial, InitialConditions};
use crate::stream::writer::TrajectoryWriter;

/// Runtime bundle: parameters plus current system state
#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub system: System,
    pub t_start: f64,
}

/// What a finished run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: usize, // integrator steps, bootstrap included
    pub records: usize, // records written
    pub t_final: f64, // time label of the last loop iteration, t_start if none ran
    pub initial: Diagnostics,
    pub last: Diagnostics,
}

impl RunSummary {
    pub fn relative_energy_error(&self) -> f64 {
        self.last.relative_energy_error(&self.initial)
    }
}

impl Scenario {
    pub fn build_scenario(initial: InitialConditions, settings: &RunSettings) -> SimResult<Self> {
        let InitialConditions { mut system, g_eff } = initial;
        if settings.recenter {
            system.recenter();
        }

        let parameters = settings.parameters(g_eff);
        parameters.validate()?;

        Ok(Self {
            t_start: system.t,
            parameters,
            system,
        })
    }

    /// Bootstrap, then step and emit until `t_end`
    ///
    /// Performs no loop iterations when `t_end <= t_start`.
    pub fn run<W: Write>(&mut self, writer: &mut TrajectoryWriter<W>) -> SimResult<RunSummary> {
        self.parameters.validate()?;
        if !self.t_start.is_finite() {
            return Err(SimError::value(format!("start time {} is not finite", self.t_start)));
        }
        let p = self.parameters.clone();

        let initial = Diagnostics::measure(&self.system, p.g_eff);
        info!(
            bodies = self.system.bodies.len(),
            t_start = self.t_start,
            t_end = p.t_end,
            dt = p.h0,
            e_tot = initial.total(),
            "starting run"
        );

        leapfrog_step(&mut self.system, &p, true)?;
        let mut steps = 1;

        let mut next_dia = p.dt_dia.map(|dia| self.t_start + dia);
        let mut t_final = self.t_start;

        // s = t_start + k * h0 avoids accumulating rounding in the clock
        let mut k: u64 = 0;
        loop {
            let s = self.t_start + k as f64 * p.h0;
            if s >= p.t_end {
                break;
            }

            leapfrog_step(&mut self.system, &p, false)?;
            steps += 1;
            t_final = s;

            if is_multiple_of(s, p.dt_out) {
                writer.write(&self.system, s)?;
                debug!(t = s, records = writer.records(), "wrote record");
            }

            if let (Some(dia), Some(next)) = (p.dt_dia, next_dia.as_mut()) {
                if s >= *next {
                    report(&Diagnostics::measure(&self.system, p.g_eff), &initial, steps);
                    while *next <= s {
                        *next += dia;
                    }
                }
            }

            k += 1;
        }

        writer.flush()?;

        let last = Diagnostics::measure(&self.system, p.g_eff);
        report(&last, &initial, steps);
        info!(steps, records = writer.records(), "run complete");

        Ok(RunSummary {
            steps,
            records: writer.records(),
            t_final,
            initial,
            last,
        })
    }
}

fn report(d: &Diagnostics, initial: &Diagnostics, steps: usize) {
    info!(
        t = d.t,
        steps,
        e_kin = d.kinetic,
        e_pot = d.potential,
        e_tot = d.total(),
        rel_err = d.relative_energy_error(initial),
        px = d.momentum.x,
        py = d.momentum.y,
        "diagnostics"
    );
}

/// Load the first record of `input`, validate the run against it and stream
/// trajectory records to `output`
///
/// Unlike [`Scenario::run`], an end time that is not after the start time is
/// rejected here, before any stepping. The loader has already rejected a
/// non-finite start time, so the comparison below is meaningful.
pub fn run_simulation<R: BufRead, W: Write>(
    input: R,
    output: W,
    settings: &RunSettings,
) -> SimResult<RunSummary> {
    let initial = load_initial(input, settings.g_base)?;
    let t_start = initial.system.t;
    if settings.end <= t_start {
        return Err(SimError::value(format!(
            "end time {} must be after start time {}",
            settings.end, t_start
        )));
    }

    let mut scenario = Scenario::build_scenario(initial, settings)?;
    let mut writer = TrajectoryWriter::new(output);
    scenario.run(&mut writer)
}
