//! Numerical and physical parameters for a run
//!
//! `Parameters` holds the validated runtime settings:
//! - step size, output interval and end time,
//! - the effective gravitational constant `g_eff` (G scaled by the mass scale),
//! - the optional diagnostics interval

use crate::error::{SimError, SimResult};

/// Physical gravitational constant in SI units
pub const G_BASE: f64 = 6.67384e-11;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64, // step size
    pub dt_out: f64, // output interval
    pub t_end: f64, // time end
    pub g_eff: f64, // G * mass scale
    pub dt_dia: Option<f64>, // diagnostics interval
}

impl Parameters {
    /// Reject step sizes and intervals that would never advance or never emit
    pub fn validate(&self) -> SimResult<()> {
        check_positive("timestep", self.h0)?;
        check_positive("output interval", self.dt_out)?;
        if let Some(dia) = self.dt_dia {
            check_positive("diagnostics interval", dia)?;
        }
        if !self.t_end.is_finite() {
            return Err(SimError::value(format!("end time must be finite, got {}", self.t_end)));
        }
        if !(self.g_eff.is_finite() && self.g_eff > 0.0) {
            return Err(SimError::value(format!(
                "gravitational constant must be positive, got {}",
                self.g_eff
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_positive(name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::value(format!("{name} must be positive, got {value}")))
    }
}

/// True when `s` is a whole multiple of `interval`, up to rounding of `s`
pub fn is_multiple_of(s: f64, interval: f64) -> bool {
    let r = s.rem_euclid(interval);
    let tol = 1e-9 * interval;
    r <= tol || interval - r <= tol
}
