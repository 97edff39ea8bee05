//! Run configuration loaded from YAML and/or the command line.
//!
//! Every field is optional so a YAML file and the CLI can each provide a
//! subset. Values are layered (CLI over file over defaults) and then
//! resolved into validated [`RunSettings`].
//!
//! # YAML format
//!
//! ```yaml
//! step: 100.0         # timestep, default 1
//! out: 2500.0         # output interval, default 1
//! end: 1.0e8          # end time, required
//! g_base: 6.67384e-11 # physical gravitational constant
//! recenter: false     # move to the center-of-mass frame on load
//! diagnostics: 1.0e6  # energy report interval, off when absent
//! ```

use std::io::Read;

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::params::{check_positive, Parameters, G_BASE};

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub step: Option<f64>, // timestep
    pub out: Option<f64>, // output interval
    pub end: Option<f64>, // end time
    pub g_base: Option<f64>, // gravitational constant before mass normalization
    pub recenter: Option<bool>, // center-of-mass frame on load
    pub diagnostics: Option<f64>, // diagnostics interval
}

impl RunConfig {
    pub fn from_yaml_reader<R: Read>(reader: R) -> SimResult<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Layer `over` on top of `self`; fields set in `over` win
    pub fn merge(self, over: RunConfig) -> RunConfig {
        RunConfig {
            step: over.step.or(self.step),
            out: over.out.or(self.out),
            end: over.end.or(self.end),
            g_base: over.g_base.or(self.g_base),
            recenter: over.recenter.or(self.recenter),
            diagnostics: over.diagnostics.or(self.diagnostics),
        }
    }

    /// Fill defaults and validate everything that does not depend on the input
    pub fn resolve(self) -> SimResult<RunSettings> {
        let step = self.step.unwrap_or(1.0);
        let out = self.out.unwrap_or(1.0);
        let end = self
            .end
            .ok_or_else(|| SimError::value("end time is required"))?;
        let g_base = self.g_base.unwrap_or(G_BASE);

        check_positive("timestep", step)?;
        check_positive("output interval", out)?;
        check_positive("gravitational constant", g_base)?;
        if let Some(dia) = self.diagnostics {
            check_positive("diagnostics interval", dia)?;
        }
        if !end.is_finite() {
            return Err(SimError::value(format!("end time must be finite, got {end}")));
        }

        Ok(RunSettings {
            step,
            out,
            end,
            g_base,
            recenter: self.recenter.unwrap_or(false),
            diagnostics: self.diagnostics,
        })
    }
}

/// Validated run settings
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub step: f64,
    pub out: f64,
    pub end: f64,
    pub g_base: f64,
    pub recenter: bool,
    pub diagnostics: Option<f64>,
}

impl RunSettings {
    pub fn new(step: f64, out: f64, end: f64) -> Self {
        Self {
            step,
            out,
            end,
            g_base: G_BASE,
            recenter: false,
            diagnostics: None,
        }
    }

    /// Runtime parameters once the mass scale of the input is known
    pub fn parameters(&self, g_eff: f64) -> Parameters {
        Parameters {
            h0: self.step,
            dt_out: self.out,
            t_end: self.end,
            g_eff,
            dt_dia: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fields_are_read() {
        let cfg = RunConfig::from_yaml_str("step: 100\nout: 2500\nend: 1.0e8\nrecenter: true\n").unwrap();
        assert_eq!(cfg.step, Some(100.0));
        assert_eq!(cfg.out, Some(2500.0));
        assert_eq!(cfg.end, Some(1.0e8));
        assert_eq!(cfg.recenter, Some(true));
        assert_eq!(cfg.g_base, None);
    }

    #[test]
    fn unknown_yaml_field_is_rejected() {
        assert!(matches!(RunConfig::from_yaml_str("stpe: 1\n"), Err(SimError::Config(_))));
    }

    #[test]
    fn cli_values_override_file_values() {
        let file = RunConfig { step: Some(5.0), end: Some(100.0), ..Default::default() };
        let cli = RunConfig { step: Some(2.0), out: Some(4.0), ..Default::default() };
        let merged = file.merge(cli);
        assert_eq!(merged.step, Some(2.0));
        assert_eq!(merged.out, Some(4.0));
        assert_eq!(merged.end, Some(100.0));
    }

    #[test]
    fn defaults_are_filled() {
        let s = RunConfig { end: Some(10.0), ..Default::default() }.resolve().unwrap();
        assert_eq!(s, RunSettings::new(1.0, 1.0, 10.0));
    }

    #[test]
    fn missing_end_is_rejected() {
        assert!(matches!(RunConfig::default().resolve(), Err(SimError::Value(_))));
    }

    #[test]
    fn non_positive_step_or_interval_is_rejected() {
        let zero_step = RunConfig { step: Some(0.0), end: Some(10.0), ..Default::default() };
        let neg_out = RunConfig { out: Some(-1.0), end: Some(10.0), ..Default::default() };
        assert!(matches!(zero_step.resolve(), Err(SimError::Value(_))));
        assert!(matches!(neg_out.resolve(), Err(SimError::Value(_))));
    }
}
