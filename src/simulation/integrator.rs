//! Fixed-step kick-drift-kick leapfrog integrator for the planar system
//!
//! One force evaluation per step. The first step of a run is a half-strength
//! kick that moves the initial velocities onto the leapfrog half-step
//! lattice; every later step is a full kick followed by a full drift.

use tracing::trace;

use super::forces::{accumulate_gravity, reset_accels};
use super::params::Parameters;
use super::states::System;
use crate::error::SimResult;

/// Advance the system by one step of size `params.h0`
///
/// Updates velocities, positions and `sys.t` in place. All pair
/// contributions are accumulated before any body moves.
pub fn leapfrog_step(sys: &mut System, params: &Parameters, first_half_step: bool) -> SimResult<()> {
    let dt = params.h0; // time step dt

    // G is folded into the kick: vdt = dt * G, halved for the bootstrap step
    let vdt = if first_half_step {
        dt * params.g_eff * 0.5
    } else {
        dt * params.g_eff
    };

    // Force phase
    if let Err(e) = accumulate_gravity(sys) {
        reset_accels(sys);
        return Err(e);
    }

    // Kick, drift, clear the accumulator
    for b in sys.bodies.iter_mut() {
        b.v += vdt * b.a;
        b.x += dt * b.v;
        b.a.fill(0.0);
    }

    sys.t += dt;
    trace!(t = sys.t, first_half_step, "leapfrog step");
    Ok(())
}
