//! Pairwise Newtonian gravity for the planar n-body engine
//!
//! Accelerations are accumulated into each body's `a` field without the
//! gravitational constant; the integrator folds `g_eff` into the kick.

use crate::error::{SimError, SimResult};
use crate::simulation::states::{System, NVec2};

/// Accumulate the mutual attraction of every unordered pair (i, j), i < j
///
/// A single pass updates both members of the pair (equal and opposite).
/// Fails if any two bodies coincide or their separation is not finite,
/// leaving `a` partially filled; the caller must not integrate after an
/// error.
pub fn accumulate_gravity(sys: &mut System) -> SimResult<()> {
    let n = sys.bodies.len();

    for i in 0..n {
        let (head, tail) = sys.bodies.split_at_mut(i + 1);
        let p = &mut head[i];

        for (k, b) in tail.iter_mut().enumerate() {
            // displacement from b to p
            let d: NVec2 = p.x - b.x;
            let h = d.norm();
            if h == 0.0 {
                return Err(SimError::DegenerateConfiguration {
                    first: i,
                    second: i + 1 + k,
                    time: sys.t,
                });
            }
            if !h.is_finite() {
                return Err(SimError::NonFinite {
                    first: i,
                    second: i + 1 + k,
                    time: sys.t,
                });
            }
            let inv_h3 = (h * h * h).recip();

            // p is pulled along -d, b along +d
            p.a -= b.m * inv_h3 * d;
            b.a += p.m * inv_h3 * d;
        }
    }
    Ok(())
}

/// Clear the acceleration accumulators
pub fn reset_accels(sys: &mut System) {
    for b in sys.bodies.iter_mut() {
        b.a = NVec2::zeros();
    }
}
