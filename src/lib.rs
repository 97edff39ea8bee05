pub mod error;
pub mod simulation;
pub mod configuration;
pub mod stream;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body, System, NVec2};
pub use simulation::forces::accumulate_gravity;
pub use simulation::integrator::leapfrog_step;
pub use simulation::diagnostics::Diagnostics;
pub use simulation::params::{Parameters, G_BASE};
pub use simulation::scenario::{run_simulation, RunSummary, Scenario};

pub use configuration::config::{RunConfig, RunSettings};

pub use stream::codec::{BodyRecord, Record, RecordReader};
pub use stream::loader::{load_initial, InitialConditions};
pub use stream::writer::TrajectoryWriter;
