pub mod data;
pub mod error;
pub mod output;
pub mod simulator;

pub use data::parser;
pub use data::{DataShapeError, Dataset, InsulinInput};
pub use error::GlucosimError;
pub use simulator::{
    time_grid, BergmanParameters, IntegrationError, MinimalModel, Simulation, SimulationOutput,
    Trajectory, DEFAULT_GRID_POINTS,
};

pub mod prelude {
    pub use crate::data::parser::{self, ColumnSpec};
    pub use crate::data::{DataShapeError, Dataset, InsulinInput};
    pub use crate::error::GlucosimError;
    pub use crate::output;
    pub use crate::simulator::{
        ode::solve_grid, time_grid, BergmanParameters, IntegrationError, MinimalModel, Simulation,
        SimulationOutput, Trajectory, DEFAULT_GRID_POINTS,
    };
}
