mod coerce;
mod engine;
mod figures;
mod grid;
mod types;

pub use coerce::{coerce_f64, finite_or_zero};
pub use engine::{compute_matrix, stress_point};
pub use figures::key_figures;
pub use grid::{default_grid, inclusive_steps};
pub use types::{
    BuildingFinancials, BuildingKeyFigures, BuildingRecord, MatrixLookup, OperatingCosts,
    ScenarioCell, ScenarioGrid, ScenarioMatrix,
};
