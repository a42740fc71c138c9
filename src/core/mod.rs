mod compare;
mod engine;
mod format;
mod types;

pub use compare::{Variant, simulate};
pub use engine::{monthly_trace, project};
pub use format::currency;
pub use types::{
    MonthTrace, PROJECTION_MONTHS, ProjectionResult, RiskTolerance, Scenario,
    SimulationOutput, SimulationParameters,
};
