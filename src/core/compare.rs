use super::engine::project;
use super::types::{Scenario, SimulationOutput, SimulationParameters};

const BEST_INCOME_FACTOR: f64 = 1.10;
const BEST_GROWTH_FACTOR: f64 = 1.5;
const BEST_INFLATION_FACTOR: f64 = 0.5;
const WORST_INCOME_FACTOR: f64 = 0.90;
const WORST_GROWTH_FACTOR: f64 = 0.5;
const WORST_INFLATION_FACTOR: f64 = 1.5;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Variant {
    Base,
    Best,
    Worst,
    Scenario,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::Best => "best",
            Variant::Worst => "worst",
            Variant::Scenario => "scenario",
        }
    }

    /// Parameters for this variant's engine run. Every variant except
    /// `Scenario` runs without a life event.
    pub fn derive(self, params: &SimulationParameters) -> SimulationParameters {
        let mut derived = *params;
        match self {
            Variant::Base => {
                derived.scenario = Scenario::None;
            }
            Variant::Best => {
                derived.monthly_income *= BEST_INCOME_FACTOR;
                derived.investment_growth_rate *= BEST_GROWTH_FACTOR;
                derived.inflation_rate *= BEST_INFLATION_FACTOR;
                derived.scenario = Scenario::None;
            }
            Variant::Worst => {
                derived.monthly_income *= WORST_INCOME_FACTOR;
                derived.investment_growth_rate *= WORST_GROWTH_FACTOR;
                derived.inflation_rate *= WORST_INFLATION_FACTOR;
                derived.scenario = Scenario::None;
            }
            Variant::Scenario => {}
        }
        derived
    }
}

pub fn simulate(params: SimulationParameters) -> SimulationOutput {
    let output = SimulationOutput {
        base: project(Variant::Base.derive(&params)),
        best: project(Variant::Best.derive(&params)),
        worst: project(Variant::Worst.derive(&params)),
        scenario: project(Variant::Scenario.derive(&params)),
    };

    tracing::debug!(
        scenario = params.scenario.label(),
        base = output.base.final_net_worth,
        best = output.best.final_net_worth,
        worst = output.worst.final_net_worth,
        selected = output.scenario.final_net_worth,
        "comparative projections complete"
    );

    output
}
