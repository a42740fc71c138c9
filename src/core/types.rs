use serde::Serialize;

pub const PROJECTION_MONTHS: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Unknown labels fall back to `Moderate` rather than failing.
    pub fn from_label(label: &str) -> Self {
        match label {
            "conservative" => RiskTolerance::Conservative,
            "aggressive" => RiskTolerance::Aggressive,
            _ => RiskTolerance::Moderate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }

    pub fn growth_multiplier(self) -> f64 {
        match self {
            RiskTolerance::Conservative => 0.75,
            RiskTolerance::Moderate => 1.0,
            RiskTolerance::Aggressive => 1.25,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Scenario {
    None,
    JobHike,
    Sabbatical,
    Emergency,
}

impl Scenario {
    /// Unknown labels fall back to `None` rather than failing.
    pub fn from_label(label: &str) -> Self {
        match label {
            "job-hike" => Scenario::JobHike,
            "sabbatical" => Scenario::Sabbatical,
            "emergency" => Scenario::Emergency,
            _ => Scenario::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scenario::None => "none",
            Scenario::JobHike => "job-hike",
            Scenario::Sabbatical => "sabbatical",
            Scenario::Emergency => "emergency",
        }
    }
}

/// Inputs for one projection run. Rates are monthly fractions, except
/// `monthly_savings_rate` which is the percentage of a positive surplus
/// routed to investments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub current_investments: f64,
    pub goal_cost: f64,
    pub investment_growth_rate: f64,
    pub inflation_rate: f64,
    pub monthly_savings_rate: f64,
    pub risk_tolerance: RiskTolerance,
    pub scenario: Scenario,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub history: Vec<f64>,
    pub goal_1_month: Option<u32>,
    pub risks: Vec<String>,
    pub insights: Vec<String>,
    pub final_net_worth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub base: ProjectionResult,
    pub best: ProjectionResult,
    pub worst: ProjectionResult,
    pub scenario: ProjectionResult,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTrace {
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub surplus: f64,
    pub invested: f64,
    pub liquidated: f64,
    pub savings: f64,
    pub investments: f64,
    pub net_worth: f64,
}
