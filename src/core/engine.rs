use super::format::{currency, whole_currency};
use super::types::{
    MonthTrace, PROJECTION_MONTHS, ProjectionResult, Scenario, SimulationParameters,
};

const JOB_HIKE_MONTH: u32 = 24;
const JOB_HIKE_RAISE: f64 = 0.20;
const JOB_HIKE_COST: f64 = 5_000.0;
const SABBATICAL_START_MONTH: u32 = 12;
const SABBATICAL_END_MONTH: u32 = 17;
const EMERGENCY_MONTH: u32 = 36;
const EMERGENCY_COST: f64 = 10_000.0;
const STRONG_POSITION_RATIO: f64 = 2.0;

#[derive(Debug)]
struct SimulationState {
    savings: f64,
    investments: f64,
    base_income: f64,
    base_expenses: f64,
    liquidated_any: bool,
}

impl SimulationState {
    fn from_parameters(params: &SimulationParameters) -> Self {
        Self {
            savings: params.current_savings,
            investments: params.current_investments,
            base_income: params.monthly_income,
            base_expenses: params.monthly_expenses,
            liquidated_any: false,
        }
    }

    fn net_worth(&self) -> f64 {
        self.savings + self.investments
    }
}

#[derive(Debug, Default)]
struct Annotations {
    risks: Vec<String>,
    insights: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Allocation {
    invested: f64,
    saved: f64,
}

#[derive(Debug, Clone, Copy)]
enum Shortfall {
    Covered { liquidated: f64 },
    Uncovered { balance: f64 },
}

pub fn project(params: SimulationParameters) -> ProjectionResult {
    run_projection(&params, None)
}

pub fn monthly_trace(params: SimulationParameters) -> Vec<MonthTrace> {
    let mut trace = Vec::with_capacity(PROJECTION_MONTHS as usize);
    run_projection(&params, Some(&mut trace));
    trace
}

fn run_projection(
    params: &SimulationParameters,
    mut trace: Option<&mut Vec<MonthTrace>>,
) -> ProjectionResult {
    let growth_rate = params.investment_growth_rate * params.risk_tolerance.growth_multiplier();
    let mut state = SimulationState::from_parameters(params);
    let mut notes = Annotations::default();
    let mut history = Vec::with_capacity(PROJECTION_MONTHS as usize);
    let mut goal_1_month = None;

    for month in 1..=PROJECTION_MONTHS {
        let expenses = inflated_expenses(state.base_expenses, params.inflation_rate, month);
        let income = apply_scenario(params.scenario, month, &mut state, &mut notes);

        let surplus = income - expenses;
        let allocation = allocate_surplus(surplus, params.monthly_savings_rate);
        state.savings += allocation.saved;
        state.investments += allocation.invested;

        let liquidated = match cover_shortfall(&mut state) {
            Some(Shortfall::Covered { liquidated }) => {
                notes.risks.push(format!(
                    "Month {month}: Liquidated {} from investments due to negative savings",
                    currency(liquidated)
                ));
                liquidated
            }
            Some(Shortfall::Uncovered { balance }) => {
                notes.risks.push(format!(
                    "Month {month}: Insufficient funds - negative balance of {}",
                    currency(balance)
                ));
                0.0
            }
            None => 0.0,
        };

        if state.investments > 0.0 {
            state.investments *= 1.0 + growth_rate;
        }

        let net_worth = state.net_worth();
        history.push(net_worth);

        if goal_1_month.is_none() && net_worth >= params.goal_cost {
            goal_1_month = Some(month);
            notes.insights.push(format!(
                "Goal achieved in month {month} ({} >= {})",
                currency(net_worth),
                currency(params.goal_cost)
            ));
        }

        if let Some(rows) = trace.as_deref_mut() {
            rows.push(MonthTrace {
                month,
                income,
                expenses,
                surplus,
                invested: allocation.invested,
                liquidated,
                savings: state.savings,
                investments: state.investments,
                net_worth,
            });
        }
    }

    let final_net_worth = history.last().copied().unwrap_or(0.0);
    annotate_outcome(params, &state, goal_1_month, final_net_worth, &mut notes);

    tracing::debug!(
        scenario = params.scenario.label(),
        risk_tolerance = params.risk_tolerance.label(),
        final_net_worth,
        goal_1_month,
        risks = notes.risks.len(),
        insights = notes.insights.len(),
        "projection complete"
    );

    ProjectionResult {
        history,
        goal_1_month,
        risks: notes.risks,
        insights: notes.insights,
        final_net_worth,
    }
}

fn inflated_expenses(base_expenses: f64, inflation_rate: f64, month: u32) -> f64 {
    base_expenses * (1.0 + inflation_rate).powf(f64::from(month))
}

/// Returns this month's income after the scenario's cash-flow shock, mutating
/// the income baseline and savings where the scenario calls for it.
fn apply_scenario(
    scenario: Scenario,
    month: u32,
    state: &mut SimulationState,
    notes: &mut Annotations,
) -> f64 {
    match scenario {
        Scenario::JobHike if month == JOB_HIKE_MONTH => {
            state.base_income += state.base_income * JOB_HIKE_RAISE;
            state.savings -= JOB_HIKE_COST;
            notes.insights.push(format!(
                "Month {month}: Job change costs {} but increases income by 20%",
                whole_currency(JOB_HIKE_COST)
            ));
            state.base_income
        }
        Scenario::Sabbatical => {
            if month == SABBATICAL_START_MONTH {
                notes.insights.push(format!(
                    "Month {month}: Sabbatical begins - no income for 6 months"
                ));
            }
            if (SABBATICAL_START_MONTH..=SABBATICAL_END_MONTH).contains(&month) {
                0.0
            } else {
                state.base_income
            }
        }
        Scenario::Emergency if month == EMERGENCY_MONTH => {
            state.savings -= EMERGENCY_COST;
            notes.risks.push(format!(
                "Month {month}: Emergency expense of {}",
                whole_currency(EMERGENCY_COST)
            ));
            state.base_income
        }
        _ => state.base_income,
    }
}

fn allocate_surplus(surplus: f64, savings_rate_pct: f64) -> Allocation {
    if surplus > 0.0 {
        let invested = surplus * (savings_rate_pct / 100.0);
        Allocation {
            invested,
            saved: surplus - invested,
        }
    } else {
        Allocation {
            invested: 0.0,
            saved: surplus,
        }
    }
}

/// All-or-nothing: investments only cover a negative savings balance when
/// they can cover all of it.
fn cover_shortfall(state: &mut SimulationState) -> Option<Shortfall> {
    if state.savings >= 0.0 {
        return None;
    }

    let deficit = state.savings.abs();
    if state.investments >= deficit {
        state.investments -= deficit;
        state.savings = 0.0;
        state.liquidated_any = true;
        Some(Shortfall::Covered {
            liquidated: deficit,
        })
    } else {
        Some(Shortfall::Uncovered {
            balance: state.savings,
        })
    }
}

fn annotate_outcome(
    params: &SimulationParameters,
    state: &SimulationState,
    goal_1_month: Option<u32>,
    final_net_worth: f64,
    notes: &mut Annotations,
) {
    if goal_1_month.is_none() && final_net_worth < params.goal_cost {
        notes.risks.push(format!(
            "Goal not achieved in 10 years. Shortfall: {}",
            currency(params.goal_cost - final_net_worth)
        ));
    }

    if notes.risks.is_empty() {
        notes
            .insights
            .push("No critical risks detected during simulation period".to_string());
    }

    if state.investments > state.savings * STRONG_POSITION_RATIO && !state.liquidated_any {
        notes
            .insights
            .push("Strong investment position maintained throughout projection".to_string());
    }
}
