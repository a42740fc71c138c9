use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::core::{
    MonthTrace, RiskTolerance, Scenario, SimulationParameters, Variant, currency, monthly_trace,
    simulate,
};

#[derive(Parser, Debug)]
#[command(
    name = "fintwin",
    about = "Deterministic 10-year net worth projection with best/worst/scenario comparisons"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "FINTWIN_LOG",
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error); RUST_LOG overrides"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API and the browser client
    Serve(ServeArgs),
    /// Run the four comparative projections and print them as JSON
    Project(ProjectArgs),
    /// Print the month-by-month trace of one projection run
    Trace(TraceArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(env = "FINTWIN_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "FINTWIN_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ParameterArgs {
    #[arg(long)]
    pub monthly_income: f64,
    #[arg(long)]
    pub monthly_expenses: f64,
    #[arg(long, default_value_t = 0.0)]
    pub current_savings: f64,
    #[arg(long, default_value_t = 0.0)]
    pub current_investments: f64,
    #[arg(long)]
    pub goal_cost: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly investment growth as a fraction, e.g. 0.005"
    )]
    pub investment_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly expense inflation as a fraction, e.g. 0.002"
    )]
    pub inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Percent of a positive monthly surplus that is invested"
    )]
    pub monthly_savings_rate: f64,
    #[arg(
        long,
        default_value = "moderate",
        help = "conservative, moderate or aggressive; anything else is treated as moderate"
    )]
    pub risk_tolerance: String,
    #[arg(
        long,
        default_value = "none",
        help = "none, job-hike, sabbatical or emergency; anything else is treated as none"
    )]
    pub scenario: String,
}

impl From<&ParameterArgs> for SimulationParameters {
    fn from(args: &ParameterArgs) -> Self {
        SimulationParameters {
            monthly_income: args.monthly_income,
            monthly_expenses: args.monthly_expenses,
            current_savings: args.current_savings,
            current_investments: args.current_investments,
            goal_cost: args.goal_cost,
            investment_growth_rate: args.investment_growth_rate,
            inflation_rate: args.inflation_rate,
            monthly_savings_rate: args.monthly_savings_rate,
            risk_tolerance: RiskTolerance::from_label(&args.risk_tolerance),
            scenario: Scenario::from_label(&args.scenario),
        }
    }
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub params: ParameterArgs,
    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliVariant {
    Base,
    Best,
    Worst,
    Scenario,
}

impl From<CliVariant> for Variant {
    fn from(value: CliVariant) -> Self {
        match value {
            CliVariant::Base => Variant::Base,
            CliVariant::Best => Variant::Best,
            CliVariant::Worst => Variant::Worst,
            CliVariant::Scenario => Variant::Scenario,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    #[command(flatten)]
    pub params: ParameterArgs,
    #[arg(long, value_enum, default_value_t = CliVariant::Scenario)]
    pub variant: CliVariant,
}

pub fn render_projection(args: &ProjectArgs) -> serde_json::Result<String> {
    let output = simulate(SimulationParameters::from(&args.params));
    if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
}

pub fn render_trace(args: &TraceArgs) -> String {
    let variant = Variant::from(args.variant);
    let params = variant.derive(&SimulationParameters::from(&args.params));
    let rows = monthly_trace(params);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {} run, scenario {}, risk tolerance {}",
        variant.label(),
        params.scenario.label(),
        params.risk_tolerance.label()
    );
    let _ = writeln!(
        out,
        "{:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>16} {:>16} {:>16}",
        "Month",
        "Income",
        "Expenses",
        "Surplus",
        "Invested",
        "Liquidated",
        "Savings",
        "Investments",
        "Net worth"
    );
    let _ = writeln!(out, "{}", "-".repeat(133));
    for row in &rows {
        write_trace_row(&mut out, row);
    }
    out
}

fn write_trace_row(out: &mut String, row: &MonthTrace) {
    let _ = writeln!(
        out,
        "{:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>16} {:>16} {:>16}",
        row.month,
        currency(row.income),
        currency(row.expenses),
        currency(row.surplus),
        currency(row.invested),
        currency(row.liquidated),
        currency(row.savings),
        currency(row.investments),
        currency(row.net_worth)
    );
}
