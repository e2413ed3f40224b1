//! Mortgage Planner CLI
//!
//! Compute, combine and compare mortgages from the command line

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use mortgage_planner::amortization::{DEFAULT_DURATION_MONTHS, DEFAULT_LABEL};
use mortgage_planner::loader::load_terms;
use mortgage_planner::report::{compare, sweep_report, ScheduleChart};
use mortgage_planner::{combine_all, MortgageSchedule, MortgageTerms, ScenarioRunner};

#[derive(Parser)]
#[command(name = "mortgage_planner", version, about = "Compute and compare multi-period mortgages")]
struct Cli {
    /// Print plot-ready JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the schedule of a single mortgage
    Compute {
        #[command(flatten)]
        terms: TermsArgs,
    },
    /// Combine every mortgage in a CSV file into one schedule
    Combine { path: PathBuf },
    /// Compare every mortgage in a CSV file side by side
    Compare { path: PathBuf },
    /// Sweep the rate of the final period over [min, max)
    Sweep {
        #[command(flatten)]
        terms: TermsArgs,
        #[arg(long, allow_negative_numbers = true)]
        min: f64,
        #[arg(long, allow_negative_numbers = true)]
        max: f64,
        /// Step between rates (defaults to MORTGAGE_SWEEP_STEP or 0.5)
        #[arg(long)]
        step: Option<f64>,
    },
    /// Find the final-period rate at which a candidate costs more than a reference
    Breakeven {
        path: PathBuf,
        /// Label of the reference mortgage in the CSV
        #[arg(long)]
        reference: String,
        /// Label of the candidate mortgage; its last rate is searched for
        #[arg(long)]
        candidate: String,
    },
}

#[derive(clap::Args)]
struct TermsArgs {
    /// Fixed period lengths in months, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    periods: Vec<u32>,
    /// Annual rates in percent, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    rates: Vec<f64>,
    #[arg(long)]
    amount: u64,
    #[arg(long, default_value_t = DEFAULT_DURATION_MONTHS)]
    duration: u32,
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,
}

impl TermsArgs {
    fn into_terms(self) -> MortgageTerms {
        MortgageTerms::new(self.periods, self.rates, self.amount)
            .with_duration(self.duration)
            .with_label(self.label)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner = ScenarioRunner::from_env();

    match cli.command {
        Command::Compute { terms } => {
            let schedule = terms.into_terms().compute()?;
            if cli.json {
                print_json(&ScheduleChart::from_schedule(&schedule))?;
            } else {
                print!("{}", schedule);
            }
        }
        Command::Combine { path } => {
            let schedules = compute_all(&path)?;
            let combined = combine_all(&schedules);
            if cli.json {
                print_json(&ScheduleChart::from_schedule(&combined))?;
            } else {
                for schedule in &schedules {
                    println!("{}", schedule);
                }
                println!("Combined");
                println!("========");
                print!("{}", combined);
            }
        }
        Command::Compare { path } => {
            let mut schedules = compute_all(&path)?;
            let last = schedules.pop().ok_or_else(|| anyhow!("no mortgages in {}", path.display()))?;
            let comparison = compare(&last, &schedules);
            if cli.json {
                print_json(&comparison)?;
            } else {
                for column in &comparison.columns {
                    println!("{}", column.title);
                }
            }
        }
        Command::Sweep { terms, min, max, step } => {
            let terms = terms.into_terms();
            let step = step.unwrap_or(runner.config().sweep_step);
            let report = sweep_report(&terms, min, max, step)?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("{}: increase compared to {}%", terms.label, report.baseline_rate);
                println!("{:>8} {:>16} {:>16}", "Rate", "Burden", "Monthly fee");
                println!("{}", "-".repeat(42));
                for point in &report.points {
                    println!("{:>7.2}% {:>16} {:>16}", point.rate, point.burden_increase, point.payment_increase);
                }
            }
        }
        Command::Breakeven { path, reference, candidate } => {
            let terms = load_terms(&path).with_context(|| format!("loading {}", path.display()))?;
            let find = |label: &str| {
                terms
                    .iter()
                    .find(|t| t.label == label)
                    .ok_or_else(|| anyhow!("no mortgage labelled '{}' in {}", label, path.display()))
            };

            let reference_schedule = find(reference.as_str())?.compute()?;
            if reference_schedule.is_empty() {
                bail!("reference mortgage '{}' is not possible", reference);
            }
            let found = runner.breakeven(&reference_schedule, find(candidate.as_str())?)?;

            if cli.json {
                print_json(&found)?;
            } else {
                println!(
                    "{} costs more than {} from a final rate of {:.2}%",
                    candidate, reference, found.rate
                );
                println!();
                print!("{}", reference_schedule);
                println!();
                print!("{}", found.schedule);
            }
        }
    }

    Ok(())
}

fn compute_all(path: &Path) -> Result<Vec<MortgageSchedule>> {
    let terms = load_terms(path).with_context(|| format!("loading {}", path.display()))?;
    log::info!("computing {} mortgages from {}", terms.len(), path.display());

    terms
        .iter()
        .map(|t| t.compute().with_context(|| format!("computing '{}'", t.label)))
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
