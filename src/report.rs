//! Plot-ready data for rendering schedules and sweeps
//!
//! Rendering happens outside this crate. These structures carry exactly the
//! numbers a bar chart needs and serialize to JSON for an external plotter.

use serde::{Deserialize, Serialize};

use crate::amortization::MortgageTerms;
use crate::error::Result;
use crate::scenario::{sweep, sweep_rates};
use crate::schedule::{with_thousands, MortgageSchedule};

/// One labelled bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub tick: String,
    pub value: u64,
}

/// Bars for a single schedule
///
/// The top chart shows the monthly payment of each segment, ticked with the
/// segment length. The bottom chart sets the amount against the total burden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleChart {
    pub title: String,
    pub payments: Vec<Bar>,
    pub amount_vs_burden: [Bar; 2],
}

impl ScheduleChart {
    pub fn from_schedule(schedule: &MortgageSchedule) -> Self {
        Self {
            title: format!("Subsequent monthly fees\nover the specified periods\n\n{}", schedule),
            payments: schedule
                .segments()
                .iter()
                .map(|s| Bar {
                    tick: s.months.to_string(),
                    value: s.payment,
                })
                .collect(),
            amount_vs_burden: [
                Bar {
                    tick: format!("Mortgage\n{}", with_thousands(schedule.total_amount())),
                    value: schedule.total_amount(),
                },
                Bar {
                    tick: format!("Total burden\n{}", with_thousands(schedule.total_burden())),
                    value: schedule.total_burden(),
                },
            ],
        }
    }

    /// Highest payment bar
    pub fn max_payment(&self) -> u64 {
        self.payments.iter().map(|b| b.value).max().unwrap_or(0)
    }

    /// Highest amount/burden bar
    pub fn max_amount(&self) -> u64 {
        self.amount_vs_burden.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

/// Several schedules side by side, one column each, rows sharing a y-axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub columns: Vec<ScheduleChart>,

    /// Shared upper bound of the payment row
    pub payment_axis_max: u64,

    /// Shared upper bound of the amount/burden row
    pub amount_axis_max: u64,
}

/// Chart columns for `others` followed by `schedule`
pub fn compare(schedule: &MortgageSchedule, others: &[MortgageSchedule]) -> Comparison {
    let columns: Vec<ScheduleChart> = others
        .iter()
        .chain(std::iter::once(schedule))
        .map(ScheduleChart::from_schedule)
        .collect();

    Comparison {
        payment_axis_max: columns.iter().map(ScheduleChart::max_payment).max().unwrap_or(0),
        amount_axis_max: columns.iter().map(ScheduleChart::max_amount).max().unwrap_or(0),
        columns,
    }
}

/// Cost increase at one swept future rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub rate: f64,

    /// Burden minus the burden at the lowest swept rate
    pub burden_increase: i64,

    /// Last-period monthly payment minus the one at the lowest swept rate
    pub payment_increase: i64,
}

/// How burden and final monthly payment grow with the future rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub label: String,
    pub baseline_rate: f64,
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Pair swept rates with their schedules, relative to the first one
    pub fn from_sweep(rates: &[f64], schedules: &[MortgageSchedule]) -> Self {
        let baseline = schedules.first();
        let base_burden = baseline.map(|s| s.total_burden() as i64).unwrap_or(0);
        let base_payment = baseline.and_then(|s| s.last_payment()).unwrap_or(0) as i64;

        Self {
            label: baseline.map(|s| s.label().to_string()).unwrap_or_default(),
            baseline_rate: rates.first().copied().unwrap_or(0.0),
            points: rates
                .iter()
                .zip(schedules)
                .map(|(&rate, schedule)| SweepPoint {
                    rate,
                    burden_increase: schedule.total_burden() as i64 - base_burden,
                    payment_increase: schedule.last_payment().unwrap_or(0) as i64 - base_payment,
                })
                .collect(),
        }
    }

    /// Largest burden increase in the sweep
    pub fn max_burden_increase(&self) -> i64 {
        self.points.iter().map(|p| p.burden_increase).max().unwrap_or(0)
    }
}

/// Sweep `[rate_min, rate_max)` and summarise the increases
pub fn sweep_report(base: &MortgageTerms, rate_min: f64, rate_max: f64, step: f64) -> Result<SweepReport> {
    let rates = sweep_rates(rate_min, rate_max, step)?;
    let schedules = sweep(base, rate_min, rate_max, step)?;
    Ok(SweepReport::from_sweep(&rates, &schedules))
}
