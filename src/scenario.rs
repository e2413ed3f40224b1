//! Scenario analysis over the unknown rate of the final fixed period
//!
//! Mortgages usually fix the rate for the first period(s) only. These helpers
//! either sweep a range of candidate future rates or search for the future
//! rate at which one mortgage becomes more expensive than another.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;

use crate::amortization::MortgageTerms;
use crate::error::{MortgageError, Result};
use crate::schedule::MortgageSchedule;

/// Step between swept future rates, in percentage points
pub const DEFAULT_SWEEP_STEP: f64 = 0.5;

/// Lowest future rate tried by the breakeven search
pub const DEFAULT_BREAKEVEN_START: f64 = -10.0;

/// Resolution of the breakeven search, in percentage points
pub const DEFAULT_BREAKEVEN_STEP: f64 = 0.01;

/// Highest future rate tried by the breakeven search
pub const DEFAULT_BREAKEVEN_MAX: f64 = 100.0;

/// Settings for sweeps and breakeven searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub sweep_step: f64,
    pub breakeven_start: f64,
    pub breakeven_step: f64,
    pub breakeven_max: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sweep_step: DEFAULT_SWEEP_STEP,
            breakeven_start: DEFAULT_BREAKEVEN_START,
            breakeven_step: DEFAULT_BREAKEVEN_STEP,
            breakeven_max: DEFAULT_BREAKEVEN_MAX,
        }
    }
}

impl ScenarioConfig {
    /// Defaults overridden by `MORTGAGE_SWEEP_STEP`, `MORTGAGE_BREAKEVEN_START`,
    /// `MORTGAGE_BREAKEVEN_STEP` and `MORTGAGE_BREAKEVEN_MAX` when set
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sweep_step: env_f64("MORTGAGE_SWEEP_STEP").unwrap_or(defaults.sweep_step),
            breakeven_start: env_f64("MORTGAGE_BREAKEVEN_START").unwrap_or(defaults.breakeven_start),
            breakeven_step: env_f64("MORTGAGE_BREAKEVEN_STEP").unwrap_or(defaults.breakeven_step),
            breakeven_max: env_f64("MORTGAGE_BREAKEVEN_MAX").unwrap_or(defaults.breakeven_max),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn check_step(step: f64) -> Result<()> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(MortgageError::InvalidStep(step))
    }
}

/// Candidate rates in `[rate_min, rate_max)` spaced by `step`
pub fn sweep_rates(rate_min: f64, rate_max: f64, step: f64) -> Result<Vec<f64>> {
    check_step(step)?;
    for bound in [rate_min, rate_max] {
        if !bound.is_finite() {
            return Err(MortgageError::NonFiniteRate(bound));
        }
    }

    let count = ((rate_max - rate_min) / step).ceil().max(0.0) as usize;
    Ok((0..count).map(|k| rate_min + k as f64 * step).collect())
}

/// Compute one schedule per candidate future rate
///
/// `base` holds every rate except the last period's; each candidate rate is
/// appended as the final rate. Schedules come back in rate order.
pub fn sweep(base: &MortgageTerms, rate_min: f64, rate_max: f64, step: f64) -> Result<Vec<MortgageSchedule>> {
    let rates = sweep_rates(rate_min, rate_max, step)?;
    log::debug!("sweeping {} future rates for {}", rates.len(), base.label);

    rates
        .par_iter()
        .map(|&rate| base.with_future_rate(rate)?.compute())
        .collect()
}

/// Future rate at which a candidate mortgage first costs more than a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakeven {
    /// First searched rate whose burden strictly exceeds the reference burden
    pub rate: f64,

    /// Candidate schedule at that rate
    pub schedule: MortgageSchedule,
}

/// Search the final-period rate at which `candidate` becomes more expensive than `reference`
///
/// Candidate rates lie on the grid `start + k * step`. The candidate is
/// computed with the reference's amount and duration; its own amount and
/// duration are ignored. The result is the first grid rate whose burden
/// strictly exceeds the reference burden. Burden never decreases as the rate
/// grows, so the grid is bracketed by doubling and then bisected.
pub fn find_breakeven_rate(
    reference: &MortgageSchedule,
    candidate: &MortgageTerms,
    config: &ScenarioConfig,
) -> Result<Breakeven> {
    check_step(config.breakeven_step)?;

    let mut terms = candidate.clone();
    terms.amount = reference.total_amount();
    terms.duration = reference.duration();

    let target = reference.total_burden();
    let rate_at = |k: u64| config.breakeven_start + k as f64 * config.breakeven_step;
    let schedule_at = |k: u64| terms.with_future_rate(rate_at(k))?.compute();

    let first = schedule_at(0)?;
    if first.is_empty() {
        return Err(MortgageError::Infeasible {
            periods_total: terms.periods_total(),
            duration: terms.duration,
        });
    }
    if first.total_burden() > target {
        return Ok(Breakeven { rate: rate_at(0), schedule: first });
    }

    let max_k = ((config.breakeven_max - config.breakeven_start) / config.breakeven_step)
        .floor()
        .max(0.0) as u64;

    // Bracket: burden at `low` does not exceed the target, at `high` it does
    let mut low = 0u64;
    let mut high = 1u64;
    let mut high_schedule = loop {
        if high >= max_k {
            high = max_k;
            let schedule = schedule_at(high)?;
            if schedule.total_burden() > target {
                break schedule;
            }
            return Err(MortgageError::NoBreakeven { upper: config.breakeven_max });
        }
        let schedule = schedule_at(high)?;
        if schedule.total_burden() > target {
            break schedule;
        }
        low = high;
        high *= 2;
    };

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let schedule = schedule_at(mid)?;
        if schedule.total_burden() > target {
            high = mid;
            high_schedule = schedule;
        } else {
            low = mid;
        }
    }

    log::debug!(
        "breakeven for {} against {}: {:.2}%",
        candidate.label,
        reference.label(),
        rate_at(high)
    );

    Ok(Breakeven {
        rate: rate_at(high),
        schedule: high_schedule,
    })
}

/// Runs sweeps and breakeven searches with one shared configuration
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ScenarioConfig,
}

impl ScenarioRunner {
    /// Runner with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner configured from the environment
    pub fn from_env() -> Self {
        Self::with_config(ScenarioConfig::from_env())
    }

    pub fn with_config(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Sweep `[rate_min, rate_max)` with the configured step
    pub fn sweep(&self, base: &MortgageTerms, rate_min: f64, rate_max: f64) -> Result<Vec<MortgageSchedule>> {
        sweep(base, rate_min, rate_max, self.config.sweep_step)
    }

    pub fn breakeven(&self, reference: &MortgageSchedule, candidate: &MortgageTerms) -> Result<Breakeven> {
        find_breakeven_rate(reference, candidate, &self.config)
    }

    /// Breakeven of every candidate against the same reference
    pub fn breakeven_batch(&self, reference: &MortgageSchedule, candidates: &[MortgageTerms]) -> Vec<Result<Breakeven>> {
        candidates
            .iter()
            .map(|candidate| self.breakeven(reference, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> MortgageSchedule {
        MortgageTerms::new(vec![120, 240], vec![2.0, 3.0], 300_000)
            .with_label("Ten years fixed")
            .compute()
            .unwrap()
    }

    #[test]
    fn test_sweep_rates_half_open() {
        let rates = sweep_rates(1.0, 3.0, 0.5).unwrap();
        assert_eq!(rates, vec![1.0, 1.5, 2.0, 2.5]);
        assert!(sweep_rates(3.0, 1.0, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_sweep_rejects_bad_step() {
        assert!(matches!(sweep_rates(1.0, 3.0, 0.0), Err(MortgageError::InvalidStep(_))));
        assert!(matches!(sweep_rates(1.0, 3.0, -0.5), Err(MortgageError::InvalidStep(_))));
    }

    #[test]
    fn test_sweep_rejects_extra_rates() {
        let base = MortgageTerms::new(vec![120, 240], vec![2.0, 3.0, 4.0], 300_000);
        let err = sweep(&base, 1.0, 3.0, 0.5).unwrap_err();
        assert!(matches!(err, MortgageError::RateCountMismatch { periods: 2, rates: 3 }));
    }

    #[test]
    fn test_sweep_count_and_order() {
        let base = MortgageTerms::new(vec![120, 240], vec![2.0], 300_000).with_label("Sweep");
        let schedules = sweep(&base, 1.0, 3.0, 0.5).unwrap();

        assert_eq!(schedules.len(), 4);
        for (schedule, rate) in schedules.iter().zip([1.0, 1.5, 2.0, 2.5]) {
            let expected = base.with_future_rate(rate).unwrap().compute().unwrap();
            assert_eq!(schedule, &expected);
            assert_eq!(schedule.label(), "Sweep");
        }
        for pair in schedules.windows(2) {
            assert!(pair[1].total_burden() > pair[0].total_burden());
            assert!(pair[1].last_payment() > pair[0].last_payment());
        }
        // The first period is fixed, so its payment does not move
        assert!(schedules.iter().all(|s| s.segments()[0] == schedules[0].segments()[0]));
    }

    #[test]
    fn test_breakeven_boundary_is_tight() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![60, 300], vec![1.5], 0).with_label("Five years fixed");
        let config = ScenarioConfig::default();

        let found = find_breakeven_rate(&reference, &candidate, &config).unwrap();
        assert!(found.schedule.total_burden() > reference.total_burden());
        assert_eq!(found.schedule.total_amount(), reference.total_amount());
        assert_eq!(found.schedule.duration(), reference.duration());

        let just_below = candidate
            .clone()
            .with_duration(360)
            .with_future_rate(found.rate - config.breakeven_step)
            .unwrap();
        let below = MortgageTerms { amount: 300_000, ..just_below }.compute().unwrap();
        assert!(below.total_burden() <= reference.total_burden());
    }

    #[test]
    fn test_breakeven_of_identical_terms_is_reference_rate() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![120, 240], vec![2.0], 300_000);

        let found = find_breakeven_rate(&reference, &candidate, &ScenarioConfig::default()).unwrap();
        assert_relative_eq!(found.rate, 3.0, epsilon = 0.02);
    }

    #[test]
    fn test_breakeven_matches_linear_scan() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![60, 300], vec![1.2], 300_000);
        let config = ScenarioConfig {
            breakeven_start: 2.0,
            breakeven_step: 0.05,
            breakeven_max: 6.0,
            ..Default::default()
        };

        let found = find_breakeven_rate(&reference, &candidate, &config).unwrap();

        let mut k = 0u64;
        let linear = loop {
            let rate = config.breakeven_start + k as f64 * config.breakeven_step;
            let schedule = candidate.with_future_rate(rate).unwrap().compute().unwrap();
            if schedule.total_burden() > reference.total_burden() {
                break rate;
            }
            k += 1;
        };
        assert_eq!(found.rate, linear);
    }

    #[test]
    fn test_breakeven_below_start() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![120, 240], vec![15.0], 300_000);
        let config = ScenarioConfig::default();

        let found = find_breakeven_rate(&reference, &candidate, &config).unwrap();
        assert_eq!(found.rate, config.breakeven_start);
    }

    #[test]
    fn test_breakeven_not_reached() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![120, 240], vec![0.5], 300_000);
        let config = ScenarioConfig {
            breakeven_max: 1.0,
            ..Default::default()
        };

        let err = find_breakeven_rate(&reference, &candidate, &config).unwrap_err();
        assert!(matches!(err, MortgageError::NoBreakeven { .. }));
    }

    #[test]
    fn test_breakeven_infeasible_candidate() {
        let reference = reference();
        let candidate = MortgageTerms::new(vec![120, 120], vec![2.0], 300_000);

        let err = find_breakeven_rate(&reference, &candidate, &ScenarioConfig::default()).unwrap_err();
        assert!(matches!(err, MortgageError::Infeasible { periods_total: 240, duration: 360 }));
    }

    #[test]
    fn test_runner_uses_config_step() {
        let runner = ScenarioRunner::with_config(ScenarioConfig {
            sweep_step: 1.0,
            ..Default::default()
        });
        let base = MortgageTerms::new(vec![360], vec![], 100_000);

        let schedules = runner.sweep(&base, 1.0, 4.0).unwrap();
        assert_eq!(schedules.len(), 3);
        assert_eq!(runner.config().breakeven_step, DEFAULT_BREAKEVEN_STEP);
    }

    #[test]
    fn test_runner_breakeven_batch() {
        let runner = ScenarioRunner::new();
        let reference = reference();
        let candidates = vec![
            MortgageTerms::new(vec![60, 300], vec![1.5], 300_000),
            MortgageTerms::new(vec![120, 120], vec![1.5], 300_000),
        ];

        let results = runner.breakeven_batch(&reference, &candidates);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
