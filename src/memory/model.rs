//! Recall Model - Beta prior over a power-law forgetting curve
//!
//! Recall after elapsed time t is modeled as p^(t / t0), p ~ Beta(alpha, beta).
//! Prediction returns the prior expectation of that quantity; updates apply a
//! conjugate-style posterior fit from a fractional grade.
//!
//! Parameters:
//! - DEFAULT_SHAPE = 3.0 (alpha = beta, so recall at t0 is exactly 0.5)
//! - REBALANCE_RATIO = 2.0 (refit at the new half-life when shapes drift apart)
//! - MIN_POWER = 1e-6 (elapsed floor, in units of t0)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::{
    log_expected_power, mean_var_to_beta, signed_log_sum_exp, solve_power_for_recall,
};

const DEFAULT_SHAPE: f64 = 3.0;
const REBALANCE_RATIO: f64 = 2.0;
const MIN_POWER: f64 = 1e-6;
const MAX_HALF_LIFE_SECS: f64 = 100.0 * 365.0 * 24.0 * 3600.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecallError {
    #[error("invalid observation: {success} successes out of {total}")]
    InvalidObservation { success: f64, total: f64 },
    #[error("posterior is degenerate for the given observation")]
    DegenerateModel,
}

/// Strength descriptor: Beta shape parameters plus the time scale `t0` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryModel {
    pub alpha: f64,
    pub beta: f64,
    pub t0: f64,
}

impl MemoryModel {
    pub fn is_valid(&self) -> bool {
        [self.alpha, self.beta, self.t0]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Per (user, word) review state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub model: MemoryModel,
    pub last_reviewed_at: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(model: MemoryModel, last_reviewed_at: DateTime<Utc>) -> Self {
        Self {
            model,
            last_reviewed_at,
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_reviewed_at)
    }

    pub fn predict_recall(&self, now: DateTime<Utc>, exact: bool) -> f64 {
        predict_recall(&self.model, self.elapsed(now), exact)
    }

    /// Applies a graded review at `now`, producing the replacement record.
    pub fn reviewed(&self, success: f64, total: f64, now: DateTime<Utc>) -> Result<Self, RecallError> {
        let model = update(&self.model, success, total, self.elapsed(now))?;
        Ok(Self::new(model, now))
    }
}

pub fn default_model(half_life: Duration) -> MemoryModel {
    MemoryModel {
        alpha: DEFAULT_SHAPE,
        beta: DEFAULT_SHAPE,
        t0: duration_secs(half_life).max(1.0),
    }
}

/// Expected recall probability after `elapsed`.
///
/// `exact = false` uses the prior mean raised to the elapsed power, a cheap
/// stand-in for sampling weights. Both forms decrease strictly with elapsed
/// time and stay within `(0, 1]`.
pub fn predict_recall(model: &MemoryModel, elapsed: Duration, exact: bool) -> f64 {
    let delta = duration_secs(elapsed) / model.t0;
    let recall = if exact {
        log_expected_power(model.alpha, model.beta, delta).exp()
    } else {
        (model.alpha / (model.alpha + model.beta)).powf(delta)
    };
    recall.clamp(f64::MIN_POSITIVE, 1.0)
}

/// Elapsed time at which the exact predicted recall is 0.5.
pub fn half_life(model: &MemoryModel) -> Duration {
    let millis = (half_life_secs(model) * 1000.0).round() as i64;
    Duration::milliseconds(millis)
}

pub fn update(
    model: &MemoryModel,
    success: f64,
    total: f64,
    elapsed: Duration,
) -> Result<MemoryModel, RecallError> {
    let valid = success.is_finite() && total.is_finite() && total > 0.0;
    if !valid || success < 0.0 || success > total {
        return Err(RecallError::InvalidObservation { success, total });
    }

    let result = success / total;
    let tnow = duration_secs(elapsed);
    let proposed = update_at(model, result, tnow, model.t0)?;

    let unbalanced = proposed.alpha > REBALANCE_RATIO * proposed.beta
        || proposed.beta > REBALANCE_RATIO * proposed.alpha;
    if unbalanced {
        return update_at(model, result, tnow, half_life_secs(&proposed));
    }

    Ok(proposed)
}

/// Posterior fit of the recall probability at `tback`, given a noisy-binary
/// observation `result` at `tnow`.
fn update_at(
    model: &MemoryModel,
    result: f64,
    tnow: f64,
    tback: f64,
) -> Result<MemoryModel, RecallError> {
    let MemoryModel { alpha, beta, t0 } = *model;
    let passed = result > 0.5;
    let q1 = if passed { result } else { 1.0 - result };
    let q0 = 1.0 - q1;
    let (c, d) = if passed { (q1 - q0, q0) } else { (q0 - q1, 1.0 - q0) };

    let power = (tnow / t0).max(MIN_POWER);
    let step = tback / t0;
    let ln_b = |a: f64| statrs::function::beta::ln_beta(a, beta);

    let log_den = signed_log_sum_exp(&[(c, ln_b(alpha + power)), (d, ln_b(alpha))])
        .ok_or(RecallError::DegenerateModel)?;

    let moment = |n: f64| -> Result<f64, RecallError> {
        let shift = n * step;
        signed_log_sum_exp(&[(c, ln_b(alpha + power + shift)), (d, ln_b(alpha + shift))])
            .map(|log_num| (log_num - log_den).exp())
            .ok_or(RecallError::DegenerateModel)
    };

    let mean = moment(1.0)?;
    let second = moment(2.0)?;
    let (alpha, beta) = mean_var_to_beta(mean, second - mean * mean);

    let fitted = MemoryModel {
        alpha,
        beta,
        t0: tback.clamp(1.0, MAX_HALF_LIFE_SECS),
    };
    if fitted.is_valid() {
        Ok(fitted)
    } else {
        Err(RecallError::DegenerateModel)
    }
}

fn half_life_secs(model: &MemoryModel) -> f64 {
    let delta = solve_power_for_recall(model.alpha, model.beta, 0.5);
    (delta * model.t0).clamp(1.0, MAX_HALF_LIFE_SECS)
}

fn duration_secs(duration: Duration) -> f64 {
    (duration.num_milliseconds() as f64 / 1000.0).max(0.0)
}
