use statrs::function::beta::ln_beta;

const MAX_BRACKET_STEPS: usize = 200;
const BISECTION_STEPS: usize = 100;

/// ln B(a + delta, b) - ln B(a, b): log of the expected recall after `delta` half-lives of scale.
pub(crate) fn log_expected_power(alpha: f64, beta: f64, delta: f64) -> f64 {
    ln_beta(alpha + delta, beta) - ln_beta(alpha, beta)
}

/// Computes `ln(sum coef_i * exp(log_i))` where coefficients may be negative.
///
/// Zero coefficients are skipped. Returns `None` when the sum is not strictly
/// positive or the result is not finite.
pub(crate) fn signed_log_sum_exp(terms: &[(f64, f64)]) -> Option<f64> {
    let max = terms
        .iter()
        .filter(|(coef, _)| *coef != 0.0)
        .map(|(_, log)| *log)
        .fold(f64::NEG_INFINITY, f64::max);

    if !max.is_finite() {
        return None;
    }

    let sum: f64 = terms
        .iter()
        .filter(|(coef, _)| *coef != 0.0)
        .map(|(coef, log)| coef * (log - max).exp())
        .sum();

    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }

    let result = max + sum.ln();
    result.is_finite().then_some(result)
}

/// Finds `delta >= 0` with `log_expected_power(alpha, beta, delta) == ln(target)`.
pub(crate) fn solve_power_for_recall(alpha: f64, beta: f64, target: f64) -> f64 {
    let log_target = target.clamp(1e-12, 1.0 - 1e-12).ln();
    let f = |delta: f64| log_expected_power(alpha, beta, delta) - log_target;

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..MAX_BRACKET_STEPS {
        if f(hi) <= 0.0 {
            break;
        }
        lo = hi;
        hi *= 2.0;
    }

    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if f(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    0.5 * (lo + hi)
}

/// Moment-matches a mean and variance back onto Beta shape parameters.
///
/// Both inputs are clamped into the feasible region so the result is always a
/// proper Beta distribution.
pub(crate) fn mean_var_to_beta(mean: f64, var: f64) -> (f64, f64) {
    let mean = mean.clamp(1e-9, 1.0 - 1e-9);
    let max_var = mean * (1.0 - mean);
    let var = var.clamp(max_var * 1e-12, max_var * (1.0 - 1e-9));
    let common = max_var / var - 1.0;
    (mean * common, (1.0 - mean) * common)
}
