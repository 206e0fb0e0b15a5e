use super::types::ScenarioGrid;

pub const DEFAULT_RATE_START: f64 = 3.0;
pub const DEFAULT_RATE_END: f64 = 8.0;
pub const DEFAULT_RATE_STEP: f64 = 0.5;

pub const DEFAULT_LTV_START: f64 = 60.0;
pub const DEFAULT_LTV_END: f64 = 85.0;
pub const DEFAULT_LTV_STEP: f64 = 5.0;

const STEP_EPSILON: f64 = 1e-9;

pub fn default_grid() -> ScenarioGrid {
    ScenarioGrid {
        interest_rates: inclusive_steps(DEFAULT_RATE_START, DEFAULT_RATE_END, DEFAULT_RATE_STEP),
        loan_to_value_ratios: inclusive_steps(
            DEFAULT_LTV_START,
            DEFAULT_LTV_END,
            DEFAULT_LTV_STEP,
        ),
    }
}

/// `start, start + step, ..., end` with the end included. Values are built
/// from the index rather than by repeated addition so rounding never pushes the
/// last value past `end`.
pub fn inclusive_steps(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || !start.is_finite() || !end.is_finite() || end < start {
        return Vec::new();
    }
    let count = ((end - start) / step + STEP_EPSILON).floor() as usize + 1;
    (0..count).map(|i| start + i as f64 * step).collect()
}
