use itertools::Itertools;
use itertools::MinMaxResult;

/// Compute X (session number) and Y (WPM) upper bounds for the history
/// progress chart.
pub fn compute_chart_params(wpm_series: &[(f64, f64)]) -> (f64, f64) {
    let highest_wpm = match wpm_series.iter().map(|&(_, wpm)| wpm).minmax() {
        MinMaxResult::NoElements => 0.0,
        MinMaxResult::OneElement(only) => only,
        MinMaxResult::MinMax(_, max) => max,
    };

    let sessions = wpm_series.len().max(1) as f64;

    (sessions, highest_wpm.round().max(1.0))
}

/// Format a simple numeric label consistently.
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
