use crate::drivers::stats::RunningStats;
/// Intensity shown for every value while the statistics have no spread yet.
pub const FLAT_SIGNAL_LEVEL: f64 = 0.5;
/// Display window of mean +/- two standard deviations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainWindow {
    pub low: f64,
    pub high: f64,
}
impl GainWindow {
    pub fn from_stats(stats: &RunningStats) -> Self {
        let mean = stats.mean_value();
        let spread = 2.0 * stats.std_value();
        Self {
            low: mean - spread,
            high: mean + spread,
        }
    }
    /// Map a raw sample into `[0, 1]`, saturating outside the window.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        if !span.is_finite() || span <= 0.0 {
            return FLAT_SIGNAL_LEVEL;
        }
        let scaled = (value - self.low) / span;
        if scaled.is_nan() {
            return FLAT_SIGNAL_LEVEL;
        }
        scaled.clamp(0.0, 1.0)
    }
}
