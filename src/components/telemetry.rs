//! Per-element telemetry shown by the editor.
//!
//! Every solved tick feeds the branch voltage and freshly computed branch
//! current through [`Telemetry::record`]. The displayed current is an
//! exponential moving average, peaks decay slowly, and RMS values come from
//! an exponentially weighted mean square:
//!
//! ```text
//! current = current * (1 - alpha) + i_new * alpha
//! peak    = max(|x|, peak * decay)
//! sum_sq  = sum_sq * (1 - beta) + x^2 * beta,   rms = sqrt(sum_sq)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Filter coefficients applied when recording a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFilter {
    /// Weight of the new current sample (alpha)
    pub smoothing: f64,
    /// Per-tick multiplier applied to the held peak
    pub peak_decay: f64,
    /// Weight of the new squared sample in the mean square (beta)
    pub rms_weight: f64,
}

/// Live readings for one component or wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Telemetry {
    /// Branch voltage V(port 0) - V(port 1)
    pub voltage: f64,
    /// Smoothed branch current
    pub current: f64,
    /// |voltage| * |current|
    pub power: f64,
    pub peak_voltage: f64,
    pub peak_current: f64,
    pub rms_voltage: f64,
    pub rms_current: f64,
    /// Exponential mean of voltage squared
    pub mean_sq_voltage: f64,
    /// Exponential mean of current squared
    pub mean_sq_current: f64,
}

impl Telemetry {
    /// Fold one solved tick into the readings.
    pub fn record(&mut self, voltage: f64, new_current: f64, filter: &TelemetryFilter) {
        let alpha = filter.smoothing;
        self.voltage = voltage;
        self.current = self.current * (1.0 - alpha) + new_current * alpha;
        self.power = self.voltage.abs() * self.current.abs();

        self.peak_voltage = self.voltage.abs().max(self.peak_voltage * filter.peak_decay);
        self.peak_current = self.current.abs().max(self.peak_current * filter.peak_decay);

        let beta = filter.rms_weight;
        self.mean_sq_voltage = self.mean_sq_voltage * (1.0 - beta) + self.voltage * self.voltage * beta;
        self.mean_sq_current = self.mean_sq_current * (1.0 - beta) + self.current * self.current * beta;
        self.rms_voltage = self.mean_sq_voltage.sqrt();
        self.rms_current = self.mean_sq_current.sqrt();
    }

    /// Zero every reading and accumulator.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
