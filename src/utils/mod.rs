//! Utils Module
pub mod lenient;
pub mod telemetry;

pub use telemetry::init_logging;

/// Round to the given number of decimal places, halves towards positive
/// infinity. Never returns `-0.0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor + 0.5).floor() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
