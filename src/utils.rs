pub const APP_NAME: &str = "watch-progress";

/// File name of the durable progress store inside the app config directory
pub const STORE_FILE_NAME: &str = "progress.json";

/// File name of the settings file inside the app config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Round a value to a fixed number of decimal places
///
/// Mirrors the two-decimal rounding clients expect for `progress_percentage`.
///
/// # Arguments
/// * `value` - The value to round
/// * `places` - Number of digits kept after the decimal point
///
/// # Returns
/// * `f64` - The rounded value, or `0.0` when the input is not finite
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places.min(12) as i32);
    (value * factor).round() / factor
}

/// Floor a playback position to whole seconds, treating negatives as zero.
pub fn whole_seconds(position: f64) -> f64 {
    position.max(0.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_to(33.333_333, 2), 33.33);
        assert_eq!(round_to(66.666_666, 2), 66.67);
        assert_eq!(round_to(50.0, 2), 50.0);
    }

    #[test]
    fn round_to_non_finite_is_zero() {
        assert_eq!(round_to(f64::NAN, 2), 0.0);
        assert_eq!(round_to(f64::INFINITY, 2), 0.0);
    }

    #[test]
    fn whole_seconds_floors_and_clamps() {
        assert_eq!(whole_seconds(12.9), 12.0);
        assert_eq!(whole_seconds(-3.2), 0.0);
    }
}
