const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count using base-1024 units, rounded to two decimals with
/// trailing zeros trimmed (`1536` becomes `"1.5 KB"`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = ((bytes as f64).log(1024.0).floor() as usize).min(UNITS.len() - 1);
    let mut scaled = bytes as f64 / 1024_f64.powi(exponent as i32);

    // log() can land just below an exact power of 1024.
    if scaled >= 1024.0 && exponent < UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }

    format!("{} {}", trim_decimals(scaled), UNITS[exponent])
}

/// Two decimals, ties away from zero (`1.125` becomes `"1.13"`).
fn trim_decimals(value: f64) -> String {
    let rounded = format!("{:.2}", (value * 100.0).round() / 100.0);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_reported_in_bytes() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn exact_powers_drop_decimals() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn fractional_values_keep_significant_digits() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5_000_000), "4.77 MB");
        assert_eq!(format_file_size(1000), "1000 Bytes");
    }

    #[test]
    fn halfway_values_round_up() {
        assert_eq!(format_file_size(1152), "1.13 KB");
        assert_eq!(format_file_size(2176), "2.13 KB");
    }

    #[test]
    fn values_beyond_terabytes_stay_in_terabytes() {
        let bytes = 2048 * 1024_u64.pow(4);
        assert_eq!(format_file_size(bytes), "2048 TB");
    }
}
