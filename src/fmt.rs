//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Rocket emoji for launch/start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use depcost::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte cost with an explicit sign
///
/// # Examples
///
/// ```
/// use depcost::fmt::format_cost;
///
/// assert_eq!(format_cost(1536), "+1.50 KB");
/// assert_eq!(format_cost(-300), "-300 B");
/// assert_eq!(format_cost(0), "+0 B");
/// ```
pub fn format_cost(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_bytes(bytes.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_various_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(2_621_440), "2.50 MB");
    }

    #[test]
    fn test_format_cost_keeps_sign() {
        assert_eq!(format_cost(512), "+512 B");
        assert_eq!(format_cost(-1024), "-1.00 KB");
        assert_eq!(format_cost(i64::MIN + 1), format!("-{}", format_bytes((i64::MAX) as u64)));
    }
}
