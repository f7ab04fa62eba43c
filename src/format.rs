//! Console rendering of readings.

use crate::reading::StructuredReading;

/// Format an integer with `,` between groups of three digits.
///
/// Locale-independent, so the output is the same on every host.
///
/// ```rust
/// use espdro_client::format::group_thousands;
///
/// assert_eq!(group_thousands(1234567), "1,234,567");
/// assert_eq!(group_thousands(-1000), "-1,000");
/// ```
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Render the console line for a sample, without the trailing newline.
pub fn format_line(reading: &StructuredReading) -> String {
    format!("  x={} time={}", group_thousands(reading.axis0), reading.ts)
}

/// Diagnostic echo prefix.
pub const DIAGNOSTIC_PREFIX: &str = "EspDRO: ";

/// Render the diagnostic echo of a raw message.
pub fn format_diagnostic(raw: &str) -> String {
    format!("{DIAGNOSTIC_PREFIX}{raw}")
}
