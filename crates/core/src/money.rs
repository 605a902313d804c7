//! Indonesian Rupiah formatting
//!
//! Output matches the `id-ID` currency style: `Rp`, a no-break space, `.`
//! as the thousands separator and `,` before the decimals.

/// No-break space between symbol and amount
const NBSP: char = '\u{a0}';

/// Format `value` as rupiah, e.g. `Rp 25.000,00`
///
/// Non-finite values format as zero. Rounding is half away from zero.
#[must_use]
pub fn format_idr(value: f64, with_decimals: bool) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = if with_decimals { 100.0 } else { 1.0 };

    // Saturating float-to-int cast keeps absurd prices from panicking
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (value.abs() * scale).round() as u128;

    let (whole, cents) = if with_decimals {
        (scaled / 100, Some(scaled % 100))
    } else {
        (scaled, None)
    };

    let sign = if value < 0.0 && scaled != 0 { "-" } else { "" };
    let mut out = format!("{sign}Rp{NBSP}{}", group_thousands(whole));
    if let Some(cents) = cents {
        out.push_str(&format!(",{cents:02}"));
    }
    out
}

/// Insert `.` every three digits from the right
fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
