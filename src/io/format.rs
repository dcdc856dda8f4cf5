//! Float formatting for report output.
//!
//! `format_g` follows printf's `%g` (six significant digits), which is what
//! the generated array literal is expected to contain. `format_repr` is the
//! shortest round-trip form used on the diagnostic lines, always showing a
//! decimal point or an exponent so integral values read as floats (`1.0`).

/// printf `%g` with the default precision of 6.
pub fn format_g(x: f64) -> String {
    format_g_prec(x, 6)
}

pub fn format_g_prec(x: f64, precision: usize) -> String {
    if !x.is_finite() {
        return non_finite(x);
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, x);
    let (mantissa, exp) = split_exponent(&sci);
    if exp < -4 || exp >= p as i32 {
        format!("{}e{}", strip_zeros(mantissa), exponent_suffix(exp))
    } else {
        let decimals = (p as i32 - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, x)).to_string()
    }
}

/// Shortest representation that reads back to the same `f64`, positional
/// for exponents in `[-4, 16)` and scientific otherwise.
pub fn format_repr(x: f64) -> String {
    if !x.is_finite() {
        return non_finite(x);
    }
    let sci = format!("{:e}", x);
    let (mantissa, exp) = split_exponent(&sci);
    if !(-4..16).contains(&exp) {
        return format!("{}e{}", mantissa, exponent_suffix(exp));
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let body = if exp < 0 {
        format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}.0", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    };
    format!("{sign}{body}")
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once('e') {
        Some((m, e)) => (m, e.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

fn exponent_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}{:02}", sign, exp.abs())
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn non_finite(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g_matches_printf() {
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(15.0 / 35.0), "0.428571");
        assert_eq!(format_g(20.0 / 35.0), "0.571429");
        assert_eq!(format_g(0.0752058123), "0.0752058");
        assert_eq!(format_g(1.0), "1");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(1234567.0), "1.23457e+06");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(0.00001234), "1.234e-05");
        assert_eq!(format_g(-2.5), "-2.5");
    }

    #[test]
    fn g_rounding_can_bump_exponent() {
        assert_eq!(format_g(999999.5), "1e+06");
        assert_eq!(format_g(0.99999999), "1");
    }

    #[test]
    fn repr_is_shortest_round_trip() {
        assert_eq!(format_repr(0.0), "0.0");
        assert_eq!(format_repr(1.0), "1.0");
        assert_eq!(format_repr(15.0 / 35.0), "0.42857142857142855");
        assert_eq!(format_repr(20.0 / 35.0), "0.5714285714285714");
        assert_eq!(format_repr(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_repr(1234.5), "1234.5");
        assert_eq!(format_repr(0.00012), "0.00012");
        assert_eq!(format_repr(0.00001), "1e-05");
        assert_eq!(format_repr(1e16), "1e+16");
        assert_eq!(format_repr(-0.5), "-0.5");
    }
}
