/// Drops values JSON cannot carry (NaN and both infinities).
pub fn sanitize_float(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Parses an integer cell, falling back to 0 for anything unusable.
///
/// Decimal text such as `"2.0"` truncates toward zero, matching how the
/// roster spreadsheet exports whole numbers.
pub fn sanitize_int(value: Option<&str>) -> i64 {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    if let Ok(parsed) = raw.parse::<i64>() {
        return parsed;
    }

    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed.trunc() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_passes_finite_values_through() {
        assert_eq!(sanitize_float(Some(8.5)), Some(8.5));
        assert_eq!(sanitize_float(Some(-0.0)), Some(-0.0));
        assert_eq!(sanitize_float(Some(0.0)), Some(0.0));
        assert_eq!(sanitize_float(None), None);
    }

    #[test]
    fn float_drops_nan_and_infinity() {
        assert_eq!(sanitize_float(Some(f64::NAN)), None);
        assert_eq!(sanitize_float(Some(f64::INFINITY)), None);
        assert_eq!(sanitize_float(Some(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn int_defaults_to_zero() {
        assert_eq!(sanitize_int(None), 0);
        assert_eq!(sanitize_int(Some("")), 0);
        assert_eq!(sanitize_int(Some("  ")), 0);
        assert_eq!(sanitize_int(Some("abc")), 0);
        assert_eq!(sanitize_int(Some("NaN")), 0);
        assert_eq!(sanitize_int(Some("inf")), 0);
    }

    #[test]
    fn int_parses_whole_and_decimal_text() {
        assert_eq!(sanitize_int(Some("3")), 3);
        assert_eq!(sanitize_int(Some(" 4 ")), 4);
        assert_eq!(sanitize_int(Some("2.0")), 2);
        assert_eq!(sanitize_int(Some("2.9")), 2);
        assert_eq!(sanitize_int(Some("-1")), -1);
    }
}
