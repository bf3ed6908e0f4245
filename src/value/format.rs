//! Host-language rendering of floating point numbers
//!
//! String concatenation must produce the same text the analyzed program
//! would: `1.0` rather than `1`, `1.0E10` rather than `10000000000`.

/// Renders a double-precision value the way `Double.toString` does
pub fn double_to_string(value: f64) -> String {
    render(value, || format!("{}", value), || format!("{:e}", value))
}

/// Renders a single-precision value the way `Float.toString` does
pub fn float_to_string(value: f32) -> String {
    render(
        f64::from(value),
        || format!("{}", value),
        || format!("{:e}", value),
    )
}

fn render(
    value: f64,
    plain: impl FnOnce() -> String,
    scientific: impl FnOnce() -> String,
) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        let mut text = plain();
        if !text.contains('.') {
            text.push_str(".0");
        }
        text
    } else {
        let text = scientific();
        let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
        if mantissa.contains('.') {
            format!("{}E{}", mantissa, exponent)
        } else {
            format!("{}.0E{}", mantissa, exponent)
        }
    }
}
