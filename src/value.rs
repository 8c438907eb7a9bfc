//! Engineering-notation values (`4.7k`, `100nF`, `10mA`).

use crate::error::ValueError;

/// Significant digits kept in emitted values
pub const SIGNIFICANT_DIGITS: usize = 5;

fn multiplier(suffix: char) -> f64 {
    match suffix {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' => 1e-6,
        'm' => 1e-3,
        'k' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    }
}

/// Parse a value with an optional SI suffix and unit letter into base units,
/// rounded to [`SIGNIFICANT_DIGITS`].
pub fn parse_value(input: &str) -> Result<f64, ValueError> {
    let mut text = input.trim();
    let chars: Vec<char> = text.chars().collect();

    // Trailing unit name after a suffix or digit, e.g. `mH`, `5V`
    if chars.len() > 2 && chars[chars.len() - 2].is_alphabetic() {
        let last = chars[chars.len() - 1];
        text = &text[..text.len() - last.len_utf8()];
    }

    let last = text.chars().last().ok_or(ValueError::Empty)?;
    let value = if last.is_numeric() {
        mantissa(text, input)?
    } else {
        mantissa(&text[..text.len() - last.len_utf8()], input)? * multiplier(last)
    };

    round_significant(value, SIGNIFICANT_DIGITS).map_err(|err| match err {
        ValueError::Zero(_) => ValueError::Zero(input.to_owned()),
        ValueError::NonFinite(_) => ValueError::NonFinite(input.to_owned()),
        err => err,
    })
}

fn mantissa(text: &str, input: &str) -> Result<f64, ValueError> {
    text.parse::<f64>()
        .map_err(|_| ValueError::InvalidMantissa(input.to_owned()))
}

/// Round to `digits` significant figures. Zero has no magnitude to round
/// against and is rejected.
pub fn round_significant(value: f64, digits: usize) -> Result<f64, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::NonFinite(value.to_string()));
    }
    if value == 0.0 {
        return Err(ValueError::Zero(value.to_string()));
    }
    let digits = digits.max(1);
    let rounded = format!("{:.*e}", digits - 1, value);
    let parsed = rounded
        .parse::<f64>()
        .map_err(|_| ValueError::InvalidMantissa(rounded.clone()))?;
    // Rounding up near the end of the range can overflow
    if !parsed.is_finite() {
        return Err(ValueError::NonFinite(rounded));
    }
    Ok(parsed)
}
