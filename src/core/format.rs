/// Renders `value` as `$1,234.56`. Negative amounts keep their sign after the
/// dollar symbol (`$-1,234.56`).
pub fn currency(value: f64) -> String {
    format!("${}", with_thousands(value, 2))
}

/// Same as [`currency`] but rounded to whole dollars.
pub fn whole_currency(value: f64) -> String {
    format!("${}", with_thousands(value, 0))
}

fn with_thousands(value: f64, decimals: usize) -> String {
    let raw = format!("{value:.decimals$}");
    if !value.is_finite() {
        return raw;
    }

    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(*digit));
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
