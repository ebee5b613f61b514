/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let grouped = grouped(val.abs());
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Two-decimal figure with thousands separators and no currency sign: 1,234.56
pub fn grouped(val: f64) -> String {
    let fixed = format!("{:.2}", val);
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    format!("{sign}{with_commas}.{dec_part}")
}

pub fn pct(val: f64) -> String {
    format!("{:.2}%", val)
}
