//! Number formatting for reports.

/// `1234567.891` -> `1,234,567.89`
pub fn thousands(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    // -0.00 prints as 0.00
    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

pub fn money(v: f64, currency: &str) -> String {
    if currency.is_empty() {
        thousands(v)
    } else {
        format!("{currency} {}", thousands(v))
    }
}

pub fn percent(v: f64) -> String {
    format!("{v:.2}%")
}

pub fn years(n: Option<u32>) -> String {
    match n {
        Some(1) => "1 year".to_string(),
        Some(n) => format!("{n} years"),
        None => "never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(999.999), "1,000.00");
        assert_eq!(thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(thousands(100_000.0), "100,000.00");
        assert_eq!(thousands(-4_004.99), "-4,004.99");
        assert_eq!(thousands(-0.001), "0.00");
    }

    #[test]
    fn money_and_percent() {
        assert_eq!(money(580.0, "AED"), "AED 580.00");
        assert_eq!(money(580.0, ""), "580.00");
        assert_eq!(percent(80.0), "80.00%");
    }

    #[test]
    fn break_even_wording() {
        assert_eq!(years(Some(1)), "1 year");
        assert_eq!(years(Some(15)), "15 years");
        assert_eq!(years(None), "never");
    }
}
