//! Cents-to-decimal rendering for report output.

/// Format a signed cents amount as a plain decimal string: 701680 → "7016.80".
/// Sign is preserved; no thousands separators.
pub fn cents(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_formatting() {
        assert_eq!(cents(701680), "7016.80");
        assert_eq!(cents(16303), "163.03");
        assert_eq!(cents(0), "0.00");
        assert_eq!(cents(5), "0.05");
        assert_eq!(cents(-50), "-0.50");
        assert_eq!(cents(-123456), "-1234.56");
    }
}
