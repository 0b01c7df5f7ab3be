//! Parsing of user-supplied trade input.

use crate::error::CoreError;

/// Trims and upper-cases a ticker symbol so that `aapl ` and `AAPL` name the same position.
pub fn normalize_symbol(raw: &str) -> Result<String, CoreError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(CoreError::InvalidInput(
            "symbol".to_string(),
            "input is blank".to_string(),
        ));
    }
    Ok(symbol.to_ascii_uppercase())
}

/// Parses a share count typed by a user. Blank, non-numeric and non-positive
/// input are all rejected.
pub fn parse_shares(raw: &str) -> Result<i64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(
            "shares".to_string(),
            "input is blank".to_string(),
        ));
    }

    let shares: i64 = trimmed.parse().map_err(|_| {
        CoreError::InvalidInput("shares".to_string(), format!("'{trimmed}' is not a whole number"))
    })?;

    if shares < 1 {
        return Err(CoreError::InvalidInput(
            "shares".to_string(),
            format!("{shares} is not a positive number of shares"),
        ));
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_whole_numbers() {
        assert_eq!(parse_shares("10").unwrap(), 10);
        assert_eq!(parse_shares(" 3 ").unwrap(), 3);
    }

    #[test]
    fn rejects_blank_fractional_and_non_positive() {
        for raw in ["", "   ", "abc", "1.5", "0", "-4"] {
            assert!(parse_shares(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn normalizes_symbols() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert!(normalize_symbol("  ").is_err());
    }
}
