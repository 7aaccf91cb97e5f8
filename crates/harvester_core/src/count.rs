use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCountError {
    #[error("empty count")]
    Empty,
    #[error("unrecognised count {0:?}")]
    Invalid(String),
}

/// Parses counters as the app prints them: `"1,234"`, `"15.3K"`, `"2M"`.
pub fn parse_count(raw: &str) -> Result<u64, ParseCountError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(ParseCountError::Empty);
    }
    if cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return cleaned
            .parse()
            .map_err(|_| ParseCountError::Invalid(raw.to_string()));
    }

    let split = cleaned.len() - cleaned.chars().last().map_or(0, char::len_utf8);
    let (mantissa, suffix) = cleaned.split_at(split);
    let multiplier = match suffix {
        "K" | "k" => 1_000.0,
        "M" | "m" => 1_000_000.0,
        "B" | "b" => 1_000_000_000.0,
        _ => return Err(ParseCountError::Invalid(raw.to_string())),
    };
    let value: f64 = mantissa
        .parse()
        .map_err(|_| ParseCountError::Invalid(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseCountError::Invalid(raw.to_string()));
    }
    Ok((value * multiplier).round() as u64)
}
