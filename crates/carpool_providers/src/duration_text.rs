use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration text is empty")]
    Missing,

    #[error("expected an integer in duration {text:?}, found {token:?}")]
    NotAnInteger { text: String, token: String },

    #[error("unknown unit {unit:?} in duration {text:?}")]
    UnknownUnit { text: String, unit: String },
}

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

fn unit_factor(unit: &str) -> Option<u32> {
    let unit = unit.trim_end_matches(',').to_ascii_lowercase();

    if unit.starts_with("day") {
        Some(MINUTES_PER_DAY)
    } else if unit.starts_with("hour") || unit.starts_with("hr") {
        Some(MINUTES_PER_HOUR)
    } else if unit.starts_with("min") {
        Some(1)
    } else {
        None
    }
}

/// Parses a provider duration text such as `"12 mins"` or `"1 hour 5 mins"`
/// into whole minutes.
///
/// Every value must be an integer followed by an optional unit; a value with
/// no unit counts as minutes. Compound text is summed rather than cut at the
/// leading integer, so `"1 hour 5 mins"` is 65 and not 1. Any token left
/// over after a value/unit pair is read as the next value, so trailing words
/// are an error.
pub fn parse_duration_minutes(text: &str) -> Result<u32, DurationParseError> {
    let mut tokens = text.split_whitespace();
    let mut total: Option<u32> = None;

    while let Some(token) = tokens.next() {
        let value: u32 = token
            .parse()
            .map_err(|_| DurationParseError::NotAnInteger {
                text: text.to_owned(),
                token: token.to_owned(),
            })?;

        let factor = match tokens.next() {
            Some(unit) => unit_factor(unit).ok_or_else(|| DurationParseError::UnknownUnit {
                text: text.to_owned(),
                unit: unit.to_owned(),
            })?,
            None => 1,
        };

        total = Some(
            total
                .unwrap_or_default()
                .saturating_add(value.saturating_mul(factor)),
        );
    }

    total.ok_or(DurationParseError::Missing)
}
