//! Textual durations such as `100ms`, `1s` or `1.5m`.

use std::time::Duration;

const UNITS: [(&str, u128); 7] = [
    ("d", 86_400_000_000_000),
    ("h", 3_600_000_000_000),
    ("m", 60_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

/// Parses a `<number><unit>` duration.
///
/// Supported units are `ns`, `us`, `ms`, `s`, `m`, `h` and `d`. The number
/// may carry a fractional part; signs are not accepted.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("duration is empty".to_owned());
    }

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| format!("duration '{trimmed}' has no unit"))?;
    let (number, unit) = trimmed.split_at(split);
    let unit = unit.trim_start();

    if number.is_empty() || number.starts_with('.') || number.ends_with('.') {
        return Err(format!("invalid duration '{trimmed}'"));
    }

    let nanos_per_unit = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, nanos)| *nanos)
        .ok_or_else(|| format!("unknown duration unit '{unit}' in '{trimmed}'"))?;

    let nanos = match number.split_once('.') {
        None => number
            .parse::<u128>()
            .ok()
            .and_then(|whole| whole.checked_mul(nanos_per_unit)),
        Some((whole, fraction)) => {
            let value: f64 = format!("{whole}.{fraction}")
                .parse()
                .map_err(|err| format!("invalid duration '{trimmed}': {err}"))?;
            let scaled = value * nanos_per_unit as f64;
            (scaled.is_finite() && scaled < u128::MAX as f64).then(|| scaled.round() as u128)
        }
    }
    .ok_or_else(|| format!("duration '{trimmed}' is out of range"))?;

    let secs = u64::try_from(nanos / 1_000_000_000)
        .map_err(|_| format!("duration '{trimmed}' is out of range"))?;
    // remainder is always below one second
    let subsec = (nanos % 1_000_000_000) as u32;
    Ok(Duration::new(secs, subsec))
}

/// Renders a duration using the largest unit that represents it exactly.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }
    UNITS
        .iter()
        .find(|(_, per_unit)| nanos % per_unit == 0)
        .map(|(unit, per_unit)| format!("{}{unit}", nanos / per_unit))
        .unwrap_or_else(|| format!("{nanos}ns"))
}
