use std::sync::LazyLock;

use catalog::model::Dosage;
use regex::Regex;

static DOSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(?:\s*-\s*(\d+(?:\.\d+)?))?\s*([A-Za-zµ]+)?")
        .expect("dosage pattern compiles")
});

/// Trimmed, `None` when blank.
pub fn non_empty(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn split_list(input: Option<&str>, separator: char) -> Vec<String> {
    input
        .map(|s| {
            s.split(separator)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn is_yes(input: Option<&str>) -> bool {
    input.map(str::trim) == Some("Yes")
}

/// `"5%"` is 5, `"3-5%"` is 4, `"n/a"` or anything unparseable is `None`.
pub fn parse_iq_boost(input: Option<&str>) -> Option<f64> {
    let raw = non_empty(input)?;
    if raw.eq_ignore_ascii_case("n/a") {
        return None;
    }

    let clean = raw.replace('%', "");
    let clean = clean.trim();

    match clean.split_once('-') {
        Some((min, max)) => {
            let min: f64 = min.trim().parse().ok()?;
            let max: f64 = max.trim().parse().ok()?;
            Some((min + max) / 2.0)
        }
        None => clean.parse().ok(),
    }
}

/// `"<amount> <unit>"` where amount may be a range, e.g. `"100-200 mg"`.
pub fn parse_dosage(input: Option<&str>) -> Option<Dosage> {
    let raw = non_empty(input)?;
    let captures = DOSAGE.captures(&raw)?;

    let minimum: Option<f64> = captures.get(1).and_then(|m| m.as_str().parse().ok());
    let maximum: Option<f64> = captures
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .or(minimum);

    Some(Dosage {
        minimum,
        maximum,
        unit: captures.get(3).map(|m| m.as_str().to_string()),
        ..Dosage::default()
    })
}
