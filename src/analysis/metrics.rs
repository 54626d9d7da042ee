use crate::{AnalyticsError, Result};

/// Engagement of an average post as a percentage of the audience.
///
/// Zero followers yields `0.0` rather than an error. Negative arguments are
/// rejected.
pub fn engagement_rate(likes: i64, comments: i64, followers: i64) -> Result<f64> {
    ensure_non_negative("likes", likes)?;
    ensure_non_negative("comments", comments)?;
    ensure_non_negative("followers", followers)?;

    if followers == 0 {
        return Ok(0.0);
    }

    let total = likes as f64 + comments as f64;
    Ok(round_to(total * 100.0 / followers as f64, 2))
}

fn ensure_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(AnalyticsError::invalid(
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}

/// Rounds to `digits` decimals. Halves go away from zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator). Undefined below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Key of the first maximum. A later item must be strictly greater to win, so
/// ties resolve to whatever the iteration order puts first.
pub(crate) fn arg_max<K, V: PartialOrd>(items: impl IntoIterator<Item = (K, V)>) -> Option<K> {
    let mut best: Option<(K, V)> = None;
    for (key, value) in items {
        let replace = match &best {
            Some((_, current)) => value > *current,
            None => true,
        };
        if replace {
            best = Some((key, value));
        }
    }
    best.map(|(key, _)| key)
}
