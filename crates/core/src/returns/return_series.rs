use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::warn;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{AlignedReturns, ReturnObservation, ValuePoint};
use crate::errors::{AnalyticsError, OperationContext, Result};

/// Converts a chronological value history into daily percentage returns.
///
/// For each consecutive pair, `return = (curr - prev) / prev * 100`. Fewer
/// than two points yield an empty series. A non-positive previous value makes
/// the percentage undefined and is rejected, as is a return too large for a
/// `Decimal`.
pub fn daily_returns(values: &[ValuePoint]) -> Result<Vec<ReturnObservation>> {
    if values.len() < 2 {
        return Ok(Vec::new());
    }

    let mut observations = Vec::with_capacity(values.len() - 1);
    for window in values.windows(2) {
        let prev = &window[0];
        let curr = &window[1];

        if prev.value <= Decimal::ZERO {
            let context = series_context("daily_returns", values);
            return Err(AnalyticsError::invalid_input(
                context,
                format!(
                    "non-positive value {} on {} cannot anchor a percentage return",
                    prev.value, prev.date
                ),
            )
            .into());
        }

        let return_pct = curr
            .value
            .checked_sub(prev.value)
            .and_then(|change| change.checked_div(prev.value))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| {
                AnalyticsError::invalid_input(
                    series_context("daily_returns", values),
                    format!(
                        "return from {} on {} to {} on {} exceeds the decimal range",
                        prev.value, prev.date, curr.value, curr.date
                    ),
                )
            })?;

        observations.push(ReturnObservation {
            date: curr.date,
            previous_date: prev.date,
            return_pct,
            value: curr.value,
        });
    }

    Ok(observations)
}

/// Extracts the raw percentage returns from a series of observations.
pub fn return_values(observations: &[ReturnObservation]) -> Vec<Decimal> {
    observations.iter().map(|o| o.return_pct).collect()
}

/// Inner-joins two return series on their date.
///
/// Output follows `series_a` in chronological order. Dates present in only
/// one series are dropped; a repeated date in `series_a` is kept once, and a
/// repeated date in `series_b` resolves to its last entry.
pub fn align(series_a: &[ReturnObservation], series_b: &[ReturnObservation]) -> AlignedReturns {
    let by_date: HashMap<NaiveDate, &ReturnObservation> =
        series_b.iter().map(|o| (o.date, o)).collect();

    let mut ordered_a: Vec<&ReturnObservation> = series_a.iter().collect();
    ordered_a.sort_by_key(|o| o.date);

    let mut seen: HashSet<NaiveDate> = HashSet::with_capacity(ordered_a.len());
    let mut aligned = AlignedReturns {
        a: Vec::with_capacity(ordered_a.len().min(series_b.len())),
        b: Vec::with_capacity(ordered_a.len().min(series_b.len())),
    };

    for obs_a in ordered_a {
        if !seen.insert(obs_a.date) {
            continue;
        }
        if let Some(obs_b) = by_date.get(&obs_a.date) {
            aligned.a.push(*obs_a);
            aligned.b.push(**obs_b);
        }
    }

    let dropped = series_a.len() + series_b.len() - 2 * aligned.len();
    if dropped > 0 {
        warn!(
            "Return alignment kept {} common dates, dropped {} unmatched entries",
            aligned.len(),
            dropped
        );
    }

    aligned
}

/// Converts an ad-hoc float array into decimal returns, rejecting NaN and
/// infinities.
pub fn returns_from_f64(values: &[f64]) -> Result<Vec<Decimal>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Decimal::from_f64(*value).ok_or_else(|| {
                AnalyticsError::invalid_input(
                    OperationContext::new("returns_from_f64"),
                    format!("value at index {} is not a finite number: {}", index, value),
                )
                .into()
            })
        })
        .collect()
}

fn series_context(operation: &'static str, values: &[ValuePoint]) -> OperationContext {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => OperationContext::with_period(operation, first.date, last.date),
        _ => OperationContext::new(operation),
    }
}
