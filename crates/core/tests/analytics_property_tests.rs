//! Property-based integration tests for the analytics primitives.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{Duration, NaiveDate};
use perfolio_core::benchmark::{beta, correlation, r_squared, tracking_error};
use perfolio_core::constants::{VAR_95_CONFIDENCE, VAR_99_CONFIDENCE};
use perfolio_core::returns::{align, ReturnObservation};
use perfolio_core::statistics::{
    compute_risk_metrics, downside_deviation, expected_shortfall, max_drawdown,
    max_drawdown_duration, total_return, value_at_risk, volatility,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Daily return between -20% and +20%, in basis points.
fn arb_return() -> impl Strategy<Value = Decimal> {
    (-2000i64..=2000).prop_map(|bp| Decimal::new(bp, 2))
}

fn arb_returns(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_return(), 1..max_len)
}

fn arb_paired_returns(max_len: usize) -> impl Strategy<Value = (Vec<Decimal>, Vec<Decimal>)> {
    (2..max_len).prop_flat_map(|len| {
        (
            prop::collection::vec(arb_return(), len),
            prop::collection::vec(arb_return(), len),
        )
    })
}

/// Observations on a random subset of the first 60 days of 2024.
fn arb_observations() -> impl Strategy<Value = Vec<ReturnObservation>> {
    prop::collection::vec((0i64..60, arb_return()), 0..40).prop_map(|entries| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        entries
            .into_iter()
            .map(|(offset, return_pct)| ReturnObservation {
                date: base + Duration::days(offset),
                previous_date: base + Duration::days(offset - 1),
                return_pct,
                value: Decimal::ONE_HUNDRED,
            })
            .collect()
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn volatility_is_non_negative(returns in arb_returns(80)) {
        prop_assert!(volatility(&returns) >= Decimal::ZERO);
        prop_assert!(downside_deviation(&returns, Decimal::ZERO) >= Decimal::ZERO);
    }

    #[test]
    fn downside_deviation_ignores_gains(
        returns in prop::collection::vec((0i64..=2000).prop_map(|bp| Decimal::new(bp, 2)), 0..50)
    ) {
        prop_assert_eq!(downside_deviation(&returns, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn max_drawdown_is_a_bounded_percentage(returns in arb_returns(120)) {
        let drawdown = max_drawdown(&returns);
        prop_assert!(drawdown >= Decimal::ZERO);
        prop_assert!(drawdown <= Decimal::ONE_HUNDRED);
        prop_assert!(max_drawdown_duration(&returns) as usize <= returns.len());
    }

    #[test]
    fn total_return_stays_above_total_loss(returns in arb_returns(120)) {
        prop_assert!(total_return(&returns) > Decimal::NEGATIVE_ONE);
    }

    #[test]
    fn value_at_risk_lies_within_observed_range(returns in arb_returns(200)) {
        let min = returns.iter().copied().min().unwrap();
        let max = returns.iter().copied().max().unwrap();
        let var_95 = value_at_risk(&returns, VAR_95_CONFIDENCE);
        let var_99 = value_at_risk(&returns, VAR_99_CONFIDENCE);

        prop_assert!(var_95 >= min && var_95 <= max);
        prop_assert!(var_99 <= var_95);
        prop_assert!(expected_shortfall(&returns, VAR_95_CONFIDENCE) <= var_95);
    }

    #[test]
    fn risk_metrics_are_deterministic(returns in arb_returns(80)) {
        prop_assert_eq!(compute_risk_metrics(&returns), compute_risk_metrics(&returns));
    }

    #[test]
    fn beta_of_series_with_itself_is_one(returns in arb_returns(60)) {
        prop_assert_eq!(beta(&returns, &returns), Decimal::ONE);
        prop_assert_eq!(tracking_error(&returns, &returns), Decimal::ZERO);
    }

    #[test]
    fn correlation_is_bounded((portfolio, benchmark) in arb_paired_returns(60)) {
        let corr = correlation(&portfolio, &benchmark);
        prop_assert!(corr >= Decimal::NEGATIVE_ONE && corr <= Decimal::ONE);

        let r2 = r_squared(corr);
        prop_assert!(r2 >= Decimal::ZERO && r2 <= Decimal::ONE);
    }

    #[test]
    fn alignment_pairs_dates_in_order(a in arb_observations(), b in arb_observations()) {
        let aligned = align(&a, &b);

        prop_assert_eq!(aligned.a.len(), aligned.b.len());
        for (left, right) in aligned.a.iter().zip(aligned.b.iter()) {
            prop_assert_eq!(left.date, right.date);
        }
        for pair in aligned.a.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
    }
}
