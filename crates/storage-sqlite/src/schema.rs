// Table definitions for the tables the analytics collaborators read and write.
// The schema itself is owned by the host application.

diesel::table! {
    daily_account_valuation (id) {
        id -> Text,
        account_id -> Text,
        valuation_date -> Date,
        total_value -> Text,
        calculated_at -> Text,
    }
}

diesel::table! {
    benchmarks (id) {
        id -> Text,
        symbol -> Text,
        name -> Text,
    }
}

diesel::table! {
    benchmark_prices (id) {
        id -> Text,
        benchmark_id -> Text,
        timestamp -> Text,
        close_price -> Text,
    }
}

diesel::table! {
    risk_free_rates (id) {
        id -> Text,
        country_code -> Text,
        recorded_date -> Date,
        annual_rate -> Text,
        daily_rate -> Nullable<Text>,
    }
}

diesel::table! {
    performance_metrics (id) {
        id -> Text,
        calculation_date -> Date,
        benchmark_id -> Nullable<Text>,
        period_days -> BigInt,
        portfolio_return -> Text,
        annualized_return -> Text,
        benchmark_return -> Nullable<Text>,
        excess_return -> Nullable<Text>,
        volatility -> Text,
        sharpe_ratio -> Text,
        sortino_ratio -> Text,
        calmar_ratio -> Text,
        tracking_error -> Nullable<Text>,
        max_drawdown -> Text,
        var_95 -> Text,
        var_99 -> Text,
        risk_free_rate -> Text,
        created_at -> Text,
    }
}

diesel::joinable!(benchmark_prices -> benchmarks (benchmark_id));

diesel::allow_tables_to_appear_in_same_query!(
    benchmark_prices,
    benchmarks,
    daily_account_valuation,
    performance_metrics,
    risk_free_rates,
);
