//! canonical feature field names. the ordered model schema is built from
//! these constants so that the training and serving paths cannot drift apart
//! by typo or reordering.

/// hour of day in [0, 23], UTC.
pub const HOUR: &str = "hour";

/// day of week in [0, 6] where 0 is Monday, matching
/// [`chrono::Weekday::num_days_from_monday`].
pub const DAY_OF_WEEK: &str = "day_of_week";

/// 1.0 when day_of_week is Saturday (5) or Sunday (6), else 0.0.
pub const IS_WEEKEND: &str = "is_weekend";

/// calendar month in [1, 12].
pub const MONTH: &str = "month";

/// observed demand at a fixed hour offset before the target slot.
/// see [`demand_lag`] for the offset-qualified field name.
pub const DEMAND_LAG_PREFIX: &str = "demand_lag";

/// trailing mean of demand over a fixed window ending at (excluding) the
/// target slot. see [`demand_rolling`] for the window-qualified field name.
pub const DEMAND_ROLLING_PREFIX: &str = "demand_rolling";

/// field name for a lag feature at the given hour offset, e.g. "demand_lag_24h".
pub fn demand_lag(offset_hours: i64) -> String {
    format!("{DEMAND_LAG_PREFIX}_{offset_hours}h")
}

/// field name for a rolling mean over the given trailing window, e.g.
/// "demand_rolling_3h".
pub fn demand_rolling(window_hours: i64) -> String {
    format!("{DEMAND_ROLLING_PREFIX}_{window_hours}h")
}
