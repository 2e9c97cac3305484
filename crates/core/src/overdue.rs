//! Late-pickup fee calculation.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Overdue days and the fee owed for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overdue {
    pub days: i64,
    pub fee: i64,
}

/// Compute overdue days and fee for a parcel deposited at `deposited_at`.
///
/// The first 24 hours are free. Past that, every started day counts in full,
/// so 24h plus one microsecond is already two days. The fee saturates at
/// `i64::MAX` instead of overflowing.
pub fn calculate_overdue(deposited_at: Option<Timestamp>, now: Timestamp, fee_per_day: i64) -> Overdue {
    let Some(deposited_at) = deposited_at else {
        return Overdue::default();
    };

    let elapsed = now - deposited_at;
    if elapsed <= Duration::hours(24) {
        return Overdue::default();
    }

    // Microseconds overflow only past ~290k years; whole seconds are plenty there.
    let days = match elapsed.num_microseconds() {
        Some(micros) => ceil_div(micros, MICROS_PER_DAY),
        None => ceil_div(elapsed.num_seconds(), MICROS_PER_DAY / 1_000_000),
    };
    Overdue {
        days,
        fee: days.saturating_mul(fee_per_day),
    }
}

/// Ceiling division for a positive `n`.
fn ceil_div(n: i64, d: i64) -> i64 {
    n / d + i64::from(n % d != 0)
}
