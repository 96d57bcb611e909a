use time::{Duration, PrimitiveDateTime};

pub(crate) fn time_limit(duration_minutes: i32) -> Duration {
    Duration::minutes(i64::from(duration_minutes))
}

/// Strictly past the limit; an attempt at exactly the limit is not yet timed out.
pub(crate) fn is_timed_out(
    start_time: PrimitiveDateTime,
    duration_minutes: i32,
    now: PrimitiveDateTime,
) -> bool {
    now - start_time > time_limit(duration_minutes)
}

/// Whole seconds left, floored at zero.
pub(crate) fn remaining_seconds(
    start_time: PrimitiveDateTime,
    duration_minutes: i32,
    now: PrimitiveDateTime,
) -> i64 {
    let remaining = time_limit(duration_minutes) - (now - start_time);
    remaining.whole_seconds().max(0)
}
