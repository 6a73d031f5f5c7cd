//! Waiting for the daily puzzle release.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};

/// Time from `now` until the next `hour:minute` in `now`'s timezone.
///
/// If that time has already passed today, the next day's release is used.
/// An invalid or ambiguous local time (DST gaps) yields zero.
pub fn duration_until<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32, minute: u32) -> Duration {
    let Some(release) = NaiveTime::from_hms_opt(hour, minute, 0) else {
        return Duration::zero();
    };

    let today = now.date_naive().and_time(release);
    let target = if today <= now.naive_local() {
        today + Duration::days(1)
    } else {
        today
    };

    match now.timezone().from_local_datetime(&target).earliest() {
        Some(target) => target.signed_duration_since(now.clone()),
        None => Duration::zero(),
    }
}
