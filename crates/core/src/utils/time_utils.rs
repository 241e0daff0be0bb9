use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Timezone that decides which calendar day a snapshot belongs to.
/// A run started after the New York close still carries that trading day.
pub const DEFAULT_SNAPSHOT_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a snapshot date in the given timezone.
pub fn snapshot_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Equivalent to `snapshot_date_from_utc(Utc::now(), DEFAULT_SNAPSHOT_TZ)`.
pub fn snapshot_date_today() -> NaiveDate {
    snapshot_date_from_utc(Utc::now(), DEFAULT_SNAPSHOT_TZ)
}
