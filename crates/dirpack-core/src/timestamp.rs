//! Conversion between archive timestamps and host modification times.
//!
//! Zip stores a 6-field wall-clock timestamp with no time zone and no
//! sub-second component. [`ArchiveTime`] is that 6-field value;
//! [`TimestampCodec`] converts it to and from host epoch seconds in a fixed
//! time zone. Sub-second precision is always discarded.

use std::time::SystemTime;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;

use crate::ArchiveError;
use crate::Result;

/// Earliest year representable in a zip (MS-DOS) timestamp.
pub const DOS_MIN_YEAR: u16 = 1980;

/// Latest year representable in a zip (MS-DOS) timestamp.
pub const DOS_MAX_YEAR: u16 = 2107;

/// A whole-second wall-clock timestamp as stored in an archive member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveTime {
    /// Calendar year.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl ArchiveTime {
    /// Creates an `ArchiveTime` from its six fields without validation.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Returns `true` if the zip (MS-DOS) date field can hold this time.
    #[must_use]
    pub const fn fits_zip(self) -> bool {
        self.year >= DOS_MIN_YEAR && self.year <= DOS_MAX_YEAR
    }

    /// Converts into the zip wire type.
    ///
    /// Values before 1980 clamp to 1980-01-01 00:00:00 and values after 2107
    /// clamp to the last representable second. DOS timestamps have 2-second
    /// granularity, so odd seconds are rounded down.
    #[must_use]
    pub fn to_zip(self) -> zip::DateTime {
        if self.year < DOS_MIN_YEAR {
            return zip::DateTime::default();
        }
        let clamped = if self.year > DOS_MAX_YEAR {
            Self::new(DOS_MAX_YEAR, 12, 31, 23, 59, 58)
        } else {
            self
        };
        zip::DateTime::from_date_and_time(
            clamped.year,
            clamped.month,
            clamped.day,
            clamped.hour,
            clamped.minute,
            clamped.second,
        )
        .unwrap_or_default()
    }

    /// Reads the six fields of a zip timestamp.
    #[must_use]
    pub fn from_zip(value: zip::DateTime) -> Self {
        Self::new(
            value.year(),
            value.month(),
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
        )
    }

    fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))?
            .and_hms_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
            )
    }
}

impl std::fmt::Display for ArchiveTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Time zone in which archive wall-clock timestamps are interpreted.
///
/// Zip tools conventionally store local time, so the archiver uses
/// [`TimestampCodec::Local`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampCodec {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl TimestampCodec {
    /// Converts a host modification time to an archive timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::timestamp::ArchiveTime;
    /// use dirpack_core::timestamp::TimestampCodec;
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let mtime = UNIX_EPOCH + Duration::from_millis(818_153_763_900);
    /// let stored = TimestampCodec::Utc.to_archive_time(mtime);
    /// assert_eq!(stored, ArchiveTime::new(1995, 12, 5, 8, 56, 3));
    /// ```
    #[must_use]
    pub fn to_archive_time(self, modified: SystemTime) -> ArchiveTime {
        self.epoch_to_archive_time(epoch_seconds(modified))
    }

    /// Converts whole epoch seconds to an archive timestamp.
    #[must_use]
    pub fn epoch_to_archive_time(self, seconds: i64) -> ArchiveTime {
        let utc = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH);
        match self {
            Self::Local => fields(&utc.with_timezone(&Local)),
            Self::Utc => fields(&utc),
        }
    }

    /// Converts an archive timestamp to whole epoch seconds.
    ///
    /// Local times that fall twice (clock set back) resolve to the earlier
    /// instant; local times skipped by a forward shift resolve to the
    /// instant one hour later.
    ///
    /// # Errors
    ///
    /// Returns `Corrupt` if the fields do not form a valid calendar time.
    pub fn to_host_time(self, stored: ArchiveTime) -> Result<i64> {
        let naive = stored
            .to_naive()
            .ok_or_else(|| ArchiveError::Corrupt(format!("invalid archive timestamp {stored}")))?;

        match self {
            Self::Utc => Ok(naive.and_utc().timestamp()),
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| {
                    Local
                        .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                        .earliest()
                })
                .map(|dt| dt.timestamp())
                .ok_or_else(|| {
                    ArchiveError::Corrupt(format!("unrepresentable local time {stored}"))
                }),
        }
    }
}

/// Truncates a [`SystemTime`] to whole epoch seconds (rounding toward the
/// past for pre-epoch times).
#[must_use]
pub fn epoch_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fields<Tz: TimeZone>(dt: &DateTime<Tz>) -> ArchiveTime {
    ArchiveTime::new(
        dt.year().clamp(0, i32::from(u16::MAX)) as u16,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
    )
}
