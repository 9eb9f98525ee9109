//! DOS packed date and time decoding.
//!
//! Both fields are little-endian 16-bit bit-fields on the medium. The
//! medium is read-only, so only the decode direction exists.

/// A DOS date.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Date {
    /// Year number. Valid range is [1980, 2107].
    year: u16,
    /// Month of the year, [1, 12].
    month: u8,
    /// Day of the month, [1, 31].
    day: u8,
}

impl Date {
    const MIN_YEAR: u16 = 1980;

    /// Decodes a packed DOS date: bits 15..9 year offset from 1980,
    /// bits 8..5 month, bits 4..0 day.
    #[must_use]
    pub fn decode(raw: u16) -> Self {
        Self {
            year: (raw >> 9) + Self::MIN_YEAR,
            month: u8::try_from((raw >> 5) & 0xF).unwrap_or(0),
            day: u8::try_from(raw & 0x1F).unwrap_or(0),
        }
    }

    #[must_use]
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    #[must_use]
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }
}

/// A DOS time.
///
/// The on-disk field only has 2-second resolution; the optional
/// high-resolution byte of the creation timestamp is not decoded.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Time {
    /// Hours, [0, 23].
    hour: u8,
    /// Minutes, [0, 59].
    min: u8,
    /// Seconds, [0, 58], always even.
    sec: u8,
}

impl Time {
    /// Decodes a packed DOS time: bits 15..11 hours, bits 10..5 minutes,
    /// bits 4..0 seconds in 2-second increments.
    #[must_use]
    pub fn decode(raw: u16) -> Self {
        Self {
            hour: u8::try_from(raw >> 11).unwrap_or(0),
            min: u8::try_from((raw >> 5) & 0x3F).unwrap_or(0),
            sec: u8::try_from((raw & 0x1F) * 2).unwrap_or(0),
        }
    }

    #[must_use]
    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[must_use]
    #[inline]
    pub const fn min(&self) -> u8 {
        self.min
    }

    #[must_use]
    #[inline]
    pub const fn sec(&self) -> u8 {
        self.sec
    }
}

/// A DOS date and time pair.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    #[must_use]
    pub fn decode(date_raw: u16, time_raw: u16) -> Self {
        Self {
            date: Date::decode(date_raw),
            time: Time::decode(time_raw),
        }
    }

    #[must_use]
    #[inline]
    pub const fn date(&self) -> Date {
        self.date
    }

    #[must_use]
    #[inline]
    pub const fn time(&self) -> Time {
        self.time
    }
}
