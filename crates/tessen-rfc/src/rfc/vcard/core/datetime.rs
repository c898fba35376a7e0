//! vCard date and time types.
//!
//! vCard 4.0 dates support partial/truncated forms (`--MM-DD`, `---DD`) that
//! 2.1 and 3.0 do not. Every type here parses both the basic (`19960415`)
//! and extended (`1996-04-15`) ISO 8601 forms and can write either.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};

/// A vCard date value with optional truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VCardDate {
    /// Full date (YYYY-MM-DD).
    Full(NaiveDate),
    /// Year and month only (YYYY-MM).
    YearMonth { year: i32, month: u32 },
    /// Year only (YYYY).
    Year(i32),
    /// Month only (--MM).
    Month(u32),
    /// Month and day, no year (--MM-DD).
    MonthDay { month: u32, day: u32 },
    /// Day only (---DD).
    Day(u32),
}

impl VCardDate {
    #[must_use]
    pub fn year_value(&self) -> Option<i32> {
        match self {
            Self::Full(d) => Some(d.year()),
            Self::YearMonth { year, .. } | Self::Year(year) => Some(*year),
            Self::Month(_) | Self::MonthDay { .. } | Self::Day(_) => None,
        }
    }

    #[must_use]
    pub fn month_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.month()),
            Self::YearMonth { month, .. } | Self::MonthDay { month, .. } | Self::Month(month) => {
                Some(*month)
            }
            Self::Year(_) | Self::Day(_) => None,
        }
    }

    #[must_use]
    pub fn day_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.day()),
            Self::MonthDay { day, .. } | Self::Day(day) => Some(*day),
            Self::Year(_) | Self::YearMonth { .. } | Self::Month(_) => None,
        }
    }

    /// Parses any of the basic or extended date forms.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() {
            return None;
        }
        if let Some(day) = s.strip_prefix("---") {
            return day_of_month(digits(day, 2)?).map(Self::Day);
        }
        if let Some(rest) = s.strip_prefix("--") {
            let rest = rest.replace('-', "");
            return match rest.len() {
                2 => month(digits(&rest, 2)?).map(Self::Month),
                4 => Some(Self::MonthDay {
                    month: month(digits(&rest[..2], 2)?)?,
                    day: day_of_month(digits(&rest[2..], 2)?)?,
                }),
                _ => None,
            };
        }
        match s.len() {
            4 => Some(Self::Year(i32::try_from(digits(s, 4)?).ok()?)),
            7 if s.as_bytes()[4] == b'-' => Some(Self::YearMonth {
                year: i32::try_from(digits(&s[..4], 4)?).ok()?,
                month: month(digits(&s[5..], 2)?)?,
            }),
            8 | 10 => {
                let compact = s.replace('-', "");
                if compact.len() != 8 {
                    return None;
                }
                NaiveDate::from_ymd_opt(
                    i32::try_from(digits(&compact[..4], 4)?).ok()?,
                    digits(&compact[4..6], 2)?,
                    digits(&compact[6..], 2)?,
                )
                .map(Self::Full)
            }
            _ => None,
        }
    }

    /// Writes the date in basic (`19960415`) or extended (`1996-04-15`) form.
    #[must_use]
    pub fn format(&self, extended: bool) -> String {
        let sep = if extended { "-" } else { "" };
        match self {
            Self::Full(d) => format!("{:04}{sep}{:02}{sep}{:02}", d.year(), d.month(), d.day()),
            Self::YearMonth { year, month } => format!("{year:04}-{month:02}"),
            Self::Year(year) => format!("{year:04}"),
            Self::Month(month) => format!("--{month:02}"),
            Self::MonthDay { month, day } => format!("--{month:02}{sep}{day:02}"),
            Self::Day(day) => format!("---{day:02}"),
        }
    }
}

/// A vCard time value with optional truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VCardTime {
    /// Full time (HH:MM:SS).
    Full(NaiveTime),
    /// Hour and minute only (HH:MM).
    HourMinute { hour: u32, minute: u32 },
    /// Hour only (HH).
    Hour(u32),
    /// Minute and second, no hour (-MM:SS).
    MinuteSecond { minute: u32, second: u32 },
    /// Minute only (-MM).
    Minute(u32),
    /// Second only (--SS).
    Second(u32),
}

impl VCardTime {
    /// Parses a time without its UTC offset suffix. Fractional seconds are dropped.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() {
            return None;
        }
        let s = s.split(['.', ',']).next().unwrap_or(s);
        if let Some(second) = s.strip_prefix("--") {
            return sixty(digits(second, 2)?).map(Self::Second);
        }
        if let Some(rest) = s.strip_prefix('-') {
            let rest = rest.replace(':', "");
            return match rest.len() {
                2 => sixty(digits(&rest, 2)?).map(Self::Minute),
                4 => Some(Self::MinuteSecond {
                    minute: sixty(digits(&rest[..2], 2)?)?,
                    second: sixty(digits(&rest[2..], 2)?)?,
                }),
                _ => None,
            };
        }
        let compact = s.replace(':', "");
        match compact.len() {
            2 => hour(digits(&compact, 2)?).map(Self::Hour),
            4 => Some(Self::HourMinute {
                hour: hour(digits(&compact[..2], 2)?)?,
                minute: sixty(digits(&compact[2..], 2)?)?,
            }),
            6 => NaiveTime::from_hms_opt(
                digits(&compact[..2], 2)?,
                digits(&compact[2..4], 2)?,
                digits(&compact[4..], 2)?,
            )
            .map(Self::Full),
            _ => None,
        }
    }

    /// Writes the time in basic (`102200`) or extended (`10:22:00`) form.
    #[must_use]
    pub fn format(&self, extended: bool) -> String {
        let sep = if extended { ":" } else { "" };
        match self {
            Self::Full(t) => format!(
                "{:02}{sep}{:02}{sep}{:02}",
                t.hour(),
                t.minute(),
                t.second()
            ),
            Self::HourMinute { hour, minute } => format!("{hour:02}{sep}{minute:02}"),
            Self::Hour(hour) => format!("{hour:02}"),
            Self::MinuteSecond { minute, second } => format!("-{minute:02}{sep}{second:02}"),
            Self::Minute(minute) => format!("-{minute:02}"),
            Self::Second(second) => format!("--{second:02}"),
        }
    }
}

/// UTC offset (`-05:00`, `+0530`, `Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VCardUtcOffset {
    /// Whether the offset is west of UTC.
    pub negative: bool,
    pub hours: u8,
    pub minutes: u8,
}

impl VCardUtcOffset {
    /// UTC offset.
    pub const UTC: Self = Self {
        negative: false,
        hours: 0,
        minutes: 0,
    };

    /// Creates an offset; the sign is taken from `hours`.
    #[must_use]
    pub const fn new(hours: i8, minutes: u8) -> Self {
        Self {
            negative: hours < 0,
            hours: hours.unsigned_abs(),
            minutes,
        }
    }

    /// Creates an offset from signed total minutes.
    #[must_use]
    pub fn from_minutes(total: i32) -> Self {
        let abs = total.unsigned_abs();
        Self {
            negative: total < 0,
            hours: u8::try_from(abs / 60).unwrap_or(u8::MAX),
            minutes: u8::try_from(abs % 60).unwrap_or(0),
        }
    }

    /// Returns total offset in minutes.
    #[must_use]
    pub fn total_minutes(&self) -> i32 {
        let total = i32::from(self.hours) * 60 + i32::from(self.minutes);
        if self.negative { -total } else { total }
    }

    /// Parses `Z`, `±HH`, `±HHMM` or `±H[H]:MM`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() {
            return None;
        }
        if s.eq_ignore_ascii_case("z") {
            return Some(Self::UTC);
        }
        let (negative, rest) = if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (true, s.strip_prefix('-')?)
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) if (1..=2).contains(&h.len()) => {
                (digits(h, h.len())?, digits(m, 2)?)
            }
            Some(_) => return None,
            None => match rest.len() {
                2 => (digits(rest, 2)?, 0),
                4 => (digits(&rest[..2], 2)?, digits(&rest[2..], 2)?),
                _ => return None,
            },
        };
        if hours > 18 || minutes > 59 {
            return None;
        }
        Some(Self {
            negative,
            hours: u8::try_from(hours).ok()?,
            minutes: u8::try_from(minutes).ok()?,
        })
    }

    /// Writes `-0530` (basic) or `-05:30` (extended).
    #[must_use]
    pub fn format(&self, extended: bool) -> String {
        let sign = if self.negative { '-' } else { '+' };
        let sep = if extended { ":" } else { "" };
        format!("{sign}{:02}{sep}{:02}", self.hours, self.minutes)
    }

    fn format_suffix(&self, extended: bool) -> String {
        if *self == Self::UTC {
            "Z".to_string()
        } else {
            self.format(extended)
        }
    }
}

/// Combined date and time, possibly partial.
///
/// This is the main type for BDAY, ANNIVERSARY, and similar properties.
#[derive(Debug, Clone, PartialEq)]
pub enum DateAndOrTime {
    /// Date only.
    Date(VCardDate),
    /// Date and time.
    DateTime {
        date: VCardDate,
        time: VCardTime,
        offset: Option<VCardUtcOffset>,
    },
    /// Time only.
    Time {
        time: VCardTime,
        offset: Option<VCardUtcOffset>,
    },
    /// Free-form text (for non-Gregorian calendars or special cases).
    Text(String),
}

impl DateAndOrTime {
    /// Creates a full date from year/month/day.
    #[must_use]
    pub fn full_date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|d| Self::Date(VCardDate::Full(d)))
    }

    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&VCardDate> {
        match self {
            Self::Date(d) | Self::DateTime { date: d, .. } => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<&VCardTime> {
        match self {
            Self::DateTime { time: t, .. } | Self::Time { time: t, .. } => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns whether this value uses a form only vCard 4.0 can express:
    /// truncated dates, reduced times, time-only values or text.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        match self {
            Self::Date(d) => !matches!(d, VCardDate::Full(_)),
            Self::DateTime { date, time, .. } => {
                !matches!(date, VCardDate::Full(_))
                    || !matches!(time, VCardTime::Full(_) | VCardTime::HourMinute { .. })
            }
            Self::Time { .. } | Self::Text(_) => true,
        }
    }

    /// Returns whether a time component is present.
    #[must_use]
    pub fn has_time(&self) -> bool {
        matches!(self, Self::DateTime { .. } | Self::Time { .. })
    }

    /// Parses a date, date-time or time (`T` prefixed) value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(time) = s.strip_prefix('T').or_else(|| s.strip_prefix('t')) {
            let (time, offset) = parse_time_with_offset(time)?;
            return Some(Self::Time { time, offset });
        }
        if let Some((date, time)) = s.split_once(['T', 't']) {
            let date = VCardDate::parse(date)?;
            let (time, offset) = parse_time_with_offset(time)?;
            return Some(Self::DateTime { date, time, offset });
        }
        VCardDate::parse(s).map(Self::Date)
    }

    /// Formats as ISO 8601. Text values are returned verbatim.
    #[must_use]
    pub fn format(&self, extended: bool) -> String {
        match self {
            Self::Date(d) => d.format(extended),
            Self::DateTime { date, time, offset } => {
                let mut out = format!("{}T{}", date.format(extended), time.format(extended));
                if let Some(offset) = offset {
                    out.push_str(&offset.format_suffix(extended));
                }
                out
            }
            Self::Time { time, offset } => {
                let mut out = format!("T{}", time.format(extended));
                if let Some(offset) = offset {
                    out.push_str(&offset.format_suffix(extended));
                }
                out
            }
            Self::Text(text) => text.clone(),
        }
    }
}

/// Timestamp value for the REV property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// UTC datetime.
    pub datetime: DateTime<Utc>,
}

impl Timestamp {
    #[must_use]
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self { datetime }
    }

    #[must_use]
    pub fn now() -> Self {
        Self {
            datetime: Utc::now(),
        }
    }

    /// Parses `YYYYMMDDTHHMMSSZ`, the extended equivalent, explicit offsets and
    /// bare dates (taken as midnight UTC).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
            return Some(Self::new(dt.with_timezone(&Utc)));
        }
        let (date, time, offset) = match DateAndOrTime::parse(s)? {
            DateAndOrTime::Date(VCardDate::Full(date)) => (date, NaiveTime::MIN, None),
            DateAndOrTime::DateTime {
                date: VCardDate::Full(date),
                time,
                offset,
            } => {
                let time = match time {
                    VCardTime::Full(t) => t,
                    VCardTime::HourMinute { hour, minute } => {
                        NaiveTime::from_hms_opt(hour, minute, 0)?
                    }
                    VCardTime::Hour(hour) => NaiveTime::from_hms_opt(hour, 0, 0)?,
                    _ => return None,
                };
                (date, time, offset)
            }
            _ => return None,
        };
        let minutes = offset.map_or(0, |o| o.total_minutes());
        let naive = date.and_time(time) - chrono::Duration::minutes(i64::from(minutes));
        Some(Self::new(DateTime::from_naive_utc_and_offset(naive, Utc)))
    }

    /// Writes `19960415T231000Z` or `1996-04-15T23:10:00Z`.
    #[must_use]
    pub fn format(&self, extended: bool) -> String {
        if extended {
            self.datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
        } else {
            self.datetime.format("%Y%m%dT%H%M%SZ").to_string()
        }
    }
}

/// Splits a trailing `Z` or `±hh[mm]` offset from a time string.
fn parse_time_with_offset(s: &str) -> Option<(VCardTime, Option<VCardUtcOffset>)> {
    if let Some(time) = s.strip_suffix(['Z', 'z']) {
        return Some((VCardTime::parse(time)?, Some(VCardUtcOffset::UTC)));
    }
    let split = s
        .char_indices()
        .rev()
        .find(|&(i, c)| (c == '+' || c == '-') && s[..i].bytes().any(|b| b.is_ascii_digit()))
        .map(|(i, _)| i);
    match split {
        Some(i) => Some((VCardTime::parse(&s[..i])?, Some(VCardUtcOffset::parse(&s[i..])?))),
        None => Some((VCardTime::parse(s)?, None)),
    }
}

/// Parses exactly `len` ASCII digits.
fn digits(s: &str, len: usize) -> Option<u32> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn month(m: u32) -> Option<u32> {
    (1..=12).contains(&m).then_some(m)
}

fn day_of_month(d: u32) -> Option<u32> {
    (1..=31).contains(&d).then_some(d)
}

fn hour(h: u32) -> Option<u32> {
    (h <= 23).then_some(h)
}

fn sixty(v: u32) -> Option<u32> {
    (v <= 59).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_forms() {
        let full = VCardDate::parse("1990-06-15").unwrap();
        assert_eq!(full.year_value(), Some(1990));
        assert_eq!(VCardDate::parse("19900615"), Some(full.clone()));
        assert_eq!(full.format(false), "19900615");
        assert_eq!(full.format(true), "1990-06-15");

        assert_eq!(
            VCardDate::parse("--0203"),
            Some(VCardDate::MonthDay { month: 2, day: 3 })
        );
        assert_eq!(VCardDate::parse("--12-25").unwrap().format(true), "--12-25");
        assert_eq!(VCardDate::parse("--06"), Some(VCardDate::Month(6)));
        assert_eq!(VCardDate::parse("---15"), Some(VCardDate::Day(15)));
        assert_eq!(
            VCardDate::parse("1985-04"),
            Some(VCardDate::YearMonth {
                year: 1985,
                month: 4
            })
        );
        assert_eq!(VCardDate::parse("1990"), Some(VCardDate::Year(1990)));
        assert_eq!(VCardDate::parse("19901345"), None);
        assert_eq!(VCardDate::parse("circa 1800"), None);
    }

    #[test]
    fn time_forms() {
        assert_eq!(
            VCardTime::parse("10:22:00").unwrap().format(false),
            "102200"
        );
        assert_eq!(VCardTime::parse("--30"), Some(VCardTime::Second(30)));
        assert_eq!(
            VCardTime::parse("-1530"),
            Some(VCardTime::MinuteSecond {
                minute: 15,
                second: 30
            })
        );
        assert_eq!(VCardTime::parse("-15"), Some(VCardTime::Minute(15)));
        assert_eq!(VCardTime::parse("25"), None);
    }

    #[test]
    fn utc_offset_forms() {
        let offset = VCardUtcOffset::parse("-05:30").unwrap();
        assert_eq!(offset.total_minutes(), -330);
        assert_eq!(offset.format(false), "-0530");
        assert_eq!(offset.format(true), "-05:30");
        assert_eq!(VCardUtcOffset::parse("+0100").unwrap().total_minutes(), 60);
        assert_eq!(VCardUtcOffset::parse("-5:00").unwrap().total_minutes(), -300);
        assert_eq!(VCardUtcOffset::parse("Z"), Some(VCardUtcOffset::UTC));
        assert_eq!(VCardUtcOffset::parse("-00:30").unwrap().total_minutes(), -30);
        assert_eq!(VCardUtcOffset::parse("America/New_York"), None);
        assert_eq!(VCardUtcOffset::parse("+1"), None);
    }

    #[test]
    fn offset_from_minutes() {
        assert_eq!(VCardUtcOffset::from_minutes(-330), VCardUtcOffset::new(-5, 30));
        assert_eq!(VCardUtcOffset::from_minutes(60), VCardUtcOffset::new(1, 0));
    }

    #[test]
    fn date_and_or_time_forms() {
        let dt = DateAndOrTime::parse("1990-06-15T14:30:00Z").unwrap();
        assert!(matches!(dt, DateAndOrTime::DateTime { offset: Some(_), .. }));
        assert_eq!(dt.format(false), "19900615T143000Z");
        assert!(!dt.is_partial());

        let time = DateAndOrTime::parse("T102200-0800").unwrap();
        assert_eq!(time.format(true), "T10:22:00-08:00");
        assert!(time.is_partial());

        assert!(DateAndOrTime::parse("--0203").unwrap().is_partial());
        assert!(DateAndOrTime::parse("circa 1800").is_none());
        assert!(DateAndOrTime::text("circa 1800").is_text());
    }

    #[test]
    fn timestamp_forms() {
        let ts = Timestamp::parse("19951031T222710Z").unwrap();
        assert_eq!(ts.format(true), "1995-10-31T22:27:10Z");
        assert_eq!(Timestamp::parse("1995-10-31T22:27:10Z"), Some(ts));
        assert_eq!(
            Timestamp::parse("19951031T172710-0500").map(|t| t.format(false)),
            Some("19951031T222710Z".to_string())
        );
        assert_eq!(
            Timestamp::parse("19951031").map(|t| t.format(false)),
            Some("19951031T000000Z".to_string())
        );
        assert!(Timestamp::parse("yesterday").is_none());
    }
}
