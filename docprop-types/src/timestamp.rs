//! Timestamp parsing for document values.
//!
//! Stored documents carry timestamps as text in one dominant shape,
//! `YYYY/MM/DD HH:MM:SS +HHMM`. Going through a general-purpose parser for
//! every such field is wasteful, so [`parse_timestamp_fast`] reads that shape
//! directly off the bytes. [`parse_timestamp`] is the general parser used
//! for everything else (arrays of times, explicit `parse` casts).
//!
//! All results are expressed in the ambient local zone.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::{Error, Result};

/// `strftime` pattern of the document timestamp format.
pub const DOCUMENT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S %z";

/// Parses `YYYY/MM/DD HH:MM:SS±HH`.
///
/// A single space before the sign and a trailing two-digit minute offset
/// (`+HHMM`) are also accepted. Anything else is rejected; there is no
/// fallback to the general parser.
pub fn parse_timestamp_fast(input: &str) -> Result<DateTime<Local>> {
    let fields = Cursor::new(input).fixed_fields().ok_or_else(|| {
        Error::InvalidTimestamp(format!("expected YYYY/MM/DD HH:MM:SS±HH, got {input:?}"))
    })?;

    let naive = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)
        .and_then(|date| date.and_hms_opt(fields.hour, fields.minute, fields.second))
        .ok_or_else(|| {
            Error::InvalidTimestamp(format!("calendar fields out of range in {input:?}"))
        })?;

    let offset = FixedOffset::east_opt(fields.offset_seconds)
        .ok_or_else(|| Error::InvalidTimestamp(format!("zone offset out of range in {input:?}")))?;

    // Fixed offsets have no gaps or folds, so the mapping is always single.
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|ts| ts.with_timezone(&Local))
        .ok_or_else(|| Error::InvalidTimestamp(format!("unrepresentable instant {input:?}")))
}

/// Parses a timestamp in any of the accepted textual forms.
///
/// Tried in order: the fast-path document format, RFC 3339, RFC 2822,
/// `YYYY-MM-DD HH:MM:SS ±HHMM`, then zone-less date-times and plain dates,
/// which are read as local time.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Local>> {
    let trimmed = input.trim();

    if let Ok(ts) = parse_timestamp_fast(trimmed) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Local));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(ts.with_timezone(&Local));
    }
    for format in [DOCUMENT_TIME_FORMAT, "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, format) {
            return Ok(ts.with_timezone(&Local));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return local_from_naive(naive, input);
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Some(midnight) = NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return local_from_naive(midnight, input);
        }
    }

    Err(Error::InvalidTimestamp(format!("unrecognized timestamp {input:?}")))
}

/// Formats a timestamp in the document format, `YYYY/MM/DD HH:MM:SS +HHMM`.
#[must_use]
pub fn format_timestamp<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.format(DOCUMENT_TIME_FORMAT).to_string()
}

fn local_from_naive(naive: NaiveDateTime, input: &str) -> Result<DateTime<Local>> {
    // Earliest wins inside a DST fold; gaps have no valid local reading.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            Error::InvalidTimestamp(format!("{input:?} does not exist in the local zone"))
        })
}

struct FixedFields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    offset_seconds: i32,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn fixed_fields(mut self) -> Option<FixedFields> {
        let year = self.digits(4)?;
        self.expect(b'/')?;
        let month = self.digits(2)?;
        self.expect(b'/')?;
        let day = self.digits(2)?;
        self.expect(b' ')?;
        let hour = self.digits(2)?;
        self.expect(b':')?;
        let minute = self.digits(2)?;
        self.expect(b':')?;
        let second = self.digits(2)?;
        self.optional(b' ');

        let sign = match self.next()? {
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        let offset_hours = self.digits(2)?;
        let offset_minutes = if self.at_end() { 0 } else { self.digits(2)? };
        if !self.at_end() || offset_hours > 23 || offset_minutes > 59 {
            return None;
        }

        Some(FixedFields {
            year: i32::try_from(year).ok()?,
            month,
            day,
            hour,
            minute,
            second,
            offset_seconds: sign * i32::try_from(offset_hours * 3600 + offset_minutes * 60).ok()?,
        })
    }

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Option<()> {
        (self.next()? == expected).then_some(())
    }

    fn optional(&mut self, expected: u8) {
        if self.bytes.get(self.pos) == Some(&expected) {
            self.pos += 1;
        }
    }

    fn digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.next()?;
            if !byte.is_ascii_digit() {
                return None;
            }
            value = value * 10 + u32::from(byte - b'0');
        }
        Some(value)
    }

    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }
}
