//! Date/time conversions (`%t` and `%T`)

use crate::error::{TextError, TextResult};
use crate::locale::DateSymbols;
use crate::value::Value;
use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Timelike, Utc};

/// The field selected by the character after `t`/`T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeField {
    /// `H`: hour of day, 00-23
    Hour24,
    /// `I`: hour of half-day, 01-12
    Hour12,
    /// `k`: hour of day, 0-23
    Hour24Unpadded,
    /// `l`: hour of half-day, 1-12
    Hour12Unpadded,
    /// `M`
    Minute,
    /// `S`
    Second,
    /// `L`: milliseconds, 000-999
    Millis,
    /// `N`: nanoseconds, nine digits
    Nanos,
    /// `p`: `am`/`pm`
    AmPm,
    /// `z`: numeric offset, `+0100`
    ZoneOffset,
    /// `Z`: `UTC` or `+01:00`
    ZoneName,
    /// `s`: seconds since the epoch
    EpochSeconds,
    /// `Q`: milliseconds since the epoch
    EpochMillis,
    /// `B`
    MonthName,
    /// `b`, `h`
    MonthAbbrev,
    /// `A`
    WeekdayName,
    /// `a`
    WeekdayAbbrev,
    /// `C`: year / 100, two digits
    Century,
    /// `Y`: at least four digits
    Year,
    /// `y`: last two digits
    YearShort,
    /// `j`: day of year, 001-366
    DayOfYear,
    /// `m`: 01-12
    Month,
    /// `d`: 01-31
    Day,
    /// `e`: 1-31
    DayUnpadded,
    /// `R`: `%tH:%tM`
    Time24Short,
    /// `T`: `%tH:%tM:%tS`
    Time24,
    /// `r`: `%tI:%tM:%tS %Tp`
    Time12,
    /// `D`: `%tm/%td/%ty`
    DateUs,
    /// `F`: `%tY-%tm-%td`
    DateIso,
    /// `c`: `%ta %tb %td %tT %tZ %tY`
    Full,
}

impl DateTimeField {
    pub fn from_char(c: char) -> Option<Self> {
        use DateTimeField::*;
        Some(match c {
            'H' => Hour24,
            'I' => Hour12,
            'k' => Hour24Unpadded,
            'l' => Hour12Unpadded,
            'M' => Minute,
            'S' => Second,
            'L' => Millis,
            'N' => Nanos,
            'p' => AmPm,
            'z' => ZoneOffset,
            'Z' => ZoneName,
            's' => EpochSeconds,
            'Q' => EpochMillis,
            'B' => MonthName,
            'b' | 'h' => MonthAbbrev,
            'A' => WeekdayName,
            'a' => WeekdayAbbrev,
            'C' => Century,
            'Y' => Year,
            'y' => YearShort,
            'j' => DayOfYear,
            'm' => Month,
            'd' => Day,
            'e' => DayUnpadded,
            'R' => Time24Short,
            'T' => Time24,
            'r' => Time12,
            'D' => DateUs,
            'F' => DateIso,
            'c' => Full,
            _ => return None,
        })
    }
}

/// Format one field of a date/time argument
///
/// Integers are read as milliseconds since the epoch, in UTC.
pub(crate) fn format_datetime(
    field: DateTimeField,
    conversion: &str,
    value: &Value,
    symbols: &DateSymbols,
) -> TextResult<String> {
    let dt = to_datetime(value, conversion)?;
    Ok(render_field(field, &dt, symbols))
}

fn to_datetime(value: &Value, conversion: &str) -> TextResult<DateTime<FixedOffset>> {
    let millis = match value {
        Value::DateTime(dt) => return Ok(*dt),
        Value::Int(millis) => *millis,
        Value::UInt(millis) => i64::try_from(*millis)
            .map_err(|_| TextError::mismatch(conversion, "out-of-range timestamp"))?,
        other => return Err(TextError::mismatch(conversion, other.type_name())),
    };

    let utc = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| TextError::mismatch(conversion, "out-of-range timestamp"))?;
    Ok(utc.with_timezone(&Utc.fix()))
}

fn hour12(dt: &DateTime<FixedOffset>) -> u32 {
    match dt.hour() % 12 {
        0 => 12,
        h => h,
    }
}

fn render_field(field: DateTimeField, dt: &DateTime<FixedOffset>, symbols: &DateSymbols) -> String {
    use DateTimeField::*;
    let part = |field| render_field(field, dt, symbols);

    match field {
        Hour24 => format!("{:02}", dt.hour()),
        Hour12 => format!("{:02}", hour12(dt)),
        Hour24Unpadded => dt.hour().to_string(),
        Hour12Unpadded => hour12(dt).to_string(),
        Minute => format!("{:02}", dt.minute()),
        Second => format!("{:02}", dt.second()),
        Millis => format!("{:03}", dt.timestamp_subsec_millis().min(999)),
        Nanos => format!("{:09}", dt.timestamp_subsec_nanos().min(999_999_999)),
        AmPm => (if dt.hour() < 12 { "am" } else { "pm" }).to_string(),
        ZoneOffset => dt.format("%z").to_string(),
        ZoneName => {
            if dt.offset().local_minus_utc() == 0 {
                "UTC".to_string()
            } else {
                dt.format("%:z").to_string()
            }
        }
        EpochSeconds => dt.timestamp().to_string(),
        EpochMillis => dt.timestamp_millis().to_string(),
        MonthName => symbols.months[dt.month0() as usize].to_string(),
        MonthAbbrev => symbols.short_months[dt.month0() as usize].to_string(),
        WeekdayName => symbols.weekdays[dt.weekday().num_days_from_monday() as usize].to_string(),
        WeekdayAbbrev => {
            symbols.short_weekdays[dt.weekday().num_days_from_monday() as usize].to_string()
        }
        Century => format!("{:02}", dt.year().div_euclid(100)),
        Year => format!("{:04}", dt.year()),
        YearShort => format!("{:02}", dt.year().rem_euclid(100)),
        DayOfYear => format!("{:03}", dt.ordinal()),
        Month => format!("{:02}", dt.month()),
        Day => format!("{:02}", dt.day()),
        DayUnpadded => dt.day().to_string(),
        Time24Short => format!("{}:{}", part(Hour24), part(Minute)),
        Time24 => format!("{}:{}:{}", part(Hour24), part(Minute), part(Second)),
        Time12 => format!(
            "{}:{}:{} {}",
            part(Hour12),
            part(Minute),
            part(Second),
            part(AmPm).to_uppercase()
        ),
        DateUs => format!("{}/{}/{}", part(Month), part(Day), part(YearShort)),
        DateIso => format!("{}-{}-{}", part(Year), part(Month), part(Day)),
        Full => format!(
            "{} {} {} {} {} {}",
            part(WeekdayAbbrev),
            part(MonthAbbrev),
            part(Day),
            part(Time24),
            part(ZoneName),
            part(Year)
        ),
    }
}
