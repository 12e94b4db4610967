//! Format module for formatted text
//!
//! Locale-aware printf-style substitution:
//! - Pattern parsing and specifier validation
//! - General, character and integral conversions
//! - Floating-point conversions with locale separators
//! - Date/time conversions with localized names
//!
//! Upper-case conversions (`%S`, `%X`, `%TB`, ...) use Unicode case mapping,
//! independent of the locale: `%S` of `"i"` is `"I"` even for Turkish.

pub mod datetime;
pub mod number;
pub mod specifier;

pub use datetime::DateTimeField;
pub use specifier::{parse, ArgIndex, Conversion, Flags, FormatSpec, Segment};

use crate::error::{TextError, TextResult};
use crate::locale::{Locale, NumberSymbols};
use crate::utils::text::{justify, truncate};
use crate::value::Value;

/// Format `args` into `pattern` using the process default locale
pub fn format(pattern: &str, args: &[Value]) -> TextResult<String> {
    let locale = Locale::process_default();
    format_in(&locale, pattern, args)
}

/// Format `args` into `pattern` using `locale`
pub fn format_in(locale: &Locale, pattern: &str, args: &[Value]) -> TextResult<String> {
    Formatter::new(locale).format(pattern, args)
}

/// Substitutes arguments into patterns for one locale
#[derive(Debug, Clone)]
pub struct Formatter<'a> {
    locale: &'a Locale,
    symbols: NumberSymbols,
}

impl<'a> Formatter<'a> {
    pub fn new(locale: &'a Locale) -> Self {
        Self {
            locale,
            symbols: locale.number_symbols(),
        }
    }

    pub fn locale(&self) -> &Locale {
        self.locale
    }

    /// Parse `pattern` completely, then format each specifier in order
    pub fn format(&self, pattern: &str, args: &[Value]) -> TextResult<String> {
        let segments = parse(pattern)?;

        let mut out = String::with_capacity(pattern.len() + args.len() * 8);
        let mut ordinary = 0;
        let mut last: Option<usize> = None;

        for segment in &segments {
            let spec = match segment {
                Segment::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Segment::Spec(spec) => spec,
            };

            if !spec.conversion.takes_argument() {
                out.push_str(&self.format_constant(spec));
                continue;
            }

            let index = match spec.index {
                ArgIndex::Ordinary => {
                    ordinary += 1;
                    ordinary - 1
                }
                ArgIndex::Explicit(index) => index,
                ArgIndex::Previous => last.ok_or_else(|| missing(spec))?,
            };
            let value = args.get(index).ok_or_else(|| missing(spec))?;
            last = Some(index);

            out.push_str(&self.format_value(spec, value)?);
        }

        Ok(out)
    }

    fn format_constant(&self, spec: &FormatSpec) -> String {
        match spec.conversion {
            Conversion::LineSeparator => "\n".to_string(),
            _ => justify("%".to_string(), spec.width, spec.flags.left_justify),
        }
    }

    /// Format one argument for one specifier, including width and case
    fn format_value(&self, spec: &FormatSpec, value: &Value) -> TextResult<String> {
        let body = match (spec.conversion, value) {
            (Conversion::Boolean, _) => {
                let b = match value {
                    Value::Null => false,
                    Value::Bool(b) => *b,
                    _ => true,
                };
                truncate(b.to_string(), spec.precision)
            }
            (_, Value::Null) => truncate("null".to_string(), spec.precision),
            (Conversion::HashCode, _) => {
                let hash = value.hash_code()?.unwrap_or_default();
                truncate(format!("{:x}", hash), spec.precision)
            }
            (Conversion::String, _) => truncate(value.render_string()?, spec.precision),
            (Conversion::Char, _) => self.format_char(spec, value)?,
            (Conversion::Decimal | Conversion::Octal | Conversion::Hex, _) => {
                number::format_integer(spec, value, &self.symbols)?
            }
            (
                Conversion::Scientific
                | Conversion::Fixed
                | Conversion::General
                | Conversion::HexFloat,
                _,
            ) => number::format_float(spec, value, &self.symbols)?,
            (Conversion::DateTime(field), _) => datetime::format_datetime(
                field,
                &spec.conversion_char.to_string(),
                value,
                self.locale.date_symbols(),
            )?,
            (Conversion::Percent | Conversion::LineSeparator, _) => self.format_constant(spec),
        };

        let body = if spec.upper {
            body.to_uppercase()
        } else {
            body
        };
        Ok(justify(body, spec.width, spec.flags.left_justify))
    }

    fn format_char(&self, spec: &FormatSpec, value: &Value) -> TextResult<String> {
        let code_point = match value {
            Value::Char(c) => return Ok(c.to_string()),
            Value::Int(i) => u32::try_from(*i).ok(),
            Value::UInt(u) => u32::try_from(*u).ok(),
            other => {
                return Err(TextError::mismatch(
                    spec.conversion_char.to_string(),
                    other.type_name(),
                ))
            }
        };

        code_point
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .ok_or_else(|| TextError::mismatch(spec.conversion_char.to_string(), "invalid code point"))
    }
}

fn missing(spec: &FormatSpec) -> TextError {
    TextError::MissingArgument {
        specifier: spec.source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, PatternError};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn root(pattern: &str, args: &[Value]) -> TextResult<String> {
        format_in(&Locale::ROOT, pattern, args)
    }

    #[test]
    fn test_positional() {
        let out = root("%d. Formatted %s", &[Value::from(1), Value::from("text")]).unwrap();
        assert_eq!(out, "1. Formatted text");
    }

    #[test]
    fn test_explicit_and_previous_index() {
        let args = [Value::from("a"), Value::from("b")];
        assert_eq!(root("%2$s %1$s %<s %s", &args).unwrap(), "b a a a");
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let args = [Value::from(1), Value::from(2)];
        assert_eq!(root("only %d", &args).unwrap(), "only 1");
    }

    #[test]
    fn test_missing_argument() {
        let err = root("%s and %s", &[Value::from("one")]).unwrap_err();
        assert!(matches!(err, TextError::MissingArgument { .. }));
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
        assert!(err.to_string().contains("%s"));

        let err = root("%<s", &[Value::from("one")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
    }

    #[test]
    fn test_width_precision_and_case() {
        let args = [Value::from("hello")];
        assert_eq!(root("[%8s]", &args).unwrap(), "[   hello]");
        assert_eq!(root("[%-8s]", &args).unwrap(), "[hello   ]");
        assert_eq!(root("[%.3s]", &args).unwrap(), "[hel]");
        assert_eq!(root("[%S]", &args).unwrap(), "[HELLO]");
        assert_eq!(root("%X", &[Value::from(255)]).unwrap(), "FF");
    }

    #[test]
    fn test_upper_case_ignores_locale() {
        let args = [Value::from("straße i")];
        assert_eq!(format_in(&Locale::GERMAN, "%S", &args).unwrap(), "STRASSE I");
        let turkish = Locale::parse("tr-TR").unwrap();
        assert_eq!(format_in(&turkish, "%S", &args).unwrap(), "STRASSE I");
    }

    #[test]
    fn test_boolean_and_null() {
        assert_eq!(root("%b", &[Value::Null]).unwrap(), "false");
        assert_eq!(root("%b", &[Value::from("x")]).unwrap(), "true");
        assert_eq!(root("%B", &[Value::from(false)]).unwrap(), "FALSE");
        assert_eq!(root("%d", &[Value::Null]).unwrap(), "null");
        assert_eq!(root("%5s", &[Value::from(None::<i32>)]).unwrap(), " null");
    }

    #[test]
    fn test_char() {
        assert_eq!(root("%c", &[Value::from('z')]).unwrap(), "z");
        assert_eq!(root("%c", &[Value::from(65)]).unwrap(), "A");
        assert_eq!(root("%C", &[Value::from('z')]).unwrap(), "Z");
        let err = root("%c", &[Value::from(0x110000)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
        let err = root("%c", &[Value::from("z")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentTypeMismatch);
    }

    #[test]
    fn test_hash_code() {
        assert_eq!(root("%h", &[Value::from("hello")]).unwrap(), "5e918d2");
        assert_eq!(root("%h", &[Value::Null]).unwrap(), "null");
    }

    #[test]
    fn test_percent_and_newline() {
        assert_eq!(root("100%% done%n", &[]).unwrap(), "100% done\n");
        assert_eq!(root("[%-3%]", &[]).unwrap(), "[%  ]");
    }

    #[test]
    fn test_locale_grouping() {
        let args = [Value::from(1234567890)];
        assert_eq!(format_in(&Locale::GERMAN, "%,d", &args).unwrap(), "1.234.567.890");
        assert_eq!(format_in(&Locale::US, "%,d", &args).unwrap(), "1,234,567,890");
        assert_eq!(format_in(&Locale::FRANCE, "%.2f", &[Value::from(2.5)]).unwrap(), "2,50");
    }

    #[test]
    fn test_date_time() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let args = [Value::from(date)];
        assert_eq!(root("%tF", &args).unwrap(), "2020-02-29");
        assert_eq!(root("%1$te %1$tB %1$tY", &args).unwrap(), "29 February 2020");
        assert_eq!(format_in(&Locale::GERMAN, "%tB", &args).unwrap(), "Februar");
        assert_eq!(root("%TB", &args).unwrap(), "FEBRUARY");
    }

    #[test]
    fn test_date_time_bound_to_integer_conversion() {
        let now = Utc.with_ymd_and_hms(2017, 6, 4, 12, 0, 0).unwrap();
        let err = root("Local time: %d", &[Value::from(now)]).unwrap_err();
        assert!(matches!(
            err,
            TextError::ArgumentTypeMismatch { found: "date-time", .. }
        ));
    }

    #[test]
    fn test_malformed_pattern_checked_before_arguments() {
        let err = root("%d then %$", &[Value::from("not a number")]).unwrap_err();
        assert!(matches!(
            err,
            TextError::MalformedPattern(PatternError::UnknownConversion(ref c)) if c == "$"
        ));
    }

    #[test]
    fn test_deferred_text_argument() {
        let inner = crate::text::StringAsText::new("inner");
        assert_eq!(root("<%s>", &[Value::from(inner)]).unwrap(), "<inner>");
    }
}
