//! Format arguments
//!
//! A [`Value`] is one typed argument; an [`ArgumentList`] is the ordered
//! sequence of them bound to a pattern.

use crate::error::TextResult;
use crate::text::{FormattedText, SharedText, StringAsText, Text};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use std::fmt;
use std::sync::Arc;

/// A single argument substituted into a pattern
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    DateTime(DateTime<FixedOffset>),
    Seq(Vec<Value>),
    /// Deferred text, resolved only when its string form is needed
    Text(SharedText),
}

impl Value {
    /// Wrap a deferred text
    pub fn text(text: impl Text + Send + Sync + 'static) -> Self {
        Value::Text(Arc::new(text))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the runtime type, used in mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::UInt(_) => "unsigned int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::DateTime(_) => "date-time",
            Value::Seq(_) => "sequence",
            Value::Text(_) => "text",
        }
    }

    /// The string form used by `%s`
    ///
    /// Deferred texts are resolved here, so this can fail.
    pub fn render_string(&self) -> TextResult<String> {
        Ok(match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => float_to_string(*f),
            Value::Str(s) => s.clone(),
            Value::DateTime(dt) => dt.to_string(),
            Value::Seq(items) => {
                let rendered = items
                    .iter()
                    .map(Value::render_string)
                    .collect::<TextResult<Vec<_>>>()?;
                format!("[{}]", rendered.join(", "))
            }
            Value::Text(text) => text.resolve()?,
        })
    }

    /// Stable 32-bit hash used by `%h`, `None` for null
    ///
    /// Strings hash over UTF-16 code units, sequences combine element
    /// hashes with the factor 31, and integers outside the 32-bit range fold
    /// their high half into the low half.
    pub fn hash_code(&self) -> TextResult<Option<i32>> {
        Ok(Some(match self {
            Value::Null => return Ok(None),
            Value::Bool(true) => 1231,
            Value::Bool(false) => 1237,
            Value::Char(c) => *c as i32,
            Value::Int(i) => int_hash(*i),
            Value::UInt(u) => match i64::try_from(*u) {
                Ok(i) => int_hash(i),
                Err(_) => fold_hash(*u),
            },
            Value::Float(f) => {
                let bits = if f.is_nan() { 0x7ff8_0000_0000_0000 } else { f.to_bits() };
                fold_hash(bits)
            }
            Value::Str(s) => string_hash(s),
            Value::DateTime(dt) => fold_hash(dt.timestamp_millis() as u64),
            Value::Seq(items) => {
                let mut hash: i32 = 1;
                for item in items {
                    let item_hash = item.hash_code()?.unwrap_or(0);
                    hash = hash.wrapping_mul(31).wrapping_add(item_hash);
                }
                hash
            }
            Value::Text(text) => string_hash(&text.resolve()?),
        }))
    }
}

fn int_hash(value: i64) -> i32 {
    match i32::try_from(value) {
        Ok(small) => small,
        Err(_) => fold_hash(value as u64),
    }
}

fn fold_hash(bits: u64) -> i32 {
    (bits ^ (bits >> 32)) as u32 as i32
}

fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Shortest round-trip form, always with a fraction or an exponent
///
/// `1.0`, `0.001`, `1.0E7`, `1.5E-4`, `NaN`, `-Infinity`.
fn float_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let scientific = format!("{:e}", value);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => scientific,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::DateTime(dt) => f.debug_tuple("DateTime").field(dt).finish(),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Value::Text(_) => f.write_str("Text(..)"),
        }
    }
}

impl PartialEq for Value {
    /// Deferred texts are equal only when they are the same shared text
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! value_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Int(value as i64)
            }
        })*
    };
}

macro_rules! value_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::UInt(value as u64)
            }
        })*
    };
}

value_from_signed!(i8, i16, i32, i64, isize);
value_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    /// Widens through the shortest decimal form, so `0.1f32` stays `0.1`
    fn from(value: f32) -> Self {
        let widened = value.to_string().parse().unwrap_or(f64::from(value));
        Value::Float(widened)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Value::DateTime(value.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for Value {
    /// Naive date-times are taken as UTC
    fn from(value: NaiveDateTime) -> Self {
        Utc.from_utc_datetime(&value).into()
    }
}

impl From<NaiveDate> for Value {
    /// Midnight UTC of the date
    fn from(value: NaiveDate) -> Self {
        value.and_time(NaiveTime::MIN).into()
    }
}

impl From<FormattedText> for Value {
    fn from(value: FormattedText) -> Self {
        Value::text(value)
    }
}

impl From<StringAsText> for Value {
    fn from(value: StringAsText) -> Self {
        Value::text(value)
    }
}

impl From<SharedText> for Value {
    fn from(value: SharedText) -> Self {
        Value::Text(value)
    }
}

/// Ordered arguments bound to a pattern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    values: Vec<Value>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional values
    ///
    /// When the only value is a sequence, its elements become the
    /// arguments: `[Seq([1, "text"])]` binds `1` and `"text"`, exactly as
    /// `[1, "text"]` does. Any other shape is kept as given.
    pub fn from_values(values: Vec<Value>) -> Self {
        match <[Value; 1]>::try_from(values) {
            Ok([Value::Seq(items)]) => Self { values: items },
            Ok([single]) => Self {
                values: vec![single],
            },
            Err(values) => Self { values },
        }
    }

    /// Unpack the elements of a collection into positional arguments,
    /// preserving iteration order
    pub fn unpack<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            values: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one argument
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

impl<T: Into<Value>> From<Vec<T>> for ArgumentList {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ArgumentList {
    fn from(values: [T; N]) -> Self {
        Self::from_values(values.into_iter().map(Into::into).collect())
    }
}

impl From<()> for ArgumentList {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl<T: Into<Value>> FromIterator<T> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sequence_is_unpacked() {
        let args = ArgumentList::from_values(vec![Value::from(vec![
            Value::from(1),
            Value::from("text"),
        ])]);
        assert_eq!(args.as_slice(), &[Value::Int(1), Value::Str("text".into())]);
    }

    #[test]
    fn test_sequence_among_others_is_kept() {
        let args = ArgumentList::from_values(vec![Value::from(vec![1, 2]), Value::from(3)]);
        assert_eq!(args.len(), 2);
        assert!(matches!(args.as_slice()[0], Value::Seq(_)));
    }

    #[test]
    fn test_single_scalar_is_kept() {
        let args: ArgumentList = vec![7].into();
        assert_eq!(args.as_slice(), &[Value::Int(7)]);
    }

    #[test]
    fn test_unpack_preserves_order() {
        let args = ArgumentList::unpack(["c", "a", "b"]);
        let rendered: Vec<String> = args.iter().map(|v| v.render_string().unwrap()).collect();
        assert_eq!(rendered, ["c", "a", "b"]);
    }

    #[test]
    fn test_builder_and_empty() {
        assert!(ArgumentList::from(()).is_empty());
        let args = ArgumentList::new().with(1u8).with('x').with(None::<i32>);
        assert_eq!(
            args.as_slice(),
            &[Value::UInt(1), Value::Char('x'), Value::Null]
        );
    }

    #[test]
    fn test_render_string() {
        assert_eq!(Value::Null.render_string().unwrap(), "null");
        let seq = Value::from(vec![Value::from(1), Value::from("a")]);
        assert_eq!(seq.render_string().unwrap(), "[1, a]");
        assert_eq!(Value::from(1.0).render_string().unwrap(), "1.0");
        assert_eq!(Value::from(0.1f32).render_string().unwrap(), "0.1");
        assert_eq!(Value::from(1.0e10).render_string().unwrap(), "1.0E10");
        assert_eq!(Value::from(1.5e-4).render_string().unwrap(), "1.5E-4");
        assert_eq!(Value::from(f64::NEG_INFINITY).render_string().unwrap(), "-Infinity");
        assert_eq!(Value::text(StringAsText::new("lazy")).render_string().unwrap(), "lazy");
    }

    #[test]
    fn test_hash_codes() {
        assert_eq!(Value::from("hello").hash_code().unwrap(), Some(99162322));
        assert_eq!(Value::from(true).hash_code().unwrap(), Some(1231));
        assert_eq!(Value::from(-1).hash_code().unwrap(), Some(-1));
        assert_eq!(Value::from(1.0).hash_code().unwrap(), Some(1072693248));
        assert_eq!(Value::Null.hash_code().unwrap(), None);
        assert_eq!(Value::from(vec![1, 2]).hash_code().unwrap(), Some(994));
    }

    #[test]
    fn test_date_conversions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let Value::DateTime(dt) = Value::from(date) else {
            panic!("expected a date-time");
        };
        assert_eq!(dt.timestamp(), 1_709_942_400);
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from(1u64).type_name(), "unsigned int");
        assert_eq!(Value::from("x").type_name(), "string");
    }
}
