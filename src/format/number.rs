//! Integer and floating-point conversions
//!
//! Integral conversions (`d`, `o`, `x`) accept `Int` and `UInt` values;
//! floating-point conversions (`e`, `f`, `g`, `a`) accept only `Float`.
//! Negative values print their 64-bit two's complement under `o` and `x`,
//! whatever the width of the Rust type they came from: `-1i32` prints as
//! `ffffffffffffffff`, not `ffffffff`.
//!
//! Floats are rounded half-up on their shortest decimal digits, so `2.675`
//! with two decimals prints `2.68` even though its binary value lies below.

use super::specifier::{Conversion, FormatSpec};
use crate::error::{TextError, TextResult};
use crate::locale::NumberSymbols;
use crate::utils::text::group_digits;
use crate::value::Value;

/// Format an integral conversion
pub(crate) fn format_integer(
    spec: &FormatSpec,
    value: &Value,
    symbols: &NumberSymbols,
) -> TextResult<String> {
    let (negative, magnitude, bits) = match value {
        Value::Int(v) => (*v < 0, v.unsigned_abs(), *v as u64),
        Value::UInt(v) => (false, *v, *v),
        other => return Err(mismatch(spec, other)),
    };

    Ok(match spec.conversion {
        Conversion::Octal => {
            let prefix = if spec.flags.alternate { "0" } else { "" };
            apply_sign(spec, false, prefix, &format!("{:o}", bits))
        }
        Conversion::Hex => {
            let prefix = if spec.flags.alternate { "0x" } else { "" };
            apply_sign(spec, false, prefix, &format!("{:x}", bits))
        }
        _ => {
            let digits = magnitude.to_string();
            let digits = if spec.flags.group {
                group_digits(&digits, symbols.grouping_separator, symbols.grouping_size)
            } else {
                digits
            };
            apply_sign(spec, negative, "", &digits)
        }
    })
}

/// Format a floating-point conversion
pub(crate) fn format_float(
    spec: &FormatSpec,
    value: &Value,
    symbols: &NumberSymbols,
) -> TextResult<String> {
    let value = match value {
        Value::Float(v) => *v,
        other => return Err(mismatch(spec, other)),
    };

    if value.is_nan() {
        return Ok("NaN".to_string());
    }
    let negative = value.is_sign_negative();
    if value.is_infinite() {
        let (lead, trail) = sign_marks(spec, negative);
        return Ok(format!("{}Infinity{}", lead, trail));
    }

    let magnitude = value.abs();
    let flags = &spec.flags;
    Ok(match spec.conversion {
        Conversion::Scientific => {
            let precision = spec.precision.unwrap_or(6);
            let digits = scientific(magnitude, precision, flags.alternate, symbols);
            apply_sign(spec, negative, "", &digits)
        }
        Conversion::General => {
            let digits = general(magnitude, spec.precision, flags.group, symbols);
            apply_sign(spec, negative, "", &digits)
        }
        Conversion::HexFloat => {
            apply_sign(spec, negative, "0x", &hex_float(magnitude, spec.precision))
        }
        _ => {
            let precision = spec.precision.unwrap_or(6);
            let digits = fixed(magnitude, precision, flags.alternate, flags.group, symbols);
            apply_sign(spec, negative, "", &digits)
        }
    })
}

fn mismatch(spec: &FormatSpec, value: &Value) -> TextError {
    TextError::mismatch(spec.conversion_char.to_string(), value.type_name())
}

fn sign_marks(spec: &FormatSpec, negative: bool) -> (&'static str, &'static str) {
    let flags = &spec.flags;
    if negative {
        if flags.parenthesize {
            ("(", ")")
        } else {
            ("-", "")
        }
    } else if flags.plus {
        ("+", "")
    } else if flags.leading_space {
        (" ", "")
    } else {
        ("", "")
    }
}

/// Sign, prefix, zero padding up to the width, digits, closing parenthesis
fn apply_sign(spec: &FormatSpec, negative: bool, prefix: &str, digits: &str) -> String {
    let (lead, trail) = sign_marks(spec, negative);
    let mut out = String::with_capacity(spec.width.unwrap_or(0).max(digits.len() + 4));
    out.push_str(lead);
    out.push_str(prefix);

    if let (true, Some(width)) = (spec.flags.zero_pad, spec.width) {
        let used = lead.len() + prefix.len() + digits.chars().count() + trail.len();
        for _ in used..width {
            out.push('0');
        }
    }

    out.push_str(digits);
    out.push_str(trail);
    out
}

/// Decimal digits of a float, rounded half-up the way they are printed
///
/// The value is `0.d1d2d3... * 10^point`, built from the shortest
/// round-trip representation so `2.675` rounds to `2.68`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits {
    digits: Vec<u8>,
    point: i64,
}

impl Digits {
    fn of(magnitude: f64) -> Self {
        if magnitude == 0.0 {
            return Self {
                digits: vec![0],
                point: 1,
            };
        }

        let shortest = format!("{:e}", magnitude);
        let (mantissa, exponent) = shortest.split_once('e').unwrap_or((shortest.as_str(), "0"));
        let exponent: i64 = exponent.parse().unwrap_or(0);
        Self {
            digits: mantissa
                .bytes()
                .filter(u8::is_ascii_digit)
                .map(|b| b - b'0')
                .collect(),
            point: exponent + 1,
        }
    }

    /// Keep the first `keep` digits, rounding half-up on the next one
    fn round(&mut self, keep: i64) {
        if keep >= self.digits.len() as i64 {
            return;
        }
        if keep < 0 {
            self.digits.clear();
            return;
        }

        let keep = keep as usize;
        let round_up = self.digits[keep] >= 5;
        self.digits.truncate(keep);
        if !round_up {
            return;
        }

        for digit in self.digits.iter_mut().rev() {
            if *digit < 9 {
                *digit += 1;
                return;
            }
            *digit = 0;
        }
        self.digits.insert(0, 1);
        self.point += 1;
    }

    fn digit(&self, index: i64) -> char {
        let digit = usize::try_from(index)
            .ok()
            .and_then(|i| self.digits.get(i))
            .copied()
            .unwrap_or(0);
        char::from(b'0' + digit)
    }

    fn is_zero(&self) -> bool {
        self.digits.iter().all(|d| *d == 0)
    }

    /// Decimal exponent of the leading digit
    fn exponent(&self) -> i64 {
        if self.is_zero() {
            0
        } else {
            self.point - 1
        }
    }
}

fn fixed(
    magnitude: f64,
    precision: usize,
    alternate: bool,
    group: bool,
    symbols: &NumberSymbols,
) -> String {
    let mut digits = Digits::of(magnitude);
    digits.round(digits.point + precision as i64);
    fixed_digits(&digits, precision, alternate, group, symbols)
}

fn fixed_digits(
    digits: &Digits,
    precision: usize,
    alternate: bool,
    group: bool,
    symbols: &NumberSymbols,
) -> String {
    let integer: String = if digits.point > 0 {
        (0..digits.point).map(|i| digits.digit(i)).collect()
    } else {
        "0".to_string()
    };

    let mut out = if group {
        group_digits(&integer, symbols.grouping_separator, symbols.grouping_size)
    } else {
        integer
    };

    if precision > 0 || alternate {
        out.push(symbols.decimal_separator);
    }
    out.extend((0..precision as i64).map(|i| digits.digit(digits.point + i)));
    out
}

/// `d.ddddde+xx`, with at least two exponent digits
fn scientific(magnitude: f64, precision: usize, alternate: bool, symbols: &NumberSymbols) -> String {
    let mut digits = Digits::of(magnitude);
    digits.round(1 + precision as i64);
    scientific_digits(&digits, precision, alternate, symbols)
}

fn scientific_digits(
    digits: &Digits,
    precision: usize,
    alternate: bool,
    symbols: &NumberSymbols,
) -> String {
    let mut out = String::with_capacity(precision + 6);
    out.push(digits.digit(0));
    if precision > 0 || alternate {
        out.push(symbols.decimal_separator);
    }
    out.extend((1..=precision as i64).map(|i| digits.digit(i)));

    let exponent = digits.exponent();
    let sign = if exponent < 0 { '-' } else { '+' };
    out.push_str(&format!("e{}{:02}", sign, exponent.unsigned_abs()));
    out
}

/// Fixed notation when the rounded value lies in `[1e-4, 10^precision)`,
/// scientific otherwise; `precision` counts significant digits
fn general(
    magnitude: f64,
    precision: Option<usize>,
    group: bool,
    symbols: &NumberSymbols,
) -> String {
    let precision = match precision {
        None => 6,
        Some(0) => 1,
        Some(p) => p,
    };

    let mut digits = Digits::of(magnitude);
    digits.round(precision as i64);
    if digits.is_zero() {
        return fixed_digits(&digits, precision - 1, false, group, symbols);
    }

    let exponent = digits.exponent();
    if exponent >= -4 && exponent < precision as i64 {
        let decimals = (precision as i64 - 1 - exponent) as usize;
        fixed_digits(&digits, decimals, false, group, symbols)
    } else {
        scientific_digits(&digits, precision - 1, false, symbols)
    }
}

/// Hexadecimal significand and binary exponent, without the `0x` prefix
///
/// With a precision the significand is rounded half-even to that many hex
/// digits and padded with zeros; a precision of 0 counts as 1.
fn hex_float(magnitude: f64, precision: Option<usize>) -> String {
    let bits = magnitude.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i64;
    let significand = bits & ((1u64 << 52) - 1);
    let (mut lead, mut exponent) = match (magnitude == 0.0, exponent_bits) {
        (true, _) => (0u64, 0),
        (false, 0) => (0, -1022),
        (false, e) => (1, e - 1023),
    };

    let precision = precision.map(|p| p.max(1));
    let fraction = match precision {
        Some(p) if p < 13 => {
            let shift = 52 - 4 * p as u32;
            let full = (lead << 52) | significand;
            let mut kept = full >> shift;
            let rest = full & ((1u64 << shift) - 1);
            let half = 1u64 << (shift - 1);
            if rest > half || (rest == half && kept & 1 == 1) {
                kept += 1;
            }

            lead = kept >> (4 * p);
            let mut fraction = kept & ((1u64 << (4 * p)) - 1);
            if lead == 2 {
                lead = 1;
                fraction = 0;
                exponent += 1;
            }
            format!("{:0width$x}", fraction, width = p)
        }
        _ => {
            let hex = format!("{:013x}", significand);
            let hex = hex.trim_end_matches('0');
            let hex = if hex.is_empty() { "0" } else { hex };
            match precision {
                Some(p) => format!("{:0<width$}", hex, width = p),
                None => hex.to_string(),
            }
        }
    };

    format!("{}.{}p{}", lead, fraction, exponent)
}
