//! Pattern parsing
//!
//! Splits a pattern into literal runs and format specifiers of the form
//! `%[index$][flags][width][.precision]conversion`, validating each
//! specifier before anything is formatted.

use super::datetime::DateTimeField;
use crate::error::PatternError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

static SPECIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^%(\d+\$)?([-#+ 0,(<]*)?(\d+)?(\.\d+)?([tT])?([a-zA-Z%])")
        .expect("format specifier regex is valid")
});

/// Largest width or precision a specifier may carry
pub const MAX_FIELD: usize = i32::MAX as usize;

/// A parsed piece of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Spec(FormatSpec),
}

/// Which argument a specifier consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgIndex {
    /// Next argument in order
    Ordinary,
    /// Zero-based explicit position, written 1-based as `n$`
    Explicit(usize),
    /// Same argument as the previous specifier, written with the `<` flag
    Previous,
}

/// The conversion character of a specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Boolean,
    HashCode,
    String,
    Char,
    Decimal,
    Octal,
    Hex,
    Scientific,
    Fixed,
    General,
    HexFloat,
    DateTime(DateTimeField),
    Percent,
    LineSeparator,
}

impl Conversion {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' | 'B' => Conversion::Boolean,
            'h' | 'H' => Conversion::HashCode,
            's' | 'S' => Conversion::String,
            'c' | 'C' => Conversion::Char,
            'd' => Conversion::Decimal,
            'o' => Conversion::Octal,
            'x' | 'X' => Conversion::Hex,
            'e' | 'E' => Conversion::Scientific,
            'f' => Conversion::Fixed,
            'g' | 'G' => Conversion::General,
            'a' | 'A' => Conversion::HexFloat,
            '%' => Conversion::Percent,
            'n' => Conversion::LineSeparator,
            _ => return None,
        })
    }

    /// Whether the conversion consumes an argument
    pub fn takes_argument(&self) -> bool {
        !matches!(self, Conversion::Percent | Conversion::LineSeparator)
    }
}

/// Flags between the index and the width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool,
    pub alternate: bool,
    pub plus: bool,
    pub leading_space: bool,
    pub zero_pad: bool,
    pub group: bool,
    pub parenthesize: bool,
    pub previous: bool,
}

impl Flags {
    fn parse(text: &str) -> Result<Self, PatternError> {
        let mut flags = Flags::default();
        for c in text.chars() {
            let slot = match c {
                '-' => &mut flags.left_justify,
                '#' => &mut flags.alternate,
                '+' => &mut flags.plus,
                ' ' => &mut flags.leading_space,
                '0' => &mut flags.zero_pad,
                ',' => &mut flags.group,
                '(' => &mut flags.parenthesize,
                '<' => &mut flags.previous,
                other => return Err(PatternError::IllegalFlags(other.to_string())),
            };
            if *slot {
                return Err(PatternError::DuplicateFlag(c));
            }
            *slot = true;
        }
        Ok(flags)
    }

    fn is_set(&self, flag: char) -> bool {
        match flag {
            '-' => self.left_justify,
            '#' => self.alternate,
            '+' => self.plus,
            ' ' => self.leading_space,
            '0' => self.zero_pad,
            ',' => self.group,
            '(' => self.parenthesize,
            '<' => self.previous,
            _ => false,
        }
    }

    fn is_empty(&self) -> bool {
        *self == Flags::default()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in ['-', '#', '+', ' ', '0', ',', '(', '<'] {
            if self.is_set(flag) {
                write!(f, "{}", flag)?;
            }
        }
        Ok(())
    }
}

/// One validated format specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// The specifier as written, e.g. `%-10.3s`
    pub source: String,
    pub index: ArgIndex,
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub conversion: Conversion,
    /// The conversion character as written (`t`/`T` for date/time)
    pub conversion_char: char,
    /// Upper-case variant (`S`, `X`, `T`, ...)
    pub upper: bool,
}

impl FormatSpec {
    fn from_captures(caps: &Captures<'_>) -> Result<Self, PatternError> {
        let source = caps[0].to_string();

        let mut index = match caps.get(1) {
            Some(m) => {
                let digits = m.as_str().trim_end_matches('$');
                match digits.parse::<usize>() {
                    Ok(n) if n > 0 => ArgIndex::Explicit(n - 1),
                    _ => return Err(PatternError::IllegalIndex(source)),
                }
            }
            None => ArgIndex::Ordinary,
        };

        let flags = Flags::parse(caps.get(2).map_or("", |m| m.as_str()))?;
        if flags.previous {
            index = ArgIndex::Previous;
        }

        let width = match caps.get(3) {
            Some(m) => match m.as_str().parse::<usize>() {
                Ok(width) if width <= MAX_FIELD => Some(width),
                _ => return Err(PatternError::IllegalWidth(source)),
            },
            None => None,
        };

        // Digits that overflow usize are clamped and rejected below
        let precision = caps
            .get(4)
            .map(|m| m.as_str()[1..].parse::<usize>().unwrap_or(usize::MAX));

        let c = caps[6].chars().next().unwrap_or('%');
        let (conversion, conversion_char, upper) = match caps.get(5) {
            Some(t) => {
                let t = t.as_str().chars().next().unwrap_or('t');
                let field = DateTimeField::from_char(c)
                    .ok_or_else(|| PatternError::UnknownConversion(format!("{}{}", t, c)))?;
                (Conversion::DateTime(field), t, t == 'T')
            }
            None => {
                let conversion = Conversion::from_char(c)
                    .ok_or_else(|| PatternError::UnknownConversion(c.to_string()))?;
                (conversion, c, c.is_ascii_uppercase())
            }
        };

        if let Some(precision) = precision.filter(|p| *p > MAX_FIELD) {
            return Err(PatternError::IllegalPrecision {
                precision,
                conversion: conversion_char,
            });
        }

        let spec = Self {
            source,
            index,
            flags,
            width,
            precision,
            conversion,
            conversion_char,
            upper,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), PatternError> {
        match self.conversion {
            Conversion::Percent => {
                self.forbid_precision()?;
                let left_only = Flags {
                    left_justify: true,
                    ..Flags::default()
                };
                if !self.flags.is_empty() && self.flags != left_only {
                    return Err(PatternError::IllegalFlags(self.flags.to_string()));
                }
                self.check_width_flags()
            }
            Conversion::LineSeparator => {
                if self.width.is_some() {
                    return Err(PatternError::IllegalWidth(self.source.clone()));
                }
                self.forbid_precision()?;
                if !self.flags.is_empty() {
                    return Err(PatternError::IllegalFlags(self.flags.to_string()));
                }
                Ok(())
            }
            Conversion::Boolean | Conversion::HashCode | Conversion::String => {
                self.reject_flags(&['#', '+', ' ', '0', ',', '('])?;
                self.check_width_flags()
            }
            Conversion::Char => {
                self.forbid_precision()?;
                self.reject_flags(&['#', '+', ' ', '0', ',', '('])?;
                self.check_width_flags()
            }
            Conversion::Decimal => {
                self.forbid_precision()?;
                self.reject_flags(&['#'])?;
                self.check_numeric()
            }
            Conversion::Octal | Conversion::Hex => {
                self.forbid_precision()?;
                self.reject_flags(&['+', ' ', ',', '('])?;
                self.check_numeric()
            }
            Conversion::Scientific => {
                self.reject_flags(&[','])?;
                self.check_numeric()
            }
            Conversion::Fixed => self.check_numeric(),
            Conversion::General => {
                self.reject_flags(&['#'])?;
                self.check_numeric()
            }
            Conversion::HexFloat => {
                self.reject_flags(&[',', '('])?;
                self.check_numeric()
            }
            Conversion::DateTime(_) => {
                self.forbid_precision()?;
                self.reject_flags(&['#', '+', ' ', '0', ',', '('])?;
                self.check_width_flags()
            }
        }
    }

    fn forbid_precision(&self) -> Result<(), PatternError> {
        match self.precision {
            Some(precision) => Err(PatternError::IllegalPrecision {
                precision,
                conversion: self.conversion_char,
            }),
            None => Ok(()),
        }
    }

    fn reject_flags(&self, rejected: &[char]) -> Result<(), PatternError> {
        match rejected.iter().find(|flag| self.flags.is_set(**flag)) {
            Some(flag) => Err(PatternError::FlagsMismatch {
                flag: *flag,
                conversion: self.conversion_char,
            }),
            None => Ok(()),
        }
    }

    fn check_width_flags(&self) -> Result<(), PatternError> {
        if (self.flags.left_justify || self.flags.zero_pad) && self.width.is_none() {
            return Err(PatternError::MissingWidth(self.source.clone()));
        }
        Ok(())
    }

    fn check_numeric(&self) -> Result<(), PatternError> {
        self.check_width_flags()?;
        if (self.flags.plus && self.flags.leading_space)
            || (self.flags.left_justify && self.flags.zero_pad)
        {
            return Err(PatternError::IllegalFlags(self.flags.to_string()));
        }
        Ok(())
    }
}

/// Parse a whole pattern, failing on the first malformed specifier
pub fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, PatternError> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some(offset) = pattern[pos..].find('%') {
        let start = pos + offset;
        if start > pos {
            segments.push(Segment::Literal(&pattern[pos..start]));
        }

        let Some(caps) = SPECIFIER.captures(&pattern[start..]) else {
            let unknown = pattern[start + 1..]
                .chars()
                .next()
                .map_or_else(|| "%".to_string(), |c| c.to_string());
            return Err(PatternError::UnknownConversion(unknown));
        };

        let spec = FormatSpec::from_captures(&caps)?;
        pos = start + caps[0].len();
        segments.push(Segment::Spec(spec));
    }

    if pos < pattern.len() {
        segments.push(Segment::Literal(&pattern[pos..]));
    }

    log::trace!("Parsed pattern into {} segment(s)", segments.len());
    Ok(segments)
}
