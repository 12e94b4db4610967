//! Formatted Text - lazily rendered, locale-aware printf-style text
//!
//! A [`FormattedText`] pairs a pattern source with an ordered list of
//! arguments and an optional [`Locale`]. Construction never fails and does
//! no work; [`FormattedText::render`] resolves the pattern, substitutes the
//! arguments and reports malformed patterns or mismatched arguments as a
//! [`TextError`]. Every render runs again from scratch.
//!
//! ```
//! use formatted_text::{FormattedText, Locale, StringAsText, Value};
//!
//! let text = FormattedText::with_locale(
//!     StringAsText::new("%d. Formatted %s"),
//!     Locale::ROOT,
//!     vec![Value::from(1), Value::from("text")],
//! );
//! assert_eq!(text.render().unwrap(), "1. Formatted text");
//! ```

mod macros;
mod utils;

pub mod config;
pub mod error;
pub mod format;
pub mod locale;
pub mod text;
pub mod value;

pub use config::Config;
pub use error::{ConfigError, ErrorKind, LocaleError, PatternError, TextError, TextResult};
pub use locale::Locale;
pub use text::{FormattedText, SharedText, StringAsText, Text, TextFn, TextFromFile};
pub use value::{ArgumentList, Value};
