//! Formatted text: a pattern plus arguments, rendered on demand
//!
//! Building a [`FormattedText`] only captures the pattern source, the
//! optional locale and the arguments. Nothing is resolved or validated until
//! [`FormattedText::render`] is called, and every call renders afresh.

use super::{SharedText, StringAsText, Text};
use crate::error::TextResult;
use crate::format;
use crate::locale::Locale;
use crate::value::{ArgumentList, Value};
use std::fmt;
use std::sync::Arc;

/// A pattern and its arguments, not yet rendered
#[derive(Clone)]
pub struct FormattedText {
    pattern: SharedText,
    locale: Option<Locale>,
    args: ArgumentList,
}

impl FormattedText {
    /// Pattern given as a literal string
    pub fn new(pattern: impl Into<String>, args: impl Into<ArgumentList>) -> Self {
        Self::from_shared(Arc::new(StringAsText::new(pattern)), None, args.into())
    }

    /// Pattern given as a deferred text
    pub fn from_text<T>(pattern: T, args: impl Into<ArgumentList>) -> Self
    where
        T: Text + Send + Sync + 'static,
    {
        Self::from_shared(Arc::new(pattern), None, args.into())
    }

    /// Arguments taken from the elements of a collection, in iteration order
    pub fn from_sequence<T, I, V>(pattern: T, values: I) -> Self
    where
        T: Text + Send + Sync + 'static,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_shared(Arc::new(pattern), None, ArgumentList::unpack(values))
    }

    /// Pattern rendered with an explicit locale
    pub fn with_locale<T>(pattern: T, locale: Locale, args: impl Into<ArgumentList>) -> Self
    where
        T: Text + Send + Sync + 'static,
    {
        Self::from_shared(Arc::new(pattern), Some(locale), args.into())
    }

    /// Build from an already shared pattern source
    pub fn from_shared(pattern: SharedText, locale: Option<Locale>, args: ArgumentList) -> Self {
        Self {
            pattern,
            locale,
            args,
        }
    }

    /// The explicit locale, `None` when the process default is used
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn arguments(&self) -> &ArgumentList {
        &self.args
    }

    /// Resolve the pattern and substitute the arguments
    pub fn render(&self) -> TextResult<String> {
        let pattern = self.pattern.resolve()?;
        log::trace!(
            "Rendering '{}' with {} argument(s)",
            pattern,
            self.args.len()
        );

        let rendered = match &self.locale {
            Some(locale) => format::format_in(locale, &pattern, self.args.as_slice()),
            None => format::format(&pattern, self.args.as_slice()),
        };

        if let Err(err) = &rendered {
            log::debug!("Could not render '{}': {}", pattern, err);
        }
        rendered
    }
}

impl Text for FormattedText {
    fn resolve(&self) -> TextResult<String> {
        self.render()
    }
}

impl fmt::Debug for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattedText")
            .field("locale", &self.locale)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
