//! Text module for formatted text
//!
//! Handles deferred text values including:
//! - The `Text` capability shared by every lazily produced string
//! - Constant and closure-backed texts
//! - File-backed texts
//! - Formatted texts rendered from a pattern and arguments

mod file;
pub mod formatted;

pub use file::TextFromFile;
pub use formatted::FormattedText;

use crate::error::TextResult;
use std::fmt;
use std::sync::Arc;

/// A string that is produced on demand
///
/// Resolving may do work (read a file, render a pattern) and may fail.
/// Implementations should return the same string for the same state.
pub trait Text {
    /// Produce the string
    fn resolve(&self) -> TextResult<String>;
}

/// Shared, thread-safe handle to a text
pub type SharedText = Arc<dyn Text + Send + Sync>;

impl Text for str {
    fn resolve(&self) -> TextResult<String> {
        Ok(self.to_owned())
    }
}

impl Text for String {
    fn resolve(&self) -> TextResult<String> {
        Ok(self.clone())
    }
}

impl<T: Text + ?Sized> Text for &T {
    fn resolve(&self) -> TextResult<String> {
        (**self).resolve()
    }
}

impl<T: Text + ?Sized> Text for Box<T> {
    fn resolve(&self) -> TextResult<String> {
        (**self).resolve()
    }
}

impl<T: Text + ?Sized> Text for Arc<T> {
    fn resolve(&self) -> TextResult<String> {
        (**self).resolve()
    }
}

/// A text that always resolves to the string it was built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StringAsText(String);

impl StringAsText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Text for StringAsText {
    fn resolve(&self) -> TextResult<String> {
        Ok(self.0.clone())
    }
}

impl From<&str> for StringAsText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StringAsText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// A text computed by a closure each time it is resolved
#[derive(Clone)]
pub struct TextFn<F>(F);

impl<F> TextFn<F>
where
    F: Fn() -> TextResult<String>,
{
    pub fn new(producer: F) -> Self {
        Self(producer)
    }
}

impl<F> Text for TextFn<F>
where
    F: Fn() -> TextResult<String>,
{
    fn resolve(&self) -> TextResult<String> {
        (self.0)()
    }
}

impl<F> fmt::Debug for TextFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TextFn(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, TextError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_string_as_text() {
        let text = StringAsText::new("constant");
        assert_eq!(text.resolve().unwrap(), "constant");
        assert_eq!(text.as_str(), "constant");
    }

    #[test]
    fn test_str_and_string_are_texts() {
        assert_eq!("slice".resolve().unwrap(), "slice");
        assert_eq!(String::from("owned").resolve().unwrap(), "owned");
    }

    #[test]
    fn test_shared_text() {
        let shared: SharedText = Arc::new(StringAsText::new("shared"));
        let clone = Arc::clone(&shared);
        assert_eq!(clone.resolve().unwrap(), "shared");
    }

    #[test]
    fn test_text_fn_resolves_every_time() {
        let calls = AtomicUsize::new(0);
        let text = TextFn::new(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("call {}", n))
        });

        assert_eq!(text.resolve().unwrap(), "call 0");
        assert_eq!(text.resolve().unwrap(), "call 1");
    }

    #[test]
    fn test_text_fn_propagates_failure() {
        let text = TextFn::new(|| Err(TextError::from(anyhow::anyhow!("offline"))));
        let err = text.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }
}
