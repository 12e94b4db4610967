//! Variadic constructors for [`FormattedText`](crate::FormattedText)

/// Build a [`FormattedText`](crate::FormattedText) from a pattern and
/// positional arguments, rendered with the process default locale
///
/// The pattern is any [`Text`](crate::Text). A single collection argument is
/// unpacked into its elements.
///
/// ```
/// use formatted_text::formatted;
///
/// let text = formatted!("%s has %d items", "cart", 3);
/// assert_eq!(text.arguments().len(), 2);
/// ```
#[macro_export]
macro_rules! formatted {
    ($pattern:expr $(,)?) => {
        $crate::FormattedText::from_text($pattern, $crate::ArgumentList::new())
    };
    ($pattern:expr, $($arg:expr),+ $(,)?) => {
        $crate::FormattedText::from_text(
            $pattern,
            $crate::ArgumentList::from_values(vec![$($crate::Value::from($arg)),+]),
        )
    };
}

/// Like [`formatted!`], with an explicit [`Locale`](crate::Locale)
///
/// ```
/// use formatted_text::{formatted_in, Locale};
///
/// let text = formatted_in!(Locale::GERMAN, "%,d", 1234567890);
/// assert_eq!(text.render().unwrap(), "1.234.567.890");
/// ```
#[macro_export]
macro_rules! formatted_in {
    ($locale:expr, $pattern:expr $(,)?) => {
        $crate::FormattedText::with_locale($pattern, $locale, $crate::ArgumentList::new())
    };
    ($locale:expr, $pattern:expr, $($arg:expr),+ $(,)?) => {
        $crate::FormattedText::with_locale(
            $pattern,
            $locale,
            $crate::ArgumentList::from_values(vec![$($crate::Value::from($arg)),+]),
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::{Locale, Value};

    #[test]
    fn test_no_arguments() {
        let text = formatted!("100%% plain");
        assert!(text.arguments().is_empty());
        assert_eq!(formatted_in!(Locale::ROOT, "100%%").render().unwrap(), "100%");
    }

    #[test]
    fn test_mixed_argument_types() {
        let text = formatted_in!(Locale::ROOT, "%s|%d|%b|%c|%.1f", "s", 7u8, true, 'c', 0.26,);
        assert_eq!(text.render().unwrap(), "s|7|true|c|0.3");
    }

    #[test]
    fn test_lone_collection_is_unpacked() {
        let text = formatted!("%s-%s", vec!["a", "b"]);
        assert_eq!(
            text.arguments().as_slice(),
            &[Value::from("a"), Value::from("b")]
        );
    }

    #[test]
    fn test_collection_among_others_is_kept() {
        let text = formatted_in!(Locale::ROOT, "%s %s", "items", vec![1, 2]);
        assert_eq!(text.render().unwrap(), "items [1, 2]");
    }
}
