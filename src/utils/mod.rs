//! Utilities module for formatted text
//!
//! Shared helper functions used by the conversions:
//! - Justification to a field width
//! - Precision truncation
//! - Digit grouping

/// Text utilities
pub mod text {
    /// Pad `s` with spaces to `width` characters, on the right when `left`
    pub fn justify(s: String, width: Option<usize>, left: bool) -> String {
        let len = s.chars().count();
        match width {
            Some(width) if width > len => {
                let padding = " ".repeat(width - len);
                if left {
                    s + &padding
                } else {
                    padding + &s
                }
            }
            _ => s,
        }
    }

    /// Keep at most `precision` characters
    pub fn truncate(s: String, precision: Option<usize>) -> String {
        match precision {
            Some(max) => match s.char_indices().nth(max) {
                Some((cut, _)) => s[..cut].to_string(),
                None => s,
            },
            None => s,
        }
    }

    /// Insert `separator` between every `size` digits, counting from the right
    pub fn group_digits(digits: &str, separator: char, size: usize) -> String {
        if size == 0 || digits.len() <= size {
            return digits.to_string();
        }

        let mut grouped = String::with_capacity(digits.len() + digits.len() / size * 3);
        let first = digits.len() % size;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + size - first) % size == 0 {
                grouped.push(separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justify() {
        assert_eq!(text::justify("ab".to_string(), Some(5), false), "   ab");
        assert_eq!(text::justify("ab".to_string(), Some(5), true), "ab   ");
        assert_eq!(text::justify("abcdef".to_string(), Some(3), false), "abcdef");
        assert_eq!(text::justify("ä".to_string(), Some(2), false), " ä");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(text::truncate("hello".to_string(), Some(3)), "hel");
        assert_eq!(text::truncate("héllo".to_string(), Some(2)), "hé");
        assert_eq!(text::truncate("hi".to_string(), Some(10)), "hi");
        assert_eq!(text::truncate("hi".to_string(), None), "hi");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(text::group_digits("1234567890", '.', 3), "1.234.567.890");
        assert_eq!(text::group_digits("123456", ',', 3), "123,456");
        assert_eq!(text::group_digits("999", ',', 3), "999");
        assert_eq!(text::group_digits("12345", ' ', 2), "1 23 45");
    }
}
