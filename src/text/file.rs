//! Text read from a file when resolved
//!
//! Provides file-backed texts with:
//! - UTF-8 and UTF-16 encoding detection
//! - File size limits

use super::Text;
use crate::config::{Config, MAX_TEXT_FILE_SIZE};
use crate::error::{TextError, TextResult};
use std::path::{Path, PathBuf};

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileEncoding {
    /// UTF-8 without BOM
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
}

/// A text whose content is the file at `path`, read on every resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFromFile {
    path: PathBuf,
    max_size: u64,
}

impl TextFromFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: MAX_TEXT_FILE_SIZE,
        }
    }

    /// Refuse files larger than `max_size` bytes
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Size limit taken from `config`
    pub fn from_config(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self::new(path).with_max_size(config.max_text_file_size)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Text for TextFromFile {
    fn resolve(&self) -> TextResult<String> {
        let path = &self.path;

        let metadata = std::fs::metadata(path).map_err(|e| TextError::Read {
            path: path.clone(),
            source: e,
        })?;

        let size = metadata.len();
        if size > self.max_size {
            return Err(TextError::TooLarge {
                path: path.clone(),
                size,
                max_size: self.max_size,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| TextError::Read {
            path: path.clone(),
            source: e,
        })?;

        log::trace!("Read {} bytes of text from {}", bytes.len(), path.display());

        decode_content(&bytes).ok_or_else(|| TextError::Encoding { path: path.clone() })
    }
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        FileEncoding::Utf8Bom
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        FileEncoding::Utf16Le
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        FileEncoding::Utf16Be
    } else {
        FileEncoding::Utf8
    }
}

/// Decode bytes to a string, `None` when they are not valid text
fn decode_content(bytes: &[u8]) -> Option<String> {
    match detect_encoding(bytes) {
        FileEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        FileEncoding::Utf8Bom => std::str::from_utf8(&bytes[3..]).ok().map(str::to_string),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let units = bytes.chunks_exact(2).map(|chunk| unit([chunk[0], chunk[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    fn temp_file(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_utf8() {
        let file = temp_file("%d. Formatted %s".as_bytes());
        let text = TextFromFile::new(file.path());
        assert_eq!(text.resolve().unwrap(), "%d. Formatted %s");
    }

    #[test]
    fn test_strips_utf8_bom() {
        let file = temp_file(b"\xEF\xBB\xBFpattern");
        assert_eq!(TextFromFile::new(file.path()).resolve().unwrap(), "pattern");
    }

    #[test]
    fn test_reads_utf16() {
        let mut le = vec![0xFF, 0xFE];
        le.extend("h\u{e9}".encode_utf16().flat_map(u16::to_le_bytes));
        assert_eq!(TextFromFile::new(temp_file(&le).path()).resolve().unwrap(), "h\u{e9}");

        let mut be = vec![0xFE, 0xFF];
        be.extend("ok".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(TextFromFile::new(temp_file(&be).path()).resolve().unwrap(), "ok");
    }

    #[test]
    fn test_rejects_binary() {
        let file = temp_file(&[0x80, 0x81, 0x00]);
        let err = TextFromFile::new(file.path()).resolve().unwrap_err();
        assert!(matches!(err, TextError::Encoding { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextFromFile::new(dir.path().join("absent.txt"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, TextError::Read { .. }));
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn test_size_limit() {
        let file = temp_file(b"0123456789");
        let err = TextFromFile::new(file.path())
            .with_max_size(4)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, TextError::TooLarge { size: 10, max_size: 4, .. }));

        let config = Config {
            max_text_file_size: 16,
            ..Config::default()
        };
        let text = TextFromFile::from_config(file.path(), &config);
        assert_eq!(text.resolve().unwrap(), "0123456789");
    }

    #[test]
    fn test_rereads_on_every_resolve() {
        let file = temp_file(b"first");
        let text = TextFromFile::new(file.path());
        assert_eq!(text.resolve().unwrap(), "first");

        std::fs::write(file.path(), b"second").unwrap();
        assert_eq!(text.resolve().unwrap(), "second");
    }
}
