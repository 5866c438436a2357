use std::fmt::Display;
use std::str::FromStr;

use crate::A2lError;

/// Character encodings that are supported for output
///
/// Text written in one of these encodings starts with the byte order mark of the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Charset {
    /// Look up a charset by name. Case and the `-` / `_` separators are not significant;
    /// `UTF-16` and `UTF-32` without a byte order suffix are big endian.
    pub fn from_name(name: &str) -> Result<Self, A2lError> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "UTF8" => Ok(Charset::Utf8),
            "UTF16LE" => Ok(Charset::Utf16Le),
            "UTF16BE" | "UTF16" => Ok(Charset::Utf16Be),
            "UTF32LE" => Ok(Charset::Utf32Le),
            "UTF32BE" | "UTF32" => Ok(Charset::Utf32Be),
            _ => Err(A2lError::EncodingError {
                charset: name.to_string(),
            }),
        }
    }

    /// the byte order mark of the charset
    #[must_use]
    pub fn bom(self) -> &'static [u8] {
        match self {
            Charset::Utf8 => &[0xEF, 0xBB, 0xBF],
            Charset::Utf16Le => &[0xFF, 0xFE],
            Charset::Utf16Be => &[0xFE, 0xFF],
            Charset::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Charset::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    /// Encode the text, preceded by the byte order mark
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut output = Vec::with_capacity(text.len() * 4 + 4);
        output.extend_from_slice(self.bom());
        match self {
            Charset::Utf8 => output.extend_from_slice(text.as_bytes()),
            Charset::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| output.extend_from_slice(&unit.to_le_bytes())),
            Charset::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| output.extend_from_slice(&unit.to_be_bytes())),
            Charset::Utf32Le => text
                .chars()
                .for_each(|c| output.extend_from_slice(&u32::from(c).to_le_bytes())),
            Charset::Utf32Be => text
                .chars()
                .for_each(|c| output.extend_from_slice(&u32::from(c).to_be_bytes())),
        }
        output
    }
}

impl FromStr for Charset {
    type Err = A2lError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Charset::from_name(name)
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf32Le => "UTF-32LE",
            Charset::Utf32Be => "UTF-32BE",
        };
        f.write_str(name)
    }
}
