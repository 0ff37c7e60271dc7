use serde::{Deserialize, Serialize};

use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SendFormat {
    #[default]
    Ascii,
    Hex,
}

impl SendFormat {
    pub const ALL: [SendFormat; 2] = [SendFormat::Ascii, SendFormat::Hex];

    pub fn label(&self) -> &'static str {
        match self {
            SendFormat::Ascii => "ASCII",
            SendFormat::Hex => "HEX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    None,
    Cr,
    Lf,
    #[default]
    CrLf,
}

impl LineEnding {
    pub const ALL: [LineEnding; 4] = [
        LineEnding::None,
        LineEnding::Cr,
        LineEnding::Lf,
        LineEnding::CrLf,
    ];

    pub fn bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::None => b"",
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }

    /// Escaped form shown in the selector
    pub fn label(&self) -> &'static str {
        match self {
            LineEnding::None => "None",
            LineEnding::Cr => "\\r",
            LineEnding::Lf => "\\n",
            LineEnding::CrLf => "\\r\\n",
        }
    }
}

/// Turn user input into the bytes written to the port.
///
/// ASCII input is sent as UTF-8 followed by the line ending. HEX input ignores
/// whitespace, must contain an even number of digits, and never gets a line
/// ending appended.
pub fn encode_command(
    text: &str,
    format: SendFormat,
    ending: LineEnding,
) -> Result<Vec<u8>, FormatError> {
    if text.is_empty() {
        return Err(FormatError::Empty);
    }

    match format {
        SendFormat::Ascii => {
            let mut data = text.as_bytes().to_vec();
            data.extend_from_slice(ending.bytes());
            Ok(data)
        }
        SendFormat::Hex => parse_hex(text),
    }
}

pub fn parse_hex(text: &str) -> Result<Vec<u8>, FormatError> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(FormatError::Empty);
    }
    if digits.len() % 2 != 0 {
        return Err(FormatError::OddLength(digits.len()));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(FormatError::InvalidHex(bad));
    }

    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, .. } => FormatError::InvalidHex(c),
        _ => FormatError::OddLength(digits.len()),
    })
}

/// Uppercase byte pairs separated by single spaces, e.g. `01 AB FF`
pub fn to_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_appends_line_ending() {
        let data = encode_command("AT", SendFormat::Ascii, LineEnding::CrLf).unwrap();
        assert_eq!(data, b"AT\r\n");
        let data = encode_command("AT", SendFormat::Ascii, LineEnding::None).unwrap();
        assert_eq!(data, b"AT");
        let data = encode_command("ping", SendFormat::Ascii, LineEnding::Lf).unwrap();
        assert_eq!(data, b"ping\n");
    }

    #[test]
    fn hex_ignores_whitespace_and_line_ending() {
        let data = encode_command("01 ab\tFF", SendFormat::Hex, LineEnding::CrLf).unwrap();
        assert_eq!(data, vec![0x01, 0xAB, 0xFF]);
    }

    #[test]
    fn hex_rejects_odd_length_and_bad_digits() {
        assert_eq!(
            encode_command("ABC", SendFormat::Hex, LineEnding::None),
            Err(FormatError::OddLength(3))
        );
        assert_eq!(
            encode_command("0G", SendFormat::Hex, LineEnding::None),
            Err(FormatError::InvalidHex('G'))
        );
    }

    #[test]
    fn odd_length_is_reported_before_bad_digits() {
        assert_eq!(parse_hex("ABG"), Err(FormatError::OddLength(3)));
        assert_eq!(parse_hex("AB G0"), Err(FormatError::InvalidHex('G')));
        assert_eq!(
            encode_command("   ", SendFormat::Hex, LineEnding::None),
            Err(FormatError::Empty)
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        assert_eq!(
            encode_command("", SendFormat::Ascii, LineEnding::CrLf),
            Err(FormatError::Empty)
        );
    }

    #[test]
    fn renders_hex_and_lossy_text() {
        assert_eq!(to_hex_string(&[0x00, 0x1f, 0xa0]), "00 1F A0");
        assert_eq!(to_hex_string(&[]), "");
        assert_eq!(decode_text(b"ok\xff"), "ok\u{FFFD}");
    }
}
