//! Standard Type1 fonts and their metrics
//!
//! Text annotations are drawn with the base-14 Helvetica faces, which every
//! PDF reader provides, so nothing has to be embedded beyond a font
//! dictionary. Strings are written in WinAnsiEncoding (cp1252); advance
//! widths come from oxidize-pdf's standard font metrics.

use crate::types::{AnnotateError, FontWeight, Result};
use oxidize_pdf::text::{Font, TextEncoding, measure_text};

/// One of the standard fonts used for annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Regular => StandardFont::Helvetica,
            FontWeight::Bold => StandardFont::HelveticaBold,
        }
    }

    /// PostScript name written to the font dictionary's /BaseFont
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn metrics_font(self) -> Font {
        match self {
            StandardFont::Helvetica => Font::Helvetica,
            StandardFont::HelveticaBold => Font::HelveticaBold,
        }
    }

    /// Width of `text` in points when set at `size`.
    ///
    /// Fails for characters that have no WinAnsiEncoding code.
    pub fn width_of_text_at_size(self, text: &str, size: f32) -> Result<f32> {
        encode_win_ansi(text)?;
        Ok(measure_text(text, self.metrics_font(), f64::from(size)) as f32)
    }
}

/// Map one character to its cp1252 code.
///
/// Control characters and anything cp1252 cannot represent are rejected.
fn encode_char(c: char) -> Result<u8> {
    if c.is_control() {
        return Err(AnnotateError::UnsupportedCharacter(c));
    }
    let mut buf = [0u8; 4];
    match TextEncoding::WinAnsiEncoding.encode(c.encode_utf8(&mut buf)).as_slice() {
        // unmapped characters come back as '?'
        [b'?'] if c != '?' => Err(AnnotateError::UnsupportedCharacter(c)),
        [code] => Ok(*code),
        _ => Err(AnnotateError::UnsupportedCharacter(c)),
    }
}

/// Encode `text` as cp1252 bytes
pub(crate) fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars().map(encode_char).collect()
}

/// Encode `text` as the body of a PDF literal string.
///
/// Delimiters and the backslash are escaped, bytes above 0x7E are written
/// as octal escapes so the content stream stays ASCII.
pub(crate) fn encode_literal(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for code in encode_win_ansi(text)? {
        match code {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(char::from(code));
            }
            0x20..=0x7E => out.push(char::from(code)),
            _ => out.push_str(&format!("\\{:03o}", code)),
        }
    }
    Ok(out)
}

/// A font registered with a canvas, ready to draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle {
    pub font: StandardFont,
    /// Canvas-specific slot identifying the registered font
    pub slot: usize,
}

impl FontHandle {
    pub fn width_of_text_at_size(&self, text: &str, size: f32) -> Result<f32> {
        self.font.width_of_text_at_size(text, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_widths_match_between_weights() {
        for c in '0'..='9' {
            let text = c.to_string();
            let regular = StandardFont::Helvetica.width_of_text_at_size(&text, 1000.0).unwrap();
            let bold = StandardFont::HelveticaBold
                .width_of_text_at_size(&text, 1000.0)
                .unwrap();
            assert_eq!(regular, 556.0);
            assert_eq!(bold, 556.0);
        }
    }

    #[test]
    fn test_width_depends_on_weight() {
        let regular = StandardFont::Helvetica
            .width_of_text_at_size("Chapter", 10.0)
            .unwrap();
        let bold = StandardFont::HelveticaBold
            .width_of_text_at_size("Chapter", 10.0)
            .unwrap();
        // C h a p t e r
        assert!((regular - 35.57).abs() < 1e-3);
        assert!((bold - 37.78).abs() < 1e-3);
    }

    #[test]
    fn test_width_scales_with_size() {
        let w12 = StandardFont::Helvetica.width_of_text_at_size("12", 12.0).unwrap();
        let w24 = StandardFont::Helvetica.width_of_text_at_size("12", 24.0).unwrap();
        assert!((w12 - 13.344).abs() < 1e-4);
        assert!((w24 - 2.0 * w12).abs() < 1e-4);
    }

    #[test]
    fn test_latin1_text_is_measured() {
        let width = StandardFont::Helvetica
            .width_of_text_at_size("Café – Résumé ©", 10.0)
            .unwrap();
        assert!(width > 0.0);
    }

    #[test]
    fn test_win_ansi_codes() {
        assert_eq!(encode_win_ansi("é").unwrap(), vec![0xE9]);
        assert_eq!(encode_win_ansi("©").unwrap(), vec![0xA9]);
        assert_eq!(encode_win_ansi("–").unwrap(), vec![0x96]);
        assert_eq!(encode_win_ansi("€").unwrap(), vec![0x80]);
        assert_eq!(encode_win_ansi("?").unwrap(), vec![b'?']);
    }

    #[test]
    fn test_unsupported_character() {
        let err = StandardFont::Helvetica
            .width_of_text_at_size("日本", 10.0)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::UnsupportedCharacter('日')));
    }

    #[test]
    fn test_encode_literal_escapes_delimiters() {
        assert_eq!(encode_literal(r"a(b)\c").unwrap(), r"a\(b\)\\c");
        assert_eq!(encode_literal("© 2024").unwrap(), r"\251 2024");
        assert!(encode_literal("tab\there").is_err());
    }
}
