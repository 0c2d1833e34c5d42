//! Text encoding and line breaking for the standard Helvetica fonts.

/// Advance widths (1/1000 em) of Helvetica for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths of Helvetica-Bold for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica widths for WinAnsi 0xA0..=0xFF.
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // '\u{a0}'..'\u{af}'
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // '\u{b0}'..'\u{bf}'
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 'À'..'Ï'
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 'Ð'..'ß'
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 'à'..'ï'
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 'ð'..'ÿ'
];

/// Helvetica-Bold widths for WinAnsi 0xA0..=0xFF.
const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // '\u{a0}'..'\u{af}'
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // '\u{b0}'..'\u{bf}'
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 'À'..'Ï'
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 'Ð'..'ß'
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 'à'..'ï'
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 'ð'..'ÿ'
];

const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name used in content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn glyph_width(&self, byte: u8) -> u16 {
        let bold = *self == Font::HelveticaBold;
        let (ascii, latin1) = if bold {
            (&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_LATIN1_WIDTHS)
        } else {
            (&HELVETICA_WIDTHS, &HELVETICA_LATIN1_WIDTHS)
        };
        match byte {
            32..=126 => ascii[(byte - 32) as usize],
            0xa0..=0xff => latin1[(byte - 0xa0) as usize],
            // The typographic slots produced by encode_win_ansi
            0x80 => 556,
            0x91 | 0x92 => if bold { 278 } else { 222 },
            0x93 | 0x94 => if bold { 500 } else { 333 },
            0x95 => 350,
            0x96 => 556,
            0x97 | 0x85 => 1000,
            _ => FALLBACK_WIDTH,
        }
    }

    /// Width in points of already-encoded text at `size`.
    pub fn measure(&self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|b| self.glyph_width(*b) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Map text to WinAnsi bytes for the standard fonts.
///
/// Latin-1 characters map to themselves; a few common typographic characters
/// are mapped to their WinAnsi slots; anything else becomes `?`. Control
/// characters (tabs included) become spaces so they cannot affect layout.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            c if c.is_control() => b' ',
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            _ => b'?',
        })
        .collect()
}

/// Break one paragraph (no newlines) into lines no wider than `max_width`.
///
/// Words longer than a line are split by character.
pub fn wrap(encoded: &[u8], font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = vec![];
    let mut current: Vec<u8> = vec![];

    for word in encoded.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let mut candidate = current.clone();
        if !candidate.is_empty() {
            candidate.push(b' ');
        }
        candidate.extend_from_slice(word);

        if font.measure(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if font.measure(word, size) <= max_width {
            current = word.to_vec();
            continue;
        }

        for byte in word {
            current.push(*byte);
            if font.measure(&current, size) > max_width && current.len() > 1 {
                let overflow = current.pop();
                lines.push(std::mem::take(&mut current));
                current.extend(overflow);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_latin1_and_replaces_rest() {
        assert_eq!(encode_win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("a\tb\u{7}"), b"a b ".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("\u{2014}"), vec![0x97]);
    }

    #[test]
    fn test_measure() {
        // "Hi" = H(722) + i(222)
        let w = Font::Helvetica.measure(b"Hi", 10.0);
        assert!((w - 9.44).abs() < 1e-4);
        assert!(Font::HelveticaBold.measure(b"Hi", 10.0) > w);
    }

    #[test]
    fn test_measure_latin1() {
        // Æ is a full em wide, é matches e
        assert!((Font::Helvetica.measure(&encode_win_ansi("Æ"), 10.0) - 10.0).abs() < 1e-4);
        assert_eq!(
            Font::Helvetica.measure(&encode_win_ansi("é"), 10.0),
            Font::Helvetica.measure(b"e", 10.0)
        );
        assert!((Font::HelveticaBold.measure(&encode_win_ansi("ñ"), 10.0) - 6.11).abs() < 1e-4);
        assert!((Font::Helvetica.measure(&encode_win_ansi("\u{2014}"), 10.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_wide_latin1_stays_in_column() {
        let text = encode_win_ansi(&vec!["ÆÆÆÆ"; 20].join(" "));
        let lines = wrap(&text, Font::Helvetica, 12.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Helvetica.measure(line, 12.0) <= 100.0);
        }
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = wrap(b"Rust and SQL", Font::Helvetica, 10.0, 400.0);
        assert_eq!(lines, vec![b"Rust and SQL".to_vec()]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = b"alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let lines = wrap(text, Font::Helvetica, 12.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Helvetica.measure(line, 12.0) <= 100.0);
        }
        let rejoined: Vec<u8> = lines.join(&b' ');
        assert_eq!(rejoined, text.to_vec());
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let word = vec![b'm'; 60];
        let lines = wrap(&word, Font::Helvetica, 12.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(|l| l.len()).sum::<usize>(), 60);
    }

    #[test]
    fn test_wrap_empty_yields_single_blank_line() {
        assert_eq!(wrap(b"", Font::Helvetica, 12.0, 100.0), vec![Vec::<u8>::new()]);
    }
}
