//! Standard Type 1 fonts, their metrics, and WinAnsi text encoding.
//!
//! Only the families the themes use are available. All fonts are declared
//! with `/WinAnsiEncoding`, which covers French accented letters and `€`.

/// A standard PDF font. Never embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
}

impl Font {
    pub const ALL: [Font; 6] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::HelveticaOblique,
        Font::TimesRoman,
        Font::TimesBold,
        Font::TimesItalic,
    ];

    /// Resource name used in content streams (`F1`..`F6`).
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
            Font::TimesRoman => "F4",
            Font::TimesBold => "F5",
            Font::TimesItalic => "F6",
        }
    }

    /// PostScript name written as `/BaseFont`.
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
            Font::TimesRoman => "Times-Roman",
            Font::TimesBold => "Times-Bold",
            Font::TimesItalic => "Times-Italic",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica | Font::HelveticaOblique => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
            Font::TimesRoman => &TIMES_ROMAN_WIDTHS,
            Font::TimesBold => &TIMES_BOLD_WIDTHS,
            Font::TimesItalic => &TIMES_ITALIC_WIDTHS,
        }
    }
}

// Adobe AFM advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

/// Width used for glyphs with no ASCII stand-in.
const FALLBACK_WIDTH: u16 = 500;

/// ASCII character whose advance width matches `ch` in the standard fonts.
/// Accented letters share their base letter's width; `€` matches a digit.
fn width_proxy(ch: char) -> Option<char> {
    let proxy = match ch {
        ' '..='~' => ch,
        '\u{a0}' | '\u{202f}' | '\u{2009}' | '\t' => ' ',
        'à'..='å' => 'a',
        'À'..='Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è'..='ë' => 'e',
        'È'..='Ë' => 'E',
        'ì'..='ï' => 'i',
        'Ì'..='Ï' => 'I',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'Ò'..='Ö' => 'O',
        'ù'..='ü' => 'u',
        'Ù'..='Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        '€' => '0',
        '‘' | '’' => '\'',
        '“' | '”' => '"',
        '–' => '-',
        _ => return None,
    };
    Some(proxy)
}

/// Advance width of `ch` in 1/1000 em.
pub fn char_width(font: Font, ch: char) -> u16 {
    match width_proxy(ch) {
        Some(p) => font.widths()[(p as u32 - 32) as usize],
        None => FALLBACK_WIDTH,
    }
}

fn text_units(text: &str, font: Font) -> u32 {
    text.chars().map(|c| char_width(font, c) as u32).sum()
}

fn units_to_points(units: u32, size: f64) -> f64 {
    units as f64 * size / 1000.0
}

/// Width of `text` in points.
pub fn measure(text: &str, font: Font, size: f64) -> f64 {
    units_to_points(text_units(text, font), size)
}

/// Baseline-to-baseline distance for a font size.
pub fn line_height(size: f64) -> f64 {
    size * 1.2
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept. A single word wider than the line is broken
/// between characters. Always returns at least one line.
pub fn wrap(text: &str, max_width: f64, font: Font, size: f64) -> Vec<String> {
    // Widths are summed in 1/1000 em so a line never drifts past `measure`.
    let fits = |units: u32| units_to_points(units, size) <= max_width;
    let mut lines = Vec::new();
    let space = char_width(font, ' ') as u32;

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut units = 0u32;
        for word in paragraph.split_whitespace() {
            let word_units = text_units(word, font);
            let needed = if line.is_empty() {
                word_units
            } else {
                units + space + word_units
            };
            if fits(needed) {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                units = needed;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if fits(word_units) {
                line.push_str(word);
                units = word_units;
                continue;
            }
            // Break an oversized word; the last piece starts the next line.
            units = 0;
            for ch in word.chars() {
                let w = char_width(font, ch) as u32;
                if !fits(units + w) && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    units = 0;
                }
                line.push(ch);
                units += w;
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Encode text for a WinAnsi-encoded font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\t' | '\u{202f}' | '\u{2009}' => b' ',
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => b'?',
        })
        .collect()
}
