//! Static glyph-width tables for the two standard PDF fonts the summary uses.
//!
//! Widths come from the Adobe core-font AFM files, in thousandths of an em.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Anything else is measured as
//! `average_char_width`, which matches how `sanitize` replaces it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFont {
    Helvetica,
    HelveticaBold,
}

impl PdfFont {
    /// Resource name used in page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "F1",
            PdfFont::HelveticaBold => "F2",
        }
    }

    /// PostScript base font name.
    pub fn base_font(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "Helvetica",
            PdfFont::HelveticaBold => "Helvetica-Bold",
        }
    }
}

pub struct FontMetricTable {
    widths: [u16; 95],
    average_char_width: u16,
}

impl FontMetricTable {
    /// Width of `s` in points at `size_pt`.
    pub fn measure_str(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_char_width as u32
                }
            })
            .sum();
        units as f32 * size_pt / 1000.0
    }

    /// Greedy word-wrap of `text` into lines no wider than `max_width_pt`.
    ///
    /// Explicit newlines start a new line; blank input lines are preserved as
    /// empty strings. Words wider than a whole line are split by character.
    pub fn wrap(&self, text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let space = self.measure_str(" ", size_pt);
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            let mut current_width = 0.0_f32;

            for word in paragraph.split_whitespace() {
                for piece in self.split_long_word(word, size_pt, max_width_pt) {
                    let piece_width = self.measure_str(&piece, size_pt);
                    if current.is_empty() {
                        current_width = piece_width;
                        current = piece;
                    } else if current_width + space + piece_width <= max_width_pt {
                        current.push(' ');
                        current.push_str(&piece);
                        current_width += space + piece_width;
                    } else {
                        lines.push(std::mem::take(&mut current));
                        current_width = piece_width;
                        current = piece;
                    }
                }
            }
            lines.push(current);
        }

        lines
    }

    fn split_long_word(&self, word: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        if self.measure_str(word, size_pt) <= max_width_pt {
            return vec![word.to_string()];
        }
        let mut pieces = Vec::new();
        let mut piece = String::new();
        for c in word.chars() {
            let mut candidate = piece.clone();
            candidate.push(c);
            if !piece.is_empty() && self.measure_str(&candidate, size_pt) > max_width_pt {
                pieces.push(std::mem::take(&mut piece));
                piece.push(c);
            } else {
                piece = candidate;
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

/// Width slot layout (see module docs):
/// ```text
/// [0]=sp [1]=! [2]=" [3]=# [4]=$ [5]=% [6]=& [7]=' [8]=( [9]=) [10]=* [11]=+
/// [12]=, [13]=- [14]=. [15]=/ [16..25]=0-9 [26]=: [27]=; [28]=< [29]== [30]=>
/// [31]=? [32]=@ [33..58]=A-Z [59]=[ [60]=\ [61]=] [62]=^ [63]=_ [64]=`
/// [65..90]=a-z [91]={ [92]=| [93]=} [94]=~
/// ```
static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, // sp .. +
        278, 333, 278, 278, // , - . /
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
        334, 260, 334, 584, // { | } ~
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, // sp .. +
        278, 333, 278, 278, // , - . /
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
        389, 280, 389, 584, // { | } ~
    ],
    average_char_width: 611,
};

pub fn get_metrics(font: PdfFont) -> &'static FontMetricTable {
    match font {
        PdfFont::Helvetica => &HELVETICA,
        PdfFont::HelveticaBold => &HELVETICA_BOLD,
    }
}

/// Maps text onto the printable ASCII range the standard fonts are measured for.
/// Typographic quotes and dashes get ASCII stand-ins; other characters become `?`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' => Some('-'),
            '\u{2022}' => Some('*'),
            '\u{00A0}' | '\t' => Some(' '),
            '\r' => None,
            '\n' => Some('\n'),
            c if (' '..='~').contains(&c) => Some(c),
            _ => Some('?'),
        })
        .collect()
}
