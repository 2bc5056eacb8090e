#![forbid(unsafe_code)]

//! Terminal escape-code indexing.
//!
//! This module recognizes a fixed grammar of CSI escape sequences and lets
//! the wrapping/filling algorithms treat a multi-character code as a single
//! atomic, zero-width unit:
//!
//! - SGR color/attribute sequences (`CSI Ps ; ... m`)
//! - cursor show/hide (`CSI ?25h`, `CSI ?25l`)
//! - cursor position (`CSI Pr ; Pc H`, `CSI Pr ; Pc f`)
//! - save/restore cursor (`CSI s`, `CSI u`)
//! - single-parameter movement/erase (`CSI Ps A..T`)
//!
//! Rather than stripping codes (which would lose styling), [`unit_indices`]
//! decomposes a string into atomic units — one display character or one
//! whole code — so a caller can insert a space or line break *between*
//! units without ever bisecting a code.
//!
//! Text that merely looks like an escape sequence but does not fully match
//! the grammar is ordinary text; nothing in here can fail.
//!
//! # Example
//! ```
//! use fmtblock::escapes::{is_escape_code, strip_codes, unit_indices};
//!
//! assert!(is_escape_code("\x1b[31m"));
//! assert_eq!(strip_codes("\x1b[31mred\x1b[0m"), "red");
//!
//! // 2 codes + 3 characters = 5 atomic units
//! assert_eq!(unit_indices("\x1b[31mred\x1b[0m").len(), 5);
//! ```

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// One atomic unit of a decomposed string.
///
/// A unit is either one display character (a grapheme cluster, one column
/// wide) or one whole escape sequence (zero columns wide).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    /// One display character.
    Grapheme(&'a str),
    /// One complete color escape sequence.
    Code(&'a str),
}

impl<'a> Unit<'a> {
    /// The unit's literal text.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Grapheme(s) | Self::Code(s) => s,
        }
    }

    /// Whether this unit is an escape sequence.
    #[inline]
    #[must_use]
    pub const fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }

    /// Display columns occupied by this unit.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> usize {
        match self {
            Self::Grapheme(_) => 1,
            Self::Code(_) => 0,
        }
    }
}

/// Byte span of one unit within the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnitSpan {
    pub start: usize,
    pub end: usize,
    pub is_code: bool,
}

/// Length of a run of ASCII digits at the start of `rest`.
fn digit_run(rest: &[u8]) -> usize {
    rest.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of a run of ASCII digits and semicolons at the start of `rest`.
fn digit_semi_run(rest: &[u8]) -> usize {
    rest.iter()
        .take_while(|&&b| b.is_ascii_digit() || b == b';')
        .count()
}

/// SGR (`CSI Ps ; ... m`): optional digits/semicolons terminated by `m`.
fn sgr_alt(rest: &[u8]) -> Option<usize> {
    let n = digit_semi_run(rest);
    (rest.get(n) == Some(&b'm')).then_some(n + 1)
}

/// DECTCEM show/hide (`CSI ?25h` / `CSI ?25l`).
fn show_hide_alt(rest: &[u8]) -> Option<usize> {
    (rest.starts_with(b"?25l") || rest.starts_with(b"?25h")).then_some(4)
}

/// CUP/HVP (`CSI Pr ; Pc H` / `CSI Pr ; Pc f`): optional `row;`, then `col`,
/// terminated by `H` or `f`.
fn position_alt(rest: &[u8]) -> Option<usize> {
    let first = digit_run(rest);
    if first == 0 {
        return None;
    }
    let mut i = first;
    if rest.get(i) == Some(&b';') {
        let second = digit_run(&rest[i + 1..]);
        if second == 0 {
            return None;
        }
        i += 1 + second;
    }
    matches!(rest.get(i), Some(b'H') | Some(b'f')).then_some(i + 1)
}

/// DECSC/DECRC (`CSI s` / `CSI u`): save/restore cursor position.
fn save_restore_alt(rest: &[u8]) -> Option<usize> {
    matches!(rest.first(), Some(b's') | Some(b'u')).then_some(1)
}

/// Movement/erase (`CSI Ps A..T`): digits terminated by one of a fixed
/// letter set.
fn motion_alt(rest: &[u8]) -> Option<usize> {
    let n = digit_run(rest);
    if n == 0 {
        return None;
    }
    matches!(
        rest.get(n),
        Some(b'A' | b'B' | b'C' | b'D' | b'E' | b'F' | b'G' | b'H' | b'J' | b'K' | b'S' | b'T')
    )
    .then_some(n + 1)
}

/// Byte length of a full-grammar escape sequence at the start of `s`.
///
/// Alternatives are tried in grammar order; the first match wins.
fn full_code_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix("\x1b[")?.as_bytes();
    for alt in [
        sgr_alt,
        show_hide_alt,
        position_alt,
        save_restore_alt,
        motion_alt,
    ] {
        if let Some(len) = alt(rest) {
            return Some(2 + len);
        }
    }
    None
}

/// Byte length of a color-subset escape sequence at the start of `s`.
///
/// The subset is stricter than the SGR form of the full grammar: at least
/// one parameter character is required before the `m` terminator.
fn color_code_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix("\x1b[")?.as_bytes();
    let n = digit_semi_run(rest);
    (n > 0 && rest.get(n) == Some(&b'm')).then_some(2 + n + 1)
}

/// Returns whether `s` starts with a recognized escape sequence.
///
/// This is a classification predicate, not a search: trailing text after
/// the code does not affect the result.
#[must_use]
pub fn is_escape_code(s: &str) -> bool {
    full_code_len(s).is_some()
}

/// Byte offset and literal text of every color code in `s`, left to right.
///
/// Matches never overlap: scanning resumes past the end of each code.
#[must_use]
pub fn code_indices(s: &str) -> Vec<(usize, &str)> {
    let mut codes = Vec::new();
    let mut i = 0;
    while let Some(off) = s[i..].find('\x1b') {
        let start = i + off;
        match color_code_len(&s[start..]) {
            Some(len) => {
                codes.push((start, &s[start..start + len]));
                i = start + len;
            }
            None => i = start + 1,
        }
    }
    codes
}

/// Every color code in `s`, in left-to-right order.
///
/// Empty when none are present.
#[must_use]
pub fn find_codes(s: &str) -> SmallVec<[&str; 4]> {
    code_indices(s).into_iter().map(|(_, code)| code).collect()
}

/// Byte spans of the full unit decomposition of `s`.
///
/// Covers every byte with no gaps and no overlaps.
pub(crate) fn unit_spans(s: &str) -> Vec<UnitSpan> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < s.len() {
        if let Some(len) = color_code_len(&s[i..]) {
            spans.push(UnitSpan {
                start: i,
                end: i + len,
                is_code: true,
            });
            i += len;
        } else if let Some(g) = s[i..].graphemes(true).next() {
            spans.push(UnitSpan {
                start: i,
                end: i + g.len(),
                is_code: false,
            });
            i += g.len();
        } else {
            break;
        }
    }
    spans
}

/// Full ordered decomposition of `s` into atomic units.
///
/// The vector position is the sequential unit index. Characters between two
/// codes (or before the first / after the last) each get their own unit;
/// with no codes present this degenerates to one unit per display
/// character. Reassembling the units in order reproduces `s` exactly.
#[must_use]
pub fn unit_indices(s: &str) -> Vec<Unit<'_>> {
    unit_spans(s)
        .into_iter()
        .map(|span| {
            let text = &s[span.start..span.end];
            if span.is_code {
                Unit::Code(text)
            } else {
                Unit::Grapheme(text)
            }
        })
        .collect()
}

/// Returns `s` with every recognized escape sequence removed.
///
/// Idempotent; an empty input gives an empty output.
#[must_use]
pub fn strip_codes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        match s[i..].find('\x1b') {
            Some(off) => {
                let start = i + off;
                out.push_str(&s[i..start]);
                match full_code_len(&s[start..]) {
                    Some(len) => i = start + len,
                    None => {
                        out.push('\x1b');
                        i = start + 1;
                    }
                }
            }
            None => {
                out.push_str(&s[i..]);
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // is_escape_code tests
    // ==========================================================================

    #[test]
    fn classifies_color_codes() {
        assert!(is_escape_code("\x1b[31m"));
        assert!(is_escape_code("\x1b[38;5;57m"));
        assert!(is_escape_code("\x1b[m"));
    }

    #[test]
    fn classifies_cursor_codes() {
        assert!(is_escape_code("\x1b[?25l"));
        assert!(is_escape_code("\x1b[?25h"));
        assert!(is_escape_code("\x1b[3;9H"));
        assert!(is_escape_code("\x1b[12f"));
        assert!(is_escape_code("\x1b[s"));
        assert!(is_escape_code("\x1b[u"));
        assert!(is_escape_code("\x1b[2J"));
        assert!(is_escape_code("\x1b[10A"));
    }

    #[test]
    fn classification_is_a_prefix_test() {
        assert!(is_escape_code("\x1b[31mtrailing text"));
    }

    #[test]
    fn rejects_non_codes() {
        assert!(!is_escape_code("plain text"));
        assert!(!is_escape_code("\x1b["));
        assert!(!is_escape_code("\x1b[31x"));
        assert!(!is_escape_code("\x1b[J"));
        assert!(!is_escape_code(""));
    }

    // ==========================================================================
    // find_codes / code_indices tests
    // ==========================================================================

    #[test]
    fn finds_codes_in_order() {
        let s = "\x1b[31mred\x1b[0m plain \x1b[1;34mblue\x1b[0m";
        let codes = find_codes(s);
        assert_eq!(
            codes.as_slice(),
            &["\x1b[31m", "\x1b[0m", "\x1b[1;34m", "\x1b[0m"]
        );
    }

    #[test]
    fn finds_nothing_in_plain_text() {
        assert!(find_codes("no codes here").is_empty());
    }

    #[test]
    fn color_subset_requires_parameters() {
        // "\x1b[m" matches the full grammar but not the color subset.
        assert!(find_codes("\x1b[m").is_empty());
        assert!(is_escape_code("\x1b[m"));
    }

    #[test]
    fn color_subset_ignores_cursor_codes() {
        assert!(find_codes("\x1b[2J\x1b[?25l").is_empty());
    }

    #[test]
    fn code_indices_reports_byte_offsets() {
        let s = "ab\x1b[31mcd\x1b[0m";
        assert_eq!(
            code_indices(s),
            vec![(2, "\x1b[31m"), (9, "\x1b[0m")]
        );
    }

    // ==========================================================================
    // unit_indices tests
    // ==========================================================================

    #[test]
    fn decomposes_plain_text_per_character() {
        let units = unit_indices("abc");
        assert_eq!(
            units,
            vec![Unit::Grapheme("a"), Unit::Grapheme("b"), Unit::Grapheme("c")]
        );
    }

    #[test]
    fn decomposes_codes_as_single_units() {
        let units = unit_indices("\x1b[31mab\x1b[0m");
        assert_eq!(
            units,
            vec![
                Unit::Code("\x1b[31m"),
                Unit::Grapheme("a"),
                Unit::Grapheme("b"),
                Unit::Code("\x1b[0m"),
            ]
        );
    }

    #[test]
    fn units_reassemble_to_original() {
        let s = "\x1b[38;5;57mT\x1b[0mhis is \x1b[1;32ma\x1b[0m test";
        let rebuilt: String = unit_indices(s).iter().map(|u| u.as_str()).collect();
        assert_eq!(rebuilt, s);
    }

    #[test]
    fn unit_columns() {
        assert_eq!(Unit::Grapheme("a").columns(), 1);
        assert_eq!(Unit::Code("\x1b[0m").columns(), 0);
    }

    #[test]
    fn grapheme_clusters_stay_whole() {
        // e + combining acute accent is one display character.
        let units = unit_indices("e\u{301}x");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0], Unit::Grapheme("e\u{301}"));
    }

    #[test]
    fn lone_escape_is_an_ordinary_character() {
        let units = unit_indices("a\x1bb");
        assert_eq!(units.len(), 3);
        assert!(!units[1].is_code());
    }

    // ==========================================================================
    // strip_codes tests
    // ==========================================================================

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_codes("\x1b[31mred\x1b[0m"), "red");
    }

    #[test]
    fn strips_full_grammar() {
        assert_eq!(strip_codes("\x1b[2J\x1b[3;9Hhome\x1b[?25l"), "home");
        assert_eq!(strip_codes("\x1b[s\x1b[10Btext\x1b[u"), "text");
    }

    #[test]
    fn strip_is_idempotent() {
        let s = "\x1b[31ma\x1b[0m b \x1b[2Jc";
        assert_eq!(strip_codes(&strip_codes(s)), strip_codes(s));
    }

    #[test]
    fn strip_keeps_near_miss_sequences() {
        // Not a full grammar match: the ESC stays.
        assert_eq!(strip_codes("\x1b[31xtext"), "\x1b[31xtext");
    }

    #[test]
    fn strip_empty() {
        assert_eq!(strip_codes(""), "");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Plain text interleaved with well-formed color codes.
    fn colored_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                "[a-zA-Z ]{0,8}".prop_map(String::from),
                (0u8..=107u8).prop_map(|n| format!("\x1b[{n}m")),
            ],
            0..8,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn units_always_round_trip(s in "\\PC*") {
            let rebuilt: String = unit_indices(&s).iter().map(|u| u.as_str()).collect();
            prop_assert_eq!(rebuilt, s);
        }

        #[test]
        fn units_round_trip_colored(s in colored_text()) {
            let rebuilt: String = unit_indices(&s).iter().map(|u| u.as_str()).collect();
            prop_assert_eq!(rebuilt, s);
        }

        #[test]
        fn strip_idempotent(s in colored_text()) {
            let once = strip_codes(&s);
            prop_assert_eq!(strip_codes(&once), once);
        }

        #[test]
        fn stripped_output_has_no_codes(s in colored_text()) {
            prop_assert!(find_codes(&strip_codes(&s)).is_empty());
        }

        #[test]
        fn found_codes_classify_as_codes(s in colored_text()) {
            for code in find_codes(&s) {
                prop_assert!(is_escape_code(code));
            }
        }
    }
}
