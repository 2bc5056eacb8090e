#![forbid(unsafe_code)]

//! Word-spacing justification.
//!
//! [`expand_words`] pads an already-wrapped line out to an exact width by
//! inserting single spaces at word boundaries, cycling left to right so the
//! extra space is distributed evenly instead of piling up at one gap. The
//! boundary search walks the atomic-unit decomposition from
//! [`crate::escapes`], so embedded color codes are never mistaken for
//! boundaries and never split.
//!
//! [`squeeze_words`] is the inverse: it collapses double-space runs from
//! the right until the line fits, always leaving at least one space
//! between words.
//!
//! # Example
//! ```
//! use fmtblock::fill::{expand_words, find_word_end};
//!
//! assert_eq!(expand_words("This is a", 12), "This   is  a");
//!
//! let s = "this is a test";
//! let i = find_word_end(s, 2).unwrap();
//! assert_eq!((&s[..i], &s[i..]), ("this is", " a test"));
//! ```

use crate::escapes::{strip_codes, unit_spans};

/// Whether the span holds whitespace (codes never do).
fn span_is_space(text: &str, start: usize, end: usize, is_code: bool) -> bool {
    !is_code && text[start..end].chars().all(char::is_whitespace)
}

/// Byte offset just past the end of the `count`-th word.
///
/// The offset lands after the word's last display character, so any escape
/// codes trailing the word sit on the far side of the split. The last
/// word's trailing boundary never counts. Returns `Some(0)` for a single
/// space-free word, `None` for empty or whitespace-only text, and `None`
/// when the text ends inside a word before `count` boundaries were seen.
///
/// # Example
/// ```
/// use fmtblock::fill::find_word_end;
///
/// let s = "this is a test";
/// assert_eq!(find_word_end(s, 1), Some(4)); // "this" / " is a test"
/// assert_eq!(find_word_end(s, 2), Some(7)); // "this is" / " a test"
/// assert_eq!(find_word_end("test", 1), Some(0));
/// assert_eq!(find_word_end("      ", 1), None);
/// ```
#[must_use]
pub fn find_word_end(text: &str, count: usize) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    if !text.contains(' ') {
        return Some(0);
    }
    if text.trim().is_empty() {
        return None;
    }
    let count = count.max(1);
    let spans = unit_spans(text);
    let mut found = 0;
    let mut found_index = None;
    let mut in_word = false;

    for (i, span) in spans.iter().enumerate() {
        let is_space = span_is_space(text, span.start, span.end, span.is_code);
        if in_word && is_space {
            in_word = false;
            // Escape codes between the word and this space belong after
            // the boundary.
            let mut boundary = span.start;
            for prev in spans[..i].iter().rev() {
                if !prev.is_code {
                    boundary = prev.end;
                    break;
                }
            }
            found_index = Some(boundary);
            found += 1;
            if found == count {
                return found_index;
            }
        } else if !is_space {
            in_word = true;
        }
    }

    // Ended in trailing escape codes: rewind to the last display character.
    if spans.last().is_some_and(|span| span.is_code) {
        for prev in spans.iter().rev() {
            if !prev.is_code {
                return Some(prev.end);
            }
        }
    }

    if in_word { None } else { found_index }
}

/// Insert spaces between words until the line reaches `width` columns.
///
/// Width is measured on the code-stripped text. Boundaries are cycled left
/// to right, restarting at the first when the cycle passes the last; a line
/// with no internal boundary collects spaces at its front instead, and a
/// line that still holds only a single word when the target is reached is
/// returned with the inserted spaces removed — a lone word is not pushed to
/// the right edge. Empty and whitespace-only lines pass through unchanged.
///
/// Never removes a word and never shortens a multi-word line; the result
/// can exceed `width` only if the input already did.
#[must_use]
pub fn expand_words(line: &str, width: usize) -> String {
    if line.trim().is_empty() {
        return line.to_string();
    }
    let mut line = line.to_string();
    let mut word_i = 1;
    while strip_codes(&line).chars().count() < width {
        let mut word_end = find_word_end(&line, word_i);
        if word_end.is_none() {
            // Cycled past the last boundary; start over at the front.
            word_i = 1;
            word_end = find_word_end(&line, word_i);
        }
        match word_end {
            Some(idx) => {
                line.insert(idx, ' ');
                word_i += 1;
            }
            None => line.insert(0, ' '),
        }
    }
    if !strip_codes(&line).trim().contains(' ') {
        return line.replace(' ', "");
    }
    line
}

/// Collapse double spaces until the line fits `width` characters.
///
/// Runs are collapsed from the right, one pair at a time. At least one
/// space always remains between words, so the result may still exceed
/// `width`.
#[must_use]
pub fn squeeze_words(line: &str, width: usize) -> String {
    let mut line = line.to_string();
    while line.chars().count() > width {
        let Some(idx) = line.rfind("  ") else { break };
        line.replace_range(idx..idx + 2, " ");
    }
    line
}
